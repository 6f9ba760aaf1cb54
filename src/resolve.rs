//! SLD resolution with negation-as-failure.
//!
//! `solve` walks a goal list depth-first, left to right, producing every
//! environment that satisfies it. Clause selection tries the program's
//! clauses in source order; each attempt gets its own fresh variable
//! renaming so two calls to the same clause never alias each other's
//! variables. A negated goal (`\+`) succeeds with no new bindings iff its
//! own sub-resolution, run to exhaustion, yields zero solutions.

use crate::builtins::lookup_builtin;
use crate::clause::Goal;
use crate::env::{new_env, Env};
use crate::rename::rename_clause;
use crate::state::StateManager;
use crate::term::{Term, TermArena};
use crate::unify::unify;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};

/// Resolution-wide context threaded through every builtin call. Carries no
/// arena-tied lifetime: the RNG and state manager outlive any single
/// resolution and are shared by interior mutability rather than `&mut`,
/// since goal branches fan out and each needs its own read of the same
/// state.
pub struct Context {
    pub bpm: f64,
    pub now: f64,
    pub rng: RefCell<StdRng>,
    pub state: StateManager,
    var_counter: Cell<u64>,
}

impl Context {
    pub fn new(bpm: f64) -> Self {
        Context {
            bpm,
            now: 0.0,
            rng: RefCell::new(StdRng::from_entropy()),
            state: StateManager::new(),
            var_counter: Cell::new(0),
        }
    }

    pub fn with_seed(bpm: f64, seed: u64) -> Self {
        Context {
            bpm,
            now: 0.0,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            state: StateManager::new(),
            var_counter: Cell::new(0),
        }
    }

    fn next_suffix(&self) -> u64 {
        let n = self.var_counter.get();
        self.var_counter.set(n + 1);
        n
    }
}

/// A program together with the arena its terms are allocated in — the unit
/// the resolver needs to try clauses and build renamed instances.
///
/// Two lifetimes are tracked separately: `'a` is the arena/term lifetime
/// (how long the actual term data is valid for), while `'p` is only how
/// long the `clauses` slice itself needs to be borrowed for — usually just
/// one resolver call. A type holding its clauses behind a shorter-lived
/// `&'p` borrow (see [`crate::scheduler::CompiledProgram`]) can still hand
/// out a `Program` here without needing its own borrow to last as long as
/// the arena.
pub struct Program<'p, 'a> {
    pub clauses: &'p [crate::clause::Clause<'a>],
    pub arena: &'a TermArena,
}

/// Finds every environment extending `env` that satisfies `goals` in order.
pub fn solve<'p, 'a>(
    goals: &[Goal<'a>],
    env: Env<'a>,
    program: &Program<'p, 'a>,
    ctx: &Context,
) -> Vec<Env<'a>> {
    match goals.split_first() {
        None => vec![env],
        Some((first, rest)) => {
            let heads = solve_one(first, env, program, ctx);
            heads
                .into_iter()
                .flat_map(|e| solve(rest, e, program, ctx))
                .collect()
        }
    }
}

fn solve_one<'p, 'a>(
    goal: &Goal<'a>,
    env: Env<'a>,
    program: &Program<'p, 'a>,
    ctx: &Context,
) -> Vec<Env<'a>> {
    match goal {
        Goal::Pos(t) => solve_term(t, env, program, ctx),
        Goal::Neg(alternatives) => {
            for alt in alternatives {
                if !solve(alt, env.clone(), program, ctx).is_empty() {
                    return vec![];
                }
            }
            vec![env]
        }
    }
}

fn solve_term<'p, 'a>(
    t: &'a Term<'a>,
    env: Env<'a>,
    program: &Program<'p, 'a>,
    ctx: &Context,
) -> Vec<Env<'a>> {
    let (functor, args): (&str, &[&Term]) = match *t {
        Term::Compound(f, a) => (f, a),
        Term::Atom(a) => (a, &[]),
        _ => return vec![],
    };

    if let Some(builtin) = lookup_builtin(functor, args.len()) {
        return builtin(args, &env, ctx, program.arena);
    }

    let mut out = Vec::new();
    for clause in program.clauses {
        let renamed = rename_clause(clause, program.arena, ctx.next_suffix());
        if let Some(extended) = unify(t, renamed.head, env.clone(), program.arena) {
            out.extend(solve(&renamed.body, extended, program, ctx));
        }
    }
    out
}

/// Solves `goals` against an empty starting environment (the entry point
/// used to evaluate a top-level query).
pub fn solve_query<'p, 'a>(goals: &[Goal<'a>], program: &Program<'p, 'a>, ctx: &Context) -> Vec<Env<'a>> {
    solve(goals, new_env(), program, ctx)
}
