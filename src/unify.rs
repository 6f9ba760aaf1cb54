//! Substitution and unification.
//!
//! The unifier does **not** perform an occurs check: a self-referential
//! binding simply produces a term that grows without bound under repeated
//! substitution rather than failing. Adding the check is a one-line change
//! (see `occurs` below) but is kept opt-in since nothing in this language
//! relies on cyclic terms to begin with.

use crate::env::Env;
use crate::term::{Term, TermArena};

/// Absolute tolerance for numeric equality during unification.
pub const NUM_TOLERANCE: f64 = 1e-9;

/// Follows a chain of variable bindings to the current value, without
/// rebuilding any surrounding structure. Stops at the first non-variable
/// term, or at the first variable with no binding in `env`.
pub fn deref<'a>(t: &'a Term<'a>, env: &Env<'a>) -> &'a Term<'a> {
    let mut cur = t;
    while let Term::Var(name) = *cur {
        match env.get(name) {
            Some(&bound) => cur = bound,
            None => break,
        }
    }
    cur
}

/// Rebuilds `t` with every bound variable replaced by its value, recursing
/// through chains of bindings, in `arena`. Atoms and numbers pass through
/// by reference — they never need rebuilding.
pub fn subst<'a>(t: &'a Term<'a>, env: &Env<'a>, arena: &'a TermArena) -> &'a Term<'a> {
    match *t {
        Term::Num(_) | Term::Atom(_) => t,
        Term::Var(name) => match env.get(name) {
            Some(&bound) => subst(bound, env, arena),
            None => t,
        },
        Term::Compound(functor, args) => {
            let new_args: Vec<&Term> = args.iter().map(|a| subst(a, env, arena)).collect();
            arena.compound(functor, &new_args)
        }
        Term::List(items, tail) => {
            let new_items: Vec<&Term> = items.iter().map(|i| subst(i, env, arena)).collect();
            let new_tail = tail.map(|t| subst(t, env, arena));
            arena.list(&new_items, new_tail)
        }
        Term::Expr(op, l, r) => {
            let nl = subst(l, env, arena);
            let nr = subst(r, env, arena);
            arena.expr(op, nl, nr)
        }
    }
}

/// Attempts to unify `a` and `b` under `env`, returning the extended
/// environment on success. `env` is consumed and either discarded (on
/// failure) or returned extended — callers that need to keep the original
/// around should clone it first; backtracking is expressed by discarding
/// clones rather than undoing bindings in place.
pub fn unify<'a>(
    a: &'a Term<'a>,
    b: &'a Term<'a>,
    mut env: Env<'a>,
    arena: &'a TermArena,
) -> Option<Env<'a>> {
    let da = deref(a, &env);
    let db = deref(b, &env);

    match (*da, *db) {
        (Term::Var(x), Term::Var(y)) if x == y => Some(env),
        (Term::Var(x), _) => {
            env.insert(x, db);
            Some(env)
        }
        (_, Term::Var(y)) => {
            env.insert(y, da);
            Some(env)
        }
        (Term::Num(n1), Term::Num(n2)) => {
            if (n1 - n2).abs() < NUM_TOLERANCE {
                Some(env)
            } else {
                None
            }
        }
        (Term::Atom(s1), Term::Atom(s2)) => {
            if s1 == s2 {
                Some(env)
            } else {
                None
            }
        }
        (Term::Expr(op1, l1, r1), Term::Expr(op2, l2, r2)) => {
            if op1 != op2 {
                return None;
            }
            let env = unify(l1, l2, env, arena)?;
            unify(r1, r2, env, arena)
        }
        (Term::Compound(f1, args1), Term::Compound(f2, args2)) => {
            if f1 != f2 || args1.len() != args2.len() {
                return None;
            }
            let mut env = env;
            for (x, y) in args1.iter().zip(args2.iter()) {
                env = unify(x, y, env, arena)?;
            }
            Some(env)
        }
        (Term::List(items1, tail1), Term::List(items2, tail2)) => {
            unify_lists(items1, tail1, items2, tail2, env, arena)
        }
        _ => None,
    }
}

/// Open-tail list unification: if lengths differ, the shorter side must
/// carry a tail that unifies with the remainder of the longer side (itself
/// wrapped as a list carrying the longer side's own tail). If lengths
/// match, tails unify pairwise, with a missing tail treated as `[]`.
fn unify_lists<'a>(
    items1: &'a [&'a Term<'a>],
    tail1: Option<&'a Term<'a>>,
    items2: &'a [&'a Term<'a>],
    tail2: Option<&'a Term<'a>>,
    env: Env<'a>,
    arena: &'a TermArena,
) -> Option<Env<'a>> {
    if items1.len() == items2.len() {
        let mut env = env;
        for (x, y) in items1.iter().zip(items2.iter()) {
            env = unify(x, y, env, arena)?;
        }
        return match (tail1, tail2) {
            (Some(t1), Some(t2)) => unify(t1, t2, env, arena),
            (Some(t1), None) => unify(t1, arena.list(&[], None), env, arena),
            (None, Some(t2)) => unify(t2, arena.list(&[], None), env, arena),
            (None, None) => Some(env),
        };
    }

    let (shorter_items, shorter_tail, longer_items, longer_tail) = if items1.len() < items2.len() {
        (items1, tail1, items2, tail2)
    } else {
        (items2, tail2, items1, tail1)
    };
    let shorter_tail = shorter_tail?;

    let min = shorter_items.len();
    let mut env = env;
    for (x, y) in shorter_items.iter().zip(longer_items[..min].iter()) {
        env = unify(x, y, env, arena)?;
    }
    let remainder: Vec<&Term> = longer_items[min..].to_vec();
    let remainder_term = arena.list(&remainder, longer_tail);
    unify(shorter_tail, remainder_term, env, arena)
}

/// Opt-in occurs check. Not called from [`unify`]; exercised only by the
/// test below to document that the capability exists without being wired
/// into default resolution.
#[allow(dead_code)]
pub fn occurs(name: &str, t: &Term, env: &Env) -> bool {
    match *deref(t, env) {
        Term::Var(v) => v == name,
        Term::Compound(_, args) => args.iter().any(|a| occurs(name, a, env)),
        Term::List(items, tail) => {
            items.iter().any(|i| occurs(name, i, env)) || tail.map_or(false, |t| occurs(name, t, env))
        }
        Term::Expr(_, l, r) => occurs(name, l, env) || occurs(name, r, env),
        Term::Num(_) | Term::Atom(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::new_env;

    #[test]
    fn identity_unification_succeeds() {
        let arena = TermArena::new();
        let t = arena.compound("foo", &[arena.num(1.0), arena.atom("a")]);
        assert!(unify(t, t, new_env(), &arena).is_some());
    }

    #[test]
    fn var_binds_to_any_term() {
        let arena = TermArena::new();
        let x = arena.var("X");
        let n = arena.num(42.0);
        let env = unify(x, n, new_env(), &arena).unwrap();
        assert_eq!(subst(x, &env, &arena).to_string(), "42");
    }

    #[test]
    fn numbers_unify_within_tolerance() {
        let arena = TermArena::new();
        let a = arena.num(1.0);
        let b = arena.num(1.0 + 1e-10);
        assert!(unify(a, b, new_env(), &arena).is_some());
    }

    #[test]
    fn numbers_outside_tolerance_fail() {
        let arena = TermArena::new();
        let a = arena.num(1.0);
        let b = arena.num(1.1);
        assert!(unify(a, b, new_env(), &arena).is_none());
    }

    #[test]
    fn mismatched_functor_fails() {
        let arena = TermArena::new();
        let a = arena.compound("foo", &[]);
        let b = arena.compound("bar", &[]);
        assert!(unify(a, b, new_env(), &arena).is_none());
    }

    #[test]
    fn mismatched_arity_fails() {
        let arena = TermArena::new();
        let a = arena.compound("foo", &[arena.num(1.0)]);
        let b = arena.compound("foo", &[arena.num(1.0), arena.num(2.0)]);
        assert!(unify(a, b, new_env(), &arena).is_none());
    }

    #[test]
    fn open_list_tail_binds_to_remainder() {
        let arena = TermArena::new();
        // [1,2,3] vs [1|T]  ->  T = [2,3]
        let closed = arena.list(&[arena.num(1.0), arena.num(2.0), arena.num(3.0)], None);
        let t = arena.var("T");
        let open = arena.list(&[arena.num(1.0)], Some(t));
        let env = unify(closed, open, new_env(), &arena).unwrap();
        assert_eq!(subst(t, &env, &arena).to_string(), "[2,3]");
    }

    #[test]
    fn shared_var_across_args_must_agree() {
        let arena = TermArena::new();
        let x = arena.var("X");
        let a = arena.compound("foo", &[x, x]);
        let b = arena.compound("foo", &[arena.num(1.0), arena.num(2.0)]);
        assert!(unify(a, b, new_env(), &arena).is_none());
    }

    #[test]
    fn subst_is_idempotent() {
        let arena = TermArena::new();
        let x = arena.var("X");
        let n = arena.num(7.0);
        let env = unify(x, n, new_env(), &arena).unwrap();
        let t = arena.compound("f", &[x, arena.atom("a")]);
        let once = subst(t, &env, &arena);
        let twice = subst(once, &env, &arena);
        assert_eq!(once, twice);
    }

    #[test]
    fn occurs_check_detects_self_reference() {
        let arena = TermArena::new();
        let x = arena.var("X");
        let t = arena.compound("f", &[x]);
        assert!(occurs("X", t, &new_env()));
        assert!(!occurs("Y", t, &new_env()));
    }
}
