//! List-backed selection policies: `distinct`/1, `choose`/2, `pick`/2,
//! `cycle`/2, `rotate`/3.

use super::common::{as_list, bind_out};
use crate::env::Env;
use crate::resolve::Context;
use crate::term::{Term, TermArena};
use crate::unify::{subst, unify};
use rand::Rng;

/// `distinct(List)`: succeeds iff no two items of `List` are structurally
/// equal once fully resolved. A check, not a binding.
pub fn distinct1<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    let Some((items, _)) = as_list(args[0], env, arena) else {
        return vec![];
    };
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            if items[i] == items[j] {
                return vec![];
            }
        }
    }
    vec![env.clone()]
}

/// `choose(List, X)`: nondeterministically unifies `X` with each item of
/// `List` in turn, like Prolog's `member/2` — one solution per match.
pub fn choose2<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    let Some((items, _)) = as_list(args[0], env, arena) else {
        return vec![];
    };
    items
        .iter()
        .filter_map(|item| unify(args[1], item, env.clone(), arena))
        .collect()
}

/// `pick(List, X)`: binds `X` to one uniformly random item of `List`.
pub fn pick2<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    let Some((items, _)) = as_list(args[0], env, arena) else {
        return vec![];
    };
    if items.is_empty() {
        return vec![];
    }
    let idx = ctx.rng.borrow_mut().gen_range(0..items.len());
    vec![bind_out(args[1], items[idx], env)]
}

/// `cycle(Key, Out)`: uses `Key`'s printed form (usually a list literal) as
/// a state-manager key, and binds `Out` to the list's item at the key's
/// current round-robin index, advancing it for next time.
pub fn cycle2<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    let resolved = subst(args[0], env, arena);
    let Term::List(items, _) = *resolved else {
        return vec![];
    };
    if items.is_empty() {
        return vec![];
    }
    let key = resolved.to_string();
    let idx = ctx.state.increment_cycle(&key, items.len());
    vec![bind_out(args[1], items[idx], env)]
}

/// `rotate(List, Shift, Out)`: binds `Out` to `List` rotated left by
/// `Shift` positions (mod the list length).
pub fn rotate3<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    let Some((items, tail)) = as_list(args[0], env, arena) else {
        return vec![];
    };
    if items.is_empty() {
        return vec![bind_out(args[2], arena.list(&[], tail), env)];
    }
    let Some(shift) = super::common::eval_expr(args[1], env) else {
        return vec![];
    };
    let len = items.len();
    let idx = (shift.rem_euclid(len as f64)) as usize;
    let mut rotated: Vec<&Term> = items[idx..].to_vec();
    rotated.extend_from_slice(&items[..idx]);
    let out = arena.list(&rotated, tail);
    vec![bind_out(args[2], out, env)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::new_env;
    use crate::unify::subst;

    fn list3(arena: &TermArena) -> &Term<'_> {
        arena.list(&[arena.num(1.0), arena.num(2.0), arena.num(3.0)], None)
    }

    #[test]
    fn distinct_detects_duplicates() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let dup = arena.list(&[arena.num(1.0), arena.num(1.0)], None);
        assert!(distinct1(&[dup], &new_env(), &ctx, &arena).is_empty());
        let clean = list3(&arena);
        assert_eq!(distinct1(&[clean], &new_env(), &ctx, &arena).len(), 1);
    }

    #[test]
    fn choose_yields_one_solution_per_item() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let x = arena.var("X");
        let out = choose2(&[list3(&arena), x], &new_env(), &ctx, &arena);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn pick_binds_to_a_member() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let x = arena.var("X");
        let out = pick2(&[list3(&arena), x], &new_env(), &ctx, &arena);
        assert_eq!(out.len(), 1);
        let val = subst(x, &out[0], &arena).as_num().unwrap();
        assert!([1.0, 2.0, 3.0].contains(&val));
    }

    #[test]
    fn cycle_round_robins_and_advances() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let x = arena.var("X");
        let first = cycle2(&[list3(&arena), x], &new_env(), &ctx, &arena);
        assert_eq!(subst(x, &first[0], &arena).as_num(), Some(1.0));
        let second = cycle2(&[list3(&arena), x], &new_env(), &ctx, &arena);
        assert_eq!(subst(x, &second[0], &arena).as_num(), Some(2.0));
    }

    #[test]
    fn rotate_shifts_left_by_n() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let out_var = arena.var("Out");
        let shift = arena.num(1.0);
        let out = rotate3(&[list3(&arena), shift, out_var], &new_env(), &ctx, &arena);
        assert_eq!(subst(out_var, &out[0], &arena).to_string(), "[2,3,1]");
    }
}
