//! Randomness: `rand`/3, `randint`/3, `prob`/1. All draw from the
//! context's seeded RNG, so a run is reproducible end to end given a seed.

use super::common::{bind_out, eval_expr};
use crate::env::Env;
use crate::resolve::Context;
use crate::term::{Term, TermArena};
use rand::Rng;

/// `rand(Min, Max, X)`: binds `X` to a uniformly random real in `[Min, Max)`.
pub fn rand3<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env)) {
        (Some(min), Some(max)) if min < max => {
            let v = ctx.rng.borrow_mut().gen_range(min..max);
            vec![bind_out(args[2], arena.num(v), env)]
        }
        _ => vec![],
    }
}

/// `randint(Min, Max, X)`: binds `X` to a uniformly random integer in
/// `[Min, Max)`.
pub fn randint3<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env)) {
        (Some(min), Some(max)) if (min as i64) < (max as i64) => {
            let v = ctx.rng.borrow_mut().gen_range(min as i64..max as i64);
            vec![bind_out(args[2], arena.num(v as f64), env)]
        }
        _ => vec![],
    }
}

/// `prob(P)`: succeeds with probability `P` (no binding).
pub fn prob1<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, ctx: &Context, _arena: &'a TermArena) -> Vec<Env<'a>> {
    match eval_expr(args[0], env) {
        Some(p) => {
            if ctx.rng.borrow_mut().gen::<f64>() < p {
                vec![env.clone()]
            } else {
                vec![]
            }
        }
        None => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::new_env;
    use crate::unify::subst;

    #[test]
    fn rand_stays_within_bounds() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 42);
        let min = arena.num(1.0);
        let max = arena.num(2.0);
        let x = arena.var("X");
        let out = rand3(&[min, max, x], &new_env(), &ctx, &arena);
        let v = subst(x, &out[0], &arena).as_num().unwrap();
        assert!((1.0..2.0).contains(&v));
    }

    #[test]
    fn randint_is_whole_number_in_range() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 42);
        let min = arena.num(0.0);
        let max = arena.num(4.0);
        let x = arena.var("X");
        let out = randint3(&[min, max, x], &new_env(), &ctx, &arena);
        let v = subst(x, &out[0], &arena).as_num().unwrap();
        assert_eq!(v.fract(), 0.0);
        assert!(v >= 0.0 && v < 4.0);
    }

    #[test]
    fn prob_zero_never_succeeds() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 42);
        let p = arena.num(0.0);
        for _ in 0..20 {
            assert!(prob1(&[p], &new_env(), &ctx, &arena).is_empty());
        }
    }

    #[test]
    fn prob_one_always_succeeds() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 42);
        let p = arena.num(1.0);
        for _ in 0..20 {
            assert_eq!(prob1(&[p], &new_env(), &ctx, &arena).len(), 1);
        }
    }

    #[test]
    fn seeded_rngs_reproduce_the_same_sequence() {
        let arena = TermArena::new();
        let ctx_a = Context::with_seed(120.0, 7);
        let ctx_b = Context::with_seed(120.0, 7);
        let min = arena.num(0.0);
        let max = arena.num(1000.0);
        let x = arena.var("X");
        let a = rand3(&[min, max, x], &new_env(), &ctx_a, &arena);
        let b = rand3(&[min, max, x], &new_env(), &ctx_b, &arena);
        assert_eq!(subst(x, &a[0], &arena), subst(x, &b[0], &arena));
    }
}
