//! Numeric ordering: `<`/2, `>`/2, `=<`/2, `>=`/2, and their word-form
//! aliases `lt`/2, `gt`/2, `lte`/2, `gte`/2. None of these bind; they
//! simply evaluate both sides and succeed or fail.

use super::common::eval_expr;
use crate::env::Env;
use crate::resolve::Context;
use crate::term::{Term, TermArena};

macro_rules! comparison_builtin {
    ($name:ident, $op:tt) => {
        pub fn $name<'a>(
            args: &'a [&'a Term<'a>],
            env: &Env<'a>,
            _ctx: &Context,
            _arena: &'a TermArena,
        ) -> Vec<Env<'a>> {
            match (eval_expr(args[0], env), eval_expr(args[1], env)) {
                (Some(a), Some(b)) if a $op b => vec![env.clone()],
                _ => vec![],
            }
        }
    };
}

comparison_builtin!(lt, <);
comparison_builtin!(gt, >);
comparison_builtin!(lte, <=);
comparison_builtin!(gte, >=);

/// `within(T, Lo, Hi)`: succeeds iff `Lo <= T <= Hi`, all three evaluated
/// as arithmetic expressions.
pub fn within3<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, _arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env), eval_expr(args[2], env)) {
        (Some(t), Some(lo), Some(hi)) if t >= lo && t <= hi => vec![env.clone()],
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::new_env;

    #[test]
    fn lt_succeeds_when_strictly_less() {
        let arena = TermArena::new();
        let a = arena.num(1.0);
        let b = arena.num(2.0);
        let ctx = Context::with_seed(120.0, 1);
        assert_eq!(lt(&[a, b], &new_env(), &ctx, &arena).len(), 1);
        assert_eq!(lt(&[b, a], &new_env(), &ctx, &arena).len(), 0);
    }

    #[test]
    fn within_is_inclusive_on_both_ends() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let lo = arena.num(0.0);
        let hi = arena.num(1.0);
        assert_eq!(within3(&[lo, lo, hi], &new_env(), &ctx, &arena).len(), 1);
        assert_eq!(within3(&[hi, lo, hi], &new_env(), &ctx, &arena).len(), 1);
        let over = arena.num(1.5);
        assert_eq!(within3(&[over, lo, hi], &new_env(), &ctx, &arena).len(), 0);
    }
}
