//! Trigger gating: `cooldown`/3.

use super::common::eval_expr;
use crate::env::Env;
use crate::resolve::Context;
use crate::term::{Term, TermArena};
use crate::unify::subst;

/// `cooldown(Now, Key, Gap)`: succeeds iff at least `Gap` (seconds) has
/// passed since `Key` last fired, or `Key` has never fired. `Key`'s
/// printed form after substitution is the state-manager lookup key. On
/// success the trigger's last-fired time is advanced to `Now`.
pub fn cooldown3<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    let Some(now) = eval_expr(args[0], env) else { return vec![] };
    let key = subst(args[1], env, arena).to_string();
    let Some(gap) = eval_expr(args[2], env) else { return vec![] };

    if ctx.state.can_trigger(&key, now, gap) {
        ctx.state.set_last_trigger(&key, now);
        vec![env.clone()]
    } else {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::new_env;

    #[test]
    fn cooldown_blocks_retriggers_within_gap() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let key = arena.atom("kick");
        let gap = arena.num(1.0);
        assert_eq!(cooldown3(&[arena.num(0.0), key, gap], &new_env(), &ctx, &arena).len(), 1);
        assert_eq!(cooldown3(&[arena.num(0.5), key, gap], &new_env(), &ctx, &arena).len(), 0);
        assert_eq!(cooldown3(&[arena.num(1.0), key, gap], &new_env(), &ctx, &arena).len(), 1);
    }

    #[test]
    fn distinct_keys_cool_down_independently() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let gap = arena.num(1.0);
        assert_eq!(cooldown3(&[arena.num(0.0), arena.atom("kick"), gap], &new_env(), &ctx, &arena).len(), 1);
        assert_eq!(cooldown3(&[arena.num(0.1), arena.atom("snare"), gap], &new_env(), &ctx, &arena).len(), 1);
    }
}
