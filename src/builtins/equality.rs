//! Equality and assignment: `=`/2, `eq`/2, `=:=`/2, `=\=`/2, `is`/2.

use super::common::{bind_out, eval_expr, near, unify_one, values_equal};
use crate::env::Env;
use crate::resolve::Context;
use crate::term::{Term, TermArena};

pub fn unify2<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    unify_one(args[0], args[1], env, arena)
}

/// Value equality: succeeds iff both sides resolve to the same term, but
/// never introduces a binding the way `=`/2 can.
pub fn eq2<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    if values_equal(args[0], args[1], env, arena) {
        vec![env.clone()]
    } else {
        vec![]
    }
}

pub fn num_eq<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, _arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env)) {
        (Some(a), Some(b)) if near(a, b) => vec![env.clone()],
        _ => vec![],
    }
}

pub fn num_neq<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, _arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env)) {
        (Some(a), Some(b)) if !near(a, b) => vec![env.clone()],
        _ => vec![],
    }
}

/// `is(X, Expr)`: evaluates `Expr` and binds `X` to the result if `X` is
/// unbound. Fails (no solutions) if `Expr` does not evaluate to a number.
pub fn is2<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    match eval_expr(args[1], env) {
        Some(v) => vec![bind_out(args[0], arena.num(v), env)],
        None => vec![],
    }
}
