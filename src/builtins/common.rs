//! Shared helpers used across builtin groups.

use crate::env::Env;
use crate::resolve::Context;
use crate::term::{ArithOp, Term, TermArena};
use crate::unify::{deref, subst, unify, NUM_TOLERANCE};

/// Evaluates an arithmetic expression to a concrete number under `env`.
/// Division by zero yields `0.0` rather than failing — there is no
/// exception mechanism in this language, and a silent zero keeps a
/// live-coded rhythm running instead of dropping out entirely. Returns
/// `None` if the term is not a number or arithmetic expression (an atom,
/// unbound variable, compound, or list in arithmetic position).
pub fn eval_expr<'a>(t: &'a Term<'a>, env: &Env<'a>) -> Option<f64> {
    match *deref(t, env) {
        Term::Num(n) => Some(n),
        Term::Expr(op, l, r) => {
            let lv = eval_expr(l, env)?;
            let rv = eval_expr(r, env)?;
            Some(match op {
                ArithOp::Add => lv + rv,
                ArithOp::Sub => lv - rv,
                ArithOp::Mul => lv * rv,
                ArithOp::Div => {
                    if rv == 0.0 {
                        0.0
                    } else {
                        lv / rv
                    }
                }
            })
        }
        _ => None,
    }
}

/// Binds `out` to `value` if `out` derefs to an unbound variable. If `out`
/// is already bound to something else, the builtin still succeeds without
/// adding a binding — the caller is expected to check the result with an
/// explicit `=`/2 goal if that matters. This mirrors how assignment-style
/// builtins (`is`, `scale`, `cycle`, ...) treat their output argument.
pub fn bind_out<'a>(out: &'a Term<'a>, value: &'a Term<'a>, env: &Env<'a>) -> Env<'a> {
    match *deref(out, env) {
        Term::Var(name) => {
            let mut extended = env.clone();
            extended.insert(name, value);
            extended
        }
        _ => env.clone(),
    }
}

/// Fully resolves `t` under `env` and, if the result is a list, returns its
/// items and trailing tail (`None` for a proper list). Returns `None` if
/// `t` does not resolve to a list term.
pub fn as_list<'a>(
    t: &'a Term<'a>,
    env: &Env<'a>,
    arena: &'a TermArena,
) -> Option<(&'a [&'a Term<'a>], Option<&'a Term<'a>>)> {
    match *subst(t, env, arena) {
        Term::List(items, tail) => Some((items, tail)),
        _ => None,
    }
}

/// Structural equality check after fully resolving both sides — used by
/// builtins that compare values without unifying (`eq`/2, `distinct`/1).
pub fn values_equal<'a>(a: &'a Term<'a>, b: &'a Term<'a>, env: &Env<'a>, arena: &'a TermArena) -> bool {
    subst(a, env, arena) == subst(b, env, arena)
}

pub fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < NUM_TOLERANCE
}

/// `unify`, wrapped to return the zero-or-one-solution `Vec` shape every
/// builtin returns.
pub fn unify_one<'a>(a: &'a Term<'a>, b: &'a Term<'a>, env: &Env<'a>, arena: &'a TermArena) -> Vec<Env<'a>> {
    match unify(a, b, env.clone(), arena) {
        Some(e) => vec![e],
        None => vec![],
    }
}
