//! Rhythm grids: `every`/2, `beat`/2, `phase`/3, `euc`/5. All of these
//! convert a time in seconds to a beat count via the context's BPM and
//! test where that beat count falls on a subdivided grid; none of them
//! bind a variable, they only gate whether the surrounding goal fires.

use super::common::eval_expr;
use crate::env::Env;
use crate::resolve::Context;
use crate::term::{Term, TermArena};

const GRID_TOLERANCE: f64 = 1e-4;

fn near_integer(x: f64) -> bool {
    (x - x.round()).abs() < GRID_TOLERANCE
}

fn beats(t: f64, bpm: f64) -> f64 {
    t * bpm / 60.0
}

/// `every(T, N)`: succeeds once every `N` beats.
pub fn every2<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, ctx: &Context, _arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env)) {
        (Some(t), Some(n)) if n != 0.0 && near_integer(beats(t, ctx.bpm) / n) => vec![env.clone()],
        _ => vec![],
    }
}

/// `beat(T, N)`: succeeds `N` times per beat (a subdivision grid).
pub fn beat2<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, ctx: &Context, _arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env)) {
        (Some(t), Some(n)) if near_integer(beats(t, ctx.bpm) * n) => vec![env.clone()],
        _ => vec![],
    }
}

/// `phase(T, N, K)`: succeeds on the `K`th subdivision (of `N` per beat),
/// `K` taken mod `N`.
pub fn phase3<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, ctx: &Context, _arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env), eval_expr(args[2], env)) {
        (Some(t), Some(n), Some(k)) if n > 0.0 => {
            let step = (beats(t, ctx.bpm) * n).round() as i64;
            let n_i = n as i64;
            if n_i == 0 {
                return vec![];
            }
            let target = (k as i64).rem_euclid(n_i);
            if step.rem_euclid(n_i) == target {
                vec![env.clone()]
            } else {
                vec![]
            }
        }
        _ => vec![],
    }
}

/// `euc(T, K, N, B, R)`: a Euclidean rhythm of `K` onsets spread over `N`
/// steps across a cycle of `B` beats, rotated by `R` steps.
///
/// `s = round((beats(T)/B) * N) mod N` maps the current beat position onto
/// a step index in `0..N`; `s' = (s + R) mod N` applies the rotation; the
/// goal succeeds iff `(s' * K) mod N < K`, the standard Bresenham-style
/// test for whether step `s'` is an onset of a `K`-in-`N` Euclidean
/// rhythm. Requires `N > 0` and `0 <= K <= N`.
pub fn euc5<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, ctx: &Context, _arena: &'a TermArena) -> Vec<Env<'a>> {
    let (Some(t), Some(k), Some(n), Some(b), Some(r)) = (
        eval_expr(args[0], env),
        eval_expr(args[1], env),
        eval_expr(args[2], env),
        eval_expr(args[3], env),
        eval_expr(args[4], env),
    ) else {
        return vec![];
    };
    let n_i = n.round() as i64;
    let k_i = k.round() as i64;
    if n_i <= 0 || k_i < 0 || k_i > n_i || b == 0.0 {
        return vec![];
    }

    let s = ((beats(t, ctx.bpm) / b) * n).round() as i64;
    let s = s.rem_euclid(n_i);
    let s_prime = (s + r.round() as i64).rem_euclid(n_i);

    if (s_prime * k_i).rem_euclid(n_i) < k_i {
        vec![env.clone()]
    } else {
        vec![]
    }
}
