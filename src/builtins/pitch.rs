//! Pitch theory: `scale`/5, `chord`/4, `transpose`/3, `add`/3, `range`/4.
//! Root notes and results are plain semitone numbers (MIDI-style); octave
//! arguments shift by 12 semitones each.

use super::common::{bind_out, eval_expr};
use crate::env::Env;
use crate::resolve::Context;
use crate::term::{Term, TermArena};

fn mode_intervals(name: &str) -> Option<&'static [i64]> {
    Some(match name {
        "ionian" | "major" => &[0, 2, 4, 5, 7, 9, 11],
        "dorian" => &[0, 2, 3, 5, 7, 9, 10],
        "phrygian" => &[0, 1, 3, 5, 7, 8, 10],
        "lydian" => &[0, 2, 4, 6, 7, 9, 11],
        "mixolydian" => &[0, 2, 4, 5, 7, 9, 10],
        "aeolian" | "minor" => &[0, 2, 3, 5, 7, 8, 10],
        "locrian" => &[0, 1, 3, 5, 6, 8, 10],
        "major_pent" => &[0, 2, 4, 7, 9],
        "minor_pent" => &[0, 3, 5, 7, 10],
        "blues" => &[0, 3, 5, 6, 7, 10],
        _ => return None,
    })
}

fn chord_intervals(name: &str) -> Option<&'static [i64]> {
    Some(match name {
        "maj" => &[0, 4, 7],
        "min" => &[0, 3, 7],
        "sus2" => &[0, 2, 7],
        "sus4" => &[0, 5, 7],
        "dim" => &[0, 3, 6],
        "aug" => &[0, 4, 8],
        "maj7" => &[0, 4, 7, 11],
        "dom7" => &[0, 4, 7, 10],
        "min7" => &[0, 3, 7, 10],
        _ => return None,
    })
}

/// `scale(Root, Mode, Degree, Octave, N)`: binds `N` to the semitone value
/// of the `Degree`th note (1-indexed) of `Mode` starting at `Root`,
/// shifted up `Octave` octaves. Degrees outside the mode's own span wrap
/// around and carry into further octave shifts.
pub fn scale5<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    let Some(root) = eval_expr(args[0], env) else { return vec![] };
    let Term::Atom(mode_name) = *crate::unify::deref(args[1], env) else {
        return vec![];
    };
    let Some(degree) = eval_expr(args[2], env) else { return vec![] };
    let Some(octave) = eval_expr(args[3], env) else { return vec![] };
    let Some(intervals) = mode_intervals(mode_name) else { return vec![] };

    let len = intervals.len() as i64;
    let z = degree as i64 - 1;
    let idx = z.rem_euclid(len) as usize;
    let octave_shift = z.div_euclid(len);
    let n = root + intervals[idx] as f64 + 12.0 * (octave + octave_shift as f64);
    vec![bind_out(args[4], arena.num(n), env)]
}

/// `chord(Root, Quality, Octave, N)`: nondeterministically binds `N` to
/// each semitone of `Quality`'s interval stack above `Root`, one solution
/// per chord tone.
pub fn chord4<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    let Some(root) = eval_expr(args[0], env) else { return vec![] };
    let Term::Atom(quality) = *crate::unify::deref(args[1], env) else {
        return vec![];
    };
    let Some(octave) = eval_expr(args[2], env) else { return vec![] };
    let Some(intervals) = chord_intervals(quality) else { return vec![] };

    intervals
        .iter()
        .map(|iv| {
            let n = root + *iv as f64 + 12.0 * octave;
            bind_out(args[3], arena.num(n), env)
        })
        .collect()
}

/// `transpose(N, Semitones, N2)`: binds `N2` to `N + Semitones`.
pub fn transpose3<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env)) {
        (Some(n), Some(semi)) => vec![bind_out(args[2], arena.num(n + semi), env)],
        _ => vec![],
    }
}

/// `add(A, B, C)`: binds `C` to `A + B`.
pub fn add3<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env)) {
        (Some(a), Some(b)) => vec![bind_out(args[2], arena.num(a + b), env)],
        _ => vec![],
    }
}

/// `range(N, Min, Max, Out)`: binds `Out` to `N` clamped into `[Min, Max]`
/// — keeps a generated pitch inside a usable register without failing the
/// whole goal when it would otherwise wander out of range.
pub fn range4<'a>(args: &'a [&'a Term<'a>], env: &Env<'a>, _ctx: &Context, arena: &'a TermArena) -> Vec<Env<'a>> {
    match (eval_expr(args[0], env), eval_expr(args[1], env), eval_expr(args[2], env)) {
        (Some(n), Some(min), Some(max)) if min <= max => {
            let clamped = n.clamp(min, max);
            vec![bind_out(args[3], arena.num(clamped), env)]
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::new_env;
    use crate::unify::subst;

    #[test]
    fn scale_first_degree_is_root() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let n = arena.var("N");
        let args = [arena.num(60.0), arena.atom("ionian"), arena.num(1.0), arena.num(0.0), n];
        let out = scale5(&args, &new_env(), &ctx, &arena);
        assert_eq!(subst(n, &out[0], &arena).as_num(), Some(60.0));
    }

    #[test]
    fn scale_wraps_degree_into_next_octave() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let n = arena.var("N");
        // degree 8 of a 7-note mode is degree 1 one octave up.
        let args = [arena.num(60.0), arena.atom("ionian"), arena.num(8.0), arena.num(0.0), n];
        let out = scale5(&args, &new_env(), &ctx, &arena);
        assert_eq!(subst(n, &out[0], &arena).as_num(), Some(72.0));
    }

    #[test]
    fn chord_yields_one_solution_per_tone() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let n = arena.var("N");
        let args = [arena.num(60.0), arena.atom("maj7"), arena.num(0.0), n];
        let out = chord4(&args, &new_env(), &ctx, &arena);
        assert_eq!(out.len(), 4);
        assert_eq!(subst(n, &out[0], &arena).as_num(), Some(60.0));
        assert_eq!(subst(n, &out[3], &arena).as_num(), Some(71.0));
    }

    #[test]
    fn range_clamps_out_of_bounds_value() {
        let arena = TermArena::new();
        let ctx = Context::with_seed(120.0, 1);
        let out = arena.var("Out");
        let args = [arena.num(100.0), arena.num(0.0), arena.num(24.0), out];
        let res = range4(&args, &new_env(), &ctx, &arena);
        assert_eq!(subst(out, &res[0], &arena).as_num(), Some(24.0));
    }
}
