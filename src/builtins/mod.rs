//! Builtin predicate registry: a compile-time table of `(name, arity) ->
//! callable` entries, looked up once per resolved goal. Every builtin
//! shares the same calling convention as a clause head — arguments already
//! dereferenced, an environment to extend, and it returns every extended
//! environment (zero, one, or many, matching ordinary clause resolution).

mod comparison;
mod common;
mod equality;
mod gating;
mod lists;
mod pitch;
mod random;
mod rhythm;

use crate::env::Env;
use crate::resolve::Context;
use crate::term::{Term, TermArena};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub type BuiltinFn = for<'a> fn(&'a [&'a Term<'a>], &Env<'a>, &Context, &'a TermArena) -> Vec<Env<'a>>;

static TABLE: Lazy<HashMap<(&'static str, usize), BuiltinFn>> = Lazy::new(|| {
    let mut m: HashMap<(&'static str, usize), BuiltinFn> = HashMap::new();

    m.insert(("=", 2), equality::unify2 as BuiltinFn);
    m.insert(("eq", 2), equality::eq2 as BuiltinFn);
    m.insert(("=:=", 2), equality::num_eq as BuiltinFn);
    m.insert(("=\\=", 2), equality::num_neq as BuiltinFn);
    m.insert(("is", 2), equality::is2 as BuiltinFn);

    m.insert(("<", 2), comparison::lt as BuiltinFn);
    m.insert((">", 2), comparison::gt as BuiltinFn);
    m.insert(("=<", 2), comparison::lte as BuiltinFn);
    m.insert((">=", 2), comparison::gte as BuiltinFn);
    m.insert(("lt", 2), comparison::lt as BuiltinFn);
    m.insert(("gt", 2), comparison::gt as BuiltinFn);
    m.insert(("lte", 2), comparison::lte as BuiltinFn);
    m.insert(("gte", 2), comparison::gte as BuiltinFn);
    m.insert(("within", 3), comparison::within3 as BuiltinFn);

    m.insert(("distinct", 1), lists::distinct1 as BuiltinFn);
    m.insert(("choose", 2), lists::choose2 as BuiltinFn);
    m.insert(("pick", 2), lists::pick2 as BuiltinFn);
    m.insert(("cycle", 2), lists::cycle2 as BuiltinFn);
    m.insert(("rotate", 3), lists::rotate3 as BuiltinFn);

    m.insert(("rand", 3), random::rand3 as BuiltinFn);
    m.insert(("randint", 3), random::randint3 as BuiltinFn);
    m.insert(("prob", 1), random::prob1 as BuiltinFn);

    m.insert(("every", 2), rhythm::every2 as BuiltinFn);
    m.insert(("beat", 2), rhythm::beat2 as BuiltinFn);
    m.insert(("phase", 3), rhythm::phase3 as BuiltinFn);
    m.insert(("euc", 5), rhythm::euc5 as BuiltinFn);

    m.insert(("scale", 5), pitch::scale5 as BuiltinFn);
    m.insert(("chord", 4), pitch::chord4 as BuiltinFn);
    m.insert(("transpose", 3), pitch::transpose3 as BuiltinFn);
    m.insert(("add", 3), pitch::add3 as BuiltinFn);
    m.insert(("range", 4), pitch::range4 as BuiltinFn);

    m.insert(("cooldown", 3), gating::cooldown3 as BuiltinFn);

    m
});

pub fn lookup_builtin(name: &str, arity: usize) -> Option<BuiltinFn> {
    TABLE.get(&(name, arity)).copied()
}
