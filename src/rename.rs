//! Clause variable renaming.
//!
//! Before a clause is tried against a goal, every variable in the clause is
//! renamed with a fresh `$N` suffix, `N` a monotone counter maintained per
//! resolution episode. Renaming is a deep copy that builds a name-to-var
//! map so repeated occurrences of the same source variable share a single
//! fresh variable.

use crate::clause::{Clause, Goal};
use crate::term::{Term, TermArena};
use std::collections::HashMap;

/// Renames every variable in `clause` with the suffix `$<suffix>`,
/// allocating the renamed terms in `arena`.
pub fn rename_clause<'a>(clause: &Clause<'a>, arena: &'a TermArena, suffix: u64) -> Clause<'a> {
    let mut map: HashMap<&'a str, &'a Term<'a>> = HashMap::new();
    let head = rename_term(clause.head, arena, &mut map, suffix);
    let body = clause.body.iter().map(|g| rename_goal(g, arena, &mut map, suffix)).collect();
    Clause { head, body }
}

fn rename_term<'a>(
    t: &'a Term<'a>,
    arena: &'a TermArena,
    map: &mut HashMap<&'a str, &'a Term<'a>>,
    suffix: u64,
) -> &'a Term<'a> {
    match *t {
        Term::Num(_) | Term::Atom(_) => t,
        Term::Var(name) => *map.entry(name).or_insert_with(|| {
            let fresh = format!("{}${}", name, suffix);
            arena.var(&fresh)
        }),
        Term::Compound(functor, args) => {
            let new_args: Vec<&Term> = args.iter().map(|a| rename_term(a, arena, map, suffix)).collect();
            arena.compound(functor, &new_args)
        }
        Term::List(items, tail) => {
            let new_items: Vec<&Term> =
                items.iter().map(|i| rename_term(i, arena, map, suffix)).collect();
            let new_tail = tail.map(|t| rename_term(t, arena, map, suffix));
            arena.list(&new_items, new_tail)
        }
        Term::Expr(op, l, r) => {
            let nl = rename_term(l, arena, map, suffix);
            let nr = rename_term(r, arena, map, suffix);
            arena.expr(op, nl, nr)
        }
    }
}

fn rename_goal<'a>(
    g: &Goal<'a>,
    arena: &'a TermArena,
    map: &mut HashMap<&'a str, &'a Term<'a>>,
    suffix: u64,
) -> Goal<'a> {
    match g {
        Goal::Pos(t) => Goal::Pos(rename_term(t, arena, map, suffix)),
        Goal::Neg(alts) => Goal::Neg(
            alts.iter()
                .map(|alt| alt.iter().map(|g| rename_goal(g, arena, map, suffix)).collect())
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;

    #[test]
    fn repeated_variable_shares_one_fresh_name() {
        let arena = TermArena::new();
        let program = parse_program(&arena, "same(X,X).").unwrap();
        let renamed = rename_clause(&program.clauses[0], &arena, 3);
        let Term::Compound(_, args) = *renamed.head else { panic!() };
        assert_eq!(args[0], args[1]);
        assert_eq!(args[0].to_string(), "X$3");
    }

    #[test]
    fn different_suffixes_produce_distinct_variables() {
        let arena = TermArena::new();
        let program = parse_program(&arena, "p(X).").unwrap();
        let r1 = rename_clause(&program.clauses[0], &arena, 1);
        let r2 = rename_clause(&program.clauses[0], &arena, 2);
        assert_ne!(r1.head.to_string(), r2.head.to_string());
    }
}
