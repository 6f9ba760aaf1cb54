//! Clauses, goals, and programs, plus the goal-tree → disjunctive-normal-form
//! flattening the parser performs after building a raw AND/OR/NOT/TERM tree.

use crate::term::Term;

/// The goal tree produced directly by recursive descent, before DNF
/// flattening. Never stored on a [`Clause`] — only [`Goal`] is.
#[derive(Debug, Clone)]
pub enum GoalNode<'a> {
    Term(&'a Term<'a>),
    Not(Box<GoalNode<'a>>),
    And(Box<GoalNode<'a>>, Box<GoalNode<'a>>),
    Or(Box<GoalNode<'a>>, Box<GoalNode<'a>>),
}

/// A goal inside a flattened clause body: either a positive term to solve,
/// or a negation whose body is a set of alternative goal lists (pre-expanded
/// disjunctions) — negation-as-failure succeeds iff none of the
/// alternatives has a solution.
#[derive(Debug, Clone)]
pub enum Goal<'a> {
    Pos(&'a Term<'a>),
    Neg(Vec<Vec<Goal<'a>>>),
}

/// `head :- body.` A fact is a clause with an empty body.
#[derive(Debug, Clone)]
pub struct Clause<'a> {
    pub head: &'a Term<'a>,
    pub body: Vec<Goal<'a>>,
}

/// An ordered vector of clauses; clause order matters — the resolver tries
/// them in the order they appear in this vector.
#[derive(Debug, Clone, Default)]
pub struct Program<'a> {
    pub clauses: Vec<Clause<'a>>,
}

impl<'a> Program<'a> {
    pub fn new() -> Self {
        Program { clauses: Vec::new() }
    }
}

/// Expands a goal tree into disjunctive normal form: a set of alternative
/// conjunctions. `A ; B` distributes over any surrounding `,`; `\+ G` wraps
/// `G`'s own alternatives as a single negation goal.
pub fn expand_goal<'a>(node: &GoalNode<'a>) -> Vec<Vec<Goal<'a>>> {
    match node {
        GoalNode::Term(t) => vec![vec![Goal::Pos(t)]],
        GoalNode::Not(inner) => {
            let alternatives = expand_goal(inner);
            vec![vec![Goal::Neg(alternatives)]]
        }
        GoalNode::Or(l, r) => {
            let mut alts = expand_goal(l);
            alts.extend(expand_goal(r));
            alts
        }
        GoalNode::And(l, r) => {
            let ls = expand_goal(l);
            let rs = expand_goal(r);
            let mut out = Vec::with_capacity(ls.len() * rs.len());
            for la in &ls {
                for ra in &rs {
                    let mut combined = la.clone();
                    combined.extend(ra.clone());
                    out.push(combined);
                }
            }
            out
        }
    }
}

/// Expands `head :- body` into one [`Clause`] per disjunctive alternative of
/// `body`, all sharing `head`: a disjunction `A ; B` becomes multiple
/// clauses sharing the same head. A fact (`body = None`) yields exactly one
/// clause with an empty body.
pub fn expand_clause<'a>(head: &'a Term<'a>, body: Option<&GoalNode<'a>>) -> Vec<Clause<'a>> {
    match body {
        None => vec![Clause { head, body: Vec::new() }],
        Some(node) => expand_goal(node)
            .into_iter()
            .map(|body| Clause { head, body })
            .collect(),
    }
}
