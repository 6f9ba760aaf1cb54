//! Recursive-descent parser.
//!
//! `program = { clause } EOF`. Each clause's goal tree is flattened into
//! disjunctive normal form by [`crate::clause::expand_clause`] as soon as it
//! is parsed, so the public entry point returns a fully-expanded
//! [`Program`] ready for the resolver.

use crate::clause::{expand_clause, Clause, GoalNode, Program};
use crate::error::{ParseError, ParseResult, Span};
use crate::lexer::{Lexer, Token};
use crate::term::{ArithOp, Term, TermArena};

pub struct Parser<'a, 's> {
    arena: &'a TermArena,
    tokens: Vec<(Token, Span)>,
    pos: usize,
    _src: &'s str,
}

/// Parses a whole program: zero or more `clause`s followed by EOF.
pub fn parse_program<'a>(arena: &'a TermArena, src: &str) -> ParseResult<Program<'a>> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser { arena, tokens, pos: 0, _src: src };
    let mut program = Program::new();
    while !parser.at_eof() {
        let clauses = parser.parse_clause()?;
        program.clauses.extend(clauses);
    }
    Ok(program)
}

/// Live-evaluator entry point: trims the text, installs an empty program on
/// blank input, and appends a trailing `.` if the caller omitted one before
/// parsing.
pub fn parse_program_repl<'a>(arena: &'a TermArena, text: &str) -> ParseResult<Program<'a>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Program::new());
    }
    if trimmed.ends_with('.') {
        parse_program(arena, trimmed)
    } else {
        let mut owned = trimmed.to_string();
        owned.push('.');
        parse_program(arena, &owned)
    }
}

impl<'a, 's> Parser<'a, 's> {
    fn at_eof(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_symbol(&mut self, sym: &'static str) -> ParseResult<()> {
        match self.peek() {
            Token::Symbol(s) if *s == sym => {
                self.advance();
                Ok(())
            }
            other => Err(ParseError::UnexpectedToken {
                expected: format!("'{}'", sym),
                found: format!("{:?}", other),
                span: self.peek_span(),
            }),
        }
    }

    fn eat_symbol(&mut self, sym: &str) -> bool {
        if matches!(self.peek(), Token::Symbol(s) if *s == sym) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, name: &str) -> bool {
        if matches!(self.peek(), Token::Ident(s) if s == name) {
            self.advance();
            true
        } else {
            false
        }
    }

    // clause = term [ ":-" goal_or ] "."
    fn parse_clause(&mut self) -> ParseResult<Vec<Clause<'a>>> {
        let head = self.parse_expr()?;
        let body = if self.eat_symbol(":-") {
            Some(self.parse_goal_or()?)
        } else {
            None
        };
        self.expect_symbol(".")?;
        Ok(expand_clause(head, body.as_ref()))
    }

    // goal_or = goal_and { ";" goal_and }
    fn parse_goal_or(&mut self) -> ParseResult<GoalNode<'a>> {
        let mut node = self.parse_goal_and()?;
        while self.eat_symbol(";") {
            let rhs = self.parse_goal_and()?;
            node = GoalNode::Or(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    // goal_and = goal_un { "," goal_un }
    fn parse_goal_and(&mut self) -> ParseResult<GoalNode<'a>> {
        let mut node = self.parse_goal_un()?;
        while self.eat_symbol(",") {
            let rhs = self.parse_goal_un()?;
            node = GoalNode::And(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    // goal_un = "\+" goal_un | "(" goal_or ")" | goal_cmp
    // Parenthesised groups are tried before falling through to goal_cmp/expr
    // parsing, so "(" is disambiguated as a goal grouping rather than an
    // arithmetic grouping at this level.
    fn parse_goal_un(&mut self) -> ParseResult<GoalNode<'a>> {
        if self.eat_symbol("\\+") {
            let inner = self.parse_goal_un()?;
            return Ok(GoalNode::Not(Box::new(inner)));
        }
        if self.eat_symbol("(") {
            let inner = self.parse_goal_or()?;
            self.expect_symbol(")")?;
            return Ok(inner);
        }
        self.parse_goal_cmp()
    }

    // goal_cmp = expr [ cmpop expr ]   -- cmpop in {=, =:=, =\=, <, >, =<, >=, is}
    fn parse_goal_cmp(&mut self) -> ParseResult<GoalNode<'a>> {
        let lhs = self.parse_expr()?;
        let op = self.try_consume_cmpop()?;
        match op {
            Some(functor) => {
                let rhs = self.parse_expr()?;
                let args = self.arena.alloc_slice([lhs, rhs]);
                Ok(GoalNode::Term(self.arena.compound(functor, args)))
            }
            None => Ok(GoalNode::Term(lhs)),
        }
    }

    fn try_consume_cmpop(&mut self) -> ParseResult<Option<&'static str>> {
        if self.eat_ident("is") {
            return Ok(Some("is"));
        }
        for sym in ["=:=", "=\\=", "=<", ">=", "<", ">", "="] {
            if self.eat_symbol(sym) {
                return Ok(Some(sym));
            }
        }
        Ok(None)
    }

    // expr = add { ("+"|"-") add }
    fn parse_expr(&mut self) -> ParseResult<&'a Term<'a>> {
        let mut acc = self.parse_add()?;
        loop {
            let op = if self.eat_symbol("+") {
                ArithOp::Add
            } else if self.eat_symbol("-") {
                ArithOp::Sub
            } else {
                break;
            };
            let rhs = self.parse_add()?;
            acc = self.arena.expr(op, acc, rhs);
        }
        Ok(acc)
    }

    // add = mul { ("*"|"/") mul }
    fn parse_add(&mut self) -> ParseResult<&'a Term<'a>> {
        let mut acc = self.parse_primary()?;
        loop {
            let op = if self.eat_symbol("*") {
                ArithOp::Mul
            } else if self.eat_symbol("/") {
                ArithOp::Div
            } else {
                break;
            };
            let rhs = self.parse_primary()?;
            acc = self.arena.expr(op, acc, rhs);
        }
        Ok(acc)
    }

    // primary = number | ident [ "(" args ")" ] | "[" [ list_items ] "]" | "(" expr ")"
    fn parse_primary(&mut self) -> ParseResult<&'a Term<'a>> {
        match self.peek().clone() {
            Token::Number(n) => {
                self.advance();
                Ok(self.arena.num(n))
            }
            Token::Ident(name) => {
                self.advance();
                if self.eat_symbol("(") {
                    let args = self.parse_args()?;
                    self.expect_symbol(")")?;
                    Ok(self.arena.compound(&name, &args))
                } else if is_var_name(&name) {
                    Ok(self.arena.var(&name))
                } else {
                    Ok(self.arena.atom(&name))
                }
            }
            Token::Symbol("[") => {
                self.advance();
                let term = self.parse_list()?;
                Ok(term)
            }
            Token::Symbol("(") => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect_symbol(")")?;
                Ok(inner)
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "a term".to_string(),
                found: format!("{:?}", other),
                span: self.peek_span(),
            }),
        }
    }

    fn parse_args(&mut self) -> ParseResult<Vec<&'a Term<'a>>> {
        let mut args = Vec::new();
        if matches!(self.peek(), Token::Symbol(")")) {
            return Ok(args);
        }
        args.push(self.parse_expr()?);
        while self.eat_symbol(",") {
            args.push(self.parse_expr()?);
        }
        Ok(args)
    }

    // "[" already consumed. list_items = elems "]"; elems = term {,term} [|term] | epsilon
    fn parse_list(&mut self) -> ParseResult<&'a Term<'a>> {
        if self.eat_symbol("]") {
            return Ok(self.arena.list(&[], None));
        }
        let mut items = vec![self.parse_expr()?];
        let mut tail = None;
        loop {
            if self.eat_symbol(",") {
                items.push(self.parse_expr()?);
            } else if self.eat_symbol("|") {
                tail = Some(self.parse_expr()?);
                break;
            } else {
                break;
            }
        }
        self.expect_symbol("]")?;
        Ok(self.arena.list(&items, tail))
    }
}

/// Identifiers starting with an uppercase letter or underscore are
/// variables; all others are atoms.
fn is_var_name(name: &str) -> bool {
    matches!(name.chars().next(), Some(c) if c == '_' || c.is_uppercase())
}
