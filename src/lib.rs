//! Bog: a small Prolog-flavoured logic language for real-time music live
//! coding. This crate provides the term model, parser, resolver, builtin
//! predicate library, persistent state manager, and the real-time
//! scheduler that drives it all from a clock.

pub mod builtins;
pub mod clause;
pub mod env;
pub mod error;
pub mod lexer;
pub mod live_eval;
pub mod parser;
pub mod rename;
pub mod resolve;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod scheduler;
pub mod state;
pub mod term;
pub mod transition;
pub mod unify;

pub use clause::{Clause, Goal, Program as ClauseProgram};
pub use error::{ParseError, ParseResult};
pub use parser::{parse_program, parse_program_repl};
pub use resolve::{solve_query, Context, Program};
pub use scheduler::{AudioCallbacks, Scheduler};
pub use state::StateManager;
pub use term::{Term, TermArena};
pub use transition::TransitionManager;
