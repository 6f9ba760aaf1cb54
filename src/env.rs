//! Variable bindings.
//!
//! A mapping variable-name → term. Resolution clones the environment at
//! each branch point; backtracking is expressed by discarding a clone
//! rather than by undoing bindings. Keys are arena-allocated `&str` slices
//! so cloning the map is a shallow copy of `(ptr, ptr)` pairs, not a
//! string-duplicating deep copy.

use crate::term::Term;
use std::collections::HashMap;

pub type Env<'a> = HashMap<&'a str, &'a Term<'a>>;

pub fn new_env<'a>() -> Env<'a> {
    HashMap::new()
}
