//! Epsilon-NFA representation and Thompson's construction.
//!
//! This module provides the compiled automaton and its building blocks:
//! - A dense state arena with bit-set state sets
//! - Tagged transition symbols with a distinguished epsilon
//! - Cycle-safe epsilon closure computation, cached per state
//! - The expression-tree-to-automaton builder

mod automaton;
mod state;
mod symbol;
mod thompson;

pub use automaton::Nfa;
pub use state::{StateId, StateSet};
pub use symbol::Symbol;
pub use thompson::build;
