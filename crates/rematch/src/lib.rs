//! Regular-expression matching through Thompson's construction.
//!
//! A pattern is parsed into an expression tree, lowered into a
//! nondeterministic finite automaton with epsilon transitions, and run by a
//! lockstep simulation that tracks every reachable state at once. Matching
//! takes time proportional to input length times automaton size; there is
//! no backtracking and no exponential blowup.
//!
//! Supported syntax: literal characters, concatenation, alternation with
//! `|`, grouping with parentheses, and zero-or-more repetition with `*`.
//! A match covers the whole input, never a substring.
//!
//! ```
//! let nfa = rematch::compile("(a|b)*c")?;
//! assert!(nfa.matches("abbac"));
//! assert!(!nfa.matches("abba"));
//! # Ok::<(), rematch::SyntaxError>(())
//! ```

pub mod matcher;
pub mod nfa;
pub mod parser;

pub use matcher::Matcher;
pub use nfa::{Nfa, StateId, StateSet, Symbol};
pub use parser::{Expr, SyntaxError};

use log::debug;
use std::io::{self, Read};
use thiserror::Error;

/// Failure to turn a pattern source into an automaton.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The pattern is malformed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The pattern stream could not be read.
    #[error("failed to read pattern: {0}")]
    Input(#[from] io::Error),
}

/// Compile a pattern into an automaton.
///
/// Compilation is all-or-nothing: a syntax error yields no automaton at
/// all. The result is immutable and can serve any number of
/// [`matches`](Nfa::matches) calls, concurrently if shared.
pub fn compile(pattern: &str) -> Result<Nfa, SyntaxError> {
    let expr = parser::parse(pattern)?;
    let nfa = nfa::build(&expr);
    debug!(
        "compiled pattern {:?} into {} states",
        pattern,
        nfa.num_states()
    );
    Ok(nfa)
}

/// Compile a pattern consumed from a byte stream.
///
/// The stream is read to its end and must be valid UTF-8. Read failures
/// surface as [`CompileError::Input`]; otherwise this behaves exactly like
/// [`compile`] on the equivalent string.
pub fn compile_reader<R: Read>(mut reader: R) -> Result<Nfa, CompileError> {
    let mut pattern = String::new();
    reader.read_to_string(&mut pattern)?;
    Ok(compile(&pattern)?)
}
