//! Symbols labeling automaton transitions.

use std::fmt;

/// A transition label: either a literal character or the epsilon marker for
/// transitions that consume no input.
///
/// Epsilon is a dedicated variant rather than a reserved character value, so
/// no real character (NUL included) can collide with it. Epsilon orders
/// before every character, which keeps transition dumps stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// Consumes no input.
    Epsilon,
    /// Consumes exactly the given character.
    Char(char),
}

impl Symbol {
    /// Check whether this symbol is the epsilon marker.
    #[inline]
    pub fn is_epsilon(self) -> bool {
        matches!(self, Symbol::Epsilon)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => f.write_str("ε"),
            Symbol::Char(c) => write!(f, "{c:?}"),
        }
    }
}
