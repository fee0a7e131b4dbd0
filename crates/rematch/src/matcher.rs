//! Lockstep simulation of a compiled automaton.
//!
//! Instead of backtracking, the matcher carries the whole set of states the
//! automaton could be in (the configuration) and advances it once per input
//! character. Work per character is bounded by the automaton size, so
//! matching is linear in the input and repetition nesting cannot blow up.

use crate::nfa::{Nfa, StateSet};
use log::trace;

/// The live configuration of one match in progress.
///
/// Useful on its own when input arrives a character at a time; for whole
/// strings, [`Nfa::matches`] drives the loop.
pub struct Matcher<'a> {
    nfa: &'a Nfa,
    configuration: StateSet,
}

impl<'a> Matcher<'a> {
    /// Start a match: the configuration is the epsilon closure of the
    /// initial state.
    pub fn new(nfa: &'a Nfa) -> Self {
        let start = StateSet::singleton(nfa.initial(), nfa.num_states() as usize);
        Self {
            configuration: nfa.epsilon_closure(&start),
            nfa,
        }
    }

    /// Consume one character.
    pub fn step(&mut self, c: char) {
        self.configuration = self.nfa.move_on_symbol(&self.configuration, c);
        trace!("consumed {c:?}, configuration {:?}", self.configuration);
    }

    /// No state is reachable any more; no suffix can ever match.
    pub fn is_dead(&self) -> bool {
        self.configuration.is_empty()
    }

    /// The input consumed so far is a complete match.
    pub fn is_accepting(&self) -> bool {
        self.configuration.contains(self.nfa.accepting())
    }
}

impl Nfa {
    /// Whether the automaton accepts the whole input. Never fails: a
    /// character with no transitions simply empties the configuration and
    /// the scan stops early.
    pub fn matches(&self, input: &str) -> bool {
        let mut matcher = Matcher::new(self);
        for c in input.chars() {
            matcher.step(c);
            if matcher.is_dead() {
                return false;
            }
        }
        matcher.is_accepting()
    }
}
