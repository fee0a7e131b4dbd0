//! Thompson's construction: expression tree to epsilon-NFA.
//!
//! Each expression node becomes a fragment with exactly one entry and one
//! exit state. Fragments draw fresh state ids from a single counter, so no
//! two fragments ever share an id and table merges cannot alias unrelated
//! states. Construction cannot fail; malformed patterns are rejected by the
//! parser before they get here.

use crate::nfa::automaton::Nfa;
use crate::nfa::state::{StateId, StateSet};
use crate::nfa::symbol::Symbol;
use crate::parser::Expr;
use log::debug;
use std::collections::{BTreeSet, HashMap};

/// A sub-automaton under construction: its entry and exit state.
///
/// Two facts hold for every completed fragment and make composition by
/// row moves safe: the start state has no incoming transitions, and the
/// accept state has no outgoing transitions.
#[derive(Clone, Copy)]
struct Fragment {
    start: StateId,
    accept: StateId,
}

struct Builder {
    next_state: StateId,
    transitions: HashMap<(StateId, Symbol), StateSet>,
}

impl Builder {
    fn new() -> Self {
        Self {
            next_state: 0,
            transitions: HashMap::new(),
        }
    }

    fn fresh_state(&mut self) -> StateId {
        let state = self.next_state;
        self.next_state += 1;
        state
    }

    fn add_transition(&mut self, source: StateId, symbol: Symbol, destination: StateId) {
        self.transitions
            .entry((source, symbol))
            .or_insert_with(|| StateSet::with_capacity(self.next_state as usize))
            .insert(destination);
    }

    /// Move every outgoing row of `from` onto `onto`, merging with any row
    /// already there. Afterwards `from` is unreferenced: fragment starts
    /// have no incoming edges, so nothing else points at it.
    fn graft(&mut self, onto: StateId, from: StateId) {
        let symbols: Vec<Symbol> = self
            .transitions
            .keys()
            .filter(|&&(source, _)| source == from)
            .map(|&(_, symbol)| symbol)
            .collect();

        for symbol in symbols {
            if let Some(destinations) = self.transitions.remove(&(from, symbol)) {
                self.transitions
                    .entry((onto, symbol))
                    .and_modify(|row| row.union_with(&destinations))
                    .or_insert(destinations);
            }
        }
    }

    fn fragment(&mut self, expr: &Expr) -> Fragment {
        match expr {
            Expr::Literal(c) => {
                let start = self.fresh_state();
                let accept = self.fresh_state();
                self.add_transition(start, Symbol::Char(*c), accept);
                Fragment { start, accept }
            }

            // An empty concatenation accepts exactly the empty string.
            Expr::Concatenation(items) if items.is_empty() => {
                let start = self.fresh_state();
                let accept = self.fresh_state();
                self.add_transition(start, Symbol::Epsilon, accept);
                Fragment { start, accept }
            }

            // Chain fragments by fusing each accept with the next start:
            // the next start's rows move onto the previous accept and the
            // duplicate id drops out of the automaton.
            Expr::Concatenation(items) => {
                let mut chained = self.fragment(&items[0]);
                for item in &items[1..] {
                    let next = self.fragment(item);
                    self.graft(chained.accept, next.start);
                    chained.accept = next.accept;
                }
                chained
            }

            Expr::Alternation(left, right) => {
                let start = self.fresh_state();
                let accept = self.fresh_state();
                let left = self.fragment(left);
                let right = self.fragment(right);
                self.add_transition(start, Symbol::Epsilon, left.start);
                self.add_transition(start, Symbol::Epsilon, right.start);
                self.add_transition(left.accept, Symbol::Epsilon, accept);
                self.add_transition(right.accept, Symbol::Epsilon, accept);
                Fragment { start, accept }
            }

            Expr::Repetition(inner) => {
                let start = self.fresh_state();
                let accept = self.fresh_state();
                let inner = self.fragment(inner);
                // Skip (zero occurrences) or enter.
                self.add_transition(start, Symbol::Epsilon, inner.start);
                self.add_transition(start, Symbol::Epsilon, accept);
                // Loop back or stop.
                self.add_transition(inner.accept, Symbol::Epsilon, inner.start);
                self.add_transition(inner.accept, Symbol::Epsilon, accept);
                Fragment { start, accept }
            }
        }
    }

    /// Renumber the surviving states densely, in ascending id order, and
    /// seal the automaton. Concatenation leaves merged-away ids behind;
    /// after this pass the arena has no holes.
    fn finish(self, fragment: Fragment) -> Nfa {
        let mut live = BTreeSet::new();
        live.insert(fragment.start);
        live.insert(fragment.accept);
        for (&(source, _), destinations) in &self.transitions {
            live.insert(source);
            for destination in destinations.iter() {
                live.insert(destination);
            }
        }

        let remap: HashMap<StateId, StateId> = live.iter().copied().zip(0..).collect();
        let num_states = live.len() as StateId;

        let mut transitions = HashMap::with_capacity(self.transitions.len());
        for ((source, symbol), destinations) in self.transitions {
            let row: StateSet = destinations.iter().map(|d| remap[&d]).collect();
            transitions.insert((remap[&source], symbol), row);
        }

        debug!(
            "compacted {} allocated states down to {num_states}",
            self.next_state
        );
        Nfa::new(
            num_states,
            remap[&fragment.start],
            remap[&fragment.accept],
            transitions,
        )
    }
}

/// Build an automaton accepting exactly the strings the expression
/// describes.
pub fn build(expr: &Expr) -> Nfa {
    let mut builder = Builder::new();
    let fragment = builder.fragment(expr);
    builder.finish(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn built(pattern: &str) -> Nfa {
        build(&parse(pattern).unwrap())
    }

    fn sorted_triples(nfa: &Nfa) -> Vec<(StateId, Symbol, StateId)> {
        let mut triples: Vec<_> = nfa.transitions().collect();
        triples.sort_unstable();
        triples
    }

    #[test]
    fn literal_is_two_states_one_edge() {
        let nfa = built("a");
        assert_eq!(nfa.num_states(), 2);
        assert_eq!(nfa.initial(), 0);
        assert_eq!(nfa.accepting(), 1);
        assert_eq!(sorted_triples(&nfa), vec![(0, Symbol::Char('a'), 1)]);
    }

    #[test]
    fn concatenation_fuses_boundary_states() {
        // Four allocated states collapse to three: the second literal's
        // start is fused into the first literal's accept.
        let nfa = built("ab");
        assert_eq!(nfa.num_states(), 3);
        assert_eq!(nfa.initial(), 0);
        assert_eq!(nfa.accepting(), 2);
        assert_eq!(
            sorted_triples(&nfa),
            vec![(0, Symbol::Char('a'), 1), (1, Symbol::Char('b'), 2)]
        );
    }

    #[test]
    fn empty_pattern_is_a_single_epsilon_edge() {
        let nfa = built("");
        assert_eq!(nfa.num_states(), 2);
        assert_eq!(sorted_triples(&nfa), vec![(0, Symbol::Epsilon, 1)]);
    }

    #[test]
    fn alternation_fans_out_and_back_in() {
        let nfa = built("a|b");
        assert_eq!(nfa.num_states(), 6);
        assert_eq!(
            sorted_triples(&nfa),
            vec![
                (0, Symbol::Epsilon, 2),
                (0, Symbol::Epsilon, 4),
                (2, Symbol::Char('a'), 3),
                (3, Symbol::Epsilon, 1),
                (4, Symbol::Char('b'), 5),
                (5, Symbol::Epsilon, 1),
            ]
        );
    }

    #[test]
    fn repetition_wires_skip_enter_loop_stop() {
        let nfa = built("a*");
        assert_eq!(nfa.num_states(), 4);
        assert_eq!(nfa.initial(), 0);
        assert_eq!(nfa.accepting(), 1);
        assert_eq!(
            sorted_triples(&nfa),
            vec![
                (0, Symbol::Epsilon, 1),
                (0, Symbol::Epsilon, 2),
                (2, Symbol::Char('a'), 3),
                (3, Symbol::Epsilon, 1),
                (3, Symbol::Epsilon, 2),
            ]
        );
    }

    #[test]
    fn every_state_id_stays_inside_the_arena() {
        for pattern in ["", "abc", "a|b|c", "(a|b)*c", "a**", "((a)(b))*"] {
            let nfa = built(pattern);
            assert!(nfa.initial() < nfa.num_states());
            assert!(nfa.accepting() < nfa.num_states());
            for (source, _, destination) in nfa.transitions() {
                assert!(source < nfa.num_states(), "pattern {pattern:?}");
                assert!(destination < nfa.num_states(), "pattern {pattern:?}");
            }
        }
    }

    #[test]
    fn long_concatenation_compacts_to_a_chain() {
        let nfa = built("abcde");
        assert_eq!(nfa.num_states(), 6);
        assert_eq!(nfa.initial(), 0);
        assert_eq!(nfa.accepting(), 5);
        assert_eq!(nfa.transitions().count(), 5);
    }
}
