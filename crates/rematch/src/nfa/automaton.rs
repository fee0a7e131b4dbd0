//! The compiled epsilon-NFA.

use crate::nfa::state::{StateId, StateSet};
use crate::nfa::symbol::Symbol;
use indexmap::IndexMap;
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// A nondeterministic finite automaton with epsilon transitions.
///
/// States live in a dense arena `0..num_states`. There is exactly one
/// initial and one accepting state. The value is immutable once built, so
/// per-state epsilon closures are computed up front and every query method
/// takes `&self`; a compiled automaton can serve concurrent match calls
/// without locking.
#[derive(Debug, Clone)]
pub struct Nfa {
    /// Number of states (states are numbered 0..num_states).
    num_states: StateId,
    initial: StateId,
    accepting: StateId,
    /// Transitions: (source, symbol) -> set of destination states.
    /// A missing key is an empty destination set.
    transitions: HashMap<(StateId, Symbol), StateSet>,
    /// Epsilon closure of each state, indexed by state id.
    epsilon_closures: Vec<StateSet>,
}

impl Nfa {
    /// Seal a built transition table into an automaton.
    ///
    /// Every state id in `transitions`, plus `initial` and `accepting`,
    /// must lie inside `0..num_states`.
    pub(crate) fn new(
        num_states: StateId,
        initial: StateId,
        accepting: StateId,
        transitions: HashMap<(StateId, Symbol), StateSet>,
    ) -> Self {
        let mut nfa = Self {
            num_states,
            initial,
            accepting,
            transitions,
            epsilon_closures: Vec::new(),
        };
        let closures = (0..num_states)
            .map(|state| nfa.epsilon_closure_single(state))
            .collect();
        nfa.epsilon_closures = closures;
        debug!(
            "automaton built: {} states, {} transition rows",
            nfa.num_states,
            nfa.transitions.len()
        );
        nfa
    }

    /// Number of states in the arena.
    pub fn num_states(&self) -> StateId {
        self.num_states
    }

    /// The initial state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// The accepting state.
    pub fn accepting(&self) -> StateId {
        self.accepting
    }

    /// Compute the epsilon closure of a single state using an explicit
    /// stack. The closure set doubles as the visited set, so epsilon cycles
    /// terminate.
    fn epsilon_closure_single(&self, state: StateId) -> StateSet {
        let mut closure = StateSet::with_capacity(self.num_states as usize);
        let mut stack = vec![state];

        while let Some(s) = stack.pop() {
            if closure.contains(s) {
                continue;
            }
            closure.insert(s);

            if let Some(destinations) = self.transitions.get(&(s, Symbol::Epsilon)) {
                for dest in destinations.iter() {
                    if !closure.contains(dest) {
                        stack.push(dest);
                    }
                }
            }
        }

        closure
    }

    /// The epsilon closure of a set of states: the union of the cached
    /// per-state closures. Ids outside the arena contribute nothing.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.num_states as usize);
        for state in states.iter() {
            if let Some(cached) = self.epsilon_closures.get(state as usize) {
                closure.union_with(cached);
            }
        }
        closure
    }

    /// The states reachable from `states` by consuming `c`, closed under
    /// epsilon transitions.
    pub fn move_on_symbol(&self, states: &StateSet, c: char) -> StateSet {
        let mut reached = StateSet::with_capacity(self.num_states as usize);
        for state in states.iter() {
            if let Some(destinations) = self.transitions.get(&(state, Symbol::Char(c))) {
                reached.union_with(destinations);
            }
        }
        self.epsilon_closure(&reached)
    }

    /// Iterate over all transitions as (source, symbol, destination) triples.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(&(src, sym), dests)| dests.iter().map(move |dst| (src, sym, dst)))
    }

    /// The transition table as nested maps in sorted (state, symbol) order,
    /// for debugging. Output order is identical across runs.
    pub fn to_transition_map(&self) -> IndexMap<StateId, IndexMap<Symbol, Vec<StateId>>> {
        let mut keys: Vec<(StateId, Symbol)> = self.transitions.keys().copied().collect();
        keys.sort_unstable();

        let mut map: IndexMap<StateId, IndexMap<Symbol, Vec<StateId>>> = IndexMap::new();
        for (source, symbol) in keys {
            map.entry(source)
                .or_default()
                .insert(symbol, self.transitions[&(source, symbol)].to_vec());
        }
        map
    }
}

impl fmt::Display for Nfa {
    /// Structural dump: state count, initial and accepting ids, then one
    /// line per table row. Presentation only, no matching semantics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "states: {}", self.num_states)?;
        writeln!(f, "initial: {}", self.initial)?;
        writeln!(f, "accepting: {}", self.accepting)?;
        writeln!(f, "transitions:")?;

        let map = self.to_transition_map();
        for state in 0..self.num_states {
            let Some(rows) = map.get(&state) else {
                writeln!(f, "{state}")?;
                continue;
            };
            for (i, (symbol, destinations)) in rows.iter().enumerate() {
                let rendered: Vec<String> =
                    destinations.iter().map(ToString::to_string).collect();
                if i == 0 {
                    write!(f, "{state}")?;
                }
                writeln!(f, "\t{symbol} -> {}", rendered.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nfa(
        num_states: StateId,
        initial: StateId,
        accepting: StateId,
        edges: &[(StateId, Symbol, StateId)],
    ) -> Nfa {
        let mut transitions: HashMap<(StateId, Symbol), StateSet> = HashMap::new();
        for &(src, sym, dst) in edges {
            transitions
                .entry((src, sym))
                .or_insert_with(|| StateSet::with_capacity(num_states as usize))
                .insert(dst);
        }
        Nfa::new(num_states, initial, accepting, transitions)
    }

    #[test]
    fn closure_follows_epsilon_chains() {
        let nfa = nfa(
            4,
            0,
            3,
            &[
                (0, Symbol::Epsilon, 1),
                (1, Symbol::Epsilon, 2),
                (1, Symbol::Char('a'), 3),
            ],
        );

        let closure = nfa.epsilon_closure(&StateSet::singleton(0, 4));
        assert_eq!(closure.to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn closure_terminates_on_cycles() {
        let nfa = nfa(
            3,
            0,
            2,
            &[
                (0, Symbol::Epsilon, 1),
                (1, Symbol::Epsilon, 0),
                (1, Symbol::Epsilon, 2),
                (2, Symbol::Epsilon, 2),
            ],
        );

        let closure = nfa.epsilon_closure(&StateSet::singleton(0, 3));
        assert_eq!(closure.to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn closure_ignores_out_of_range_ids() {
        let nfa = nfa(2, 0, 1, &[(0, Symbol::Char('a'), 1)]);
        let closure = nfa.epsilon_closure(&StateSet::singleton(17, 18));
        assert!(closure.is_empty());
    }

    #[test]
    fn move_unions_destinations_then_closes() {
        let nfa = nfa(
            4,
            0,
            3,
            &[
                (0, Symbol::Char('a'), 1),
                (0, Symbol::Char('a'), 2),
                (1, Symbol::Epsilon, 3),
            ],
        );

        let moved = nfa.move_on_symbol(&StateSet::singleton(0, 4), 'a');
        assert_eq!(moved.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn move_on_unknown_character_is_empty() {
        let nfa = nfa(2, 0, 1, &[(0, Symbol::Char('a'), 1)]);
        let moved = nfa.move_on_symbol(&StateSet::singleton(0, 2), 'z');
        assert!(moved.is_empty());
    }

    #[test]
    fn transition_map_is_sorted() {
        let nfa = nfa(
            3,
            0,
            2,
            &[
                (1, Symbol::Char('b'), 2),
                (0, Symbol::Char('a'), 1),
                (0, Symbol::Epsilon, 2),
            ],
        );

        let map = nfa.to_transition_map();
        let states: Vec<StateId> = map.keys().copied().collect();
        assert_eq!(states, vec![0, 1]);

        let symbols: Vec<Symbol> = map[&0].keys().copied().collect();
        assert_eq!(symbols, vec![Symbol::Epsilon, Symbol::Char('a')]);
    }

    #[test]
    fn display_dump_is_stable() {
        let nfa = nfa(
            3,
            0,
            2,
            &[
                (0, Symbol::Char('a'), 1),
                (1, Symbol::Epsilon, 0),
                (1, Symbol::Char('b'), 2),
            ],
        );

        let expected = "\
states: 3
initial: 0
accepting: 2
transitions:
0\t'a' -> 1
1\tε -> 0
\t'b' -> 2
2
";
        assert_eq!(nfa.to_string(), expected);
        assert_eq!(nfa.to_string(), expected);
    }
}
