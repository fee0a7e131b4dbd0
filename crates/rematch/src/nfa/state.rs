//! State identifiers and state sets.
//!
//! States carry no data of their own. An automaton owns a dense arena of
//! states numbered `0..num_states`, and a [`StateSet`] is a bit set over
//! that arena.

use fixedbitset::FixedBitSet;
use std::fmt;

/// A state identifier: an index into an automaton's state arena.
pub type StateId = u32;

/// A set of states backed by a bit set.
#[derive(Clone, PartialEq, Eq)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create an empty set sized for the given arena.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state, growing the backing storage if needed.
    pub fn insert(&mut self, state: StateId) {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        self.bits.insert(idx);
    }

    /// Check whether the set contains a state.
    pub fn contains(&self, state: StateId) -> bool {
        let idx = state as usize;
        idx < self.bits.len() && self.bits.contains(idx)
    }

    /// Check whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Number of states in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over the states in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Union another set into this one.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// The states as a sorted vector.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let items: Vec<StateId> = iter.into_iter().collect();
        let capacity = items.iter().copied().max().map_or(0, |m| m as usize + 1);
        let mut set = Self::with_capacity(capacity);
        for state in items {
            set.insert(state);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut set = StateSet::with_capacity(8);
        assert!(set.is_empty());

        set.insert(0);
        set.insert(5);
        assert!(!set.is_empty());
        assert_eq!(set.len(), 2);
        assert!(set.contains(0));
        assert!(set.contains(5));
        assert!(!set.contains(3));
    }

    #[test]
    fn insert_grows_past_capacity() {
        let mut set = StateSet::with_capacity(2);
        set.insert(40);
        assert!(set.contains(40));
        assert!(!set.contains(41));
    }

    #[test]
    fn contains_out_of_range_is_false() {
        let set = StateSet::with_capacity(4);
        assert!(!set.contains(100));
    }

    #[test]
    fn union_accumulates() {
        let mut left = StateSet::singleton(1, 4);
        let mut right = StateSet::with_capacity(8);
        right.insert(2);
        right.insert(6);

        left.union_with(&right);
        assert_eq!(left.to_vec(), vec![1, 2, 6]);

        // Unioning again changes nothing.
        left.union_with(&right);
        assert_eq!(left.to_vec(), vec![1, 2, 6]);
    }

    #[test]
    fn from_iter_collects() {
        let set: StateSet = [4, 1, 1, 3].into_iter().collect();
        assert_eq!(set.to_vec(), vec![1, 3, 4]);
    }

    #[test]
    fn debug_renders_as_set() {
        let set = StateSet::singleton(2, 4);
        assert_eq!(format!("{set:?}"), "{2}");
    }
}
