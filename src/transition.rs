//! This module defines the `TransitionTable`, the (possibly nondeterministic) transition
//! relation of a machine, keyed by `(state, read symbol)` indices.

use crate::types::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One possible move: go to `next_state`, write `write` under the head, then move.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Outcome {
    pub next_state: usize,
    pub write: usize,
    pub direction: Direction,
}

impl Outcome {
    pub fn new(next_state: usize, write: usize, direction: Direction) -> Self {
        Self {
            next_state,
            write,
            direction,
        }
    }
}

static NO_OUTCOMES: BTreeSet<Outcome> = BTreeSet::new();

/// Sparse mapping from `(state, symbol)` to the set of possible outcomes.
///
/// A missing key means "no legal move": the branch that reads it dies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    entries: BTreeMap<(usize, usize), BTreeSet<Outcome>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `outcomes` into the outcome set of `(state, symbol)`.
    pub fn add_transition(
        &mut self,
        state: usize,
        symbol: usize,
        outcomes: impl IntoIterator<Item = Outcome>,
    ) {
        let set = self.entries.entry((state, symbol)).or_default();
        set.extend(outcomes);
        if set.is_empty() {
            self.entries.remove(&(state, symbol));
        }
    }

    /// Returns the outcomes for `(state, symbol)`; empty when there are none.
    pub fn lookup(&self, state: usize, symbol: usize) -> &BTreeSet<Outcome> {
        self.entries.get(&(state, symbol)).unwrap_or(&NO_OUTCOMES)
    }

    /// Iterates every key with its outcome set, in key order.
    pub fn entries(&self) -> impl Iterator<Item = ((usize, usize), &BTreeSet<Outcome>)> {
        self.entries.iter().map(|(&key, outcomes)| (key, outcomes))
    }

    /// Iterates every `((state, symbol), outcome)` triple in key order.
    pub fn all_transitions(&self) -> impl Iterator<Item = ((usize, usize), &Outcome)> {
        self.entries
            .iter()
            .flat_map(|(&key, outcomes)| outcomes.iter().map(move |outcome| (key, outcome)))
    }

    /// Iterates `(read symbol, outcome)` pairs leaving `state`.
    pub fn outgoing(&self, state: usize) -> impl Iterator<Item = (usize, &Outcome)> {
        self.entries
            .range((state, 0)..=(state, usize::MAX))
            .flat_map(|(&(_, symbol), outcomes)| {
                outcomes.iter().map(move |outcome| (symbol, outcome))
            })
    }

    /// The set of states reachable from `state` in one transition, over any symbol.
    pub fn successors(&self, state: usize) -> BTreeSet<usize> {
        self.outgoing(state)
            .map(|(_, outcome)| outcome.next_state)
            .collect()
    }

    /// Returns true if `state` has at least one outgoing transition.
    pub fn has_transitions(&self, state: usize) -> bool {
        self.outgoing(state).next().is_some()
    }

    /// Returns true if no key maps to more than one outcome.
    pub fn is_deterministic(&self) -> bool {
        self.entries.values().all(|outcomes| outcomes.len() <= 1)
    }

    /// Number of `(state, symbol)` keys with at least one outcome.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of outcome triples.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites state indices through `remap` (`remap[old] == Some(new)`).
    ///
    /// Keys whose source state is dropped disappear, outcomes leading to a dropped
    /// state are filtered out, and keys left without outcomes are removed.
    pub fn remap_states(&mut self, remap: &[Option<usize>]) {
        let lookup = |state: usize| remap.get(state).copied().flatten();

        self.entries = std::mem::take(&mut self.entries)
            .into_iter()
            .filter_map(|((state, symbol), outcomes)| {
                let state = lookup(state)?;
                let outcomes: BTreeSet<Outcome> = outcomes
                    .into_iter()
                    .filter_map(|outcome| {
                        lookup(outcome.next_state)
                            .map(|next_state| Outcome { next_state, ..outcome })
                    })
                    .collect();
                (!outcomes.is_empty()).then_some(((state, symbol), outcomes))
            })
            .collect();
    }
}
