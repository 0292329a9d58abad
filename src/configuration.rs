//! This module defines `Configuration`, an immutable snapshot of one branch of a
//! computation, and `ConfigurationSet`, the deduplicated set of all live branches.

use crate::tape::Tape;
use crate::transition::Outcome;
use std::collections::hash_set::{self, HashSet};
use std::hash::{Hash, Hasher};

/// A single point of a computation: state, tape and head position.
///
/// Configurations are never mutated; [`Configuration::apply`] builds a successor.
/// Equality and hashing look at `(state, tape contents, head)` only, so two branches
/// that reach the same snapshot through different reads collapse into one.
#[derive(Debug, Clone)]
pub struct Configuration {
    state: usize,
    tape: Tape,
    head: isize,
    last_read: Option<usize>,
}

impl Configuration {
    /// Creates the configuration of a machine in `state` with the head at `head`.
    pub fn new(state: usize, tape: Tape, head: isize) -> Self {
        Self {
            state,
            tape: tape.grown_to(head),
            head,
            last_read: None,
        }
    }

    pub fn state(&self) -> usize {
        self.state
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Absolute head position; 0 is the first input cell.
    pub fn head(&self) -> isize {
        self.head
    }

    /// Head position as an index into [`Tape::cells`].
    pub fn offset(&self) -> usize {
        self.tape.offset(self.head) as usize
    }

    /// The symbol read by the step that produced this configuration.
    pub fn last_read(&self) -> Option<usize> {
        self.last_read
    }

    /// The symbol under the head.
    pub fn current_symbol(&self) -> usize {
        self.tape.read(self.head)
    }

    /// Builds the successor reached by applying `outcome` after reading `read`.
    pub fn apply(&self, outcome: &Outcome, read: usize) -> Configuration {
        let head = Tape::move_cursor(self.head, outcome.direction);
        let tape = self.tape.write(self.head, outcome.write).grown_to(head);

        Configuration {
            state: outcome.next_state,
            tape,
            head,
            last_read: Some(read),
        }
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.head == other.head && self.tape == other.tape
    }
}

impl Eq for Configuration {}

impl Hash for Configuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.state.hash(state);
        self.head.hash(state);
        self.tape.hash(state);
    }
}

/// The set of configurations alive at one generation of a nondeterministic run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSet {
    configurations: HashSet<Configuration>,
}

impl ConfigurationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `configuration`; returns false if an equal one was already present.
    pub fn insert(&mut self, configuration: Configuration) -> bool {
        self.configurations.insert(configuration)
    }

    pub fn contains(&self, configuration: &Configuration) -> bool {
        self.configurations.contains(configuration)
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Configuration> {
        self.configurations.iter()
    }

    /// The distinct states of the live configurations.
    pub fn states(&self) -> HashSet<usize> {
        self.configurations.iter().map(Configuration::state).collect()
    }

    /// Merges `other` into this set.
    pub fn extend(&mut self, other: ConfigurationSet) {
        self.configurations.extend(other.configurations);
    }
}

impl From<Configuration> for ConfigurationSet {
    fn from(configuration: Configuration) -> Self {
        std::iter::once(configuration).collect()
    }
}

impl FromIterator<Configuration> for ConfigurationSet {
    fn from_iter<I: IntoIterator<Item = Configuration>>(iter: I) -> Self {
        Self {
            configurations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ConfigurationSet {
    type Item = Configuration;
    type IntoIter = hash_set::IntoIter<Configuration>;

    fn into_iter(self) -> Self::IntoIter {
        self.configurations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigurationSet {
    type Item = &'a Configuration;
    type IntoIter = hash_set::Iter<'a, Configuration>;

    fn into_iter(self) -> Self::IntoIter {
        self.configurations.iter()
    }
}
