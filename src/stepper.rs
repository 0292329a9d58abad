//! This module implements the delta operator: given every configuration alive at one
//! generation, it computes every configuration reachable by exactly one transition.

use crate::configuration::{Configuration, ConfigurationSet};
use crate::machine::TuringMachine;
use crate::transition::TransitionTable;
use log::trace;
use std::fmt::Debug;
use std::hash::Hash;

/// Applies a transition table to configuration sets.
#[derive(Debug, Clone, Copy)]
pub struct Stepper<'a> {
    table: &'a TransitionTable,
}

impl<'a> Stepper<'a> {
    pub fn new(table: &'a TransitionTable) -> Self {
        Self { table }
    }

    /// Returns every configuration reachable from `configuration` in one step.
    ///
    /// The iterator is empty when no transition is defined for the state and the
    /// symbol under the head: that branch simply dies.
    pub fn successors<'c>(
        &self,
        configuration: &'c Configuration,
    ) -> impl Iterator<Item = Configuration> + 'c
    where
        'a: 'c,
    {
        let table: &'a TransitionTable = self.table;
        let read = configuration.current_symbol();
        table
            .lookup(configuration.state(), read)
            .iter()
            .map(move |outcome| configuration.apply(outcome, read))
    }

    /// Computes the next generation of `configurations`.
    ///
    /// Successors that are structurally equal collapse into one entry, whichever
    /// configuration or outcome produced them. An empty input yields an empty output.
    pub fn step(&self, configurations: &ConfigurationSet) -> ConfigurationSet {
        let mut next = ConfigurationSet::new();

        for configuration in configurations {
            let before = next.len();
            let mut produced = 0;
            for successor in self.successors(configuration) {
                next.insert(successor);
                produced += 1;
            }

            if produced == 0 {
                trace!(
                    "branch in state {} at {} has no move",
                    configuration.state(),
                    configuration.head()
                );
            } else if next.len() - before < produced {
                trace!(
                    "{} successor(s) of state {} merged with existing branches",
                    produced - (next.len() - before),
                    configuration.state()
                );
            }
        }

        next
    }
}

impl<S, A> TuringMachine<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Returns a stepper over this machine's transition table.
    pub fn stepper(&self) -> Stepper<'_> {
        Stepper::new(&self.table)
    }

    /// Computes the next generation of `configurations`. See [`Stepper::step`].
    pub fn step(&self, configurations: &ConfigurationSet) -> ConfigurationSet {
        self.stepper().step(configurations)
    }
}
