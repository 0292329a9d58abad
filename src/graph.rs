//! This module provides structural analysis of a machine's state graph: reachability from
//! the initial state, dead and sink state detection, state removal and renaming.
//!
//! The state graph has an edge `p -> q` whenever some transition out of `p`, for any
//! symbol, leads to `q`. All operations here work on the transition table only and are
//! independent of any run. Mutating operations take `&mut self`, so they cannot overlap
//! with a live [`crate::Run`], which borrows the machine.

use crate::machine::TuringMachine;
use crate::types::TuringMachineError;
use log::debug;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

impl<S, A> TuringMachine<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Returns every state reachable from the initial state, the initial state included.
    pub fn reachable_states(&self) -> Result<BTreeSet<usize>, TuringMachineError> {
        let initial = self.require_initial()?;
        let mut visited = BTreeSet::from([initial]);
        let mut queue = VecDeque::from([initial]);

        while let Some(state) = queue.pop_front() {
            for next in self.table.successors(state) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        Ok(visited)
    }

    /// Returns every state that cannot be reached from the initial state.
    pub fn unreachable_states(&self) -> Result<BTreeSet<usize>, TuringMachineError> {
        let reachable = self.reachable_states()?;
        Ok((0..self.states.len())
            .filter(|state| !reachable.contains(state))
            .collect())
    }

    /// Non-accepting states without any outgoing transition.
    pub fn dead_states(&self) -> BTreeSet<usize> {
        (0..self.states.len())
            .filter(|&state| !self.is_accepting_state(state) && !self.table.has_transitions(state))
            .collect()
    }

    /// Non-accepting states whose every transition leads back to themselves.
    pub fn sink_states(&self) -> BTreeSet<usize> {
        (0..self.states.len())
            .filter(|&state| {
                !self.is_accepting_state(state)
                    && self.table.successors(state) == BTreeSet::from([state])
            })
            .collect()
    }

    /// Removes `to_remove` from the machine.
    ///
    /// Transitions out of a removed state disappear, and so do outcomes leading into
    /// one. Remaining indices are compacted. Removing the initial state is an error and
    /// leaves the machine untouched, as does an unknown index.
    pub fn remove_states(&mut self, to_remove: &BTreeSet<usize>) -> Result<(), TuringMachineError> {
        for &state in to_remove {
            self.states.check(state)?;
        }
        if let Some(initial) = self.initial.filter(|initial| to_remove.contains(initial)) {
            return Err(TuringMachineError::InitialStateRemoval(format!(
                "{:?}",
                self.states.labels()[initial]
            )));
        }
        if to_remove.is_empty() {
            return Ok(());
        }

        debug!("removing {} state(s): {:?}", to_remove.len(), to_remove);

        let remap = self.states.retain(|state| !to_remove.contains(&state));
        let lookup = |state: usize| remap.get(state).copied().flatten();

        self.table.remap_states(&remap);
        self.accepting = self.accepting.iter().filter_map(|&state| lookup(state)).collect();
        self.initial = self.initial.and_then(lookup);
        Ok(())
    }

    /// Label-based variant of [`TuringMachine::remove_states`].
    pub fn remove_state_labels<'a>(
        &mut self,
        labels: impl IntoIterator<Item = &'a S>,
    ) -> Result<(), TuringMachineError>
    where
        S: 'a,
    {
        let to_remove = labels
            .into_iter()
            .map(|label| self.states.index_of(label))
            .collect::<Result<BTreeSet<_>, _>>()?;

        self.remove_states(&to_remove)
    }

    /// Removes every unreachable state and returns how many were removed.
    pub fn remove_unreachable(&mut self) -> Result<usize, TuringMachineError> {
        let unreachable = self.unreachable_states()?;
        self.remove_states(&unreachable)?;
        Ok(unreachable.len())
    }

    /// Removes dead and sink states until none are left and returns how many were removed.
    ///
    /// Branches that would have entered a removed state now die instead, which cannot
    /// change whether an input is accepted. The initial state is always kept.
    pub fn remove_sink_states(&mut self) -> Result<usize, TuringMachineError> {
        let mut removed = 0;

        loop {
            let mut candidates = self.dead_states();
            candidates.extend(self.sink_states());
            if let Some(initial) = self.initial {
                candidates.remove(&initial);
            }
            if candidates.is_empty() {
                return Ok(removed);
            }

            self.remove_states(&candidates)?;
            removed += candidates.len();
        }
    }

    /// Relabels every state as `<prefix><n>`, numbering from `start` in index order.
    ///
    /// Labels in `avoid` are skipped, so the numbering stays dense over the labels that
    /// are actually used. Indices do not change, hence the initial state and the
    /// accepting set keep their roles.
    pub fn autorename(
        &mut self,
        prefix: &str,
        start: usize,
        avoid: &HashSet<S>,
    ) -> Result<(), TuringMachineError>
    where
        S: From<String>,
    {
        let labels: Vec<S> = (start..)
            .map(|n| S::from(format!("{}{}", prefix, n)))
            .filter(|label| !avoid.contains(label))
            .take(self.states.len())
            .collect();

        self.states.relabel(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction::{self, Left, Right, Stay};

    fn s(label: &str) -> String {
        label.to_string()
    }

    fn machine(rules: &[(&str, &str, &str, Direction)]) -> TuringMachine {
        let mut machine = TuringMachine::new(s("B"));
        machine.add_initial_state(s("start"));
        machine.add_accepting_state(s("accept"));
        for (state, read, next, direction) in rules {
            machine.add_transition(s(state), s(read), [(s(next), s(read), *direction)]);
        }
        machine
    }

    fn labels(machine: &TuringMachine, states: &BTreeSet<usize>) -> Vec<String> {
        states
            .iter()
            .map(|&state| machine.state_label(state).unwrap().clone())
            .collect()
    }

    fn sample() -> TuringMachine {
        let mut machine = machine(&[
            ("start", "0", "middle", Right),
            ("start", "1", "trap", Right),
            ("middle", "0", "accept", Stay),
            ("trap", "0", "trap", Right),
            ("trap", "1", "trap", Left),
            ("island", "0", "start", Right),
        ]);
        machine.add_state(s("lonely"));
        machine
    }

    #[test]
    fn test_reachable_states() {
        let machine = sample();

        let reachable = machine.reachable_states().unwrap();
        assert_eq!(
            labels(&machine, &reachable),
            vec!["start", "accept", "middle", "trap"]
        );

        let unreachable = machine.unreachable_states().unwrap();
        assert_eq!(labels(&machine, &unreachable), vec!["island", "lonely"]);
        assert!(reachable.is_disjoint(&unreachable));
        assert_eq!(reachable.len() + unreachable.len(), machine.state_count());
    }

    #[test]
    fn test_reachable_states_requires_initial() {
        let machine: TuringMachine = TuringMachine::new(s("B"));

        assert_eq!(
            machine.reachable_states(),
            Err(TuringMachineError::MissingInitialState)
        );
    }

    #[test]
    fn test_dead_and_sink_states() {
        let machine = sample();

        assert_eq!(labels(&machine, &machine.sink_states()), vec!["trap"]);
        assert_eq!(labels(&machine, &machine.dead_states()), vec!["lonely"]);
    }

    #[test]
    fn test_remove_states_compacts_and_filters() {
        let mut machine = sample();
        let trap = machine.state_index(&s("trap")).unwrap();

        machine.remove_states(&BTreeSet::from([trap])).unwrap();

        assert_eq!(
            machine.states(),
            &[s("start"), s("accept"), s("middle"), s("island"), s("lonely")]
        );
        assert!(machine.transition(&s("start"), &s("1")).unwrap().is_empty());
        assert_eq!(machine.transition(&s("start"), &s("0")).unwrap().len(), 1);
        assert_eq!(machine.initial_state_label(), Some(&s("start")));
        assert_eq!(machine.accepting_state_labels(), vec![&s("accept")]);
        assert_eq!(machine.table().len(), 3);
    }

    #[test]
    fn test_remove_initial_state_is_refused() {
        let mut machine = sample();
        let before = machine.states().to_vec();

        let result = machine.remove_state_labels([&s("start"), &s("trap")]);
        assert_eq!(
            result,
            Err(TuringMachineError::InitialStateRemoval("\"start\"".to_string()))
        );
        assert_eq!(machine.states(), before.as_slice());
    }

    #[test]
    fn test_remove_unknown_state_index() {
        let mut machine = sample();

        assert_eq!(
            machine.remove_states(&BTreeSet::from([42])),
            Err(TuringMachineError::UnknownStateIndex(42))
        );
    }

    #[test]
    fn test_remove_accepting_state_may_empty_accepting_set() {
        let mut machine = sample();

        machine.remove_state_labels([&s("accept")]).unwrap();
        assert!(machine.accepting_states().is_empty());
        assert!(machine.transition(&s("middle"), &s("0")).unwrap().is_empty());
    }

    #[test]
    fn test_remove_unreachable() {
        let mut machine = sample();

        assert_eq!(machine.remove_unreachable().unwrap(), 2);
        assert!(machine.unreachable_states().unwrap().is_empty());
        assert_eq!(machine.state_count(), 4);
    }

    #[test]
    fn test_remove_sink_states_until_fixpoint() {
        let mut machine = sample();
        // `feeder` only leads into the trap, so it dies once the trap is gone.
        machine.add_transition(s("middle"), s("1"), [(s("feeder"), s("1"), Right)]);
        machine.add_transition(s("feeder"), s("0"), [(s("trap"), s("0"), Right)]);

        let removed = machine.remove_sink_states().unwrap();

        assert_eq!(removed, 3);
        assert_eq!(
            machine.states(),
            &[s("start"), s("accept"), s("middle"), s("island")]
        );
        assert!(machine.sink_states().is_empty());
        assert!(machine.dead_states().is_empty());
    }

    #[test]
    fn test_remove_sink_states_keeps_initial() {
        let mut machine = machine(&[("start", "0", "start", Right)]);

        assert_eq!(machine.remove_sink_states().unwrap(), 0);
        assert_eq!(machine.initial_state_label(), Some(&s("start")));
    }

    #[test]
    fn test_autorename_preserves_roles() {
        let mut machine = sample();
        let initial = machine.initial_state();
        let accepting = machine.accepting_states().clone();
        let count = machine.state_count();

        machine
            .autorename("q_", 0, &HashSet::from([s("q_1")]))
            .unwrap();

        assert_eq!(machine.state_count(), count);
        assert_eq!(machine.initial_state(), initial);
        assert_eq!(machine.accepting_states(), &accepting);
        assert_eq!(
            machine.states(),
            &[s("q_0"), s("q_2"), s("q_3"), s("q_4"), s("q_5"), s("q_6")]
        );
        assert_eq!(machine.initial_state_label(), Some(&s("q_0")));
        assert_eq!(machine.accepting_state_labels(), vec![&s("q_2")]);
    }

    #[test]
    fn test_autorename_can_swap_existing_labels() {
        let mut machine = machine(&[("start", "0", "accept", Right)]);
        machine.rename_state(&s("start"), s("q1")).unwrap();
        machine.rename_state(&s("accept"), s("q0")).unwrap();

        machine.autorename("q", 0, &HashSet::new()).unwrap();

        assert_eq!(machine.states(), &[s("q0"), s("q1")]);
        assert_eq!(
            machine.transition(&s("q0"), &s("0")).unwrap(),
            vec![(&s("q1"), &s("0"), Right)]
        );
    }
}
