//! This module defines the `TuringMachine` struct, the description of a nondeterministic
//! single-tape Turing Machine: its states, input and tape alphabets, initial and accepting
//! states, and transition relation.
//!
//! States and symbols are interned to dense indices; everything downstream (tapes,
//! configurations, the transition table) works with indices only. The labels are kept
//! for lookups and for rendering.

use crate::configuration::{Configuration, ConfigurationSet};
use crate::interner::Interner;
use crate::tape::Tape;
use crate::transition::{Outcome, TransitionTable};
use crate::types::{Direction, LabelKind, TuringMachineError};
use std::collections::BTreeSet;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// Index of the blank symbol in the tape alphabet. It is interned first.
pub const BLANK: usize = 0;

/// Represents a nondeterministic single-tape Turing Machine.
///
/// `S` is the state label type and `A` the tape symbol label type.
#[derive(Debug, Clone)]
pub struct TuringMachine<S = String, A = String> {
    pub(crate) states: Interner<S>,
    pub(crate) gamma: Interner<A>,
    pub(crate) sigma: BTreeSet<usize>,
    pub(crate) initial: Option<usize>,
    pub(crate) accepting: BTreeSet<usize>,
    pub(crate) table: TransitionTable,
}

impl<S, A> TuringMachine<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Creates an empty machine whose tape alphabet holds only `blank`.
    pub fn new(blank: A) -> Self {
        let mut gamma = Interner::new(LabelKind::Symbol);
        gamma.intern(blank);

        Self {
            states: Interner::new(LabelKind::State),
            gamma,
            sigma: BTreeSet::new(),
            initial: None,
            accepting: BTreeSet::new(),
            table: TransitionTable::new(),
        }
    }

    /// Adds a state (if new) and returns its index.
    pub fn add_state(&mut self, state: S) -> usize {
        self.states.intern(state)
    }

    /// Adds a state (if new) and makes it the initial state.
    pub fn add_initial_state(&mut self, state: S) -> usize {
        let index = self.add_state(state);
        self.initial = Some(index);
        index
    }

    /// Makes an existing state the initial state.
    pub fn set_initial_state(&mut self, state: &S) -> Result<usize, TuringMachineError> {
        let index = self.states.index_of(state)?;
        self.initial = Some(index);
        Ok(index)
    }

    /// Adds a state (if new) to the accepting set.
    pub fn add_accepting_state(&mut self, state: S) -> usize {
        let index = self.add_state(state);
        self.accepting.insert(index);
        index
    }

    /// Replaces the accepting set. Every state must already exist.
    pub fn set_accepting<'a>(
        &mut self,
        states: impl IntoIterator<Item = &'a S>,
    ) -> Result<(), TuringMachineError>
    where
        S: 'a,
    {
        let accepting = states
            .into_iter()
            .map(|state| self.states.index_of(state))
            .collect::<Result<BTreeSet<_>, _>>()?;

        self.accepting = accepting;
        Ok(())
    }

    /// Adds an input symbol. Input symbols are also tape symbols; the blank never is one.
    pub fn add_input_symbol(&mut self, symbol: A) -> usize {
        let index = self.gamma.intern(symbol);
        if index != BLANK {
            self.sigma.insert(index);
        }
        index
    }

    /// Adds a tape symbol (if new) and returns its index.
    pub fn add_tape_symbol(&mut self, symbol: A) -> usize {
        self.gamma.intern(symbol)
    }

    /// Adds the outcomes for `(state, read)`, interning every label on the way.
    ///
    /// Outcomes are merged with the ones already present for the same key.
    pub fn add_transition(
        &mut self,
        state: S,
        read: A,
        outcomes: impl IntoIterator<Item = (S, A, Direction)>,
    ) {
        let state = self.add_state(state);
        let read = self.add_tape_symbol(read);
        let outcomes: Vec<Outcome> = outcomes
            .into_iter()
            .map(|(next, write, direction)| {
                Outcome::new(self.add_state(next), self.add_tape_symbol(write), direction)
            })
            .collect();

        self.table.add_transition(state, read, outcomes);
    }

    /// Index-based variant of [`TuringMachine::add_transition`]. Every index must exist.
    pub fn add_transition_indexed(
        &mut self,
        state: usize,
        read: usize,
        outcomes: impl IntoIterator<Item = Outcome>,
    ) -> Result<(), TuringMachineError> {
        self.states.check(state)?;
        self.gamma.check(read)?;

        let outcomes = outcomes
            .into_iter()
            .map(|outcome| {
                self.states.check(outcome.next_state)?;
                self.gamma.check(outcome.write)?;
                Ok(outcome)
            })
            .collect::<Result<Vec<_>, TuringMachineError>>()?;

        self.table.add_transition(state, read, outcomes);
        Ok(())
    }

    /// Returns the labelled outcomes for `(state, read)`; empty when there is no move.
    pub fn transition(
        &self,
        state: &S,
        read: &A,
    ) -> Result<Vec<(&S, &A, Direction)>, TuringMachineError> {
        let state = self.states.index_of(state)?;
        let read = self.gamma.index_of(read)?;

        Ok(self
            .table
            .lookup(state, read)
            .iter()
            .map(|outcome| self.label_outcome(outcome))
            .collect())
    }

    /// Iterates every transition as `((state, read), (next, write, direction))` labels.
    pub fn transitions(&self) -> impl Iterator<Item = ((&S, &A), (&S, &A, Direction))> {
        self.table.all_transitions().map(|((state, read), outcome)| {
            (
                (&self.states.labels()[state], &self.gamma.labels()[read]),
                self.label_outcome(outcome),
            )
        })
    }

    fn label_outcome(&self, outcome: &Outcome) -> (&S, &A, Direction) {
        (
            &self.states.labels()[outcome.next_state],
            &self.gamma.labels()[outcome.write],
            outcome.direction,
        )
    }

    /// Renames a state. Transitions, the initial state and the accepting set follow it.
    pub fn rename_state(&mut self, old: &S, new: S) -> Result<usize, TuringMachineError> {
        self.states.rename(old, new)
    }

    /// Renames a tape symbol. Transitions and input-alphabet membership follow it.
    pub fn rename_symbol(&mut self, old: &A, new: A) -> Result<usize, TuringMachineError> {
        self.gamma.rename(old, new)
    }

    /// Returns the transition table.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Returns all state labels in index order.
    pub fn states(&self) -> &[S] {
        self.states.labels()
    }

    /// Returns the tape alphabet in index order; the blank comes first.
    pub fn tape_symbols(&self) -> &[A] {
        self.gamma.labels()
    }

    /// Returns the input alphabet labels in index order.
    pub fn input_symbols(&self) -> Vec<&A> {
        self.sigma
            .iter()
            .map(|&index| &self.gamma.labels()[index])
            .collect()
    }

    /// Returns the indices of the input alphabet.
    pub fn input_alphabet(&self) -> &BTreeSet<usize> {
        &self.sigma
    }

    pub fn blank(&self) -> usize {
        BLANK
    }

    pub fn blank_label(&self) -> &A {
        &self.gamma.labels()[BLANK]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.gamma.len()
    }

    pub fn initial_state(&self) -> Option<usize> {
        self.initial
    }

    pub fn initial_state_label(&self) -> Option<&S> {
        self.initial.map(|index| &self.states.labels()[index])
    }

    /// Returns the initial state index, or `MissingInitialState`.
    pub(crate) fn require_initial(&self) -> Result<usize, TuringMachineError> {
        self.initial.ok_or(TuringMachineError::MissingInitialState)
    }

    pub fn accepting_states(&self) -> &BTreeSet<usize> {
        &self.accepting
    }

    pub fn accepting_state_labels(&self) -> Vec<&S> {
        self.accepting
            .iter()
            .map(|&index| &self.states.labels()[index])
            .collect()
    }

    pub fn is_accepting_state(&self, state: usize) -> bool {
        self.accepting.contains(&state)
    }

    pub fn state_index(&self, state: &S) -> Result<usize, TuringMachineError> {
        self.states.index_of(state)
    }

    pub fn state_label(&self, state: usize) -> Result<&S, TuringMachineError> {
        self.states.label_of(state)
    }

    pub fn symbol_index(&self, symbol: &A) -> Result<usize, TuringMachineError> {
        self.gamma.index_of(symbol)
    }

    pub fn symbol_label(&self, symbol: usize) -> Result<&A, TuringMachineError> {
        self.gamma.label_of(symbol)
    }

    /// Builds the starting configuration for `input`: initial state, input written from
    /// position 0, head on position 0.
    pub fn initial_configuration(&self, input: &[A]) -> Result<Configuration, TuringMachineError> {
        let state = self.require_initial()?;
        let symbols = input
            .iter()
            .map(|symbol| self.gamma.index_of(symbol))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Configuration::new(state, Tape::from_symbols(BLANK, symbols), 0))
    }

    /// Returns true if `configuration` is in an accepting state.
    pub fn is_accepting(&self, configuration: &Configuration) -> bool {
        self.is_accepting_state(configuration.state())
    }

    /// Returns the configurations of `configurations` that are in an accepting state.
    pub fn accepting_configurations(&self, configurations: &ConfigurationSet) -> ConfigurationSet {
        configurations
            .iter()
            .filter(|configuration| self.is_accepting(configuration))
            .cloned()
            .collect()
    }

    /// Returns the label of the state of `configuration`.
    pub fn state_label_of(&self, configuration: &Configuration) -> Result<&S, TuringMachineError> {
        self.states.label_of(configuration.state())
    }

    /// Returns the symbol labels from `before` cells left of the head to `after` cells right of it.
    pub fn tape_window(
        &self,
        configuration: &Configuration,
        before: usize,
        after: usize,
    ) -> Result<Vec<&A>, TuringMachineError> {
        configuration
            .tape()
            .window(configuration.head(), before, after)
            .into_iter()
            .map(|symbol| self.gamma.label_of(symbol))
            .collect()
    }

    /// Adds a new state labelled `q_<n>`, with `n` the first free number from `|Q|` on.
    pub fn add_next_state(&mut self) -> (S, usize)
    where
        S: From<String>,
    {
        let mut n = self.states.len();
        let label = loop {
            let label = S::from(format!("q_{}", n));
            if !self.states.contains(&label) {
                break label;
            }
            n += 1;
        };

        let index = self.add_state(label.clone());
        (label, index)
    }

    /// Adds an error state and routes every missing `(state, symbol)` move to it.
    ///
    /// The filler move keeps the symbol under the head and stays in place. Afterwards
    /// every key of `Q x gamma` has at least one outcome.
    pub fn add_error_state(&mut self, label: S) -> usize {
        let error = self.add_state(label);

        for state in 0..self.states.len() {
            for symbol in 0..self.gamma.len() {
                if self.table.lookup(state, symbol).is_empty() {
                    self.table.add_transition(
                        state,
                        symbol,
                        [Outcome::new(error, symbol, Direction::Stay)],
                    );
                }
            }
        }

        error
    }
}

impl<S, A> TuringMachine<S, A>
where
    S: Clone + Eq + Hash + Debug + Display,
    A: Clone + Eq + Hash + Debug + Display,
{
    /// Renders `configuration` as `state, … left _head_ right …`.
    pub fn describe(&self, configuration: &Configuration) -> String {
        let label = |symbol: &usize| {
            self.gamma
                .label_of(*symbol)
                .map(ToString::to_string)
                .unwrap_or_else(|_| "?".to_string())
        };
        let cells = configuration.tape().cells();
        let offset = configuration.offset().min(cells.len().saturating_sub(1));
        let left: String = cells[..offset].iter().map(label).collect();
        let head = cells.get(offset).map(label).unwrap_or_default();
        let right: String = cells.get(offset + 1..).unwrap_or(&[]).iter().map(label).collect();
        let state = self
            .states
            .label_of(configuration.state())
            .map(ToString::to_string)
            .unwrap_or_else(|_| "?".to_string());

        format!("{}, … {} _{}_ {} …", state, left, head, right)
    }

    /// Renders every configuration of `configurations`, separated by `|`, in a stable order.
    pub fn describe_set(&self, configurations: &ConfigurationSet) -> String {
        let mut lines: Vec<String> = configurations
            .iter()
            .map(|configuration| self.describe(configuration))
            .collect();
        lines.sort();
        lines.join("|")
    }
}

fn join<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl<S, A> Display for TuringMachine<S, A>
where
    S: Clone + Eq + Hash + Debug + Display,
    A: Clone + Eq + Hash + Debug + Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "States  : {}", join(self.states()))?;
        writeln!(f, "Sigma   : {}", join(self.input_symbols()))?;
        writeln!(f, "Gamma   : {}", join(self.tape_symbols()))?;
        writeln!(
            f,
            "Initial : {}",
            self.initial_state_label()
                .map(ToString::to_string)
                .unwrap_or_default()
        )?;
        writeln!(f, "Acceptors: {}", join(self.accepting_state_labels()))?;
        write!(f, "Transitions:")?;
        for ((state, read), (next, write, direction)) in self.transitions() {
            write!(
                f,
                "\n {},{}/{} → {},{}",
                state, read, write, next, direction
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn increment() -> TuringMachine {
        let mut machine = TuringMachine::new("B".to_string());
        machine.add_initial_state("q0".to_string());
        machine.add_accepting_state("qF".to_string());
        machine.add_input_symbol("1".to_string());
        machine.add_tape_symbol("0".to_string());
        machine.add_transition(
            "q0".to_string(),
            "1".to_string(),
            [("q0".to_string(), "1".to_string(), Direction::Right)],
        );
        machine.add_transition(
            "q0".to_string(),
            "B".to_string(),
            [("qF".to_string(), "1".to_string(), Direction::Stay)],
        );
        machine
    }

    fn s(label: &str) -> String {
        label.to_string()
    }

    #[test]
    fn test_machine_creation() {
        let machine = increment();

        assert_eq!(machine.states(), &[s("q0"), s("qF")]);
        assert_eq!(machine.tape_symbols(), &[s("B"), s("1"), s("0")]);
        assert_eq!(machine.input_symbols(), vec![&s("1")]);
        assert_eq!(machine.blank_label(), "B");
        assert_eq!(machine.initial_state(), Some(0));
        assert!(machine.is_accepting_state(1));
        assert_eq!(machine.table().len(), 2);
    }

    #[test]
    fn test_blank_is_never_an_input_symbol() {
        let mut machine: TuringMachine = TuringMachine::new(s("B"));

        assert_eq!(machine.add_input_symbol(s("B")), BLANK);
        assert!(machine.input_alphabet().is_empty());
    }

    #[test]
    fn test_transition_lookup_by_label() {
        let machine = increment();

        let outcomes = machine.transition(&s("q0"), &s("1")).unwrap();
        assert_eq!(outcomes, vec![(&s("q0"), &s("1"), Direction::Right)]);

        // Known key without a move is not an error
        assert!(machine.transition(&s("qF"), &s("1")).unwrap().is_empty());

        assert_eq!(
            machine.transition(&s("nope"), &s("1")),
            Err(TuringMachineError::UnknownState("\"nope\"".to_string()))
        );
        assert!(matches!(
            machine.transition(&s("q0"), &s("x")),
            Err(TuringMachineError::UnknownSymbol(_))
        ));
    }

    #[test]
    fn test_add_transition_indexed_fails_fast() {
        let mut machine = increment();

        assert_eq!(
            machine.add_transition_indexed(9, 0, []),
            Err(TuringMachineError::UnknownStateIndex(9))
        );
        assert_eq!(
            machine.add_transition_indexed(0, 1, [Outcome::new(0, 7, Direction::Left)]),
            Err(TuringMachineError::UnknownSymbolIndex(7))
        );
        assert_eq!(machine.table().len(), 2);

        machine
            .add_transition_indexed(1, 1, [Outcome::new(0, 2, Direction::Left)])
            .unwrap();
        assert_eq!(machine.table().len(), 3);
    }

    #[test]
    fn test_set_accepting_requires_known_states() {
        let mut machine = increment();

        assert!(machine.set_accepting([&s("q0"), &s("zz")]).is_err());
        assert_eq!(machine.accepting_state_labels(), vec![&s("qF")]);

        machine.set_accepting([&s("q0")]).unwrap();
        assert_eq!(machine.accepting_state_labels(), vec![&s("q0")]);
    }

    #[test]
    fn test_set_initial_state_requires_known_state() {
        let mut machine = increment();

        assert!(machine.set_initial_state(&s("zz")).is_err());
        assert_eq!(machine.set_initial_state(&s("qF")).unwrap(), 1);
        assert_eq!(machine.initial_state_label(), Some(&s("qF")));
    }

    #[test]
    fn test_rename_state_keeps_roles() {
        let mut machine = increment();

        machine.rename_state(&s("qF"), s("accept")).unwrap();
        assert_eq!(machine.accepting_state_labels(), vec![&s("accept")]);
        assert_eq!(
            machine.transition(&s("q0"), &s("B")).unwrap(),
            vec![(&s("accept"), &s("1"), Direction::Stay)]
        );
        assert_eq!(
            machine.rename_state(&s("q0"), s("accept")),
            Err(TuringMachineError::AlreadyExistsState("\"accept\"".to_string()))
        );
    }

    #[test]
    fn test_rename_symbol() {
        let mut machine = increment();

        machine.rename_symbol(&s("1"), s("|")).unwrap();
        assert_eq!(machine.input_symbols(), vec![&s("|")]);
        assert!(matches!(
            machine.rename_symbol(&s("0"), s("B")),
            Err(TuringMachineError::AlreadyExistsSymbol(_))
        ));
    }

    #[test]
    fn test_initial_configuration() {
        let machine = increment();

        let configuration = machine
            .initial_configuration(&[s("1"), s("1")])
            .unwrap();
        assert_eq!(configuration.state(), 0);
        assert_eq!(configuration.head(), 0);
        assert_eq!(configuration.tape().cells(), vec![1, 1]);

        assert!(matches!(
            machine.initial_configuration(&[s("7")]),
            Err(TuringMachineError::UnknownSymbol(_))
        ));

        let empty: TuringMachine = TuringMachine::new(s("B"));
        assert_eq!(
            empty.initial_configuration(&[]).unwrap_err(),
            TuringMachineError::MissingInitialState
        );
    }

    #[test]
    fn test_empty_input_stores_one_blank_cell() {
        let machine = increment();

        let configuration = machine.initial_configuration(&[]).unwrap();
        assert_eq!(configuration.tape().cells(), vec![BLANK]);
        assert_eq!(configuration.current_symbol(), BLANK);
    }

    #[test]
    fn test_presentation_accessors() {
        let machine = increment();
        let configuration = machine
            .initial_configuration(&[s("1"), s("0")])
            .unwrap();

        assert_eq!(machine.state_label_of(&configuration).unwrap(), "q0");
        assert_eq!(
            machine.tape_window(&configuration, 1, 2).unwrap(),
            vec![&s("B"), &s("1"), &s("0"), &s("B")]
        );
        assert!(!machine.is_accepting(&configuration));
        assert_eq!(machine.describe(&configuration), "q0, …  _1_ 0 …");
    }

    #[test]
    fn test_add_next_state_skips_taken_labels() {
        let mut machine = increment();
        machine.add_state(s("q_3"));

        assert_eq!(machine.add_next_state(), (s("q_4"), 3));
        assert_eq!(machine.add_next_state(), (s("q_5"), 4));
    }

    #[test]
    fn test_add_error_state_completes_table() {
        let mut machine = increment();
        let error = machine.add_error_state(s("qE"));

        let keys = machine.state_count() * machine.symbol_count();
        assert_eq!(machine.table().key_count(), keys);
        assert_eq!(
            machine.transition(&s("qF"), &s("0")).unwrap(),
            vec![(&s("qE"), &s("0"), Direction::Stay)]
        );
        assert_eq!(machine.table().successors(error), BTreeSet::from([error]));
        // Existing moves are untouched
        assert_eq!(machine.transition(&s("q0"), &s("1")).unwrap().len(), 1);
    }

    #[test]
    fn test_summary() {
        let machine = increment();
        let summary = machine.to_string();

        assert!(summary.contains("States  : q0, qF"));
        assert!(summary.contains("Sigma   : 1"));
        assert!(summary.contains("Gamma   : B, 1, 0"));
        assert!(summary.contains("Initial : q0"));
        assert!(summary.contains("Acceptors: qF"));
        assert!(summary.contains(" q0,1/1 → q0,R"));
        assert!(summary.contains(" q0,B/1 → qF,N"));
    }
}
