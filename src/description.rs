//! This module defines `MachineDescription`, a plain-data, serde-friendly form of a
//! machine, and the conversions between it and `TuringMachine`.

use crate::machine::TuringMachine;
use crate::types::{Direction, TuringMachineError, DEFAULT_BLANK_SYMBOL};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

fn default_blank<A: From<&'static str>>() -> A {
    A::from(DEFAULT_BLANK_SYMBOL)
}

/// The outcomes of one `(state, read)` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaEntry<S = String, A = String> {
    pub state: S,
    pub read: A,
    pub outcomes: Vec<(S, A, Direction)>,
}

/// A complete machine as plain data.
///
/// Only `blank` has a default; every list may be omitted. States and symbols that
/// only appear in `delta` are added when the machine is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, A: Serialize",
    deserialize = "S: Deserialize<'de>, A: Deserialize<'de> + From<&'static str>"
))]
pub struct MachineDescription<S = String, A = String> {
    #[serde(default)]
    pub states: Vec<S>,
    #[serde(default)]
    pub sigma: Vec<A>,
    #[serde(default)]
    pub gamma: Vec<A>,
    #[serde(default = "default_blank")]
    pub blank: A,
    #[serde(default)]
    pub initial: Option<S>,
    #[serde(default)]
    pub accepting: Vec<S>,
    #[serde(default)]
    pub delta: Vec<DeltaEntry<S, A>>,
}

impl<S, A> TuringMachine<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Builds a machine from `description`.
    ///
    /// Fails if the blank is listed as an input symbol, or if the initial or an accepting
    /// state is mentioned nowhere else.
    pub fn from_description(
        description: &MachineDescription<S, A>,
    ) -> Result<Self, TuringMachineError> {
        if description.sigma.contains(&description.blank) {
            return Err(TuringMachineError::ValidationError(format!(
                "Blank symbol {:?} cannot be an input symbol",
                description.blank
            )));
        }

        let mut machine = TuringMachine::new(description.blank.clone());

        for state in &description.states {
            machine.add_state(state.clone());
        }
        for symbol in &description.gamma {
            machine.add_tape_symbol(symbol.clone());
        }
        for symbol in &description.sigma {
            machine.add_input_symbol(symbol.clone());
        }
        for entry in &description.delta {
            machine.add_transition(
                entry.state.clone(),
                entry.read.clone(),
                entry.outcomes.iter().cloned(),
            );
        }

        if let Some(initial) = &description.initial {
            machine.set_initial_state(initial)?;
        }
        machine.set_accepting(&description.accepting)?;

        Ok(machine)
    }

    /// Returns a description that rebuilds an equivalent machine.
    pub fn to_description(&self) -> MachineDescription<S, A> {
        let states = self.states();
        let symbols = self.tape_symbols();

        MachineDescription {
            states: states.to_vec(),
            sigma: self.input_symbols().into_iter().cloned().collect(),
            gamma: symbols.iter().skip(1).cloned().collect(),
            blank: self.blank_label().clone(),
            initial: self.initial_state_label().cloned(),
            accepting: self.accepting_state_labels().into_iter().cloned().collect(),
            delta: self
                .table
                .entries()
                .map(|((state, read), outcomes)| DeltaEntry {
                    state: states[state].clone(),
                    read: symbols[read].clone(),
                    outcomes: outcomes
                        .iter()
                        .map(|outcome| {
                            (
                                states[outcome.next_state].clone(),
                                symbols[outcome.write].clone(),
                                outcome.direction,
                            )
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
