//! This crate provides the core logic for a nondeterministic Turing machine simulator.
//! It includes modules for building machines over arbitrary state and symbol labels,
//! simulating them breadth-first over sets of configurations, analyzing and pruning their
//! state graph, and loading them from JSON descriptions.

pub mod configuration;
pub mod description;
pub mod graph;
pub mod interner;
pub mod loader;
pub mod machine;
pub mod run;
pub mod stepper;
pub mod tape;
pub mod transition;
pub mod types;

/// Re-exports the configuration types the simulation works on.
pub use configuration::{Configuration, ConfigurationSet};
/// Re-exports the plain-data machine description used for (de)serialization.
pub use description::{DeltaEntry, MachineDescription};
pub use interner::Interner;
/// Re-exports the `MachineLoader` struct and the input tokenizer from the loader module.
pub use loader::{tokenize, MachineLoader};
/// Re-exports the `TuringMachine` struct and the blank symbol index from the machine module.
pub use machine::{TuringMachine, BLANK};
pub use run::{Run, RunOutcome, RunStatus};
pub use stepper::Stepper;
pub use tape::Tape;
pub use transition::{Outcome, TransitionTable};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Direction, LabelKind, TuringMachineError, BLANK_TOKEN, DEFAULT_BLANK_SYMBOL,
    MAX_EXECUTION_STEPS,
};
