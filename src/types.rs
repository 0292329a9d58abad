//! This module defines the shared types used throughout the simulator: head directions,
//! label kinds, the crate error type and a few configuration constants.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The blank symbol label used when a description does not name one.
pub const DEFAULT_BLANK_SYMBOL: &str = "B";
/// The token that stands for the blank symbol inside an input word.
pub const BLANK_TOKEN: &str = "[B]";
/// The default step budget used by drivers that do not specify one.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// Represents the possible directions a Turing Machine head can move.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Direction {
    /// Move the head one position to the left.
    #[serde(alias = "L")]
    Left,
    /// Keep the head in the same position.
    #[serde(alias = "N", alias = "S")]
    Stay,
    /// Move the head one position to the right.
    #[serde(alias = "R")]
    Right,
}

impl Direction {
    /// Returns the numeric offset of this direction: -1, 0 or +1.
    pub fn offset(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Stay => 0,
            Direction::Right => 1,
        }
    }

    /// Moves `pos` one cell in this direction.
    pub fn apply(self, pos: isize) -> isize {
        pos + self.offset()
    }

    /// Returns the one-letter code used in summaries (`L`, `N`, `R`).
    pub fn code(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Stay => 'N',
            Direction::Right => 'R',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which interner a label belongs to. Used to pick the right error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    State,
    Symbol,
}

/// Represents various errors that can occur while building or analysing a Turing Machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// A state label that was never interned.
    #[error("Unknown state: {0}")]
    UnknownState(String),
    /// A state index outside `0..|Q|`.
    #[error("Unknown state index: {0}")]
    UnknownStateIndex(usize),
    /// A symbol label that was never interned.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
    /// A symbol index outside `0..|gamma|`.
    #[error("Unknown symbol index: {0}")]
    UnknownSymbolIndex(usize),
    /// A rename target that already names another state.
    #[error("State already exists: {0}")]
    AlreadyExistsState(String),
    /// A rename target that already names another symbol.
    #[error("Symbol already exists: {0}")]
    AlreadyExistsSymbol(String),
    /// The machine has no initial state yet.
    #[error("Initial state is not set")]
    MissingInitialState,
    /// The initial state cannot be removed from the machine.
    #[error("Cannot remove the initial state {0}")]
    InitialStateRemoval(String),
    /// A machine description that is structurally invalid.
    #[error("Machine validation error: {0}")]
    ValidationError(String),
    /// An error related to reading machine description files.
    #[error("File error: {0}")]
    FileError(String),
}

impl TuringMachineError {
    pub(crate) fn unknown(kind: LabelKind, label: String) -> Self {
        match kind {
            LabelKind::State => TuringMachineError::UnknownState(label),
            LabelKind::Symbol => TuringMachineError::UnknownSymbol(label),
        }
    }

    pub(crate) fn unknown_index(kind: LabelKind, index: usize) -> Self {
        match kind {
            LabelKind::State => TuringMachineError::UnknownStateIndex(index),
            LabelKind::Symbol => TuringMachineError::UnknownSymbolIndex(index),
        }
    }

    pub(crate) fn already_exists(kind: LabelKind, label: String) -> Self {
        match kind {
            LabelKind::State => TuringMachineError::AlreadyExistsState(label),
            LabelKind::Symbol => TuringMachineError::AlreadyExistsSymbol(label),
        }
    }
}
