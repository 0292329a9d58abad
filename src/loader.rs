//! This module provides the `MachineLoader` struct, responsible for loading machine
//! descriptions from JSON files and strings, and the tokenizer that turns an input word
//! into tape symbol labels.

use crate::description::MachineDescription;
use crate::machine::TuringMachine;
use crate::types::{TuringMachineError, BLANK_TOKEN};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref TAPE_TOKEN: Regex = Regex::new(r#"\[B\]|epsilon|ε|"[^"]+"|\S"#).unwrap();
}

/// Splits `input` into symbol labels.
///
/// * `[B]` stands for the blank symbol and becomes `blank`.
/// * `"..."` is a single multi-character symbol (quotes removed).
/// * `epsilon` and `ε` denote the empty word and produce nothing.
/// * Any other non-whitespace character is a symbol of its own.
pub fn tokenize(input: &str, blank: &str) -> Vec<String> {
    TAPE_TOKEN
        .find_iter(input)
        .filter_map(|token| match token.as_str() {
            BLANK_TOKEN => Some(blank.to_string()),
            "epsilon" | "ε" => None,
            quoted if quoted.len() > 1 && quoted.starts_with('"') => {
                Some(quoted.trim_matches('"').to_string())
            }
            symbol => Some(symbol.to_string()),
        })
        .collect()
}

/// `MachineLoader` is a utility struct for loading machines.
/// It provides methods to load machines from individual files, from string content,
/// and to discover and load all `.json` files within a specified directory.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a machine from the JSON description at `path`.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ValidationError)` if the content is not a valid description.
    pub fn load(path: &Path) -> Result<TuringMachine, TuringMachineError> {
        TuringMachine::from_description(&Self::load_description(path)?)
    }

    /// Reads the JSON description at `path` without building the machine.
    pub fn load_description(path: &Path) -> Result<MachineDescription, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::parse_description(&content)
    }

    /// Loads a machine from a JSON description string.
    pub fn load_from_str(content: &str) -> Result<TuringMachine, TuringMachineError> {
        TuringMachine::from_description(&Self::parse_description(content)?)
    }

    fn parse_description(content: &str) -> Result<MachineDescription, TuringMachineError> {
        serde_json::from_str(content).map_err(|e| {
            TuringMachineError::ValidationError(format!("Invalid machine description: {}", e))
        })
    }

    /// Writes the description of `machine` to `path` as pretty-printed JSON.
    pub fn save(machine: &TuringMachine, path: &Path) -> Result<(), TuringMachineError> {
        let content = serde_json::to_string_pretty(&machine.to_description()).map_err(|e| {
            TuringMachineError::ValidationError(format!("Failed to encode machine: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to write file {}: {}", path.display(), e))
        })
    }

    /// Loads every `.json` machine description from `directory`.
    ///
    /// Directories and files with other extensions are skipped. Each entry of the result
    /// is either the path with its machine, or the error met while loading it.
    pub fn load_machines(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, TuringMachine), TuringMachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let path = match entry {
                    Ok(entry) => entry.path(),
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                Some(Self::load(&path).map(|machine| (path, machine)))
            })
            .collect()
    }
}
