//! This module provides the `Interner`, a bidirectional mapping between external labels
//! (state names, tape symbols) and dense `usize` indices.

use crate::types::{LabelKind, TuringMachineError};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Maps labels to dense indices `0..len` and back.
///
/// Indices are handed out in insertion order and never change, except through
/// [`Interner::rename`] (which keeps the index and swaps the label) or by rebuilding
/// the interner with [`Interner::retain`].
#[derive(Debug, Clone)]
pub struct Interner<L> {
    kind: LabelKind,
    labels: Vec<L>,
    indices: HashMap<L, usize>,
}

impl<L> Interner<L>
where
    L: Clone + Eq + Hash + Debug,
{
    /// Creates an empty interner for labels of the given kind.
    pub fn new(kind: LabelKind) -> Self {
        Self {
            kind,
            labels: Vec::new(),
            indices: HashMap::new(),
        }
    }

    /// Returns the index of `label`, allocating the next free one if it is new.
    pub fn intern(&mut self, label: L) -> usize {
        if let Some(&index) = self.indices.get(&label) {
            return index;
        }

        let index = self.labels.len();
        self.indices.insert(label.clone(), index);
        self.labels.push(label);
        index
    }

    /// Returns the index of `label` if it has been interned.
    pub fn get(&self, label: &L) -> Option<usize> {
        self.indices.get(label).copied()
    }

    /// Returns the index of `label`, or an `Unknown*` error.
    pub fn index_of(&self, label: &L) -> Result<usize, TuringMachineError> {
        self.get(label)
            .ok_or_else(|| TuringMachineError::unknown(self.kind, format!("{:?}", label)))
    }

    /// Returns the label stored at `index`, or an `Unknown*Index` error.
    pub fn label_of(&self, index: usize) -> Result<&L, TuringMachineError> {
        self.labels
            .get(index)
            .ok_or_else(|| TuringMachineError::unknown_index(self.kind, index))
    }

    /// Fails with an `Unknown*Index` error unless `index` is in range.
    pub fn check(&self, index: usize) -> Result<usize, TuringMachineError> {
        self.label_of(index).map(|_| index)
    }

    pub fn contains(&self, label: &L) -> bool {
        self.indices.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns all labels in index order.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Iterates `(index, label)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &L)> {
        self.labels.iter().enumerate()
    }

    /// Repoints the index of `old` to `new`.
    ///
    /// Fails with `AlreadyExists*` if `new` is already interned, and with `Unknown*`
    /// if `old` is not. On failure nothing changes.
    pub fn rename(&mut self, old: &L, new: L) -> Result<usize, TuringMachineError> {
        if self.contains(&new) {
            return Err(TuringMachineError::already_exists(
                self.kind,
                format!("{:?}", new),
            ));
        }

        let index = self.index_of(old)?;
        self.indices.remove(old);
        self.indices.insert(new.clone(), index);
        self.labels[index] = new;
        Ok(index)
    }

    /// Keeps only the indices for which `keep` returns true and compacts the rest.
    ///
    /// Returns the remapping table: `remap[old] == Some(new)` for kept labels.
    pub fn retain(&mut self, mut keep: impl FnMut(usize) -> bool) -> Vec<Option<usize>> {
        let mut remap = Vec::with_capacity(self.labels.len());
        let mut labels = Vec::new();

        for (index, label) in self.labels.drain(..).enumerate() {
            if keep(index) {
                remap.push(Some(labels.len()));
                labels.push(label);
            } else {
                remap.push(None);
            }
        }

        self.indices = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (label.clone(), index))
            .collect();
        self.labels = labels;
        remap
    }

    /// Replaces every label at once, keeping the indices.
    ///
    /// `labels` must have exactly one entry per index and contain no duplicates.
    pub fn relabel(&mut self, labels: Vec<L>) -> Result<(), TuringMachineError> {
        if labels.len() != self.labels.len() {
            return Err(TuringMachineError::ValidationError(format!(
                "Expected {} labels, got {}",
                self.labels.len(),
                labels.len()
            )));
        }

        let mut indices = HashMap::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            if indices.insert(label.clone(), index).is_some() {
                return Err(TuringMachineError::already_exists(
                    self.kind,
                    format!("{:?}", label),
                ));
            }
        }

        self.labels = labels;
        self.indices = indices;
        Ok(())
    }
}
