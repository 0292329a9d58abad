//! This module defines the `Tape`, a conceptually bi-infinite tape of symbol indices.
//!
//! The tape is split at the origin into two halves: `negative[i]` holds the cell at
//! position `-(i + 1)` and `non_negative[i]` holds the cell at position `i`. Cells that
//! were never written read as the blank symbol. Both halves are shared behind `Arc`
//! so cloning a tape is cheap; writing copies only the half it touches, and only when
//! that half is shared with another tape.

use crate::types::Direction;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An immutable, copy-on-write Turing machine tape.
#[derive(Debug, Clone)]
pub struct Tape {
    blank: usize,
    negative: Arc<Vec<usize>>,
    non_negative: Arc<Vec<usize>>,
}

impl Tape {
    /// Creates an empty tape where every cell holds `blank`.
    pub fn new(blank: usize) -> Self {
        Self {
            blank,
            negative: Arc::new(Vec::new()),
            non_negative: Arc::new(Vec::new()),
        }
    }

    /// Creates a tape holding `symbols` at positions `0..`.
    pub fn from_symbols(blank: usize, symbols: impl IntoIterator<Item = usize>) -> Self {
        Self {
            blank,
            negative: Arc::new(Vec::new()),
            non_negative: Arc::new(symbols.into_iter().collect()),
        }
    }

    /// Returns the blank symbol index of this tape.
    pub fn blank(&self) -> usize {
        self.blank
    }

    /// Cells stored at negative positions, nearest to the origin first.
    pub fn negative_half(&self) -> &[usize] {
        &self.negative
    }

    /// Cells stored at positions `0..`.
    pub fn non_negative_half(&self) -> &[usize] {
        &self.non_negative
    }

    /// Reads the symbol at `pos`. Cells beyond the stored halves are blank.
    pub fn read(&self, pos: isize) -> usize {
        let (half, index) = self.locate(pos);
        half.get(index).copied().unwrap_or(self.blank)
    }

    /// Returns a new tape with the cell at `pos` set to `symbol`.
    ///
    /// The half that holds `pos` is padded with blanks up to and including `pos`.
    pub fn write(&self, pos: isize, symbol: usize) -> Tape {
        if self.covers(pos) && self.read(pos) == symbol {
            return self.clone();
        }

        let mut tape = self.clone();
        let blank = tape.blank;
        let (half, index) = tape.locate_mut(pos);
        if half.len() <= index {
            half.resize(index + 1, blank);
        }
        half[index] = symbol;
        tape
    }

    /// Returns this tape padded with blanks so that `pos` is stored explicitly.
    pub fn grown_to(mut self, pos: isize) -> Tape {
        if !self.covers(pos) {
            let blank = self.blank;
            let (half, index) = self.locate_mut(pos);
            half.resize(index + 1, blank);
        }
        self
    }

    /// Returns true if the cell at `pos` is stored in one of the halves.
    pub fn covers(&self, pos: isize) -> bool {
        let (half, index) = self.locate(pos);
        index < half.len()
    }

    /// Moves a cursor position one cell in `direction`.
    pub fn move_cursor(pos: isize, direction: Direction) -> isize {
        direction.apply(pos)
    }

    /// Leftmost stored position (0 when the negative half is empty).
    pub fn leftmost(&self) -> isize {
        -(self.negative.len() as isize)
    }

    /// Translates a position into an index of the concatenated view returned by [`Tape::cells`].
    pub fn offset(&self, pos: isize) -> isize {
        pos + self.negative.len() as isize
    }

    /// Returns `reverse(negative_half) ++ non_negative_half`.
    pub fn cells(&self) -> Vec<usize> {
        self.negative
            .iter()
            .rev()
            .chain(self.non_negative.iter())
            .copied()
            .collect()
    }

    /// Returns the cells from `pos - before` to `pos + after`, reading blanks outside.
    pub fn window(&self, pos: isize, before: usize, after: usize) -> Vec<usize> {
        (pos - before as isize..=pos + after as isize)
            .map(|p| self.read(p))
            .collect()
    }

    /// Returns the stored cells with leading and trailing blanks removed.
    pub fn trimmed(&self) -> Vec<usize> {
        let cells = self.cells();
        let start = cells.iter().position(|&c| c != self.blank);
        let end = cells.iter().rposition(|&c| c != self.blank);
        match (start, end) {
            (Some(start), Some(end)) => cells[start..=end].to_vec(),
            _ => Vec::new(),
        }
    }

    fn locate(&self, pos: isize) -> (&Vec<usize>, usize) {
        if pos < 0 {
            (&self.negative, (-pos - 1) as usize)
        } else {
            (&self.non_negative, pos as usize)
        }
    }

    fn locate_mut(&mut self, pos: isize) -> (&mut Vec<usize>, usize) {
        if pos < 0 {
            (Arc::make_mut(&mut self.negative), (-pos - 1) as usize)
        } else {
            (Arc::make_mut(&mut self.non_negative), pos as usize)
        }
    }

    /// A half without the blank padding at its far end.
    fn significant(half: &[usize], blank: usize) -> &[usize] {
        let len = half.iter().rposition(|&c| c != blank).map_or(0, |i| i + 1);
        &half[..len]
    }
}

/// Two tapes are equal when they hold the same symbol in every cell, regardless of
/// how much blank padding each one has stored.
impl PartialEq for Tape {
    fn eq(&self, other: &Self) -> bool {
        self.blank == other.blank
            && Self::significant(&self.negative, self.blank)
                == Self::significant(&other.negative, other.blank)
            && Self::significant(&self.non_negative, self.blank)
                == Self::significant(&other.non_negative, other.blank)
    }
}

impl Eq for Tape {}

impl Hash for Tape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.blank.hash(state);
        Self::significant(&self.negative, self.blank).hash(state);
        Self::significant(&self.non_negative, self.blank).hash(state);
    }
}
