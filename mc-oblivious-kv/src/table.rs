// Copyright (c) 2018-2023 The MobileCoin Foundation

//! The table arena: a flat, fixed-length word array with row accessors.
//!
//! Row layout is `| used flag | key chunks | value chunks |`. Rows are
//! indexed by plain public integers only; nothing in the layout can be
//! addressed by secret data. The initial state is all zeroes, and the
//! circuits maintain the invariant that a row with a zero used flag has
//! all-zero key and value chunks (inserts only ever add zero into rows they
//! do not select).

use crate::{ArithBackend, TableConfig};
use alloc::{vec, vec::Vec};

/// The full state of a table, generic over the backend's word type.
///
/// Each operation consumes the state by mutable borrow and leaves the next
/// state in place; there is no partial application, a circuit's pass over
/// the rows is one atomic transformation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableState<W> {
    cfg: TableConfig,
    words: Vec<W>,
}

impl<W: Clone> TableState<W> {
    /// An all-zero table of `cfg.capacity()` rows, zeroed through the
    /// backend so the words are valid in its domain.
    pub fn new<B: ArithBackend<Word = W>>(backend: &B, cfg: TableConfig) -> Self {
        let words = vec![backend.word(0); cfg.capacity() * cfg.row_width()];
        Self { cfg, words }
    }

    /// The configuration this state was built with.
    pub fn config(&self) -> &TableConfig {
        &self.cfg
    }

    /// Number of rows.
    pub fn capacity(&self) -> usize {
        self.cfg.capacity()
    }

    fn row_start(&self, row: usize) -> usize {
        debug_assert!(row < self.cfg.capacity(), "row index out of range");
        row * self.cfg.row_width()
    }

    /// The used flag of a row.
    pub fn flag(&self, row: usize) -> &W {
        &self.words[self.row_start(row)]
    }

    /// The key chunks of a row.
    pub fn key_chunks(&self, row: usize) -> &[W] {
        let start = self.row_start(row) + 1;
        &self.words[start..start + self.cfg.key_chunks()]
    }

    /// The value chunks of a row.
    pub fn value_chunks(&self, row: usize) -> &[W] {
        let start = self.row_start(row) + 1 + self.cfg.key_chunks();
        &self.words[start..start + self.cfg.value_chunks()]
    }

    pub(crate) fn flag_mut(&mut self, row: usize) -> &mut W {
        let start = self.row_start(row);
        &mut self.words[start]
    }

    pub(crate) fn key_chunks_mut(&mut self, row: usize) -> &mut [W] {
        let start = self.row_start(row) + 1;
        let len = self.cfg.key_chunks();
        &mut self.words[start..start + len]
    }

    pub(crate) fn value_chunks_mut(&mut self, row: usize) -> &mut [W] {
        let start = self.row_start(row) + 1 + self.cfg.key_chunks();
        let len = self.cfg.value_chunks();
        &mut self.words[start..start + len]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ClearBackend;

    #[test]
    fn test_layout_and_accessors() {
        let backend = ClearBackend;
        let cfg = TableConfig::new(3, 4, 8, 8).unwrap();
        let mut state = TableState::new(&backend, cfg);
        assert_eq!(state.capacity(), 3);
        assert_eq!(state.key_chunks(0).len(), 2);
        assert_eq!(state.value_chunks(2).len(), 2);

        *state.flag_mut(1) = 1;
        state.key_chunks_mut(1).copy_from_slice(&[2, 10]);
        state.value_chunks_mut(1).copy_from_slice(&[0, 3]);

        // neighbours untouched
        assert_eq!(*state.flag(0), 0);
        assert_eq!(state.key_chunks(0), &[0, 0]);
        assert_eq!(*state.flag(1), 1);
        assert_eq!(state.key_chunks(1), &[2, 10]);
        assert_eq!(state.value_chunks(1), &[0, 3]);
        assert_eq!(*state.flag(2), 0);
        assert_eq!(state.value_chunks(2), &[0, 0]);
    }
}
