// Copyright (c) 2018-2023 The MobileCoin Foundation

//! The three table operations, packaged as one capability object each.
//!
//! A circuit is built once per store from the public configuration; building
//! it constructs the keep-selected table it will evaluate on every run,
//! which is the moral equivalent of compiling the operation for the
//! backend. `run` is the single entry point, a pure function of the state
//! and the encoded arguments: no circuit ever reveals a word, returns an
//! error, or takes a branch that depends on one.
//!
//! Argument chunk counts are caller contracts, checked with debug asserts
//! only; the facade is the sole caller and encodes arguments through the
//! same configuration.

use crate::{select, ArithBackend, KeepSelected, TableConfig, TableState};
use alloc::{vec, vec::Vec};

/// Writes a key-value pair into the lowest-indexed unused row.
#[derive(Clone, Debug)]
pub struct InsertCircuit {
    cfg: TableConfig,
    mux: KeepSelected,
}

impl InsertCircuit {
    /// Build the circuit for a configuration.
    pub fn new(cfg: TableConfig) -> Self {
        Self {
            mux: KeepSelected::new(cfg.chunk_bits()),
            cfg,
        }
    }

    /// Add `(key, value)` into the first free row of `state`.
    ///
    /// Every row receives an update: the selected row gets the flag and the
    /// argument chunks, every other row gets zeroes, so `state + update`
    /// touches nothing it should not. A full table selects no row and the
    /// whole update is zero; the caller cannot observe the difference.
    ///
    /// No existing-key check happens here: inserting a key twice occupies
    /// two rows.
    pub fn run<B: ArithBackend>(
        &self,
        backend: &B,
        state: &mut TableState<B::Word>,
        key: &[B::Word],
        value: &[B::Word],
    ) {
        debug_assert_eq!(key.len(), self.cfg.key_chunks(), "key chunk count");
        debug_assert_eq!(value.len(), self.cfg.value_chunks(), "value chunk count");

        let selection = select::first_free(backend, state);
        for (row, is_selected) in selection.iter().enumerate() {
            let flag = backend.add(state.flag(row), is_selected);
            *state.flag_mut(row) = flag;

            for (chunk, arg) in key.iter().enumerate() {
                let update = self.mux.eval(backend, arg, is_selected);
                let merged = backend.add(&state.key_chunks(row)[chunk], &update);
                state.key_chunks_mut(row)[chunk] = merged;
            }
            for (chunk, arg) in value.iter().enumerate() {
                let update = self.mux.eval(backend, arg, is_selected);
                let merged = backend.add(&state.value_chunks(row)[chunk], &update);
                state.value_chunks_mut(row)[chunk] = merged;
            }
        }
    }
}

/// Overwrites the value of every row whose key equals the query key.
#[derive(Clone, Debug)]
pub struct ReplaceCircuit {
    cfg: TableConfig,
    mux: KeepSelected,
}

impl ReplaceCircuit {
    /// Build the circuit for a configuration.
    pub fn new(cfg: TableConfig) -> Self {
        Self {
            mux: KeepSelected::new(cfg.chunk_bits()),
            cfg,
        }
    }

    /// Set the value of every row matching `key` to `value`.
    ///
    /// Per row, the new value chunk is `keep(new, selected) + keep(old, not
    /// selected)`; the negation is an equality test against zero because the
    /// backend has no subtraction. Flags and key chunks are never written.
    /// No match means every row keeps its old value.
    pub fn run<B: ArithBackend>(
        &self,
        backend: &B,
        state: &mut TableState<B::Word>,
        key: &[B::Word],
        value: &[B::Word],
    ) {
        debug_assert_eq!(key.len(), self.cfg.key_chunks(), "key chunk count");
        debug_assert_eq!(value.len(), self.cfg.value_chunks(), "value chunk count");

        let selection = select::exact_match(backend, state, key);
        let zero = backend.word(0);
        for (row, is_selected) in selection.iter().enumerate() {
            let not_selected = backend.eq(is_selected, &zero);
            for (chunk, arg) in value.iter().enumerate() {
                let take_new = self.mux.eval(backend, arg, is_selected);
                let keep_old = self
                    .mux
                    .eval(backend, &state.value_chunks(row)[chunk], &not_selected);
                state.value_chunks_mut(row)[chunk] = backend.add(&take_new, &keep_old);
            }
        }
    }
}

/// Reads the value stored under a key, with a found counter.
#[derive(Clone, Debug)]
pub struct QueryCircuit {
    cfg: TableConfig,
    mux: KeepSelected,
}

impl QueryCircuit {
    /// Build the circuit for a configuration.
    pub fn new(cfg: TableConfig) -> Self {
        Self {
            mux: KeepSelected::new(cfg.chunk_bits()),
            cfg,
        }
    }

    /// Return `(found, value chunks)` for `key`.
    ///
    /// `found` is the sum of the selection vector and the value chunks are
    /// sums of the selected rows' chunks: 0 and all-zero when absent, the
    /// stored entry when present exactly once, and the chunk-wise sum over
    /// all matches when duplicate keys exist. The caller interprets the
    /// revealed counter; this circuit never does.
    pub fn run<B: ArithBackend>(
        &self,
        backend: &B,
        state: &TableState<B::Word>,
        key: &[B::Word],
    ) -> (B::Word, Vec<B::Word>) {
        debug_assert_eq!(key.len(), self.cfg.key_chunks(), "key chunk count");

        let selection = select::exact_match(backend, state, key);
        let mut found = backend.word(0);
        for is_selected in &selection {
            found = backend.add(&found, is_selected);
        }

        let mut value = vec![backend.word(0); self.cfg.value_chunks()];
        for (row, is_selected) in selection.iter().enumerate() {
            for (chunk, out) in value.iter_mut().enumerate() {
                let picked = self
                    .mux
                    .eval(backend, &state.value_chunks(row)[chunk], is_selected);
                *out = backend.add(out, &picked);
            }
        }
        (found, value)
    }
}
