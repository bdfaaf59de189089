// Copyright (c) 2018-2023 The MobileCoin Foundation

//! Row selection vectors, computed without early exit.
//!
//! Both selectors visit every row of the table and return a vector of 0/1
//! words. They are the only place where an operation "decides" which rows it
//! affects, and the decision is arithmetic, never a branch: the circuit
//! shape is identical for every input.

use crate::{ArithBackend, TableState};
use alloc::vec::Vec;

/// Select the lowest-indexed row whose used flag is unset.
///
/// A running `found` accumulator is packed with each flag as
/// `packed = found * 2 + flag`, and a row is selected exactly when the
/// packed word is zero: the flag is unset and no earlier row was already
/// taken. At most one entry of the result is 1; if every row is used the
/// result is all-zero, which makes the caller's update a no-op.
pub fn first_free<B: ArithBackend>(backend: &B, state: &TableState<B::Word>) -> Vec<B::Word> {
    let zero = backend.word(0);
    let two = backend.word(2);
    let mut found = backend.word(0);
    let mut selection = Vec::with_capacity(state.capacity());
    for row in 0..state.capacity() {
        let packed = backend.add(&backend.mul(&found, &two), state.flag(row));
        let is_selected = backend.eq(&packed, &zero);
        found = backend.add(&found, &is_selected);
        selection.push(is_selected);
    }
    selection
}

/// Select every row whose key chunks all equal the query key.
///
/// A row matches when the count of equal chunks is the full chunk count.
/// Only key chunks are compared, so unused rows (all-zero key chunks) match
/// a query for the all-zero key. More than one entry of the result may be 1
/// when duplicate keys were inserted, and that is deliberately not collapsed
/// here.
pub fn exact_match<B: ArithBackend>(
    backend: &B,
    state: &TableState<B::Word>,
    query: &[B::Word],
) -> Vec<B::Word> {
    debug_assert_eq!(
        query.len(),
        state.config().key_chunks(),
        "query chunk count mismatch"
    );
    let full_count = backend.word(query.len() as u64);
    let mut selection = Vec::with_capacity(state.capacity());
    for row in 0..state.capacity() {
        let mut equal_chunks = backend.word(0);
        for (chunk, wanted) in state.key_chunks(row).iter().zip(query) {
            equal_chunks = backend.add(&equal_chunks, &backend.eq(chunk, wanted));
        }
        selection.push(backend.eq(&equal_chunks, &full_count));
    }
    selection
}
