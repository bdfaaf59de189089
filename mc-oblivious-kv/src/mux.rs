// Copyright (c) 2018-2023 The MobileCoin Foundation

//! The keep-selected multiplexer, the one conditional-selection mechanism
//! available to the table circuits.
//!
//! `keep_selected(value, selected)` is `value` when `selected` is 1 and 0
//! when it is 0, computed without ever branching on `selected`: the flag is
//! packed as the most significant bit above the value's width, and the
//! packed index is run through a fixed table of size `2^(width+1)` whose
//! lower half is all zeroes and whose upper half is the identity. One table
//! evaluation per chunk, per row, per operation is the dominant cost of
//! every circuit, which is why the table is always built at chunk width and
//! never at the width of a whole key or value.

use crate::{ArithBackend, LookupTable};
use alloc::vec;

/// A keep-selected table for values of a fixed width.
///
/// Built once per circuit and reused for every evaluation; construction is
/// the analog of compiling the selection into the circuit.
#[derive(Clone, Debug)]
pub struct KeepSelected {
    lut: LookupTable,
    /// Weight of the packed select flag, `2^width_bits`.
    select_weight: u64,
}

impl KeepSelected {
    /// Build the table for `width_bits`-bit values.
    pub fn new(width_bits: u32) -> Self {
        let half = 1usize << width_bits;
        let mut entries = vec![0u64; half * 2];
        for (i, entry) in entries.iter_mut().enumerate().skip(half) {
            *entry = (i - half) as u64;
        }
        Self {
            lut: LookupTable::new(entries),
            select_weight: half as u64,
        }
    }

    /// The value width this table was built for.
    pub fn width_bits(&self) -> u32 {
        self.lut.index_bits() - 1
    }

    /// `value` if `selected` is 1, else 0.
    ///
    /// `value` must be below `2^width_bits` and `selected` must be 0 or 1,
    /// both guaranteed by the callers' chunk and selection invariants.
    pub fn eval<B: ArithBackend>(
        &self,
        backend: &B,
        value: &B::Word,
        selected: &B::Word,
    ) -> B::Word {
        let packed = backend.add(
            &backend.mul(selected, &backend.word(self.select_weight)),
            value,
        );
        backend.apply_lut(&self.lut, &packed)
    }
}
