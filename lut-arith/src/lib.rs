// Copyright (c) 2018-2023 The MobileCoin Foundation

//! The primitive layer for data-oblivious arithmetic circuits.
//!
//! Everything here is expressed over an opaque word type holding a small
//! non-negative integer. A word may be a plain integer (the [`ClearBackend`]
//! reference implementation), or a protected value such as a ciphertext or a
//! secret share, in which case the executing machine cannot branch on it.
//! The trait surface is deliberately tiny: addition, multiplication, a 0/1
//! equality indicator, and evaluation of a fixed finite lookup table. Any
//! computation built only from these operations has a shape (sequence of
//! operations, memory touched) that is independent of the word values, which
//! is the property the layers above rely on.
//!
//! Notably absent: subtraction, comparison other than equality, and any way
//! to branch on a word. `eq(x, zero)` serves as logical negation of a 0/1
//! word where an implementation would otherwise reach for `1 - x`.

#![no_std]
#![deny(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

use alloc::vec::Vec;

mod clear;
pub use clear::ClearBackend;

/// A fixed finite table of small non-negative integers, evaluated by index.
///
/// The table length must be a power of two: the index fed to
/// [`ArithBackend::apply_lut`] is always a packed value of exactly
/// `index_bits` bits, built by the caller from multiplications and additions,
/// so it is in-domain by construction rather than by a runtime check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupTable {
    entries: Vec<u64>,
}

impl LookupTable {
    /// Build a table from its entries. The length must be a power of two.
    ///
    /// Table contents are public configuration, never secret data, so it is
    /// fine to panic here on a bad length.
    pub fn new(entries: Vec<u64>) -> Self {
        assert!(
            entries.len().is_power_of_two(),
            "lookup table length must be a power of two"
        );
        Self { entries }
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty. It never is, per the power-of-two check.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The width in bits of a valid index into this table.
    pub fn index_bits(&self) -> u32 {
        log2_ceil(self.entries.len() as u64)
    }

    /// The raw entries.
    pub fn entries(&self) -> &[u64] {
        &self.entries
    }
}

/// An execution backend for oblivious arithmetic over bounded non-negative
/// integers.
///
/// Implementations must guarantee that none of the four circuit operations
/// (`add`, `mul`, `eq`, `apply_lut`) branches on word values or indexes
/// memory by them in a value-dependent way. For a cleartext backend this
/// means constant-time code; for an encrypted or secret-shared backend the
/// property is structural.
///
/// `word` and `reveal` are the boundary between public data and the
/// oblivious domain. They are only valid at the edges of a computation; the
/// layers above never reveal intermediate values.
pub trait ArithBackend {
    /// The word type all circuit operations are expressed over.
    type Word: Clone;

    /// Lift a public constant into the oblivious domain.
    fn word(&self, n: u64) -> Self::Word;

    /// `a + b`.
    fn add(&self, a: &Self::Word, b: &Self::Word) -> Self::Word;

    /// `a * b`.
    fn mul(&self, a: &Self::Word, b: &Self::Word) -> Self::Word;

    /// A 0/1 indicator word for `a == b`.
    fn eq(&self, a: &Self::Word, b: &Self::Word) -> Self::Word;

    /// Evaluate `lut` at `index`.
    ///
    /// The caller guarantees the index is a packed value of exactly
    /// `lut.index_bits()` bits.
    fn apply_lut(&self, lut: &LookupTable, index: &Self::Word) -> Self::Word;

    /// Take a word back out of the oblivious domain.
    ///
    /// For a protected backend this is the decrypt / reconstruct step and is
    /// only meaningful for designated outputs.
    fn reveal(&self, w: &Self::Word) -> u64;
}

/// Utility function for logs base 2 rounded up, implemented as const fn
#[inline]
pub const fn log2_ceil(arg: u64) -> u32 {
    if arg == 0 {
        return 0;
    }
    (!0u64).count_ones() - (arg - 1).leading_zeros()
}
