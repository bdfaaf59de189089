// Copyright (c) 2018-2023 The MobileCoin Foundation

//! A cleartext backend over plain u64 words.
//!
//! This is the reference implementation for tests, and for deployments where
//! the protection comes from somewhere else (an enclave, say) rather than
//! from an encryption scheme. The words are not secret from this process,
//! but the code is still written without value-dependent branches or
//! value-dependent memory access: equality goes through `subtle`, and lookup
//! tables are evaluated by scanning every entry and conditionally keeping
//! one, never by indexing with the (secret-derived) index.

use super::{ArithBackend, LookupTable};
use subtle::{ConditionallySelectable, ConstantTimeEq};

/// Plain u64 arithmetic with constant-time equality and table evaluation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearBackend;

impl ArithBackend for ClearBackend {
    type Word = u64;

    fn word(&self, n: u64) -> u64 {
        n
    }

    fn add(&self, a: &u64, b: &u64) -> u64 {
        a.wrapping_add(*b)
    }

    fn mul(&self, a: &u64, b: &u64) -> u64 {
        a.wrapping_mul(*b)
    }

    fn eq(&self, a: &u64, b: &u64) -> u64 {
        a.ct_eq(b).unwrap_u8() as u64
    }

    fn apply_lut(&self, lut: &LookupTable, index: &u64) -> u64 {
        debug_assert!(
            (*index as usize) < lut.len(),
            "lut index out of domain: {} >= {}",
            index,
            lut.len()
        );
        let mut result = 0u64;
        for (i, entry) in lut.entries().iter().enumerate() {
            result.conditional_assign(entry, (i as u64).ct_eq(index));
        }
        result
    }

    fn reveal(&self, w: &u64) -> u64 {
        *w
    }
}
