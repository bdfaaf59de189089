// Copyright (c) 2018-2023 The MobileCoin Foundation

//! A fixed-capacity key-value table whose insert, replace, and query
//! operations are data-oblivious: every operation is a fixed sequence of
//! additions, multiplications, 0/1 equality tests, and small lookup-table
//! evaluations over an [`ArithBackend`], with no branch taken and no memory
//! address computed from the value of a key or a value. This is the property
//! needed when the table contents are secret, e.g. encrypted or
//! secret-shared, and the executing machine must not learn anything from its
//! own control flow.
//!
//! Keys and values are represented as fixed-length sequences of small
//! fixed-width digits ("chunks") so that the one conditional-selection
//! primitive, the keep-selected multiplexer, can be a lookup table of
//! practical size: selection happens chunk by chunk, never over a whole key
//! or value at once. Each table row is one used flag, the key chunks, and
//! the value chunks; selection vectors over the rows replace every
//! conditional the operations would otherwise need:
//!
//! - Insert selects the lowest-indexed unused row with a running accumulator
//!   and adds a zero-or-selected update to every row. A full table makes the
//!   selection vector all-zero and the insert a silent no-op; surfacing
//!   "full" as an error would itself be a branch on secret state.
//! - Replace selects rows whose key chunks all equal the query key and
//!   merges `new value if selected, old value otherwise` for every row.
//! - Query sums the selection vector into a found counter and sums the
//!   selected value chunks into the output. A found count of zero decodes to
//!   "absent" at the facade.
//!
//! The table deliberately does not enforce key uniqueness: Insert never
//! checks whether a key already exists, so duplicate keys may occupy several
//! rows. When that happens, Replace overwrites every matching row and Query
//! sums the found counter and the value chunks across all matches. That
//! summing behaviour is a known gap inherited from the design, not a
//! feature; it is pinned by tests rather than silently repaired here.
//!
//! There is no delete, no resize, and no iteration: any of those would
//! either clear a used flag (breaking the all-zero invariant for unused
//! rows) or introduce data-dependent traversal.

#![no_std]
#![deny(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

pub use lut_arith::{ArithBackend, ClearBackend, LookupTable};

mod codec;
pub use codec::{ChunkCodec, DomainError};

mod mux;
pub use mux::KeepSelected;

pub mod select;

mod table;
pub use table::TableState;

mod circuits;
pub use circuits::{InsertCircuit, QueryCircuit, ReplaceCircuit};

mod store;
pub use store::{DebugRow, KvStore};

pub mod testing;

use core::fmt::{self, Display};

/// The largest permitted chunk width.
///
/// The keep-selected multiplexer table has `2^(chunk_bits + 1)` entries, so
/// this bounds the table at 2^17 entries. Real backends want chunks far
/// smaller than this.
pub const MAX_CHUNK_BITS: u32 = 16;

/// The widest key or value the facade can carry, since its API speaks u64.
pub const MAX_INTEGER_BITS: u32 = 64;

/// Public configuration of a table, fixed before construction.
///
/// All of this is public data; the oblivious property only covers the keys
/// and values flowing through the table, never its geometry. Validation
/// happens once, here, so the circuits can assume a coherent geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableConfig {
    capacity: usize,
    chunk_bits: u32,
    key_bits: u32,
    value_bits: u32,
}

impl TableConfig {
    /// Validate and build a configuration.
    ///
    /// Key and value widths must be nonzero exact multiples of the chunk
    /// width, and small enough for the facade's u64 boundary.
    pub fn new(
        capacity: usize,
        chunk_bits: u32,
        key_bits: u32,
        value_bits: u32,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if chunk_bits == 0 || chunk_bits > MAX_CHUNK_BITS {
            return Err(ConfigError::BadChunkWidth { chunk_bits });
        }
        if key_bits == 0 || key_bits > MAX_INTEGER_BITS || key_bits % chunk_bits != 0 {
            return Err(ConfigError::BadKeyWidth {
                key_bits,
                chunk_bits,
            });
        }
        if value_bits == 0 || value_bits > MAX_INTEGER_BITS || value_bits % chunk_bits != 0 {
            return Err(ConfigError::BadValueWidth {
                value_bits,
                chunk_bits,
            });
        }
        Ok(Self {
            capacity,
            chunk_bits,
            key_bits,
            value_bits,
        })
    }

    /// Number of rows in the table.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Width of one chunk in bits.
    pub fn chunk_bits(&self) -> u32 {
        self.chunk_bits
    }

    /// Width of a key in bits.
    pub fn key_bits(&self) -> u32 {
        self.key_bits
    }

    /// Width of a value in bits.
    pub fn value_bits(&self) -> u32 {
        self.value_bits
    }

    /// Number of chunks in a key.
    pub fn key_chunks(&self) -> usize {
        (self.key_bits / self.chunk_bits) as usize
    }

    /// Number of chunks in a value.
    pub fn value_chunks(&self) -> usize {
        (self.value_bits / self.chunk_bits) as usize
    }

    /// Number of words in one table row: the used flag, then the key chunks,
    /// then the value chunks.
    pub fn row_width(&self) -> usize {
        1 + self.key_chunks() + self.value_chunks()
    }
}

/// A configuration rejected at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A table with no rows can hold nothing.
    ZeroCapacity,
    /// Chunk width of zero, or too wide for a practical lookup table.
    BadChunkWidth {
        /// The offending chunk width.
        chunk_bits: u32,
    },
    /// Key width of zero, wider than 64, or not a multiple of the chunk
    /// width.
    BadKeyWidth {
        /// The offending key width.
        key_bits: u32,
        /// The chunk width it must divide by.
        chunk_bits: u32,
    },
    /// Value width of zero, wider than 64, or not a multiple of the chunk
    /// width.
    BadValueWidth {
        /// The offending value width.
        value_bits: u32,
        /// The chunk width it must divide by.
        chunk_bits: u32,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "table capacity must be nonzero"),
            ConfigError::BadChunkWidth { chunk_bits } => write!(
                f,
                "chunk width must be in 1..={} bits, got {}",
                MAX_CHUNK_BITS, chunk_bits
            ),
            ConfigError::BadKeyWidth {
                key_bits,
                chunk_bits,
            } => write!(
                f,
                "key width {} must be a nonzero multiple of chunk width {} and at most {}",
                key_bits, chunk_bits, MAX_INTEGER_BITS
            ),
            ConfigError::BadValueWidth {
                value_bits,
                chunk_bits,
            } => write!(
                f,
                "value width {} must be a nonzero multiple of chunk width {} and at most {}",
                value_bits, chunk_bits, MAX_INTEGER_BITS
            ),
        }
    }
}
