// Copyright (c) 2018-2023 The MobileCoin Foundation

//! Conversion between integers and fixed-length chunk sequences.
//!
//! This is plain arithmetic on public-side values, performed before a key or
//! value enters the oblivious domain and after a query result leaves it. It
//! carries no backend dependency and has no oblivious requirement of its
//! own.

use alloc::{vec, vec::Vec};
use core::fmt::{self, Display};

/// Encodes integers into base `2^chunk_bits` digit sequences and back.
///
/// Chunks are most-significant first, zero-padded to the full width, e.g.
/// with 4-bit chunks `encode(3, 8)` is `[0, 3]` and `encode(0x2a, 8)` is
/// `[2, 10]`.
#[derive(Clone, Copy, Debug)]
pub struct ChunkCodec {
    chunk_bits: u32,
}

impl ChunkCodec {
    /// Build a codec for a chunk width.
    ///
    /// Chunk width is public configuration, normally validated by
    /// [`TableConfig`](crate::TableConfig) first, so a bad width here is a
    /// construction-time panic rather than a runtime error.
    pub fn new(chunk_bits: u32) -> Self {
        assert!(
            chunk_bits >= 1 && chunk_bits <= crate::MAX_CHUNK_BITS,
            "chunk width out of range"
        );
        Self { chunk_bits }
    }

    /// Encode `n` into exactly `width_bits / chunk_bits` chunks.
    ///
    /// `width_bits` must be a multiple of the chunk width (a configuration
    /// precondition, upheld by [`TableConfig`](crate::TableConfig)). A value
    /// that does not fit in `width_bits` bits is rejected, never truncated.
    pub fn encode(&self, n: u64, width_bits: u32) -> Result<Vec<u64>, DomainError> {
        debug_assert!(width_bits % self.chunk_bits == 0, "width unaligned to chunks");
        if width_bits < 64 && (n >> width_bits) != 0 {
            return Err(DomainError {
                value: n,
                width_bits,
            });
        }
        let mut chunks = vec![0u64; (width_bits / self.chunk_bits) as usize];
        let mask = (1u64 << self.chunk_bits) - 1;
        let mut rest = n;
        for chunk in chunks.iter_mut().rev() {
            *chunk = rest & mask;
            rest >>= self.chunk_bits;
        }
        Ok(chunks)
    }

    /// Decode a chunk sequence back to an integer: the positional sum
    /// `Σ chunks[i] * (2^chunk_bits)^(len-1-i)`.
    ///
    /// Chunks are not required to be reduced below `2^chunk_bits`; a query
    /// over duplicate keys legitimately produces chunk sums above the base,
    /// and those decode by the same positional formula (wrapping at 64
    /// bits).
    pub fn decode(&self, chunks: &[u64]) -> u64 {
        let base = 1u64 << self.chunk_bits;
        chunks
            .iter()
            .fold(0u64, |acc, chunk| acc.wrapping_mul(base).wrapping_add(*chunk))
    }
}

/// An argument outside the domain of its configured width.
///
/// Raised at the encode boundary, before anything enters the oblivious
/// computation. Inside the circuits there are no errors at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomainError {
    /// The rejected value.
    pub value: u64,
    /// The width it needed to fit in.
    pub width_bits: u32,
}

impl Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "value {} does not fit in {} bits",
            self.value, self.width_bits
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use yare::parameterized;

    #[test]
    fn test_encode_examples() {
        let codec = ChunkCodec::new(4);
        assert_eq!(codec.encode(3, 8).unwrap(), &[0, 3]);
        assert_eq!(codec.encode(0x2a, 8).unwrap(), &[2, 10]);
        assert_eq!(codec.encode(25, 8).unwrap(), &[1, 9]);
        assert_eq!(
            codec.encode(0xdead_beef, 32).unwrap(),
            &[13, 14, 10, 13, 11, 14, 14, 15]
        );
    }

    #[test]
    fn test_encode_rejects_out_of_domain() {
        let codec = ChunkCodec::new(4);
        assert_eq!(
            codec.encode(256, 8),
            Err(DomainError {
                value: 256,
                width_bits: 8,
            })
        );
        assert!(codec.encode(255, 8).is_ok());
        // full-width values always fit
        assert!(codec.encode(u64::MAX, 64).is_ok());
    }

    #[parameterized(
        chunk1_width8 = { 1, 8 },
        chunk2_width8 = { 2, 8 },
        chunk4_width8 = { 4, 8 },
        chunk8_width8 = { 8, 8 },
        chunk4_width16 = { 4, 16 },
        chunk8_width16 = { 8, 16 },
        chunk16_width16 = { 16, 16 },
    )]
    fn round_trip_exhaustive(chunk_bits: u32, width_bits: u32) {
        let codec = ChunkCodec::new(chunk_bits);
        for n in 0..(1u64 << width_bits) {
            let chunks = codec.encode(n, width_bits).unwrap();
            assert_eq!(chunks.len() as u32, width_bits / chunk_bits);
            assert_eq!(codec.decode(&chunks), n);
        }
    }

    #[parameterized(
        chunk4_width32 = { 4, 32 },
        chunk8_width64 = { 8, 64 },
        chunk16_width64 = { 16, 64 },
    )]
    fn round_trip_sampled(chunk_bits: u32, width_bits: u32) {
        let codec = ChunkCodec::new(chunk_bits);
        let top = if width_bits == 64 {
            u64::MAX
        } else {
            (1u64 << width_bits) - 1
        };
        let step = (top / 257).max(1);
        let mut n = 0u64;
        loop {
            assert_eq!(codec.decode(&codec.encode(n, width_bits).unwrap()), n);
            n = match n.checked_add(step) {
                Some(next) if next <= top => next,
                _ => break,
            };
        }
        assert_eq!(codec.decode(&codec.encode(top, width_bits).unwrap()), top);
    }

    #[test]
    fn test_decode_unreduced_chunks() {
        // Duplicate-key queries sum value chunks, so decode must accept
        // digits at or above the base: [0, 8] + [0, 8] -> [0, 16]
        let codec = ChunkCodec::new(4);
        assert_eq!(codec.decode(&[0, 16]), 16);
        assert_eq!(codec.decode(&[2, 20]), 52);
    }
}
