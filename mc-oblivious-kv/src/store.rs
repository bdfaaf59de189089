// Copyright (c) 2018-2023 The MobileCoin Foundation

//! The key-value store facade.
//!
//! This is the only layer that crosses the boundary between public integers
//! and oblivious words. It owns the backend, the codec, the current table
//! state, and one prebuilt circuit per operation, held for the store's
//! lifetime. Insert and replace push encoded arguments through their
//! circuits and keep the resulting state; query additionally reveals the
//! found counter and the value chunks on the way out.
//!
//! A store is single-owner state: callers needing shared access serialize
//! outside this type.

use crate::{
    ArithBackend, ChunkCodec, DomainError, InsertCircuit, QueryCircuit, ReplaceCircuit,
    TableConfig, TableState,
};
use alloc::vec::Vec;

/// A fixed-capacity oblivious key-value store over a backend.
pub struct KvStore<B: ArithBackend> {
    backend: B,
    cfg: TableConfig,
    codec: ChunkCodec,
    insert_circuit: InsertCircuit,
    replace_circuit: ReplaceCircuit,
    query_circuit: QueryCircuit,
    state: TableState<B::Word>,
}

impl<B: ArithBackend> KvStore<B> {
    /// Build an empty store from a validated configuration.
    ///
    /// All three circuits are built here, once, and held for the store's
    /// lifetime.
    pub fn new(backend: B, cfg: TableConfig) -> Self {
        let state = TableState::new(&backend, cfg);
        let codec = ChunkCodec::new(cfg.chunk_bits());
        Self {
            insert_circuit: InsertCircuit::new(cfg),
            replace_circuit: ReplaceCircuit::new(cfg),
            query_circuit: QueryCircuit::new(cfg),
            codec,
            state,
            backend,
            cfg,
        }
    }

    /// The store's configuration.
    pub fn config(&self) -> &TableConfig {
        &self.cfg
    }

    /// Number of rows.
    pub fn capacity(&self) -> usize {
        self.cfg.capacity()
    }

    fn lift(&self, chunks: Vec<u64>) -> Vec<B::Word> {
        chunks.iter().map(|chunk| self.backend.word(*chunk)).collect()
    }

    fn encode_key(&self, key: u64) -> Result<Vec<B::Word>, DomainError> {
        Ok(self.lift(self.codec.encode(key, self.cfg.key_bits())?))
    }

    fn encode_value(&self, value: u64) -> Result<Vec<B::Word>, DomainError> {
        Ok(self.lift(self.codec.encode(value, self.cfg.value_bits())?))
    }

    /// Insert `(key, value)` into the first free row.
    ///
    /// A full table drops the pair silently; surfacing that as an error
    /// would leak the (secret) fill level. Inserting an existing key again
    /// is not detected and occupies a second row, after which queries for
    /// that key sum across the copies.
    pub fn insert(&mut self, key: u64, value: u64) -> Result<(), DomainError> {
        let key = self.encode_key(key)?;
        let value = self.encode_value(value)?;
        self.insert_circuit
            .run(&self.backend, &mut self.state, &key, &value);
        Ok(())
    }

    /// Overwrite the value stored under `key`, if any.
    ///
    /// An absent key makes this a no-op; a duplicated key has every copy
    /// overwritten identically. Either way nothing observable distinguishes
    /// the cases.
    pub fn replace(&mut self, key: u64, value: u64) -> Result<(), DomainError> {
        let key = self.encode_key(key)?;
        let value = self.encode_value(value)?;
        self.replace_circuit
            .run(&self.backend, &mut self.state, &key, &value);
        Ok(())
    }

    /// Look up `key`, returning `None` when its found counter is zero.
    ///
    /// Caveats, both pinned by tests: a duplicated key decodes the sum of
    /// its copies' values, and the all-zero key matches the all-zero key
    /// chunks of unused rows, so it reads as present (with value 0) on any
    /// table with a free row.
    pub fn query(&self, key: u64) -> Result<Option<u64>, DomainError> {
        let key = self.encode_key(key)?;
        let (found, value) = self.query_circuit.run(&self.backend, &self.state, &key);
        if self.backend.reveal(&found) == 0 {
            return Ok(None);
        }
        let chunks: Vec<u64> = value.iter().map(|word| self.backend.reveal(word)).collect();
        Ok(Some(self.codec.decode(&chunks)))
    }

    /// Reveal and decode the entire table, row by row.
    ///
    /// This defeats the oblivious property by construction and exists for
    /// tests and diagnostics only, in the spirit of a debug invariant
    /// checker: never call it on production secrets.
    pub fn debug_rows(&self) -> Vec<DebugRow> {
        (0..self.capacity())
            .map(|row| {
                let key_chunks: Vec<u64> = self
                    .state
                    .key_chunks(row)
                    .iter()
                    .map(|word| self.backend.reveal(word))
                    .collect();
                let value_chunks: Vec<u64> = self
                    .state
                    .value_chunks(row)
                    .iter()
                    .map(|word| self.backend.reveal(word))
                    .collect();
                DebugRow {
                    used: self.backend.reveal(self.state.flag(row)) != 0,
                    key: self.codec.decode(&key_chunks),
                    value: self.codec.decode(&value_chunks),
                }
            })
            .collect()
    }
}

/// One revealed table row, for tests and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugRow {
    /// Whether the row holds a live entry.
    pub used: bool,
    /// The decoded key chunks.
    pub key: u64,
    /// The decoded value chunks.
    pub value: u64,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ClearBackend;

    fn small_store() -> KvStore<ClearBackend> {
        // The reference walkthrough geometry: 4-bit chunks, 8-bit keys and
        // values, three rows.
        let cfg = TableConfig::new(3, 4, 8, 8).unwrap();
        KvStore::new(ClearBackend, cfg)
    }

    #[test]
    fn test_reference_walkthrough() {
        let mut store = small_store();

        store.insert(3, 4).unwrap();
        assert_eq!(store.query(3).unwrap(), Some(4));

        store.replace(3, 1).unwrap();
        assert_eq!(store.query(3).unwrap(), Some(1));

        store.insert(25, 40).unwrap();
        assert_eq!(store.query(25).unwrap(), Some(40));

        assert_eq!(store.query(4).unwrap(), None);

        store.replace(3, 5).unwrap();
        assert_eq!(store.query(3).unwrap(), Some(5));
    }

    #[test]
    fn test_query_on_empty_table() {
        let store = small_store();
        for key in 1..=255u64 {
            assert_eq!(store.query(key).unwrap(), None);
        }
    }

    #[test]
    fn test_zero_key_caveat() {
        // Unused rows hold all-zero key chunks, and selection only compares
        // key chunks, so key 0 reads as present whenever a free row exists.
        let store = small_store();
        assert_eq!(store.query(0).unwrap(), Some(0));
    }

    #[test]
    fn test_first_free_ordering_is_observable() {
        let mut store = small_store();
        store.insert(7, 10).unwrap();
        store.insert(9, 20).unwrap();

        let rows = store.debug_rows();
        assert_eq!(
            rows,
            &[
                DebugRow {
                    used: true,
                    key: 7,
                    value: 10,
                },
                DebugRow {
                    used: true,
                    key: 9,
                    value: 20,
                },
                DebugRow {
                    used: false,
                    key: 0,
                    value: 0,
                },
            ]
        );
    }

    #[test]
    fn test_insert_into_full_store_is_silent_noop() {
        let mut store = small_store();
        store.insert(1, 11).unwrap();
        store.insert(2, 12).unwrap();
        store.insert(3, 13).unwrap();

        let before = store.debug_rows();
        store.insert(4, 14).unwrap();
        assert_eq!(store.debug_rows(), before);
        assert_eq!(store.query(4).unwrap(), None);
        assert_eq!(store.query(2).unwrap(), Some(12));
    }

    #[test]
    fn test_replace_absent_key_is_noop() {
        let mut store = small_store();
        store.insert(3, 4).unwrap();

        let before = store.debug_rows();
        store.replace(9, 1).unwrap();
        assert_eq!(store.debug_rows(), before);
        assert_eq!(store.query(9).unwrap(), None);
    }

    #[test]
    fn duplicate_keys_sum_across_matches() {
        // Insert never checks for an existing key. Both copies are live,
        // the found counter is 2, and the decoded value is the chunk-wise
        // sum of the copies. Replace rewrites both copies, so the sum after
        // a replace is twice the new value.
        let mut store = small_store();
        store.insert(3, 4).unwrap();
        store.insert(3, 4).unwrap();

        assert_eq!(store.query(3).unwrap(), Some(8));

        store.replace(3, 5).unwrap();
        assert_eq!(store.query(3).unwrap(), Some(10));
    }

    #[test]
    fn test_out_of_domain_arguments_rejected() {
        let mut store = small_store();
        assert_eq!(
            store.insert(256, 0),
            Err(DomainError {
                value: 256,
                width_bits: 8,
            })
        );
        assert_eq!(
            store.replace(0, 300),
            Err(DomainError {
                value: 300,
                width_bits: 8,
            })
        );
        assert!(store.query(999).is_err());
        // nothing was modified by the rejected calls
        assert_eq!(store.query(1).unwrap(), None);
        assert!(store.debug_rows().iter().all(|row| !row.used));
    }

    #[test]
    fn test_exercise_store_against_shadow_model() {
        use test_helper::run_with_several_seeds;

        run_with_several_seeds(|mut rng| {
            let cfg = TableConfig::new(8, 4, 16, 16).unwrap();
            let mut store = KvStore::new(ClearBackend, cfg);
            crate::testing::exercise_store(200, &mut store, &mut rng);
        });
    }
}
