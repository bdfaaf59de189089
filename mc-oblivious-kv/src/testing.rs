// Copyright (c) 2018-2023 The MobileCoin Foundation

//! Some generic tests that exercise a store over any backend

use crate::{ArithBackend, KvStore};
use alloc::collections::BTreeMap;
use rand_core::{CryptoRng, RngCore};

/// Exercise a store against a shadow map with random in-domain keys and
/// values.
///
/// Per round: pick a key, replace it if the shadow already holds it, insert
/// it if there is room, then check that queries for it and for a random
/// probe agree with the shadow. Key 0 is resampled away because it collides
/// with the all-zero key chunks of unused rows, and duplicate inserts are
/// avoided because their summing semantics are pinned by a dedicated test
/// instead.
pub fn exercise_store<B, R>(num_rounds: usize, store: &mut KvStore<B>, rng: &mut R)
where
    B: ArithBackend,
    R: RngCore + CryptoRng,
{
    let key_bits = store.config().key_bits();
    let value_bits = store.config().value_bits();
    let mut expected = BTreeMap::<u64, u64>::new();

    let mut draw = |rng: &mut R, bits: u32| {
        if bits >= 64 {
            rng.next_u64()
        } else {
            rng.next_u64() & ((1u64 << bits) - 1)
        }
    };

    for _ in 0..num_rounds {
        let mut key = draw(rng, key_bits);
        while key == 0 {
            key = draw(rng, key_bits);
        }
        let value = draw(rng, value_bits);

        if expected.contains_key(&key) {
            store.replace(key, value).expect("in-domain replace");
            expected.insert(key, value);
        } else if expected.len() < store.capacity() {
            store.insert(key, value).expect("in-domain insert");
            expected.insert(key, value);
        }

        assert_eq!(
            store.query(key).expect("in-domain query"),
            expected.get(&key).copied()
        );

        let mut probe = draw(rng, key_bits);
        while probe == 0 {
            probe = draw(rng, key_bits);
        }
        assert_eq!(
            store.query(probe).expect("in-domain query"),
            expected.get(&probe).copied()
        );
    }
}
