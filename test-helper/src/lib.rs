pub use rand_core::{CryptoRng, RngCore, SeedableRng};
use rand_hc::Hc128Rng;
type Seed = <RngType as SeedableRng>::Seed;

const NUM_TRIALS: usize = 3;

// Sometimes you need to have the type in scope to call trait functions
pub type RngType = Hc128Rng;

// Helper for running a unit test that requires randomness, but doing it
// seeded and deterministically
pub fn run_with_several_seeds<F: FnMut(RngType)>(mut f: F) {
    let mut source = get_seeded_rng();
    for _ in 0..NUM_TRIALS {
        let mut seed = Seed::default();
        source.fill_bytes(&mut seed);
        f(RngType::from_seed(seed));
    }
}

pub fn get_seeded_rng() -> RngType {
    RngType::from_seed([11u8; 32])
}
