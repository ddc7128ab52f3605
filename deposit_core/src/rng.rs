//! Deterministic per-trial RNG seeding.
//!
//! Every (loading level, trial) pair gets its own `SmallRng`:
//!
//!   seed = run_seed XOR ((level << 32 | trial) * MIXING_CONSTANT)
//!
//! Trials therefore never share RNG state, can run on any thread in any
//! order, and a run is reproduced exactly by its run seed.

use rand::SeedableRng;
use rand::rngs::SmallRng;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seed of trial `trial` at loading level `level`.
#[inline]
pub fn trial_seed(run_seed: u64, level: usize, trial: usize) -> u64 {
    let slot = ((level as u64) << 32) | (trial as u64 & 0xffff_ffff);
    run_seed ^ slot.wrapping_add(1).wrapping_mul(MIXING_CONSTANT)
}

#[inline]
pub fn trial_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Fresh run seed from OS entropy.
pub fn entropy_seed() -> u64 {
    rand::random::<u64>()
}
