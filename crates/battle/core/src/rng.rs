//! Deterministic random rolls for critical hits.
//!
//! The oracle is stateless: every roll derives from an explicit seed, so a
//! battle replays identically from its base seed and tests can script
//! outcomes by substituting the oracle.

/// Source of random rolls.
///
/// Implementations must be deterministic: the same seed always yields the
/// same value.
pub trait RngOracle: Send + Sync {
    /// Generates a random u32 from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Rolls a d100 (1-100 inclusive), the base of percentage checks.
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output permuted out of 64-bit LCG state. Small, fast,
/// and statistically solid for game rolls.
///
/// Reference: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// Advances the LCG state by one step.
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation: xorshift high bits, then a random rotate.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Computes a per-event seed from the battle's entropy sources.
///
/// `battle_seed` is fixed for the run, `nonce` increments per roll, `actor`
/// distinguishes who rolled, and `context` separates multiple independent
/// rolls within one action.
pub fn compute_seed(battle_seed: u64, nonce: u64, actor: u32, context: u32) -> u64 {
    // Hash-combine with SplitMix64/FxHash style multipliers.
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(actor).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
