//! Deterministic per-agent RNG wrapper.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//!
//! - Agents never share RNG state, so the random room pick, every branch
//!   coin-flip and every timer draw is reproducible per agent.
//! - The room registry never owns a generator: reservation takes the caller's
//!   RNG, which keeps the registry free of hidden state and lets tests fix the
//!   outcome by fixing the agent seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Owned by the agent it belongs to; `Send` so agents can be stepped on Rayon
/// workers, never shared between agents.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for APIs generic over `rand::Rng`.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform duration in seconds drawn from `[lo, hi]`.
    ///
    /// Degenerate ranges (`hi <= lo`) return `lo` instead of panicking so a
    /// config that pins a duration to a single value stays valid.
    #[inline]
    pub fn secs_between(&mut self, (lo, hi): (f32, f32)) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    /// Uniform point inside the unit disc, as `(x, z)`.
    pub fn in_unit_circle(&mut self) -> (f32, f32) {
        loop {
            let x: f32 = self.0.gen_range(-1.0..=1.0);
            let z: f32 = self.0.gen_range(-1.0..=1.0);
            if x * x + z * z <= 1.0 {
                return (x, z);
            }
        }
    }

    /// Uniform point inside the unit ball, as `(x, y, z)`.
    pub fn in_unit_sphere(&mut self) -> (f32, f32, f32) {
        loop {
            let x: f32 = self.0.gen_range(-1.0..=1.0);
            let y: f32 = self.0.gen_range(-1.0..=1.0);
            let z: f32 = self.0.gen_range(-1.0..=1.0);
            if x * x + y * y + z * z <= 1.0 {
                return (x, y, z);
            }
        }
    }
}
