//! Deterministic random number generation.
//!
//! RULE: No generator may call a platform RNG.
//! All randomness flows through StepRng instances derived
//! from the single master seed recorded on the run log.
//!
//! Each generation step gets its own RNG stream, seeded deterministically
//! from (master_seed XOR slot_index). This means:
//!   - Adding a new step never changes existing steps' streams.
//!   - Regenerating one table leaves the others reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single generation step.
pub struct StepRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StepRng {
    /// Create a step RNG from the master seed and a stable
    /// slot index. The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Integer in [lo, hi], both ends inclusive.
    pub fn int_between(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "int_between: lo={lo} > hi={hi}");
        self.inner.gen_range(lo..=hi)
    }

    /// Float in [lo, hi].
    pub fn float_between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// All step RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_step(&self, slot: GeneratorSlot) -> StepRng {
        StepRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries; only append.
/// Reordering changes every step's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum GeneratorSlot {
    Customer = 0,
    Adoption = 1,
    Subscription = 2,
    Activity = 3,
}

impl GeneratorSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Customer     => "customer",
            Self::Adoption     => "adoption",
            Self::Subscription => "subscription",
            Self::Activity     => "activity",
        }
    }
}
