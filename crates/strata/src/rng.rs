//! Tie-break source for the ordering and ranking phases.

use crate::config::TieBreak;

/// xorshift64* generator. Small, seedable and identical on every platform.
#[derive(Debug, Clone)]
struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }
}

/// Resolves ties according to the configured [`TieBreak`] policy.
///
/// Under `Deterministic` every query returns the "no preference" answer, so a run depends only on
/// the input graph and config.
#[derive(Debug, Clone)]
pub struct TieBreaker {
    rng: Option<XorShift64Star>,
}

impl TieBreaker {
    pub fn new(policy: TieBreak) -> Self {
        let rng = match policy {
            TieBreak::Deterministic => None,
            TieBreak::Seeded(seed) => Some(XorShift64Star::new(seed)),
        };
        Self { rng }
    }

    pub fn is_seeded(&self) -> bool {
        self.rng.is_some()
    }

    /// A fair coin; always `false` when deterministic.
    pub fn coin(&mut self) -> bool {
        match &mut self.rng {
            Some(rng) => rng.next_u64() >> 63 == 1,
            None => false,
        }
    }

    /// A start offset in `0..upper`; always `0` when deterministic.
    pub fn offset(&mut self, upper: usize) -> usize {
        match &mut self.rng {
            Some(rng) if upper > 1 => {
                // 53-bit float in [0, 1), scaled.
                let u = rng.next_u64() >> 11;
                let unit = (u as f64) / ((1u64 << 53) as f64);
                ((unit * upper as f64) as usize).min(upper - 1)
            }
            _ => 0,
        }
    }
}
