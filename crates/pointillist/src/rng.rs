//! Seeded linear congruential generator.
//!
//! Every placement decision in a generation flows through [`Lcg`], so the
//! whole scene is a pure function of (seed, call index). The recurrence is
//! `state = (1664525 * state + 1013904223) mod 2^32` and the float output is
//! `state / 2^32`, which is stable across platforms.
use std::convert::Infallible;

use rand::TryRng;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const LCG_MODULUS: f64 = 4_294_967_296.0;

/// Deterministic uniform stream seeded from a single `u32`.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Create a new stream from a seed. The same seed always yields the same
    /// call sequence.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advance the recurrence and return the raw 32-bit state.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Next value in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f64 / LCG_MODULUS) as f32
    }

    /// Uniform value in `[a, b)`.
    #[inline]
    pub fn uniform(&mut self, a: f32, b: f32) -> f32 {
        a + (b - a) * self.next_f32()
    }

    /// Uniform value in `[-d, d)`, the symmetric jitter used by color and
    /// position perturbation.
    #[inline]
    pub fn jitter(&mut self, d: f32) -> f32 {
        self.uniform(-d, d)
    }
}

// The blanket impls in rand_core turn this into `Rng` (and the deprecated
// `RngCore` marker) for free, so an `Lcg` plugs into any rand adapter.
impl TryRng for Lcg {
    type Error = Infallible;

    fn try_next_u32(&mut self) -> Result<u32, Infallible> {
        Ok(self.next_u32())
    }

    fn try_next_u64(&mut self) -> Result<u64, Infallible> {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        Ok((hi << 32) | lo)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Infallible> {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
        Ok(())
    }
}
