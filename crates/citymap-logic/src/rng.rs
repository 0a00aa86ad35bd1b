//! Seeded pseudo-random stream (mulberry32).
//!
//! Every noise lattice and the per-district offset draw is backed by one of
//! these. The state update uses only wrapping `u32` arithmetic so that any
//! other implementation of the same mixer reproduces the stream bit-for-bit.
//!
//! `SeededRng` also implements [`rand::RngCore`], so callers that want
//! `gen_range` and friends can use it through [`rand::Rng`] without giving
//! up reproducibility.

use rand::{Error, RngCore, SeedableRng};

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Deterministic 32-bit PRNG. Same seed ⇒ same infinite sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Seeds are signed to match the integer seeds in world configs;
    /// only the bit pattern matters.
    pub fn new(seed: i32) -> Self {
        Self {
            state: seed as u32,
        }
    }

    /// Next draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_raw() as f64 / TWO_POW_32
    }

    fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(s | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_raw());
        let hi = u64::from(self.next_raw());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i32::from_le_bytes(seed))
    }
}
