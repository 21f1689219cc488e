// Based on https://github.com/rust-random/rand/blob/master/rand_pcg/src/pcg64.rs, which is
//
// Copyright 2018 Developers of the Rand project.
// Copyright 2017 Paul Dicker.
// Copyright 2014-2017 Melissa O'Neill and PCG Project contributors
//
// and licensed under the MIT license.

use core::fmt;
use libm::ldexp;
use rand_core::{impls, Error, RngCore, SeedableRng};

// This is the default multiplier used by PCG for 64-bit state.
const MULTIPLIER: u64 = 0x5851f42d4c957f2d;
const INCREMENT: u64 = 0xb47c73972972b7b7;
const INITIAL_OFFSET: u64 = 0x3d657cc62bc341e;

/// A PCG random number generator (XSH RR 64/32 (LCG) variant).
///
/// Permuted Congruential Generator with 64-bit state, internal Linear
/// Congruential Generator, and 32-bit output via "xorshift high (bits),
/// random rotation" output function.
///
/// The stream is fixed, so the whole generator is determined by a single
/// `u64` seed. Series values depend on this exact algorithm: changing any
/// constant here changes every value the service has ever returned.
#[derive(Clone, PartialEq, Eq)]
pub struct MetricPcg {
    state: u64
}

impl MetricPcg {
    pub fn new(seed: u64) -> Self {
        MetricPcg {
            state : seed.wrapping_mul(MULTIPLIER).wrapping_sub(INITIAL_OFFSET)
        }
    }

    /// Next uniform draw in `[0, 1)`.
    ///
    /// Uses one 32-bit output scaled by 2^-32, so 1.0 is unreachable.
    #[inline]
    pub fn next_unit(&mut self) -> f64 {
        ldexp(self.next_u32() as f64, -32)
    }

    #[inline]
    fn step(&mut self) {
        // prepare the LCG for the next round
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
    }
}

// Custom Debug implementation that does not expose the internal state
impl fmt::Debug for MetricPcg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MetricPcg {{}}")
    }
}

impl SeedableRng for MetricPcg {
    type Seed = [u8; 8];

    /// Seed bytes are read big-endian, matching how series seeds are taken
    /// from a digest.
    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_be_bytes(seed))
    }

    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed)
    }
}

impl RngCore for MetricPcg {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        let state = self.state;
        self.step();

        // Output function XSH RR: xorshift high (bits), followed by a random rotate
        // Constants are for 64-bit state, 32-bit output
        const ROTATE: u32 = 59; // 64 - 5
        const XSHIFT: u32 = 18; // (5 + 32) / 2
        const SPARE: u32 = 27; // 64 - 32 - 5

        let rot = (state >> ROTATE) as u32;
        let xsh = (((state >> XSHIFT) ^ state) >> SPARE) as u32;
        xsh.rotate_right(rot)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
