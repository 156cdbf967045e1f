//! Rayleigh fading magnitudes
//!
//! Flat, slow fading: one complex Gaussian coefficient per path per trial,
//!
//!   h = a + j·b,  a, b ~ N(0, 1/2)
//!
//! so |h| is Rayleigh with E[|h|²] = 1 and the phase is uniform. Only the
//! magnitude is applied; frequency paths share one oscillator and are not faded.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::noise::box_muller;
use crate::utils::magnitude;

/// Independent Rayleigh gain source
pub struct RayleighFading {
    rng: ChaCha8Rng,
}

impl RayleighFading {
    pub fn new(seed_rng: &mut ChaCha8Rng) -> Self {
        let seed: u64 = seed_rng.gen();
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Complex coefficient (I, Q) with unit mean power
    pub fn next_coefficient(&mut self) -> (f64, f64) {
        let (z0, z1) = box_muller(&mut self.rng);
        (z0 * FRAC_1_SQRT_2, z1 * FRAC_1_SQRT_2)
    }

    /// Rayleigh magnitude |h|
    pub fn next_magnitude(&mut self) -> f64 {
        let (i, q) = self.next_coefficient();
        magnitude(i, q)
    }
}
