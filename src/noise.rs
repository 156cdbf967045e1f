//! Additive White Gaussian Noise generator
//!
//! Uses Box-Muller transform for Gaussian samples.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Standard-normal sample source, scaled per call
pub struct NoiseGenerator {
    /// Internal RNG
    rng: ChaCha8Rng,

    /// Cached second sample from Box-Muller
    cached: Option<f64>,
}

impl NoiseGenerator {
    pub fn new(seed_rng: &mut ChaCha8Rng) -> Self {
        // Create a new RNG with a derived seed
        let seed: u64 = seed_rng.gen();
        Self::from_seed(seed)
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            cached: None,
        }
    }

    /// Next N(0, 1) sample
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(cached) = self.cached.take() {
            return cached;
        }

        let (z0, z1) = box_muller(&mut self.rng);
        self.cached = Some(z1);
        z0
    }

    /// Next N(0, std_dev²) sample
    #[inline]
    pub fn next_sample(&mut self, std_dev: f64) -> f64 {
        self.next_gaussian() * std_dev
    }
}

/// Two independent N(0, 1) samples from one pair of uniforms
pub(crate) fn box_muller<R: Rng>(rng: &mut R) -> (f64, f64) {
    let u1: f64 = rng.gen();
    let u2: f64 = rng.gen();

    // Avoid log(0)
    let u1 = u1.max(1e-10);

    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * PI * u2;

    (r * theta.cos(), r * theta.sin())
}
