//! Symbol alphabet
//!
//! Symbols are always 0-based: `{0 … M−1}`. The symbol-level encodings carry
//! the 1-based *level* `n = symbol + 1`, so the smallest data amplitude is one
//! reference step and never zero.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// One transmitted information unit
pub type Symbol = u16;

/// Finite ordered alphabet `{0 … size−1}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    size: u16,
}

impl Alphabet {
    pub fn new(size: u16) -> SimResult<Self> {
        if size < 2 {
            return Err(SimError::InvalidConfig(format!(
                "alphabet needs at least 2 symbols, got {}",
                size
            )));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn min(&self) -> Symbol {
        0
    }

    pub fn max(&self) -> Symbol {
        self.size - 1
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        symbol < self.size
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> {
        0..self.size
    }

    /// Uniform draw over the alphabet
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Symbol {
        rng.gen_range(0..self.size)
    }

    /// Level carried by the symbol-level encodings
    #[inline]
    pub fn level(&self, symbol: Symbol) -> f64 {
        symbol as f64 + 1.0
    }

    /// Inclusive level bounds `(1, M)`
    #[inline]
    pub fn level_bounds(&self) -> (f64, f64) {
        (1.0, self.size as f64)
    }

    /// Map an already clipped integer level back to its symbol
    #[inline]
    pub fn symbol_from_level(&self, level: f64) -> Symbol {
        let (lo, hi) = self.level_bounds();
        debug_assert!(level >= lo && level <= hi && level.fract() == 0.0, "level {} not decided", level);
        (level as Symbol).saturating_sub(1).min(self.max())
    }
}
