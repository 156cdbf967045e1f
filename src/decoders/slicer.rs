//! Level slicer for the symbol-level FSK baseline
//!
//! Level n → symbol n−1 after rounding and clipping to `[1, M]`.

use crate::symbol::{Alphabet, Symbol};
use crate::traits::SymbolDecoder;
use crate::utils::round_to_level;

#[derive(Debug, Clone, Copy)]
pub struct LevelSlicer {
    alphabet: Alphabet,
}

impl LevelSlicer {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }
}

impl SymbolDecoder for LevelSlicer {
    type Observation = f64;

    fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    fn decode(&self, value: &f64) -> Option<Symbol> {
        if !value.is_finite() {
            return None;
        }
        let (lo, hi) = self.alphabet.level_bounds();
        Some(self.alphabet.symbol_from_level(round_to_level(*value, lo, hi)))
    }
}
