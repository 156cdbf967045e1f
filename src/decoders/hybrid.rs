//! Hybrid amplitude/frequency ratio decoder
//!
//! Two-stage estimate in level space `[1, M]`:
//! 1. Coarse anchor from the amplitude ratio, rounded and clipped.
//! 2. Frequency ratio clipped to `[anchor − 0.5, anchor + 0.5]`, then
//!    rounded and clipped again.
//!
//! Rounding is half-to-even, so a frequency ratio pinned to a window edge
//! lands on whichever neighbour is even.
//!
//! Frequency only refines inside the region the amplitude already decided;
//! it can never move the decision more than one level from the anchor.

use crate::signal::RatioObservation;
use crate::symbol::{Alphabet, Symbol};
use crate::traits::SymbolDecoder;
use crate::utils::{clamp_level, round_to_level};

/// Half-width of the frequency refinement window
pub const REFINEMENT_HALF_WINDOW: f64 = 0.5;

/// Anchor and final decision, both in level space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioDecision {
    pub anchor: f64,
    pub level: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct HybridRatioDecoder {
    alphabet: Alphabet,
}

/// `num / den`, or `None` for a zero or non-finite reference
fn guarded_ratio(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 || !den.is_finite() || !num.is_finite() {
        return None;
    }
    Some(num / den)
}

impl HybridRatioDecoder {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    /// Coarse stage: `clip(round(data_amp / pilot_amp), 1, M)`
    pub fn anchor(&self, obs: &RatioObservation) -> Option<f64> {
        let (lo, hi) = self.alphabet.level_bounds();
        let ratio = guarded_ratio(obs.data_amplitude, obs.pilot_amplitude)?;
        Some(round_to_level(ratio, lo, hi))
    }

    /// Both stages
    pub fn decide(&self, obs: &RatioObservation) -> Option<RatioDecision> {
        let (lo, hi) = self.alphabet.level_bounds();
        let anchor = self.anchor(obs)?;

        let ratio = guarded_ratio(obs.data_frequency, obs.pilot_frequency)?;
        let windowed = clamp_level(
            ratio,
            anchor - REFINEMENT_HALF_WINDOW,
            anchor + REFINEMENT_HALF_WINDOW,
        );
        let level = round_to_level(windowed, lo, hi);

        debug_assert!((level - anchor).abs() <= 1.0);
        Some(RatioDecision { anchor, level })
    }
}

impl SymbolDecoder for HybridRatioDecoder {
    type Observation = RatioObservation;

    fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    fn decode(&self, obs: &RatioObservation) -> Option<Symbol> {
        let decision = self.decide(obs)?;
        Some(self.alphabet.symbol_from_level(decision.level))
    }
}
