//! Decoder implementations
//!
//! - `EnergyDetector`: waveform-level M-FSK, argmax correlator energy
//! - `HybridRatioDecoder`: amplitude-anchored, frequency-refined ratio
//! - `LevelSlicer`: symbol-level FSK baseline

mod energy;
mod hybrid;
mod slicer;

pub use energy::{first_argmax, EnergyDetector};
pub use hybrid::{HybridRatioDecoder, RatioDecision, REFINEMENT_HALF_WINDOW};
pub use slicer::LevelSlicer;
