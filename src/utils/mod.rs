//! Utility functions for level decisions and dB math

mod clamp;
mod math;

pub use clamp::{clamp_level, round_to_level};
pub use math::*;
