//! Hybrid Ratio Sim - Monte Carlo engine comparing M-FSK and ratio decoding
//!
//! Non-coherent M-FSK energy detection is swept against a hybrid receiver
//! that decodes a symbol from the amplitude ratio of a data tone to a pilot
//! tone, refined by their frequency ratio. Each SNR point reports SER,
//! latency and receiver energy. The engine never prints or plots; the
//! `SweepReport` is its only output.

pub mod channel;
pub mod config;
pub mod decoders;
pub mod error;
pub mod estimation;
pub mod fading;
pub mod metrics;
pub mod noise;
pub mod signal;
pub mod slab;
pub mod stats;
pub mod sweep;
pub mod symbol;
pub mod traits;
mod utils;

#[cfg(feature = "nif")]
mod nif;

// Re-export core types for convenience
pub use channel::Channel;
pub use config::{ChannelKind, Encoding, NoiseInjection, SimConfig, Variant};
pub use decoders::{EnergyDetector, HybridRatioDecoder, LevelSlicer};
pub use error::{SimError, SimResult};
pub use signal::RatioObservation;
pub use stats::{RunningStats, SweepPoint};
pub use sweep::{MonteCarloDriver, Scheme, SchemeCurve, SweepReport};
pub use symbol::{Alphabet, Symbol};
pub use traits::SymbolDecoder;
