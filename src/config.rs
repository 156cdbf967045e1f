//! Simulation configuration
//!
//! Every constant the engine uses lives here. `SimConfig::default()` holds the
//! reference parameter set; callers override fields and call `validate()`
//! (the driver does this on construction).

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::metrics::{EnergyModel, EnergyTable, LatencyModel};
use crate::symbol::Alphabet;

/// How symbols are put on the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// One real value per path per trial
    SymbolLevel,
    /// Sampled tones over one symbol duration
    WaveformLevel,
}

/// Channel impairments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Awgn,
    /// AWGN plus per-trial Rayleigh magnitudes on amplitude paths
    AwgnFading,
}

/// Test override that bypasses every channel impairment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseInjection {
    Enabled,
    Disabled,
}

/// Simulation variant: {symbol, waveform} × {AWGN, AWGN+fading}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    pub encoding: Encoding,
    pub channel: ChannelKind,
}

impl Default for Variant {
    fn default() -> Self {
        Self {
            encoding: Encoding::SymbolLevel,
            channel: ChannelKind::Awgn,
        }
    }
}

/// Sampled-waveform parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformParams {
    /// Samples per second
    pub sample_rate: f64,
    /// Tone of symbol 0 (Hz)
    pub carrier_hz: f64,
    /// Seconds per symbol; also sets the FSK tone spacing `1/T`
    pub symbol_duration: f64,
    /// Integrated energy of one FSK symbol
    pub symbol_energy: f64,
}

impl Default for WaveformParams {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            carrier_hz: 1_000.0,
            symbol_duration: 0.01,
            symbol_energy: 1.0,
        }
    }
}

impl WaveformParams {
    pub fn samples_per_symbol(&self) -> usize {
        (self.sample_rate * self.symbol_duration).round() as usize
    }

    /// Minimum orthogonal spacing for non-coherent detection
    pub fn tone_spacing(&self) -> f64 {
        1.0 / self.symbol_duration
    }

    pub fn tone_frequency(&self, index: u16) -> f64 {
        self.carrier_hz + index as f64 * self.tone_spacing()
    }

    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }
}

/// Pilot ("reference") values of the ratio scheme
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridParams {
    /// Pilot amplitude; data amplitude is `level ×` this
    pub reference_amplitude: f64,
    /// Pilot frequency at symbol level (normalized units)
    pub reference_frequency: f64,
    /// Pilot tone (Hz) at waveform level; data tone is `level ×` this
    pub reference_tone_hz: f64,
    /// Noise bandwidth (Hz) of the envelope and zero-crossing front end.
    /// `None` uses the symbol rate `1/T`, where the pilot's per-sample SNR
    /// equals `Es/N0`.
    pub detection_bandwidth_hz: Option<f64>,
}

impl Default for HybridParams {
    fn default() -> Self {
        Self {
            reference_amplitude: 1.0,
            reference_frequency: 1.0,
            reference_tone_hz: 1_000.0,
            detection_bandwidth_hz: None,
        }
    }
}

impl HybridParams {
    pub fn detection_bandwidth(&self, waveform: &WaveformParams) -> f64 {
        self.detection_bandwidth_hz.unwrap_or_else(|| waveform.tone_spacing())
    }
}

/// Per-scheme energy models over a shared subsystem table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyConfig {
    pub table: EnergyTable,
    pub fsk: EnergyModel,
    pub hybrid: EnergyModel,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            table: EnergyTable::default(),
            fsk: EnergyModel::fsk_default(),
            hybrid: EnergyModel::hybrid_default(),
        }
    }
}

/// Per-scheme latency models
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyConfig {
    pub fsk: LatencyModel,
    pub hybrid: LatencyModel,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            fsk: LatencyModel::fsk_default(),
            hybrid: LatencyModel::hybrid_default(),
        }
    }
}

/// Full sweep configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub alphabet_size: u16,
    pub variant: Variant,
    pub noise: NoiseInjection,
    /// Trials per SNR point
    pub trials: usize,
    /// Trials drawn and noised together; scalar AWGN power is measured per block
    pub block_len: usize,
    pub snr_db: Vec<f64>,
    pub waveform: WaveformParams,
    pub hybrid: HybridParams,
    pub energy: EnergyConfig,
    pub latency: LatencyConfig,
    /// SER the energy model provisions for
    pub target_ser: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            alphabet_size: 4,
            variant: Variant::default(),
            noise: NoiseInjection::Enabled,
            trials: 10_000,
            block_len: 1_000,
            snr_db: (0..=20).step_by(2).map(|db| db as f64).collect(),
            waveform: WaveformParams::default(),
            hybrid: HybridParams::default(),
            energy: EnergyConfig::default(),
            latency: LatencyConfig::default(),
            target_ser: 1e-3,
        }
    }
}

fn positive(name: &str, value: f64) -> SimResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!("{} must be positive and finite, got {}", name, value)))
    }
}

impl SimConfig {
    pub fn alphabet(&self) -> SimResult<Alphabet> {
        Alphabet::new(self.alphabet_size)
    }

    pub fn validate(&self) -> SimResult<()> {
        let alphabet = self.alphabet()?;

        if self.trials == 0 {
            return Err(SimError::InvalidConfig("trials must be at least 1".into()));
        }
        if self.block_len == 0 {
            return Err(SimError::InvalidConfig("block_len must be at least 1".into()));
        }
        if self.snr_db.is_empty() {
            return Err(SimError::InvalidConfig("SNR sweep is empty".into()));
        }
        // +inf is allowed and means a noiseless point
        if let Some(bad) = self.snr_db.iter().find(|s| s.is_nan() || **s == f64::NEG_INFINITY) {
            return Err(SimError::InvalidConfig(format!("invalid SNR value {}", bad)));
        }
        if !(self.target_ser > 0.0 && self.target_ser <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "target_ser must lie in (0, 1], got {}",
                self.target_ser
            )));
        }

        positive("hybrid.reference_amplitude", self.hybrid.reference_amplitude)?;
        positive("hybrid.reference_frequency", self.hybrid.reference_frequency)?;

        if self.variant.encoding == Encoding::WaveformLevel {
            let wf = &self.waveform;
            positive("waveform.sample_rate", wf.sample_rate)?;
            positive("waveform.symbol_duration", wf.symbol_duration)?;
            positive("waveform.symbol_energy", wf.symbol_energy)?;
            positive("hybrid.reference_tone_hz", self.hybrid.reference_tone_hz)?;
            if !(wf.carrier_hz >= 0.0 && wf.carrier_hz.is_finite()) {
                return Err(SimError::InvalidConfig(format!(
                    "waveform.carrier_hz must be finite and non-negative, got {}",
                    wf.carrier_hz
                )));
            }
            if wf.samples_per_symbol() < 2 {
                return Err(SimError::InvalidConfig(format!(
                    "symbol spans {} samples, need at least 2",
                    wf.samples_per_symbol()
                )));
            }
            let top_tone = wf.tone_frequency(alphabet.max());
            if top_tone >= wf.nyquist() {
                return Err(SimError::InvalidConfig(format!(
                    "highest FSK tone {} Hz is above Nyquist {} Hz",
                    top_tone,
                    wf.nyquist()
                )));
            }
            let bandwidth = self.hybrid.detection_bandwidth(wf);
            positive("hybrid.detection_bandwidth_hz", bandwidth)?;
            if bandwidth > wf.nyquist() {
                return Err(SimError::InvalidConfig(format!(
                    "detection bandwidth {} Hz exceeds Nyquist {} Hz",
                    bandwidth,
                    wf.nyquist()
                )));
            }
            let top_ratio_tone = self.hybrid.reference_tone_hz * alphabet.size() as f64;
            if top_ratio_tone >= wf.nyquist() {
                return Err(SimError::InvalidConfig(format!(
                    "highest ratio tone {} Hz is above Nyquist {} Hz",
                    top_ratio_tone,
                    wf.nyquist()
                )));
            }
        }

        self.energy.fsk.validate("fsk")?;
        self.energy.hybrid.validate("hybrid")?;
        self.latency.fsk.validate("fsk")?;
        self.latency.hybrid.validate("hybrid")?;
        Ok(())
    }
}
