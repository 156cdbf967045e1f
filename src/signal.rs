//! Signal model
//!
//! Symbol-level encodings produce one value per path; waveform-level
//! encodings produce sampled tones spanning one symbol duration.

use std::f64::consts::PI;

use crate::config::{HybridParams, WaveformParams};
use crate::symbol::{Alphabet, Symbol};

/// Pilot and data values of one ratio-scheme trial
///
/// Clean at the transmitter, noisy after the channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioObservation {
    pub pilot_amplitude: f64,
    pub data_amplitude: f64,
    pub pilot_frequency: f64,
    pub data_frequency: f64,
}

/// Symbol-level ratio encoding: pilot `(A, F)`, data `(n·A, n·F)`
pub fn encode_hybrid(symbol: Symbol, alphabet: &Alphabet, params: &HybridParams) -> RatioObservation {
    let level = alphabet.level(symbol);
    RatioObservation {
        pilot_amplitude: params.reference_amplitude,
        data_amplitude: level * params.reference_amplitude,
        pilot_frequency: params.reference_frequency,
        data_frequency: level * params.reference_frequency,
    }
}

/// Symbol-level FSK baseline: the level itself
#[inline]
pub fn encode_fsk_level(symbol: Symbol, alphabet: &Alphabet) -> f64 {
    alphabet.level(symbol)
}

/// M-FSK tone generator, `A cos(2π f_k t)` with `f_k = f_c + k/T`
#[derive(Debug, Clone)]
pub struct FskToneGenerator {
    params: WaveformParams,
    amplitude: f64,
    num_samples: usize,
}

impl FskToneGenerator {
    pub fn new(params: WaveformParams) -> Self {
        // ∫ A² cos² over T = A²T/2 = Es
        let amplitude = (2.0 * params.symbol_energy / params.symbol_duration).sqrt();
        Self {
            num_samples: params.samples_per_symbol(),
            params,
            amplitude,
        }
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn frequency(&self, symbol: Symbol) -> f64 {
        self.params.tone_frequency(symbol)
    }

    pub fn tone(&self, symbol: Symbol) -> Vec<f64> {
        self.tone_with_gain(symbol, 1.0)
    }

    /// Tone scaled by a channel amplitude gain
    pub fn tone_with_gain(&self, symbol: Symbol, gain: f64) -> Vec<f64> {
        let w = 2.0 * PI * self.frequency(symbol) / self.params.sample_rate;
        let a = self.amplitude * gain;
        (0..self.num_samples).map(|i| a * (w * i as f64).cos()).collect()
    }
}

/// Ratio-scheme tones: pilot `A sin(2π F t)`, data `n·A sin(2π n·F t)`
#[derive(Debug, Clone)]
pub struct HybridToneGenerator {
    sample_rate: f64,
    pilot_amplitude: f64,
    pilot_hz: f64,
    num_samples: usize,
}

impl HybridToneGenerator {
    /// The pilot tone carries `reference_amplitude² · Es`
    pub fn new(waveform: WaveformParams, hybrid: HybridParams) -> Self {
        let unit = (2.0 * waveform.symbol_energy / waveform.symbol_duration).sqrt();
        Self {
            sample_rate: waveform.sample_rate,
            pilot_amplitude: hybrid.reference_amplitude * unit,
            pilot_hz: hybrid.reference_tone_hz,
            num_samples: waveform.samples_per_symbol(),
        }
    }

    pub fn pilot_amplitude(&self) -> f64 {
        self.pilot_amplitude
    }

    pub fn pilot(&self, gain: f64) -> Vec<f64> {
        self.sine(self.pilot_amplitude * gain, self.pilot_hz)
    }

    pub fn data(&self, symbol: Symbol, alphabet: &Alphabet, gain: f64) -> Vec<f64> {
        let level = alphabet.level(symbol);
        self.sine(level * self.pilot_amplitude * gain, level * self.pilot_hz)
    }

    fn sine(&self, amplitude: f64, freq_hz: f64) -> Vec<f64> {
        let w = 2.0 * PI * freq_hz / self.sample_rate;
        (0..self.num_samples).map(|i| amplitude * (w * i as f64).sin()).collect()
    }
}
