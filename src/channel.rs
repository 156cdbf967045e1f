//! Channel model
//!
//! Two AWGN relations are supported:
//! - **scalar**: noise power measured from the input, `P / SNR`. Used for the
//!   symbol-level paths, where the impairment is relative to the value being
//!   measured.
//! - **thermal**: `N0 = Es / SNR` and the per-sample variance is `N0 · B`,
//!   independent of the waveform itself. The FSK correlator sees the full
//!   sampled band `B = fs / 2`; the ratio tones see the receiver's detection
//!   bandwidth.
//!
//! Rayleigh magnitudes multiply amplitude paths only. Impairments are applied
//! as fading first, then AWGN.

use rand_chacha::ChaCha8Rng;

use crate::config::{ChannelKind, NoiseInjection};
use crate::error::{SimError, SimResult};
use crate::fading::RayleighFading;
use crate::noise::NoiseGenerator;
use crate::utils::{db_to_power_ratio, mean_power};

/// Noise power for the scalar relation
pub fn scalar_noise_power(signal: &[f64], snr_db: f64) -> SimResult<f64> {
    if signal.is_empty() {
        return Err(SimError::EmptySignal);
    }
    check_snr(snr_db)?;
    let power = mean_power(signal);
    if !power.is_finite() {
        return Err(SimError::InvalidParameter { name: "signal_power", value: power });
    }
    if power == 0.0 {
        return Err(SimError::DegenerateSignal);
    }
    Ok(power / db_to_power_ratio(snr_db))
}

/// Per-sample variance of thermal noise `N0 · B` with `N0 = Es / SNR`
pub fn band_noise_variance(snr_db: f64, symbol_energy: f64, bandwidth_hz: f64) -> SimResult<f64> {
    check_snr(snr_db)?;
    if !(symbol_energy > 0.0 && symbol_energy.is_finite()) {
        return Err(SimError::InvalidParameter { name: "symbol_energy", value: symbol_energy });
    }
    if !(bandwidth_hz > 0.0 && bandwidth_hz.is_finite()) {
        return Err(SimError::InvalidParameter { name: "bandwidth_hz", value: bandwidth_hz });
    }
    let n0 = symbol_energy / db_to_power_ratio(snr_db);
    Ok(n0 * bandwidth_hz)
}

/// Per-sample noise variance over the full sampled band, `N0 · fs / 2`
pub fn waveform_noise_variance(snr_db: f64, symbol_energy: f64, sample_rate: f64) -> SimResult<f64> {
    if !(sample_rate > 0.0 && sample_rate.is_finite()) {
        return Err(SimError::InvalidParameter { name: "sample_rate", value: sample_rate });
    }
    band_noise_variance(snr_db, symbol_energy, sample_rate / 2.0)
}

fn check_snr(snr_db: f64) -> SimResult<()> {
    if snr_db.is_nan() || snr_db == f64::NEG_INFINITY {
        return Err(SimError::InvalidParameter { name: "snr_db", value: snr_db });
    }
    Ok(())
}

/// Seeded channel: AWGN generator plus Rayleigh gain source
pub struct Channel {
    kind: ChannelKind,
    injection: NoiseInjection,
    noise: NoiseGenerator,
    fading: RayleighFading,
}

impl Channel {
    pub fn new(kind: ChannelKind, injection: NoiseInjection, seed_rng: &mut ChaCha8Rng) -> Self {
        let noise = NoiseGenerator::new(seed_rng);
        let fading = RayleighFading::new(seed_rng);
        Self {
            kind,
            injection,
            noise,
            fading,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    fn noise_enabled(&self) -> bool {
        self.injection == NoiseInjection::Enabled
    }

    /// `signal + N(0, mean(signal²)/SNR)`, i.i.d. per sample
    pub fn apply_awgn_scalar(&mut self, signal: &[f64], snr_db: f64) -> SimResult<Vec<f64>> {
        let noise_power = scalar_noise_power(signal, snr_db)?;
        Ok(self.add_noise(signal, noise_power))
    }

    /// `signal + N(0, (Es/SNR)·fs/2)`, i.i.d. per sample
    pub fn apply_awgn_waveform(
        &mut self,
        signal: &[f64],
        snr_db: f64,
        symbol_energy: f64,
        sample_rate: f64,
    ) -> SimResult<Vec<f64>> {
        if signal.is_empty() {
            return Err(SimError::EmptySignal);
        }
        let variance = waveform_noise_variance(snr_db, symbol_energy, sample_rate)?;
        Ok(self.add_noise(signal, variance))
    }

    /// `signal + N(0, (Es/SNR)·B)`, i.i.d. per sample
    pub fn apply_awgn_band(
        &mut self,
        signal: &[f64],
        snr_db: f64,
        symbol_energy: f64,
        bandwidth_hz: f64,
    ) -> SimResult<Vec<f64>> {
        if signal.is_empty() {
            return Err(SimError::EmptySignal);
        }
        let variance = band_noise_variance(snr_db, symbol_energy, bandwidth_hz)?;
        Ok(self.add_noise(signal, variance))
    }

    fn add_noise(&mut self, signal: &[f64], variance: f64) -> Vec<f64> {
        if !self.noise_enabled() {
            return signal.to_vec();
        }
        let std_dev = variance.sqrt();
        signal.iter().map(|&x| x + self.noise.next_sample(std_dev)).collect()
    }

    /// Fresh Rayleigh magnitude, independent of every previous draw
    pub fn rayleigh_fading(&mut self) -> f64 {
        self.fading.next_magnitude()
    }

    /// Gain for one amplitude path in one trial
    ///
    /// 1.0 unless the channel fades and noise injection is enabled.
    pub fn amplitude_gain(&mut self) -> f64 {
        match (self.kind, self.injection) {
            (ChannelKind::AwgnFading, NoiseInjection::Enabled) => self.rayleigh_fading(),
            _ => 1.0,
        }
    }
}
