//! Amplitude and frequency estimators for the ratio receiver
//!
//! Hardware-friendly, non-coherent: an RMS envelope for amplitude and a
//! zero-crossing counter for frequency. Also hosts the study of
//! zero-crossing variance against observation length.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};
use tracing::debug;

use crate::channel::Channel;
use crate::config::{ChannelKind, NoiseInjection};
use crate::error::{SimError, SimResult};
use crate::signal::RatioObservation;
use crate::stats::RunningStats;
use crate::utils::mean_power;

/// Peak amplitude of a sinusoid from its RMS, `√2 · rms`
pub fn estimate_amplitude(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let a = SQRT_2 * mean_power(samples).sqrt();
    a.is_finite().then_some(a)
}

/// Frequency from the mean spacing of sign changes
///
/// Consecutive crossings are half a period apart. Fewer than two crossings
/// leave the period unobserved and return `None`.
pub fn zero_crossing_frequency(samples: &[f64], sample_rate: f64) -> Option<f64> {
    let crossings: Vec<usize> = samples
        .windows(2)
        .enumerate()
        .filter(|(_, w)| (w[0] >= 0.0) != (w[1] >= 0.0))
        .map(|(i, _)| i)
        .collect();

    if crossings.len() < 2 {
        return None;
    }
    let (first, last) = (crossings[0], crossings[crossings.len() - 1]);
    let mean_spacing = (last - first) as f64 / (crossings.len() - 1) as f64;
    Some(sample_rate / (2.0 * mean_spacing))
}

/// Measure pilot and data tones into a ratio observation
pub fn measure_ratio_tones(pilot: &[f64], data: &[f64], sample_rate: f64) -> Option<RatioObservation> {
    Some(RatioObservation {
        pilot_amplitude: estimate_amplitude(pilot)?,
        data_amplitude: estimate_amplitude(data)?,
        pilot_frequency: zero_crossing_frequency(pilot, sample_rate)?,
        data_frequency: zero_crossing_frequency(data, sample_rate)?,
    })
}

/// Zero-crossing accuracy study parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyStudyConfig {
    pub sample_rate: f64,
    pub tone_hz: f64,
    pub amplitude: f64,
    pub snr_db: Vec<f64>,
    /// Observation lengths in tone cycles
    pub observation_cycles: Vec<u32>,
    pub trials: usize,
}

impl Default for FrequencyStudyConfig {
    fn default() -> Self {
        Self {
            sample_rate: 200e3,
            tone_hz: 10e3,
            amplitude: 1.0,
            snr_db: vec![0.0, 5.0, 10.0, 15.0, 20.0],
            observation_cycles: vec![4, 8, 12, 16, 24, 32],
            trials: 1000,
        }
    }
}

/// Estimate variance at one (SNR, observation length) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyVariancePoint {
    pub snr_db: f64,
    pub cycles: u32,
    /// Estimates that were defined
    pub valid: usize,
    pub mean_hz: Option<f64>,
    /// Population variance (Hz²); `None` if no estimate was defined
    pub variance: Option<f64>,
}

/// Zero-crossing variance against SNR and observation length
///
/// Undefined estimates are excluded, never counted as zero.
pub fn frequency_variance_sweep(
    config: &FrequencyStudyConfig,
    seed: u64,
) -> SimResult<Vec<FrequencyVariancePoint>> {
    if !(config.sample_rate > 0.0 && config.tone_hz > 0.0 && config.tone_hz < config.sample_rate / 2.0) {
        return Err(SimError::InvalidConfig(format!(
            "tone {} Hz must lie below Nyquist of {} Hz",
            config.tone_hz, config.sample_rate
        )));
    }
    if config.trials == 0 {
        return Err(SimError::InvalidConfig("trials must be at least 1".into()));
    }
    if !(config.amplitude > 0.0 && config.amplitude.is_finite()) {
        return Err(SimError::InvalidConfig(format!(
            "tone amplitude must be positive and finite, got {}",
            config.amplitude
        )));
    }
    if config.observation_cycles.contains(&0) {
        return Err(SimError::InvalidConfig("observation lengths must span at least one cycle".into()));
    }

    let mut points = Vec::with_capacity(config.snr_db.len() * config.observation_cycles.len());
    let mut stream = 0u64;

    for &snr_db in &config.snr_db {
        for &cycles in &config.observation_cycles {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(stream);
            stream += 1;
            let mut channel = Channel::new(ChannelKind::Awgn, NoiseInjection::Enabled, &mut rng);

            let n = (cycles as f64 * config.sample_rate / config.tone_hz).round() as usize;
            let w = 2.0 * PI * config.tone_hz / config.sample_rate;
            let tone: Vec<f64> = (0..n).map(|i| config.amplitude * (w * i as f64).sin()).collect();

            let mut stats = RunningStats::new();
            for _ in 0..config.trials {
                let received = channel.apply_awgn_scalar(&tone, snr_db)?;
                if let Some(f_hat) = zero_crossing_frequency(&received, config.sample_rate) {
                    stats.push(f_hat);
                }
            }

            debug!(snr_db, cycles, valid = stats.count(), "frequency estimate point");
            points.push(FrequencyVariancePoint {
                snr_db,
                cycles,
                valid: stats.count() as usize,
                mean_hz: stats.mean(),
                variance: stats.population_variance(),
            });
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f64, fs: f64, n: usize, amp: f64) -> Vec<f64> {
        (0..n).map(|i| amp * (2.0 * PI * freq * i as f64 / fs).sin()).collect()
    }

    #[test]
    fn test_zero_crossing_clean_tone() {
        let f = zero_crossing_frequency(&tone(1_000.0, 48_000.0, 480, 1.0), 48_000.0).unwrap();
        assert!((f - 1_000.0).abs() < 10.0, "estimate {}", f);
        let f = zero_crossing_frequency(&tone(4_000.0, 48_000.0, 480, 1.0), 48_000.0).unwrap();
        assert!((f - 4_000.0).abs() < 40.0, "estimate {}", f);
    }

    #[test]
    fn test_zero_crossing_needs_two_crossings() {
        assert_eq!(zero_crossing_frequency(&[1.0; 64], 1_000.0), None);
        assert_eq!(zero_crossing_frequency(&[1.0, 1.0, -1.0, -1.0], 1_000.0), None);
        assert_eq!(zero_crossing_frequency(&[], 1_000.0), None);
        assert!(zero_crossing_frequency(&[1.0, -1.0, 1.0], 1_000.0).is_some());
    }

    #[test]
    fn test_amplitude_estimate() {
        let a = estimate_amplitude(&tone(1_000.0, 48_000.0, 480, 3.0)).unwrap();
        assert!((a - 3.0).abs() < 1e-9);
        assert_eq!(estimate_amplitude(&[]), None);
    }

    #[test]
    fn test_measure_ratio_tones() {
        let fs = 48_000.0;
        let pilot = tone(1_000.0, fs, 480, 2.0);
        let data = tone(3_000.0, fs, 480, 6.0);
        let obs = measure_ratio_tones(&pilot, &data, fs).unwrap();
        assert!((obs.data_amplitude / obs.pilot_amplitude - 3.0).abs() < 1e-9);
        assert!((obs.data_frequency / obs.pilot_frequency - 3.0).abs() < 0.05);
        assert!(measure_ratio_tones(&[0.5; 480], &data, fs).is_none());
    }

    #[test]
    fn test_variance_drops_with_snr_and_length() {
        let config = FrequencyStudyConfig {
            snr_db: vec![5.0, 20.0],
            observation_cycles: vec![4, 32],
            trials: 300,
            ..FrequencyStudyConfig::default()
        };
        let points = frequency_variance_sweep(&config, 42).unwrap();
        assert_eq!(points.len(), 4);
        let var = |snr: f64, cycles: u32| {
            points
                .iter()
                .find(|p| p.snr_db == snr && p.cycles == cycles)
                .and_then(|p| p.variance)
                .unwrap()
        };
        assert!(var(20.0, 32) < var(5.0, 32), "more SNR should tighten the estimate");
        assert!(var(20.0, 32) < var(20.0, 4), "longer observation should tighten the estimate");
    }

    #[test]
    fn test_variance_sweep_deterministic() {
        let config = FrequencyStudyConfig {
            snr_db: vec![10.0],
            observation_cycles: vec![8],
            trials: 50,
            ..FrequencyStudyConfig::default()
        };
        let a = frequency_variance_sweep(&config, 7).unwrap();
        let b = frequency_variance_sweep(&config, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_variance_sweep_rejects_empty_observation() {
        let config = FrequencyStudyConfig {
            observation_cycles: vec![4, 0],
            ..FrequencyStudyConfig::default()
        };
        assert!(matches!(frequency_variance_sweep(&config, 1), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_variance_sweep_rejects_silent_tone() {
        for amplitude in [0.0, -1.0, f64::NAN] {
            let config = FrequencyStudyConfig {
                amplitude,
                trials: 10,
                ..FrequencyStudyConfig::default()
            };
            assert!(matches!(frequency_variance_sweep(&config, 1), Err(SimError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_variance_sweep_rejects_aliased_tone() {
        let config = FrequencyStudyConfig {
            tone_hz: 150e3,
            ..FrequencyStudyConfig::default()
        };
        assert!(frequency_variance_sweep(&config, 1).is_err());
    }
}
