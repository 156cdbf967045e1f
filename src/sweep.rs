//! Monte Carlo SNR sweep
//!
//! Every (scheme, SNR point) pair owns a `ChaCha8Rng` stream derived from
//! the sweep seed, so a point's result never depends on which worker ran it
//! or in what order.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::channel::Channel;
use crate::config::{Encoding, SimConfig, Variant};
use crate::decoders::{EnergyDetector, HybridRatioDecoder, LevelSlicer};
use crate::error::{SimError, SimResult};
use crate::estimation::measure_ratio_tones;
use crate::metrics::LatencyModel;
use crate::signal::{encode_fsk_level, encode_hybrid, FskToneGenerator, HybridToneGenerator, RatioObservation};
use crate::stats::{PointAccumulator, SweepPoint, TrialOutcome};
use crate::symbol::{Alphabet, Symbol};
use crate::traits::SymbolDecoder;

/// Modulation scheme under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    Fsk,
    Hybrid,
}

impl Scheme {
    pub const ALL: [Scheme; 2] = [Scheme::Fsk, Scheme::Hybrid];

    fn stream_bit(self) -> u64 {
        match self {
            Scheme::Fsk => 0,
            Scheme::Hybrid => 1,
        }
    }
}

/// One scheme's SweepPoints, in configured SNR order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeCurve {
    pub scheme: Scheme,
    pub points: Vec<SweepPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub variant: Variant,
    pub fsk: SchemeCurve,
    pub hybrid: SchemeCurve,
}

impl SweepReport {
    pub fn curve(&self, scheme: Scheme) -> &SchemeCurve {
        match scheme {
            Scheme::Fsk => &self.fsk,
            Scheme::Hybrid => &self.hybrid,
        }
    }
}

/// Transmitters and correlator bank, only built for waveform sweeps
#[derive(Debug, Clone)]
struct WaveformChain {
    fsk_tx: FskToneGenerator,
    hybrid_tx: HybridToneGenerator,
    detector: EnergyDetector,
    /// Noise bandwidth of the ratio front end (Hz)
    ratio_bandwidth: f64,
}

/// Per-trial metric inputs for one scheme at one SNR
///
/// A retry doubles latency; receiver energy is the provisioned figure for
/// every trial.
struct TrialMetrics<'a> {
    snr_db: f64,
    latency: &'a LatencyModel,
    energy: f64,
}

impl TrialMetrics<'_> {
    fn outcome(&self, symbol: Symbol, detected: Option<Symbol>, rng: &mut ChaCha8Rng) -> TrialOutcome {
        let sample = self.latency.sample(self.snr_db, rng);
        TrialOutcome {
            symbol,
            detected,
            latency: sample.latency,
            energy: self.energy,
        }
    }
}

/// Runs the configured sweep for both schemes
pub struct MonteCarloDriver {
    config: SimConfig,
    alphabet: Alphabet,
    slicer: LevelSlicer,
    ratio_rx: HybridRatioDecoder,
    waveform: Option<WaveformChain>,
    fsk_energy: f64,
    hybrid_energy: f64,
}

impl MonteCarloDriver {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let alphabet = config.alphabet()?;

        let waveform = match config.variant.encoding {
            Encoding::WaveformLevel => Some(WaveformChain {
                fsk_tx: FskToneGenerator::new(config.waveform),
                hybrid_tx: HybridToneGenerator::new(config.waveform, config.hybrid),
                detector: EnergyDetector::new(&config.waveform, alphabet),
                ratio_bandwidth: config.hybrid.detection_bandwidth(&config.waveform),
            }),
            Encoding::SymbolLevel => None,
        };

        let fsk_energy = config.energy.fsk.energy_at(&config.energy.table, config.target_ser)?;
        let hybrid_energy = config.energy.hybrid.energy_at(&config.energy.table, config.target_ser)?;

        Ok(Self {
            alphabet,
            slicer: LevelSlicer::new(alphabet),
            ratio_rx: HybridRatioDecoder::new(alphabet),
            waveform,
            fsk_energy,
            hybrid_energy,
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn num_points(&self) -> usize {
        self.config.snr_db.len()
    }

    /// Full sweep of both schemes
    pub fn run(&self, seed: u64) -> SimResult<SweepReport> {
        info!(
            alphabet = self.alphabet.size(),
            trials = self.config.trials,
            points = self.num_points(),
            variant = ?self.config.variant,
            "starting sweep"
        );
        let report = SweepReport {
            variant: self.config.variant,
            fsk: self.run_scheme(Scheme::Fsk, seed)?,
            hybrid: self.run_scheme(Scheme::Hybrid, seed)?,
        };
        info!("sweep complete");
        Ok(report)
    }

    pub fn run_scheme(&self, scheme: Scheme, seed: u64) -> SimResult<SchemeCurve> {
        let indices = 0..self.num_points();

        #[cfg(feature = "parallel")]
        let points = indices
            .into_par_iter()
            .map(|index| self.run_point(scheme, index, seed))
            .collect::<SimResult<Vec<_>>>()?;

        #[cfg(not(feature = "parallel"))]
        let points = indices
            .map(|index| self.run_point(scheme, index, seed))
            .collect::<SimResult<Vec<_>>>()?;

        Ok(SchemeCurve { scheme, points })
    }

    /// One SNR point of one scheme
    pub fn run_point(&self, scheme: Scheme, index: usize, seed: u64) -> SimResult<SweepPoint> {
        let len = self.num_points();
        let snr_db = *self
            .config
            .snr_db
            .get(index)
            .ok_or(SimError::PointOutOfRange { index, len })?;

        let mut rng = point_rng(seed, index, scheme);
        let mut channel = Channel::new(self.config.variant.channel, self.config.noise, &mut rng);
        let metrics = match scheme {
            Scheme::Fsk => TrialMetrics {
                snr_db,
                latency: &self.config.latency.fsk,
                energy: self.fsk_energy,
            },
            Scheme::Hybrid => TrialMetrics {
                snr_db,
                latency: &self.config.latency.hybrid,
                energy: self.hybrid_energy,
            },
        };

        let mut acc = PointAccumulator::new();
        let mut remaining = self.config.trials;
        while remaining > 0 {
            let n = remaining.min(self.config.block_len);
            let symbols: Vec<Symbol> = (0..n).map(|_| self.alphabet.draw(&mut rng)).collect();

            let mut block = PointAccumulator::new();
            match (&self.waveform, scheme) {
                (None, Scheme::Fsk) => self.fsk_symbol_block(&symbols, &metrics, &mut channel, &mut rng, &mut block)?,
                (None, Scheme::Hybrid) => {
                    self.hybrid_symbol_block(&symbols, &metrics, &mut channel, &mut rng, &mut block)?
                }
                (Some(chain), Scheme::Fsk) => {
                    self.fsk_waveform_block(chain, &symbols, &metrics, &mut channel, &mut rng, &mut block)?
                }
                (Some(chain), Scheme::Hybrid) => {
                    self.hybrid_waveform_block(chain, &symbols, &metrics, &mut channel, &mut rng, &mut block)?
                }
            }
            acc.merge(&block);
            remaining -= n;
        }

        let point = acc.finish(snr_db);
        debug!(
            ?scheme,
            snr_db,
            errors = point.errors,
            erasures = point.erasures,
            ser = ?point.ser,
            "point complete"
        );
        Ok(point)
    }

    /// Levels through scalar AWGN, then the slicer
    fn fsk_symbol_block(
        &self,
        symbols: &[Symbol],
        metrics: &TrialMetrics<'_>,
        channel: &mut Channel,
        rng: &mut ChaCha8Rng,
        acc: &mut PointAccumulator,
    ) -> SimResult<()> {
        let levels: Vec<f64> = symbols.iter().map(|&s| encode_fsk_level(s, &self.alphabet)).collect();
        let received = channel.apply_awgn_scalar(&levels, metrics.snr_db)?;

        for (&symbol, value) in symbols.iter().zip(&received) {
            let detected = self.slicer.decode(value);
            acc.push(&metrics.outcome(symbol, detected, rng));
        }
        Ok(())
    }

    /// Four scalar paths per trial; pilot and data amplitudes fade independently
    fn hybrid_symbol_block(
        &self,
        symbols: &[Symbol],
        metrics: &TrialMetrics<'_>,
        channel: &mut Channel,
        rng: &mut ChaCha8Rng,
        acc: &mut PointAccumulator,
    ) -> SimResult<()> {
        let n = symbols.len();
        let mut pilot_amp = Vec::with_capacity(n);
        let mut data_amp = Vec::with_capacity(n);
        let mut pilot_freq = Vec::with_capacity(n);
        let mut data_freq = Vec::with_capacity(n);

        for &symbol in symbols {
            let clean = encode_hybrid(symbol, &self.alphabet, &self.config.hybrid);
            pilot_amp.push(clean.pilot_amplitude * channel.amplitude_gain());
            data_amp.push(clean.data_amplitude * channel.amplitude_gain());
            pilot_freq.push(clean.pilot_frequency);
            data_freq.push(clean.data_frequency);
        }

        let snr_db = metrics.snr_db;
        let pilot_amp = channel.apply_awgn_scalar(&pilot_amp, snr_db)?;
        let data_amp = channel.apply_awgn_scalar(&data_amp, snr_db)?;
        let pilot_freq = channel.apply_awgn_scalar(&pilot_freq, snr_db)?;
        let data_freq = channel.apply_awgn_scalar(&data_freq, snr_db)?;

        for (i, &symbol) in symbols.iter().enumerate() {
            let obs = RatioObservation {
                pilot_amplitude: pilot_amp[i],
                data_amplitude: data_amp[i],
                pilot_frequency: pilot_freq[i],
                data_frequency: data_freq[i],
            };
            let detected = self.ratio_rx.decode(&obs);
            acc.push(&metrics.outcome(symbol, detected, rng));
        }
        Ok(())
    }

    /// Faded tone through thermal AWGN, then the correlator bank
    fn fsk_waveform_block(
        &self,
        chain: &WaveformChain,
        symbols: &[Symbol],
        metrics: &TrialMetrics<'_>,
        channel: &mut Channel,
        rng: &mut ChaCha8Rng,
        acc: &mut PointAccumulator,
    ) -> SimResult<()> {
        let wf = &self.config.waveform;
        for &symbol in symbols {
            let tone = chain.fsk_tx.tone_with_gain(symbol, channel.amplitude_gain());
            let received = channel.apply_awgn_waveform(&tone, metrics.snr_db, wf.symbol_energy, wf.sample_rate)?;
            let detected = chain.detector.decode(&received);
            acc.push(&metrics.outcome(symbol, detected, rng));
        }
        Ok(())
    }

    /// Pilot and data tones measured by envelope and zero-crossing estimators
    ///
    /// Both tones share one flat-fading gain and one thermal noise floor.
    /// A tone that cannot be measured is an erasure.
    fn hybrid_waveform_block(
        &self,
        chain: &WaveformChain,
        symbols: &[Symbol],
        metrics: &TrialMetrics<'_>,
        channel: &mut Channel,
        rng: &mut ChaCha8Rng,
        acc: &mut PointAccumulator,
    ) -> SimResult<()> {
        let wf = &self.config.waveform;
        for &symbol in symbols {
            let gain = channel.amplitude_gain();
            let pilot = chain.hybrid_tx.pilot(gain);
            let data = chain.hybrid_tx.data(symbol, &self.alphabet, gain);

            let pilot = channel.apply_awgn_band(&pilot, metrics.snr_db, wf.symbol_energy, chain.ratio_bandwidth)?;
            let data = channel.apply_awgn_band(&data, metrics.snr_db, wf.symbol_energy, chain.ratio_bandwidth)?;

            let detected =
                measure_ratio_tones(&pilot, &data, wf.sample_rate).and_then(|obs| self.ratio_rx.decode(&obs));
            acc.push(&metrics.outcome(symbol, detected, rng));
        }
        Ok(())
    }
}

/// Independent stream per (seed, point, scheme)
fn point_rng(seed: u64, index: usize, scheme: Scheme) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(((index as u64) << 1) | scheme.stream_bit());
    rng
}
