//! Latency and energy models
//!
//! Both are independent of the symbol decision itself. Latency depends on SNR
//! through a retransmission probability; energy is a weighted sum of receiver
//! subsystems scaled by how hard the architecture works for a target SER.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Retransmission probability as a function of SNR (dB)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RetryModel {
    /// No retransmissions at any SNR
    Never,
    /// `exp(−snr_db / scale_db)`
    Exponential { scale_db: f64 },
}

impl RetryModel {
    pub fn retry_probability(&self, snr_db: f64) -> f64 {
        match *self {
            RetryModel::Never => 0.0,
            RetryModel::Exponential { scale_db } => (-snr_db / scale_db).exp().clamp(0.0, 1.0),
        }
    }
}

/// One latency draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySample {
    pub latency: f64,
    pub retried: bool,
}

/// Decode latency in symbol times
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyModel {
    pub sync_overhead: f64,
    pub processing_time: f64,
    pub retry: RetryModel,
}

impl LatencyModel {
    /// Frame-synchronised digital receiver: 80 symbol times per decision
    pub fn fsk_default() -> Self {
        Self {
            sync_overhead: 72.0,
            processing_time: 8.0,
            retry: RetryModel::Exponential { scale_db: 5.0 },
        }
    }

    /// Ratio receiver: pilot plus data, 1.5 symbol times
    pub fn hybrid_default() -> Self {
        Self {
            sync_overhead: 1.0,
            processing_time: 0.5,
            retry: RetryModel::Exponential { scale_db: 8.0 },
        }
    }

    pub fn base_latency(&self) -> f64 {
        self.sync_overhead + self.processing_time
    }

    /// One Bernoulli retry draw; a retry doubles the latency
    pub fn sample<R: Rng>(&self, snr_db: f64, rng: &mut R) -> LatencySample {
        let p = self.retry.retry_probability(snr_db);
        let retried = p > 0.0 && rng.gen::<f64>() < p;
        let base = self.base_latency();
        LatencySample {
            latency: if retried { 2.0 * base } else { base },
            retried,
        }
    }

    pub(crate) fn validate(&self, name: &str) -> SimResult<()> {
        if !(self.sync_overhead >= 0.0 && self.sync_overhead.is_finite())
            || !(self.processing_time >= 0.0 && self.processing_time.is_finite())
        {
            return Err(SimError::InvalidConfig(format!(
                "{} latency terms must be finite and non-negative",
                name
            )));
        }
        if let RetryModel::Exponential { scale_db } = self.retry {
            if !(scale_db > 0.0 && scale_db.is_finite()) {
                return Err(SimError::InvalidConfig(format!(
                    "{} retry scale must be positive, got {}",
                    name, scale_db
                )));
            }
        }
        Ok(())
    }
}

/// Named receiver subsystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    HighAdc,
    LowAdc,
    Dsp,
    Counter,
    Comparator,
    Envelope,
    Math,
}

/// Per-symbol energy of each subsystem (normalized units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyTable {
    pub high_adc: f64,
    pub low_adc: f64,
    pub dsp: f64,
    pub counter: f64,
    pub comparator: f64,
    pub envelope: f64,
    pub math: f64,
}

impl Default for EnergyTable {
    fn default() -> Self {
        Self {
            high_adc: 10.0,
            low_adc: 2.0,
            dsp: 15.0,
            counter: 2.0,
            comparator: 0.5,
            envelope: 0.5,
            math: 1.0,
        }
    }
}

impl EnergyTable {
    pub fn weight(&self, subsystem: Subsystem) -> f64 {
        match subsystem {
            Subsystem::HighAdc => self.high_adc,
            Subsystem::LowAdc => self.low_adc,
            Subsystem::Dsp => self.dsp,
            Subsystem::Counter => self.counter,
            Subsystem::Comparator => self.comparator,
            Subsystem::Envelope => self.envelope,
            Subsystem::Math => self.math,
        }
    }
}

/// Receiver energy per decoded symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyModel {
    pub components: Vec<Subsystem>,
    /// `c` in `E_base · (1 + c·log10(1/target_ser))`
    pub reliability_coeff: f64,
}

impl EnergyModel {
    /// High-rate ADC, correlator DSP and a decision comparator
    pub fn fsk_default() -> Self {
        Self {
            components: vec![Subsystem::HighAdc, Subsystem::Dsp, Subsystem::Comparator],
            reliability_coeff: 2.0,
        }
    }

    /// Low-rate ADC, envelope detector, frequency counter, divider, comparator
    pub fn hybrid_default() -> Self {
        Self {
            components: vec![
                Subsystem::LowAdc,
                Subsystem::Envelope,
                Subsystem::Counter,
                Subsystem::Math,
                Subsystem::Comparator,
            ],
            reliability_coeff: 0.0,
        }
    }

    pub fn base_energy(&self, table: &EnergyTable) -> f64 {
        self.components.iter().map(|&s| table.weight(s)).sum()
    }

    /// Energy needed to reach `target_ser`, non-increasing in `target_ser`
    pub fn energy_at(&self, table: &EnergyTable, target_ser: f64) -> SimResult<f64> {
        if !(target_ser > 0.0 && target_ser <= 1.0) {
            return Err(SimError::InvalidParameter {
                name: "target_ser",
                value: target_ser,
            });
        }
        let base = self.base_energy(table);
        Ok(base * (1.0 + self.reliability_coeff * (1.0 / target_ser).log10()))
    }

    pub(crate) fn validate(&self, name: &str) -> SimResult<()> {
        if self.components.is_empty() {
            return Err(SimError::InvalidConfig(format!("{} energy model has no subsystems", name)));
        }
        if !(self.reliability_coeff >= 0.0 && self.reliability_coeff.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "{} reliability coefficient must be finite and non-negative",
                name
            )));
        }
        Ok(())
    }
}

/// Relative switched capacitance of each subsystem
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacitanceTable {
    pub dsp: f64,
    pub high_adc: f64,
    pub low_adc: f64,
    pub counter: f64,
    pub comparator: f64,
    pub envelope: f64,
    pub math: f64,
}

impl Default for CapacitanceTable {
    fn default() -> Self {
        Self {
            dsp: 100.0,
            high_adc: 60.0,
            low_adc: 10.0,
            counter: 8.0,
            comparator: 2.0,
            envelope: 2.0,
            math: 4.0,
        }
    }
}

impl CapacitanceTable {
    pub fn capacitance(&self, subsystem: Subsystem) -> f64 {
        match subsystem {
            Subsystem::HighAdc => self.high_adc,
            Subsystem::LowAdc => self.low_adc,
            Subsystem::Dsp => self.dsp,
            Subsystem::Counter => self.counter,
            Subsystem::Comparator => self.comparator,
            Subsystem::Envelope => self.envelope,
            Subsystem::Math => self.math,
        }
    }
}

/// CMOS dynamic power `α · ΣC · Vdd² · f`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmosPowerModel {
    pub components: Vec<Subsystem>,
    /// Relative operating frequency
    pub clock: f64,
    pub activity: f64,
    pub vdd: f64,
}

impl CmosPowerModel {
    pub fn fsk_default() -> Self {
        Self {
            components: vec![Subsystem::Dsp, Subsystem::HighAdc, Subsystem::Comparator],
            clock: 100.0,
            activity: 0.5,
            vdd: 1.0,
        }
    }

    pub fn hybrid_default() -> Self {
        Self {
            components: vec![
                Subsystem::LowAdc,
                Subsystem::Counter,
                Subsystem::Envelope,
                Subsystem::Math,
                Subsystem::Comparator,
            ],
            clock: 5.0,
            activity: 0.5,
            vdd: 1.0,
        }
    }

    pub fn total_capacitance(&self, table: &CapacitanceTable) -> f64 {
        self.components.iter().map(|&s| table.capacitance(s)).sum()
    }

    pub fn power(&self, table: &CapacitanceTable) -> f64 {
        self.power_at(table, self.clock)
    }

    /// Power at an arbitrary operating frequency
    pub fn power_at(&self, table: &CapacitanceTable, clock: f64) -> f64 {
        self.activity * self.total_capacitance(table) * self.vdd * self.vdd * clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_retry_probability_monotonic() {
        let retry = RetryModel::Exponential { scale_db: 5.0 };
        assert!((retry.retry_probability(0.0) - 1.0).abs() < 1e-12);
        let mut prev = f64::INFINITY;
        for snr in (0..=20).step_by(2) {
            let p = retry.retry_probability(snr as f64);
            assert!(p <= prev, "retry probability increased at {} dB", snr);
            assert!((0.0..=1.0).contains(&p));
            prev = p;
        }
        assert!((retry.retry_probability(10.0) - (-2.0_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_retry_negative_snr_clamped() {
        let retry = RetryModel::Exponential { scale_db: 5.0 };
        assert_eq!(retry.retry_probability(-10.0), 1.0);
    }

    #[test]
    fn test_no_retry_latency_is_base() {
        let model = LatencyModel {
            sync_overhead: 3.0,
            processing_time: 0.25,
            retry: RetryModel::Never,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let trials = 10_000;
        let total: f64 = (0..trials).map(|_| model.sample(0.0, &mut rng).latency).sum();
        assert_eq!(total / trials as f64, model.base_latency());
    }

    #[test]
    fn test_retry_doubles_latency() {
        let model = LatencyModel::fsk_default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        // p = 1 at 0 dB
        let sample = model.sample(0.0, &mut rng);
        assert!(sample.retried);
        assert_eq!(sample.latency, 160.0);
    }

    #[test]
    fn test_mean_latency_matches_retry_rate() {
        let model = LatencyModel::hybrid_default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let snr = 8.0;
        let trials = 50_000;
        let mean: f64 = (0..trials).map(|_| model.sample(snr, &mut rng).latency).sum::<f64>() / trials as f64;
        let expected = model.base_latency() * (1.0 + model.retry.retry_probability(snr));
        assert!((mean - expected).abs() < 0.02, "mean {} expected {}", mean, expected);
    }

    #[test]
    fn test_base_energies() {
        let table = EnergyTable::default();
        assert_eq!(EnergyModel::fsk_default().base_energy(&table), 25.5);
        assert_eq!(EnergyModel::hybrid_default().base_energy(&table), 6.0);
    }

    #[test]
    fn test_fsk_energy_non_increasing_in_target() {
        let table = EnergyTable::default();
        let model = EnergyModel::fsk_default();
        let targets = [1e-1, 1e-2, 1e-3, 1e-4];
        for pair in targets.windows(2) {
            let (s2, s1) = (pair[0], pair[1]);
            assert!(model.energy_at(&table, s1).unwrap() >= model.energy_at(&table, s2).unwrap());
        }
        // 25.5 · (1 + 2·3)
        assert!((model.energy_at(&table, 1e-3).unwrap() - 178.5).abs() < 1e-9);
    }

    #[test]
    fn test_hybrid_energy_flat() {
        let table = EnergyTable::default();
        let model = EnergyModel::hybrid_default();
        assert_eq!(model.energy_at(&table, 1e-4).unwrap(), 6.0);
        assert_eq!(model.energy_at(&table, 1e-1).unwrap(), 6.0);
    }

    #[test]
    fn test_invalid_target_ser() {
        let table = EnergyTable::default();
        let model = EnergyModel::fsk_default();
        assert!(model.energy_at(&table, 0.0).is_err());
        assert!(model.energy_at(&table, 1.5).is_err());
        assert!(model.energy_at(&table, f64::NAN).is_err());
    }

    #[test]
    fn test_cmos_power() {
        let table = CapacitanceTable::default();
        let fsk = CmosPowerModel::fsk_default();
        let hybrid = CmosPowerModel::hybrid_default();
        assert_eq!(fsk.power(&table), 0.5 * 162.0 * 100.0);
        assert_eq!(hybrid.power(&table), 0.5 * 26.0 * 5.0);
        assert!(fsk.power(&table) / hybrid.power(&table) > 100.0);
        assert!(fsk.power_at(&table, 150.0) > fsk.power_at(&table, 1.0));
    }
}
