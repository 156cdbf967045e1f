//! Streaming accumulators and per-SNR aggregates
//!
//! Every accumulator merges associatively and commutatively, so partial
//! results from independent workers reduce to the same aggregate.

use serde::{Deserialize, Serialize};

use crate::symbol::Symbol;

/// Welford running mean/variance with pairwise merge
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Chan et al. parallel combination
    pub fn merge(&mut self, other: &RunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;
        self.mean += delta * n_b / n;
        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.count += other.count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    pub fn population_variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }
}

/// One Monte Carlo draw, folded into a `PointAccumulator` immediately
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    pub symbol: Symbol,
    /// `None` when the decode was undefined
    pub detected: Option<Symbol>,
    pub latency: f64,
    pub energy: f64,
}

/// Aggregate statistics of one SNR point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub snr_db: f64,
    pub trials: u64,
    pub errors: u64,
    /// Trials whose decode was undefined; excluded from `ser`
    pub erasures: u64,
    /// `errors / (trials − erasures)`; `None` if every trial was erased
    pub ser: Option<f64>,
    /// Variance of the SER estimator, `p(1−p)/n`
    pub ser_variance: Option<f64>,
    pub mean_latency: f64,
    pub mean_energy: f64,
}

impl SweepPoint {
    /// Trials that produced a decision
    pub fn decided(&self) -> u64 {
        self.trials - self.erasures
    }

    /// Normal-approximation 95% interval on the SER, clipped to [0, 1]
    pub fn confidence_interval_95(&self) -> Option<(f64, f64)> {
        let ser = self.ser?;
        let half = 1.96 * self.ser_variance?.sqrt();
        Some(((ser - half).max(0.0), (ser + half).min(1.0)))
    }
}

/// Running totals for a single SNR point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointAccumulator {
    trials: u64,
    errors: u64,
    erasures: u64,
    latency: RunningStats,
    energy: RunningStats,
}

impl PointAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        match outcome.detected {
            Some(detected) if detected != outcome.symbol => self.errors += 1,
            Some(_) => {}
            None => self.erasures += 1,
        }
        self.latency.push(outcome.latency);
        self.energy.push(outcome.energy);
    }

    pub fn merge(&mut self, other: &PointAccumulator) {
        self.trials += other.trials;
        self.errors += other.errors;
        self.erasures += other.erasures;
        self.latency.merge(&other.latency);
        self.energy.merge(&other.energy);
    }

    pub fn finish(&self, snr_db: f64) -> SweepPoint {
        let decided = self.trials - self.erasures;
        let (ser, ser_variance) = if decided > 0 {
            let p = self.errors as f64 / decided as f64;
            (Some(p), Some(p * (1.0 - p) / decided as f64))
        } else {
            (None, None)
        };
        SweepPoint {
            snr_db,
            trials: self.trials,
            errors: self.errors,
            erasures: self.erasures,
            ser,
            ser_variance,
            mean_latency: self.latency.mean().unwrap_or(f64::NAN),
            mean_energy: self.energy.mean().unwrap_or(f64::NAN),
        }
    }
}
