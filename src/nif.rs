//! NIF interface for Elixir
//!
//! Sweeps live in a global slab and are addressed by `u64` handles. The host
//! steps a sweep point by point with `run_point`, so it can stop between
//! points without tearing down the driver.

use rustler::{Atom, NifMap, NifResult, NifStruct, NifUnitEnum};

use crate::config::{ChannelKind, Encoding, NoiseInjection, SimConfig, Variant};
use crate::slab::SweepSlab;
use crate::stats::SweepPoint;
use crate::sweep::{MonteCarloDriver, Scheme};

lazy_static::lazy_static! {
    static ref SWEEPS: SweepSlab<SweepHandle> = SweepSlab::new(256);
}

mod atoms {
    rustler::atoms! {
        ok,
    }
}

struct SweepHandle {
    driver: MonteCarloDriver,
    seed: u64,
}

/// Sweep parameters from Elixir; unset knobs keep the reference defaults
#[derive(NifStruct, Debug, Clone)]
#[module = "HybridRatioSim.Types.SweepParams"]
pub struct SweepParams {
    pub alphabet_size: u32,
    pub trials: u64,
    pub block_len: u64,
    pub snr_db: Vec<f64>,
    pub waveform: bool,
    pub fading: bool,
    pub noise: bool,
}

impl SweepParams {
    fn into_config(self) -> NifResult<SimConfig> {
        let alphabet_size = u16::try_from(self.alphabet_size).map_err(|_| term("alphabet_too_large"))?;
        Ok(SimConfig {
            alphabet_size,
            variant: Variant {
                encoding: if self.waveform { Encoding::WaveformLevel } else { Encoding::SymbolLevel },
                channel: if self.fading { ChannelKind::AwgnFading } else { ChannelKind::Awgn },
            },
            noise: if self.noise { NoiseInjection::Enabled } else { NoiseInjection::Disabled },
            trials: self.trials as usize,
            block_len: self.block_len as usize,
            snr_db: self.snr_db,
            ..SimConfig::default()
        })
    }
}

#[derive(NifUnitEnum, Debug, Clone, Copy)]
pub enum SchemeAtom {
    Fsk,
    Hybrid,
}

impl From<SchemeAtom> for Scheme {
    fn from(atom: SchemeAtom) -> Self {
        match atom {
            SchemeAtom::Fsk => Scheme::Fsk,
            SchemeAtom::Hybrid => Scheme::Hybrid,
        }
    }
}

/// One SNR point; `ser` is nil when every trial was erased
#[derive(NifMap, Debug, Clone)]
pub struct PointResult {
    pub snr_db: f64,
    pub trials: u64,
    pub errors: u64,
    pub erasures: u64,
    pub ser: Option<f64>,
    pub ser_variance: Option<f64>,
    pub mean_latency: f64,
    pub mean_energy: f64,
}

impl From<SweepPoint> for PointResult {
    fn from(p: SweepPoint) -> Self {
        Self {
            snr_db: p.snr_db,
            trials: p.trials,
            errors: p.errors,
            erasures: p.erasures,
            ser: p.ser,
            ser_variance: p.ser_variance,
            mean_latency: p.mean_latency,
            mean_energy: p.mean_energy,
        }
    }
}

#[derive(NifMap, Debug, Clone)]
pub struct ReportResult {
    pub fsk: Vec<PointResult>,
    pub hybrid: Vec<PointResult>,
}

fn term(reason: &'static str) -> rustler::Error {
    rustler::Error::Term(Box::new(reason))
}

fn sim_error(e: crate::error::SimError) -> rustler::Error {
    rustler::Error::Term(Box::new(e.to_string()))
}

rustler::init!("Elixir.HybridRatioSim.Nif");

/// Validates the parameters and stores a driver; returns its handle.
#[rustler::nif]
fn create_sweep(params: SweepParams, seed: u64) -> NifResult<(Atom, u64)> {
    let driver = MonteCarloDriver::new(params.into_config()?).map_err(sim_error)?;

    match SWEEPS.insert(SweepHandle { driver, seed }) {
        Some(handle) => Ok((atoms::ok(), handle)),
        None => Err(term("slab_full")),
    }
}

/// Runs one SNR point of one scheme.
#[rustler::nif(schedule = "DirtyCpu")]
fn run_point(handle: u64, scheme: SchemeAtom, index: u64) -> NifResult<(Atom, PointResult)> {
    let point = SWEEPS
        .with_entry(handle, |h| h.driver.run_point(scheme.into(), index as usize, h.seed))
        .ok_or_else(|| term("sweep_not_found"))?
        .map_err(sim_error)?;

    Ok((atoms::ok(), point.into()))
}

/// Runs every point of both schemes.
#[rustler::nif(schedule = "DirtyCpu")]
fn run_sweep(handle: u64) -> NifResult<(Atom, ReportResult)> {
    let report = SWEEPS
        .with_entry(handle, |h| h.driver.run(h.seed))
        .ok_or_else(|| term("sweep_not_found"))?
        .map_err(sim_error)?;

    Ok((
        atoms::ok(),
        ReportResult {
            fsk: report.fsk.points.into_iter().map(PointResult::from).collect(),
            hybrid: report.hybrid.points.into_iter().map(PointResult::from).collect(),
        },
    ))
}

/// Destroys a sweep and frees its slot.
#[rustler::nif]
fn destroy_sweep(handle: u64) -> NifResult<Atom> {
    SWEEPS.remove(handle);
    Ok(atoms::ok())
}

/// Returns the number of live sweeps.
#[rustler::nif]
fn sweep_count() -> NifResult<u64> {
    Ok(SWEEPS.count() as u64)
}
