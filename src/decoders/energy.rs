//! Non-coherent M-FSK energy detector
//!
//! One I/Q correlator pair per candidate tone; energy(k) = I² + Q².
//! The decision is the first index of maximal energy.

use std::f64::consts::PI;

use crate::config::WaveformParams;
use crate::symbol::{Alphabet, Symbol};
use crate::traits::SymbolDecoder;

/// Correlator bank over the alphabet's tones
#[derive(Debug, Clone)]
pub struct EnergyDetector {
    alphabet: Alphabet,
    /// Per-tone (cos, sin) reference, one symbol long
    references: Vec<(Vec<f64>, Vec<f64>)>,
}

impl EnergyDetector {
    pub fn new(params: &WaveformParams, alphabet: Alphabet) -> Self {
        let n = params.samples_per_symbol();
        let references = alphabet
            .symbols()
            .map(|k| {
                let w = 2.0 * PI * params.tone_frequency(k) / params.sample_rate;
                let cos: Vec<f64> = (0..n).map(|i| (w * i as f64).cos()).collect();
                let sin: Vec<f64> = (0..n).map(|i| (w * i as f64).sin()).collect();
                (cos, sin)
            })
            .collect();
        Self { alphabet, references }
    }

    /// Energy at every candidate tone
    ///
    /// Correlates over the overlap of the waveform and one symbol duration.
    pub fn energies(&self, waveform: &[f64]) -> Vec<f64> {
        self.references
            .iter()
            .map(|(cos, sin)| {
                let i: f64 = waveform.iter().zip(cos).map(|(r, c)| r * c).sum();
                let q: f64 = waveform.iter().zip(sin).map(|(r, s)| r * s).sum();
                i * i + q * q
            })
            .collect()
    }
}

/// Index of the first maximum; `None` if empty or any value is not finite
pub fn first_argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (k, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            return None;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((k, v)),
        }
    }
    best.map(|(k, _)| k)
}

impl SymbolDecoder for EnergyDetector {
    type Observation = [f64];

    fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    fn decode(&self, waveform: &[f64]) -> Option<Symbol> {
        if waveform.is_empty() {
            return None;
        }
        let k = first_argmax(&self.energies(waveform))? as Symbol;
        debug_assert!(self.alphabet.contains(k));
        Some(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::FskToneGenerator;

    fn setup(size: u16) -> (FskToneGenerator, EnergyDetector) {
        let params = WaveformParams::default();
        let alphabet = Alphabet::new(size).unwrap();
        (FskToneGenerator::new(params), EnergyDetector::new(&params, alphabet))
    }

    #[test]
    fn test_clean_tones_recovered() {
        let (tx, rx) = setup(8);
        for sym in 0..8u16 {
            assert_eq!(rx.decode(&tx.tone(sym)), Some(sym), "Symbol {} not recovered", sym);
        }
    }

    #[test]
    fn test_energy_concentrated_on_sent_tone() {
        let (tx, rx) = setup(4);
        let energies = rx.energies(&tx.tone(2));
        let peak = energies[2];
        for (k, &e) in energies.iter().enumerate() {
            if k != 2 {
                assert!(e < peak * 1e-12, "Leakage into tone {}: {}", k, e / peak);
            }
        }
    }

    #[test]
    fn test_decision_ignores_phase() {
        let params = WaveformParams::default();
        let alphabet = Alphabet::new(4).unwrap();
        let rx = EnergyDetector::new(&params, alphabet);
        let w = 2.0 * PI * params.tone_frequency(3) / params.sample_rate;
        let shifted: Vec<f64> = (0..params.samples_per_symbol())
            .map(|i| (w * i as f64 + 1.1).cos())
            .collect();
        assert_eq!(rx.decode(&shifted), Some(3));
    }

    #[test]
    fn test_tie_break_first_index() {
        assert_eq!(first_argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(first_argmax(&[0.0, 0.0, 0.0]), Some(0));
        assert_eq!(first_argmax(&[]), None);
        assert_eq!(first_argmax(&[1.0, f64::NAN]), None);
    }

    #[test]
    fn test_silent_input_decides_first_symbol() {
        // All energies tie at zero
        let (_, rx) = setup(4);
        assert_eq!(rx.decode(&[0.0; 480]), Some(0));
    }

    #[test]
    fn test_empty_waveform_undefined() {
        let (_, rx) = setup(4);
        assert_eq!(rx.decode(&[]), None);
    }

    #[test]
    fn test_large_noise_stays_in_alphabet() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;
        use crate::noise::NoiseGenerator;

        let (tx, rx) = setup(4);
        let mut noise = NoiseGenerator::new(&mut ChaCha8Rng::seed_from_u64(99));
        for trial in 0..200 {
            let sym = (trial % 4) as u16;
            let noisy: Vec<f64> = tx.tone(sym).iter().map(|x| x + noise.next_sample(1e6)).collect();
            let decided = rx.decode(&noisy).unwrap();
            assert!(rx.alphabet().contains(decided));
        }
    }
}
