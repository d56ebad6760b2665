//! Welch-averaged power spectral density
//!
//! Each recording is segmented into overlapping frames, every frame is
//! tapered and transformed, and the squared magnitudes are averaged
//! index-wise across frames before the single conversion to dB. Averaging
//! power first trades frequency resolution for variance reduction; a single
//! frame's spectrum is far too noisy for stable band statistics.

use crate::error::FingerprintError;
use crate::spectrum::fft::FftEngine;
use crate::spectrum::frames::segment_frames;
use crate::spectrum::window::{generate_window, WindowKind};

/// Floor applied to the averaged power before the log. A silent recording
/// therefore produces a finite, documented floor value in every bin instead
/// of `-inf` leaking into downstream medians.
pub const ZERO_POWER_FLOOR: f64 = 1e-20;

/// One frequency axis and its power curve, equal lengths, axis ascending
/// and Nyquist-limited. Produced once per recording, read-only afterwards.
#[derive(Debug, Clone)]
pub struct SpectrumCurve {
    pub frequencies_hz: Vec<f64>,
    pub power_db: Vec<f64>,
}

impl SpectrumCurve {
    pub fn len(&self) -> usize {
        self.frequencies_hz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies_hz.is_empty()
    }
}

/// Welch PSD estimator
///
/// The window coefficients and FFT plan are built once per run and reused
/// for every recording.
pub struct WelchEstimator {
    frame_length: usize,
    overlap: usize,
    db_reference: f64,
    window: Vec<f64>,

    /// One-sided calibration: 2 / (Σw)² puts a full-scale unit sine at
    /// 0 dB re the 0.5 reference. DC and Nyquist bins take half of it.
    power_scale: f64,

    fft: FftEngine,
}

impl WelchEstimator {
    pub fn new(
        frame_length: usize,
        overlap: usize,
        window_kind: WindowKind,
        db_reference: f64,
    ) -> Self {
        let window = generate_window(window_kind, frame_length);
        let window_sum: f64 = window.iter().sum();
        let power_scale = 2.0 / (window_sum * window_sum);

        Self {
            frame_length,
            overlap,
            db_reference,
            window,
            power_scale,
            fft: FftEngine::new(frame_length),
        }
    }

    /// Floor value in dB that a zero-power bin collapses to.
    pub fn db_floor(&self) -> f64 {
        10.0 * (ZERO_POWER_FLOOR / self.db_reference).log10()
    }

    /// Estimate the PSD of one normalized recording.
    pub fn estimate(
        &mut self,
        samples: &[f64],
        sample_rate: f64,
    ) -> Result<SpectrumCurve, FingerprintError> {
        let frames = segment_frames(samples, self.frame_length, self.overlap)?;
        let bins = self.fft.num_bins();

        let mut sum_power = vec![0.0; bins];
        let mut windowed = vec![0.0; self.frame_length];
        let mut frame_power = vec![0.0; bins];

        for frame in &frames {
            for ((w, &x), &c) in windowed.iter_mut().zip(frame.iter()).zip(self.window.iter()) {
                *w = x * c;
            }
            self.fft.power_into(&windowed, &mut frame_power);
            for (acc, &p) in sum_power.iter_mut().zip(frame_power.iter()) {
                *acc += p;
            }
        }

        let frame_count = frames.len() as f64;
        let nyquist_bin = bins - 1;
        let power_db: Vec<f64> = sum_power
            .iter()
            .enumerate()
            .map(|(k, &sum)| {
                let scale = if k == 0 || k == nyquist_bin {
                    self.power_scale / 2.0
                } else {
                    self.power_scale
                };
                let mean = (sum / frame_count) * scale;
                10.0 * (mean.max(ZERO_POWER_FLOOR) / self.db_reference).log10()
            })
            .collect();

        Ok(SpectrumCurve {
            frequencies_hz: self.fft.frequency_axis_hz(sample_rate),
            power_db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn estimator() -> WelchEstimator {
        WelchEstimator::new(512, 256, WindowKind::Hamming, 0.5)
    }

    fn sine(freq_hz: f64, amplitude: f64, sample_rate: f64, seconds: f64) -> Vec<f64> {
        let n = (sample_rate * seconds) as usize;
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq_hz * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_axis_shape() {
        let mut est = estimator();
        let curve = est.estimate(&vec![0.0; 4096], 96_000.0).unwrap();

        assert_eq!(curve.frequencies_hz.len(), 257);
        assert_eq!(curve.power_db.len(), 257);
        assert!(curve.frequencies_hz.windows(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn test_sine_peak_location_and_level() {
        // Half-scale 1 kHz sine, 2 s at 96 kHz
        let mut est = estimator();
        let signal = sine(1000.0, 0.5, 96_000.0, 2.0);
        let curve = est.estimate(&signal, 96_000.0).unwrap();

        let (peak_bin, &peak_db) = curve
            .power_db
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        // Peak within one bin (187.5 Hz) of the tone
        assert!((curve.frequencies_hz[peak_bin] - 1000.0).abs() <= 96_000.0 / 512.0);

        // Level consistent with 10*log10((0.5^2 / 2) / 0.5) = -6.02 dB,
        // allowing for scalloping loss of the off-bin tone
        let expected = 10.0 * (0.5f64.powi(2) / 2.0 / 0.5).log10();
        assert!((peak_db - expected).abs() < 3.0, "peak at {peak_db} dB");
    }

    #[test]
    fn test_flat_zero_hits_documented_floor() {
        let mut est = estimator();
        let curve = est.estimate(&vec![0.0; 96_000], 96_000.0).unwrap();

        let floor = est.db_floor();
        assert!(floor.is_finite());
        assert!(curve.power_db.iter().all(|&p| p == floor));
    }

    #[test]
    fn test_amplitude_scaling_shifts_db_uniformly() {
        // Deterministic broadband signal so no bin sits at the floor
        let mut state = 0x2545_f491_4f6c_dd1du64;
        let mut noise = || {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
        };
        let signal: Vec<f64> = (0..8192).map(|_| noise() * 0.1).collect();
        let scaled: Vec<f64> = signal.iter().map(|&x| x * 10.0).collect();

        let mut est = estimator();
        let base = est.estimate(&signal, 96_000.0).unwrap();
        let boosted = est.estimate(&scaled, 96_000.0).unwrap();

        // x10 in amplitude is +20 dB in power, in every bin
        for (a, b) in base.power_db.iter().zip(boosted.power_db.iter()) {
            assert!((b - a - 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_insufficient_data_propagates() {
        let mut est = estimator();
        let err = est.estimate(&vec![0.0; 100], 96_000.0).unwrap_err();
        assert!(matches!(err, FingerprintError::InsufficientData { .. }));
    }
}
