//! End-to-end fingerprint pipeline
//!
//! Raw buffer → overlapping frames → Welch PSD → peak suppression → band
//! medians. Recordings are independent: the pipeline keeps no state between
//! them beyond reusable FFT scratch space, so a malformed recording fails
//! alone and the caller's batch continues.

use tracing::debug;

use crate::bands::{band_medians, BandMedianVector};
use crate::config::PipelineConfig;
use crate::error::FingerprintError;
use crate::peaks::{suppress_peaks, PeakRegion};
use crate::spectrum::frames::normalize_samples;
use crate::spectrum::welch::{SpectrumCurve, WelchEstimator};
use crate::table::FingerprintTableBuilder;

/// Everything the pipeline derives from one recording. Only the band
/// vector is meant to outlive the recording's processing; the curves are
/// exposed so callers can persist or render them before dropping.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    /// Median power per catalogue range, `None` where the band had no data
    pub band_medians: BandMedianVector,

    /// The Welch PSD (or the externally supplied curve), untouched
    pub curve: SpectrumCurve,

    /// The curve with peak windows flattened to NaN
    pub suppressed: Vec<f64>,

    /// Nulled windows in detection order
    pub peak_regions: Vec<PeakRegion>,
}

/// One configured pipeline, reused across all recordings of a batch run.
pub struct Pipeline {
    config: PipelineConfig,
    estimator: WelchEstimator,
}

impl Pipeline {
    /// Validate the configuration and plan the FFT once.
    pub fn new(config: PipelineConfig) -> Result<Self, FingerprintError> {
        config.validate()?;
        let estimator = WelchEstimator::new(
            config.frame_length,
            config.frame_overlap(),
            config.window_kind,
            config.db_reference,
        );
        Ok(Self { config, estimator })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// dB value a zero-power spectrum bin collapses to.
    pub fn db_floor(&self) -> f64 {
        self.estimator.db_floor()
    }

    /// A table builder keyed by this pipeline's catalogue.
    pub fn table_builder(&self) -> FingerprintTableBuilder {
        FingerprintTableBuilder::new(self.config.band_catalogue.clone())
    }

    /// Full chain from a raw integer sample buffer.
    pub fn process_recording(
        &mut self,
        samples: &[i16],
        sample_rate: f64,
    ) -> Result<Fingerprint, FingerprintError> {
        let normalized = normalize_samples(samples);
        let curve = self.estimator.estimate(&normalized, sample_rate)?;
        debug!(
            samples = samples.len(),
            bins = curve.len(),
            "estimated spectrum"
        );
        Ok(self.fingerprint_curve(curve))
    }

    /// Alternate entry for an already-materialized `(frequency, value)`
    /// curve, bypassing segmentation and spectral estimation.
    pub fn process_curve(
        &mut self,
        frequencies_hz: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Fingerprint, FingerprintError> {
        if frequencies_hz.len() != values.len() {
            return Err(FingerprintError::CurveShapeMismatch {
                axis: frequencies_hz.len(),
                values: values.len(),
            });
        }
        Ok(self.fingerprint_curve(SpectrumCurve {
            frequencies_hz,
            power_db: values,
        }))
    }

    fn fingerprint_curve(&self, curve: SpectrumCurve) -> Fingerprint {
        let (suppressed, peak_regions) = if self.config.suppress_peaks {
            let result = suppress_peaks(
                &curve.power_db,
                self.config.peak_prominence,
                self.config.peak_min_distance,
                self.config.peak_buffer_width,
            );
            (result.suppressed, result.regions)
        } else {
            (curve.power_db.clone(), Vec::new())
        };

        let medians = band_medians(
            &curve.frequencies_hz,
            &suppressed,
            &self.config.band_catalogue,
        );
        debug!(
            peaks = peak_regions.len(),
            bands = medians.len(),
            "fingerprint complete"
        );

        Fingerprint {
            band_medians: medians,
            curve,
            suppressed,
            peak_regions,
        }
    }
}
