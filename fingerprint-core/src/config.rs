//! Run configuration for the fingerprint pipeline
//!
//! Everything here is fixed at run start and passed by value into
//! [`crate::Pipeline::new`]. There is no module-level state, so concurrent
//! batch runs with different catalogues cannot interfere with each other.

use crate::error::FingerprintError;
use crate::spectrum::WindowKind;

/// A frequency band `[start_hz, end_hz]`. Both bounds are inclusive when
/// selecting spectrum bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRange {
    pub start_hz: f64,
    pub end_hz: f64,
}

impl FrequencyRange {
    pub const fn new(start_hz: f64, end_hz: f64) -> Self {
        Self { start_hz, end_hz }
    }

    /// Whether `freq_hz` falls inside the band, bounds inclusive.
    pub fn contains(&self, freq_hz: f64) -> bool {
        freq_hz >= self.start_hz && freq_hz <= self.end_hz
    }
}

impl std::fmt::Display for FrequencyRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}-{:.2} Hz", self.start_hz, self.end_hz)
    }
}

/// Pipeline configuration
///
/// The band catalogue is the only field without a usable default: it is
/// domain-specific and must be applied identically to every recording in a
/// run for the resulting columns to be comparable.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Frame length in samples (power of two recommended for FFT speed)
    pub frame_length: usize,

    /// Fraction of each frame shared with its predecessor, `0.0 <= f < 1.0`
    pub overlap_fraction: f64,

    /// Taper window applied to every frame before the FFT
    pub window_kind: WindowKind,

    /// dB reference level; `0.5` is the mean square of a unit sinusoid
    pub db_reference: f64,

    /// Minimum prominence for a curve maximum to count as a peak
    pub peak_prominence: f64,

    /// Minimum index distance between detected peaks
    pub peak_min_distance: usize,

    /// Half-width of the nulled window around each detected peak
    pub peak_buffer_width: usize,

    /// Run peak suppression before band statistics
    pub suppress_peaks: bool,

    /// Ordered band catalogue, identical for every recording in a run
    pub band_catalogue: Vec<FrequencyRange>,
}

impl PipelineConfig {
    /// Default parameters around the given band catalogue.
    pub fn with_catalogue(band_catalogue: Vec<FrequencyRange>) -> Self {
        Self {
            frame_length: 512,
            overlap_fraction: 0.5,
            window_kind: WindowKind::Hamming,
            db_reference: 0.5,
            peak_prominence: 1.0,
            peak_min_distance: 10,
            peak_buffer_width: 5,
            suppress_peaks: true,
            band_catalogue,
        }
    }

    /// Validate the configuration once, at pipeline construction.
    pub fn validate(&self) -> Result<(), FingerprintError> {
        if self.frame_length < 2 {
            return Err(FingerprintError::InvalidConfig(format!(
                "frame_length must be at least 2, got {}",
                self.frame_length
            )));
        }
        if !(0.0..1.0).contains(&self.overlap_fraction) {
            return Err(FingerprintError::InvalidConfig(format!(
                "overlap_fraction must be in [0.0, 1.0), got {}",
                self.overlap_fraction
            )));
        }
        if self.db_reference <= 0.0 {
            return Err(FingerprintError::InvalidConfig(format!(
                "db_reference must be positive, got {}",
                self.db_reference
            )));
        }
        if self.band_catalogue.is_empty() {
            return Err(FingerprintError::InvalidConfig(
                "band_catalogue must contain at least one range".into(),
            ));
        }
        for range in &self.band_catalogue {
            if !(range.start_hz < range.end_hz) {
                return Err(FingerprintError::InvalidConfig(format!(
                    "band {} does not satisfy start < end",
                    range
                )));
            }
        }
        Ok(())
    }

    /// Samples shared between consecutive frames.
    pub fn frame_overlap(&self) -> usize {
        (self.frame_length as f64 * self.overlap_fraction) as usize
    }

    /// Hop between consecutive frame starts.
    pub fn frame_step(&self) -> usize {
        self.frame_length - self.frame_overlap()
    }
}

/// The twelve bands used on the original bearing test rig, chosen between
/// the rig's tonal components so the medians track broadband noise only.
pub fn default_band_catalogue() -> Vec<FrequencyRange> {
    vec![
        FrequencyRange::new(1687.50, 3750.00),
        FrequencyRange::new(6000.00, 6937.50),
        FrequencyRange::new(9187.50, 10875.00),
        FrequencyRange::new(13125.00, 14812.50),
        FrequencyRange::new(17062.50, 18937.50),
        FrequencyRange::new(21187.50, 22687.50),
        FrequencyRange::new(24937.50, 26812.50),
        FrequencyRange::new(29062.50, 30937.50),
        FrequencyRange::new(33187.50, 34875.00),
        FrequencyRange::new(37125.00, 38812.50),
        FrequencyRange::new(41062.50, 41812.50),
        FrequencyRange::new(44062.50, 45750.00),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig::with_catalogue(default_band_catalogue())
    }

    #[test]
    fn test_defaults_valid() {
        let cfg = config();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.frame_length, 512);
        assert_eq!(cfg.frame_overlap(), 256);
        assert_eq!(cfg.frame_step(), 256);
    }

    #[test]
    fn test_rejects_empty_catalogue() {
        let cfg = PipelineConfig::with_catalogue(vec![]);
        assert!(matches!(
            cfg.validate(),
            Err(FingerprintError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let cfg = PipelineConfig::with_catalogue(vec![FrequencyRange::new(2000.0, 1000.0)]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_full_overlap() {
        let mut cfg = config();
        cfg.overlap_fraction = 1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = FrequencyRange::new(100.0, 200.0);
        assert!(range.contains(100.0));
        assert!(range.contains(200.0));
        assert!(!range.contains(99.999));
        assert!(!range.contains(200.001));
    }

    #[test]
    fn test_default_catalogue_ordered() {
        let bands = default_band_catalogue();
        assert_eq!(bands.len(), 12);
        for pair in bands.windows(2) {
            assert!(pair[0].end_hz < pair[1].start_hz);
        }
    }
}
