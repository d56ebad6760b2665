//! Noise fingerprinting for bearing/motor test rig recordings
//!
//! Reduces each raw vibration recording to a Welch-averaged power spectrum,
//! strips narrowband tonal peaks from it, and summarizes the remaining
//! background curve as one median per configured frequency band. Band
//! vectors from many recordings accumulate into a single table for
//! long-term wear tracking.

pub mod bands;
pub mod config;
pub mod error;
pub mod peaks;
pub mod pipeline;
pub mod spectrum;
pub mod table;

pub use bands::{band_medians, BandMedianVector};
pub use config::{default_band_catalogue, FrequencyRange, PipelineConfig};
pub use error::FingerprintError;
pub use peaks::{suppress_peaks, PeakRegion, SuppressionResult};
pub use pipeline::{Fingerprint, Pipeline};
pub use spectrum::{SpectrumCurve, WelchEstimator, WindowKind};
pub use table::{FingerprintTable, FingerprintTableBuilder};
