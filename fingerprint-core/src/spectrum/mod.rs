//! Welch-style spectral estimation from raw sample buffers

pub mod fft;
pub mod frames;
pub mod welch;
pub mod window;

pub use fft::FftEngine;
pub use frames::{normalize_samples, segment_frames};
pub use welch::{SpectrumCurve, WelchEstimator, ZERO_POWER_FLOOR};
pub use window::{generate_window, WindowKind};
