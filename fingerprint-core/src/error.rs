//! Error types for the fingerprint pipeline
//!
//! A failed recording surfaces one of these to the caller and is skipped;
//! it never corrupts the shared fingerprint table. An empty band result is
//! not an error (see [`crate::bands`]).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("recording too short: {got} samples, need at least {need} for one frame")]
    InsufficientData { got: usize, need: usize },

    #[error("frequency axis has {axis} points but value curve has {values}")]
    CurveShapeMismatch { axis: usize, values: usize },

    #[error("recording '{0}' is already in the fingerprint table")]
    DuplicateRecording(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("required column '{0}' not found in input table")]
    MissingColumn(String),
}
