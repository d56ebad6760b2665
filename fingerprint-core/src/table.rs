//! Accumulating fingerprint table
//!
//! One column per recording, one row per catalogue range. The catalogue is
//! the stable key: every configured range is present in the output even if
//! no recording produced data for it. Appends are atomic, so a rejected or
//! failed recording leaves the table exactly as it was.

use crate::bands::BandMedianVector;
use crate::config::FrequencyRange;
use crate::error::FingerprintError;

/// Append-only builder for one batch run.
pub struct FingerprintTableBuilder {
    catalogue: Vec<FrequencyRange>,
    recordings: Vec<String>,
    columns: Vec<BandMedianVector>,
}

impl FingerprintTableBuilder {
    pub fn new(catalogue: Vec<FrequencyRange>) -> Self {
        Self {
            catalogue,
            recordings: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Append one recording's band vector under its opaque identity.
    ///
    /// A duplicate identity is rejected and the table left untouched; the
    /// first arrival wins. Append order does not need to match recording
    /// chronology, presentation ordering is a downstream concern.
    pub fn append(
        &mut self,
        identity: impl Into<String>,
        medians: BandMedianVector,
    ) -> Result<(), FingerprintError> {
        assert_eq!(
            medians.len(),
            self.catalogue.len(),
            "band vector length does not match catalogue"
        );

        let identity = identity.into();
        if self.recordings.contains(&identity) {
            return Err(FingerprintError::DuplicateRecording(identity));
        }

        self.recordings.push(identity);
        self.columns.push(medians);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }

    /// Finalize the batch.
    pub fn finish(self) -> FingerprintTable {
        FingerprintTable {
            catalogue: self.catalogue,
            recordings: self.recordings,
            columns: self.columns,
        }
    }
}

/// Finished table for one batch run.
#[derive(Debug, Clone)]
pub struct FingerprintTable {
    /// Row key: the configured range catalogue, complete and in order
    pub catalogue: Vec<FrequencyRange>,

    /// Column key: recording identities in append order
    pub recordings: Vec<String>,

    /// `columns[recording][band]`
    pub columns: Vec<BandMedianVector>,
}

impl FingerprintTable {
    pub fn num_bands(&self) -> usize {
        self.catalogue.len()
    }

    pub fn num_recordings(&self) -> usize {
        self.recordings.len()
    }

    /// Value for one band of one recording; `None` is missing data.
    pub fn value(&self, band: usize, recording: usize) -> Option<f64> {
        self.columns[recording][band]
    }
}
