//! Sample normalization and overlapping frame segmentation

use crate::error::FingerprintError;

/// Maximum representable magnitude of 16-bit PCM sources.
const I16_FULL_SCALE: f64 = 32768.0;

/// Normalize raw integer samples to full scale, so power values are
/// comparable across recordings regardless of storage format.
pub fn normalize_samples(samples: &[i16]) -> Vec<f64> {
    samples
        .iter()
        .map(|&s| f64::from(s) / I16_FULL_SCALE)
        .collect()
}

/// Slice a normalized buffer into fixed-length overlapping frames.
///
/// Produces `(N - overlap) / step` frames of length `frame_length`, where
/// `step = frame_length - overlap`. Frames borrow from the input buffer.
/// Fails when the buffer is shorter than a single frame.
pub fn segment_frames(
    samples: &[f64],
    frame_length: usize,
    overlap: usize,
) -> Result<Vec<&[f64]>, FingerprintError> {
    if samples.len() < frame_length {
        return Err(FingerprintError::InsufficientData {
            got: samples.len(),
            need: frame_length,
        });
    }

    let step = frame_length - overlap;
    let count = (samples.len() - overlap) / step;

    let mut frames = Vec::with_capacity(count);
    for i in 0..count {
        let start = i * step;
        frames.push(&samples[start..start + frame_length]);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_scale() {
        let normalized = normalize_samples(&[i16::MIN, 0, 16384, i16::MAX]);
        assert_eq!(normalized[0], -1.0);
        assert_eq!(normalized[1], 0.0);
        assert_eq!(normalized[2], 0.5);
        assert!((normalized[3] - 32767.0 / 32768.0).abs() < 1e-15);
    }

    #[test]
    fn test_frame_count_formula() {
        // 2 s at 96 kHz with L = 512, half overlap:
        // (192000 - 256) / 256 = 749 frames
        let samples = vec![0.0; 192_000];
        let frames = segment_frames(&samples, 512, 256).unwrap();
        assert_eq!(frames.len(), 749);
        assert!(frames.iter().all(|f| f.len() == 512));
    }

    #[test]
    fn test_exact_single_frame() {
        let samples = vec![0.0; 512];
        let frames = segment_frames(&samples, 512, 256).unwrap();
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_frames_overlap_by_half() {
        let samples: Vec<f64> = (0..1024).map(|i| i as f64).collect();
        let frames = segment_frames(&samples, 512, 256).unwrap();

        // Second frame starts one step (256 samples) after the first
        assert_eq!(frames[1][0], 256.0);
        assert_eq!(frames[0][256..], frames[1][..256]);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let samples = vec![0.0; 511];
        let err = segment_frames(&samples, 512, 256).unwrap_err();
        assert!(matches!(
            err,
            FingerprintError::InsufficientData { got: 511, need: 512 }
        ));
    }
}
