//! FFT engine using realfft for real-valued frames
//!
//! The forward plan and scratch buffers are allocated once and reused for
//! every frame of every recording in a run.

use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Real-to-complex FFT engine sized for one frame
pub struct FftEngine {
    frame_length: usize,

    /// Forward real FFT plan
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex half-spectrum)
    output_buffer: Vec<num_complex::Complex<f64>>,
}

impl FftEngine {
    pub fn new(frame_length: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(frame_length);

        let input_buffer = vec![0.0; frame_length];
        let output_buffer = vec![num_complex::Complex::new(0.0, 0.0); frame_length / 2 + 1];

        Self {
            frame_length,
            r2c,
            input_buffer,
            output_buffer,
        }
    }

    /// Squared magnitude of the non-negative-frequency half-spectrum.
    ///
    /// `frame` must be exactly one frame long; `power_out` must hold
    /// `num_bins()` values and is overwritten.
    pub fn power_into(&mut self, frame: &[f64], power_out: &mut [f64]) {
        assert_eq!(frame.len(), self.frame_length, "frame length mismatch");
        assert_eq!(power_out.len(), self.num_bins(), "power buffer mismatch");

        self.input_buffer.copy_from_slice(frame);

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .expect("FFT processing failed");

        for (p, c) in power_out.iter_mut().zip(self.output_buffer.iter()) {
            *p = c.norm_sqr();
        }
    }

    /// Frame length the plan was built for.
    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// Number of frequency bins (`frame_length / 2 + 1` for a real FFT).
    pub fn num_bins(&self) -> usize {
        self.frame_length / 2 + 1
    }

    /// Frequency axis in Hz: `k * fs / L` for `k = 0 ..= L/2`.
    pub fn frequency_axis_hz(&self, sample_rate: f64) -> Vec<f64> {
        (0..self.num_bins())
            .map(|k| k as f64 * sample_rate / self.frame_length as f64)
            .collect()
    }
}
