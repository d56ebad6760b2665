//! Taper windows applied to frames before the FFT
//!
//! A raised-cosine window suppresses the spectral leakage a finite frame
//! length would otherwise smear across neighbouring bins.

use std::f64::consts::PI;

/// Taper window families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1)), ~44 dB sidelobes
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1)), ~53 dB sidelobes
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Rectangular window (no tapering)
    Rectangular,
}

/// Generate window coefficients w[n] for n = 0..M-1.
pub fn generate_window(kind: WindowKind, length: usize) -> Vec<f64> {
    let m = length as f64;
    let mut window = Vec::with_capacity(length);

    match kind {
        WindowKind::Hann => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.5 - 0.5 * angle.cos());
            }
        }

        WindowKind::Hamming => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.54 - 0.46 * angle.cos());
            }
        }

        WindowKind::Blackman => {
            for n in 0..length {
                let angle1 = 2.0 * PI * n as f64 / (m - 1.0);
                let angle2 = 4.0 * PI * n as f64 / (m - 1.0);
                window.push(0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos());
            }
        }

        WindowKind::Rectangular => {
            window.resize(length, 1.0);
        }
    }

    window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_symmetry() {
        let length = 512;

        for kind in [WindowKind::Hann, WindowKind::Hamming, WindowKind::Blackman] {
            let w = generate_window(kind, length);
            assert_eq!(w.len(), length);

            // Symmetric about the midpoint
            for n in 0..length / 2 {
                assert!((w[n] - w[length - 1 - n]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_hamming_endpoints() {
        let w = generate_window(WindowKind::Hamming, 512);

        // Hamming endpoints sit at 0.08, not zero
        assert!(w[0] > 0.07 && w[0] < 0.09);
        assert!(w[511] > 0.07 && w[511] < 0.09);
    }

    #[test]
    fn test_hann_endpoints_zero() {
        let w = generate_window(WindowKind::Hann, 128);
        assert!(w[0].abs() < 1e-12);
        assert!(w[127].abs() < 1e-12);
    }

    #[test]
    fn test_rectangular_all_ones() {
        let w = generate_window(WindowKind::Rectangular, 100);
        assert_eq!(w.len(), 100);
        assert!(w.iter().all(|&x| x == 1.0));
    }
}
