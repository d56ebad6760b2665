//! Peak detection and suppression on 1-D noise curves
//!
//! Narrowband tonal artifacts (shaft harmonics, electrical hum) would skew
//! band medians, so locally prominent maxima are located and a buffered
//! window around each is flattened to NaN. The result is a conservative
//! background-only curve. NaN marks "no data" and is distinguishable from
//! a legitimate zero; re-marking an already-NaN index is a no-op, so
//! overlapping windows from nearby peaks compose correctly.

use std::cmp::Ordering;

/// Inclusive index window nulled around one detected peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakRegion {
    pub start: usize,
    pub end: usize,
}

/// Output of [`suppress_peaks`]: the derived background curve plus the
/// nulled regions in detection order. The input curve is left untouched.
#[derive(Debug, Clone)]
pub struct SuppressionResult {
    pub suppressed: Vec<f64>,
    pub regions: Vec<PeakRegion>,
}

/// Indices of strict local maxima. The midpoint of a flat plateau counts
/// once; NaN samples never qualify and never border a reported maximum.
fn local_maxima(values: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    let n = values.len();
    if n < 3 {
        return maxima;
    }

    let mut i = 1;
    while i < n - 1 {
        if values[i - 1] < values[i] {
            // Walk across a possible plateau of equal values
            let mut j = i;
            while j + 1 < n && values[j + 1] == values[i] {
                j += 1;
            }
            if j + 1 < n && values[j + 1] < values[i] {
                maxima.push((i + j) / 2);
            }
            i = j + 1;
        } else {
            i += 1;
        }
    }
    maxima
}

/// Height of a peak above the higher of its two bounding minima.
///
/// The search extends on each side until a sample higher than the peak (or
/// a NaN, or the curve border) is met; the minimum over each span is the
/// base on that side.
fn prominence(values: &[f64], peak: usize) -> f64 {
    let peak_value = values[peak];

    let mut left_min = peak_value;
    let mut i = peak;
    while i > 0 && values[i - 1] <= peak_value {
        i -= 1;
        if values[i] < left_min {
            left_min = values[i];
        }
    }

    let mut right_min = peak_value;
    let mut j = peak;
    while j + 1 < values.len() && values[j + 1] <= peak_value {
        j += 1;
        if values[j] < right_min {
            right_min = values[j];
        }
    }

    peak_value - left_min.max(right_min)
}

/// Thin candidate maxima so survivors are at least `min_distance` apart.
/// Higher peaks win; their lower neighbours inside the exclusion zone are
/// dropped.
fn enforce_min_distance(values: &[f64], maxima: &[usize], min_distance: usize) -> Vec<usize> {
    if min_distance <= 1 || maxima.len() < 2 {
        return maxima.to_vec();
    }

    let mut keep = vec![true; maxima.len()];
    let mut by_height: Vec<usize> = (0..maxima.len()).collect();
    by_height.sort_by(|&a, &b| {
        values[maxima[a]]
            .partial_cmp(&values[maxima[b]])
            .unwrap_or(Ordering::Equal)
    });

    for &idx in by_height.iter().rev() {
        if !keep[idx] {
            continue;
        }
        let mut k = idx;
        while k > 0 && maxima[idx] - maxima[k - 1] < min_distance {
            k -= 1;
            keep[k] = false;
        }
        let mut k = idx + 1;
        while k < maxima.len() && maxima[k] - maxima[idx] < min_distance {
            keep[k] = false;
            k += 1;
        }
    }

    maxima
        .iter()
        .zip(keep)
        .filter_map(|(&m, kept)| kept.then_some(m))
        .collect()
}

/// Locally prominent maxima of a curve, in ascending index order.
///
/// Candidates are thinned by `min_distance` first (highest wins), then
/// filtered by `min_prominence`, matching the detection rule the rig's
/// analysis has always used.
pub fn find_prominent_peaks(
    values: &[f64],
    min_prominence: f64,
    min_distance: usize,
) -> Vec<usize> {
    let candidates = local_maxima(values);
    let spaced = enforce_min_distance(values, &candidates, min_distance);
    spaced
        .into_iter()
        .filter(|&p| prominence(values, p) >= min_prominence)
        .collect()
}

/// Null an inclusive `[peak - buffer, peak + buffer]` window around every
/// prominent peak, clipped to the curve bounds.
pub fn suppress_peaks(
    values: &[f64],
    min_prominence: f64,
    min_distance: usize,
    buffer_width: usize,
) -> SuppressionResult {
    let peaks = find_prominent_peaks(values, min_prominence, min_distance);

    let mut suppressed = values.to_vec();
    let mut regions = Vec::with_capacity(peaks.len());
    for &peak in &peaks {
        let start = peak.saturating_sub(buffer_width);
        let end = (peak + buffer_width).min(values.len() - 1);
        for v in &mut suppressed[start..=end] {
            *v = f64::NAN;
        }
        regions.push(PeakRegion { start, end });
    }

    SuppressionResult { suppressed, regions }
}
