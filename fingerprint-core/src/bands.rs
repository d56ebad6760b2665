//! Band-wise median aggregation over a fixed catalogue
//!
//! The median, not the mean, so a residual outlier bin cannot drag a band's
//! summary. A band with no eligible bins yields `None`: missing data is
//! propagated as data, never as zero and never as an error.

use crate::config::FrequencyRange;

/// One `Option<f64>` per catalogue range, in catalogue order, for one
/// recording. `None` means the band had no data.
pub type BandMedianVector = Vec<Option<f64>>;

/// Median power per catalogue range.
///
/// A curve value is eligible for a range when its frequency lies inside the
/// range (bounds inclusive) and the value is not NaN. Even-sized selections
/// take the mean of the two middle sorted values.
pub fn band_medians(
    frequencies_hz: &[f64],
    values: &[f64],
    catalogue: &[FrequencyRange],
) -> BandMedianVector {
    catalogue
        .iter()
        .map(|range| {
            let eligible: Vec<f64> = frequencies_hz
                .iter()
                .zip(values.iter())
                .filter(|(&f, &v)| range.contains(f) && !v.is_nan())
                .map(|(_, &v)| v)
                .collect();
            median(eligible)
        })
        .collect()
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(n: usize) -> Vec<f64> {
        (0..n).map(|k| k as f64 * 100.0).collect()
    }

    #[test]
    fn test_single_eligible_sample() {
        let freqs = axis(10);
        let values: Vec<f64> = (0..10).map(|v| v as f64).collect();

        // Only the 300 Hz bin falls inside
        let medians = band_medians(&freqs, &values, &[FrequencyRange::new(250.0, 350.0)]);
        assert_eq!(medians, vec![Some(3.0)]);
    }

    #[test]
    fn test_even_count_averages_middle_pair() {
        let freqs = axis(10);
        let values = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];

        // Bins 100..400 Hz inclusive: values 1, 2, 3, 4
        let medians = band_medians(&freqs, &values, &[FrequencyRange::new(100.0, 400.0)]);
        assert_eq!(medians, vec![Some(2.5)]);
    }

    #[test]
    fn test_inclusive_bounds() {
        let freqs = axis(10);
        let values: Vec<f64> = (0..10).map(|v| v as f64).collect();

        // Bins sitting exactly on both bounds are eligible: 2, 3, 4
        let medians = band_medians(&freqs, &values, &[FrequencyRange::new(200.0, 400.0)]);
        assert_eq!(medians, vec![Some(3.0)]);
    }

    #[test]
    fn test_empty_range_is_none_not_zero() {
        let freqs = axis(10);
        let values = vec![1.0; 10];

        // Band between bins: no eligible frequency
        let medians = band_medians(&freqs, &values, &[FrequencyRange::new(110.0, 190.0)]);
        assert_eq!(medians, vec![None]);
    }

    #[test]
    fn test_suppressed_values_excluded() {
        let freqs = axis(5);
        let values = vec![1.0, f64::NAN, 5.0, f64::NAN, 3.0];

        let medians = band_medians(&freqs, &values, &[FrequencyRange::new(0.0, 400.0)]);
        assert_eq!(medians, vec![Some(3.0)]);
    }

    #[test]
    fn test_fully_suppressed_range_is_none() {
        let freqs = axis(5);
        let values = vec![f64::NAN; 5];

        let medians = band_medians(&freqs, &values, &[FrequencyRange::new(0.0, 400.0)]);
        assert_eq!(medians, vec![None]);
    }

    #[test]
    fn test_catalogue_order_preserved() {
        let freqs = axis(10);
        let values: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let catalogue = [
            FrequencyRange::new(700.0, 900.0),
            FrequencyRange::new(0.0, 200.0),
        ];

        let medians = band_medians(&freqs, &values, &catalogue);
        assert_eq!(medians, vec![Some(8.0), Some(1.0)]);
    }
}
