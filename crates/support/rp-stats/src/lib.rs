//! Robust statistics for sensor series.
//!
//! Median, median absolute deviation and a Hampel outlier filter over
//! `f64` series. Station exports carry spikes from sensor glitches;
//! these routines clean a read-back series before analysis.

use thiserror::Error;

/// Scale factor that makes the MAD a consistent estimator of the
/// standard deviation for Gaussian data.
pub const GAUSSIAN_SCALE: f64 = 1.4826;

/// Errors from the series statistics.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    /// The operation needs at least one observation
    #[error("empty series")]
    EmptySeries,
}

/// Median of a series.
pub fn median(series: &[f64]) -> Result<f64, StatsError> {
    if series.is_empty() {
        return Err(StatsError::EmptySeries);
    }

    let mut sorted = series.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    // Even lengths average the two middle observations.
    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[middle - 1] + sorted[middle]) / 2.0)
    } else {
        Ok(sorted[middle])
    }
}

/// Absolute difference of each observation from a central point
/// (typically the series median or mean).
pub fn absolute_deviation(series: &[f64], center: f64) -> Vec<f64> {
    series.iter().map(|value| (value - center).abs()).collect()
}

/// Median absolute deviation of a series around a given central point.
pub fn mad(series: &[f64], center: f64) -> Result<f64, StatsError> {
    median(&absolute_deviation(series, center))
}

/// Median and median absolute deviation around it, in one pass.
pub fn median_and_mad(series: &[f64]) -> Result<(f64, f64), StatsError> {
    let center = median(series)?;
    let mad = mad(series, center)?;
    Ok((center, mad))
}

/// Hampel outlier filter.
///
/// Slides a window of `2 * window` observations over the series; an
/// observation further than `n_sigmas` MAD-estimated standard
/// deviations from its window median is an outlier and is replaced by
/// that median. Returns the filtered series and the outlier indices.
///
/// A larger `n_sigmas` makes the filter more forgiving; zero reduces it
/// to a median filter. `window` must be at least 1, a zero window has
/// no observations to take a median over.
pub fn hampel(
    series: &[f64],
    window: usize,
    n_sigmas: f64,
) -> Result<(Vec<f64>, Vec<usize>), StatsError> {
    let mut filtered = series.to_vec();
    let mut outliers = Vec::new();

    for i in window..series.len().saturating_sub(window) {
        let (center, mad) = median_and_mad(&series[i - window..i + window])?;
        let spread = GAUSSIAN_SCALE * mad;

        if (series[i] - center).abs() > n_sigmas * spread {
            filtered[i] = center;
            outliers.push(i);
        }
    }

    Ok((filtered, outliers))
}
