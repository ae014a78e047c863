//! Summary figures comparing the two trajectories.

use serde::{Deserialize, Serialize};

/// How far the full model runs ahead of the Fourier approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    /// Largest `fourier - full` gap over the grid (K).
    pub max_gap: f64,
    /// Time at which the largest gap occurs (s).
    pub max_gap_time: f64,
    /// Gap at the last sample (K).
    pub final_gap: f64,
    /// Full model temperature at the last sample (K).
    pub final_full: f64,
    /// Fourier model temperature at the last sample (K).
    pub final_fourier: f64,
    /// Time for the full model's excess over ambient to halve (s), if reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_excess_time_full: Option<f64>,
    /// Time for the Fourier model's excess over ambient to halve (s), if reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_excess_time_fourier: Option<f64>,
}

/// Compute comparison metrics for two trajectories sampled on `times`.
///
/// Returns `None` when the inputs are empty or their lengths differ.
pub fn compute_metrics(
    times: &[f64],
    full: &[f64],
    fourier: &[f64],
    ambient: f64,
) -> Option<ComparisonMetrics> {
    if times.is_empty() || times.len() != full.len() || times.len() != fourier.len() {
        return None;
    }

    let (max_gap_index, max_gap) = full
        .iter()
        .zip(fourier)
        .map(|(a, b)| b - a)
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, gap)| {
            if gap > best.1 {
                (i, gap)
            } else {
                best
            }
        });

    let last = times.len() - 1;
    Some(ComparisonMetrics {
        max_gap,
        max_gap_time: times[max_gap_index],
        final_gap: fourier[last] - full[last],
        final_full: full[last],
        final_fourier: fourier[last],
        half_excess_time_full: half_excess_time(times, full, ambient),
        half_excess_time_fourier: half_excess_time(times, fourier, ambient),
    })
}

/// First time a series drops below `threshold`, linearly interpolated between samples.
pub fn crossing_time(times: &[f64], values: &[f64], threshold: f64) -> Option<f64> {
    let points: Vec<(f64, f64)> = times.iter().copied().zip(values.iter().copied()).collect();
    points.windows(2).find_map(|pair| {
        let (t_prev, v_prev) = pair[0];
        let (t_curr, v_curr) = pair[1];
        if v_prev >= threshold && v_curr < threshold {
            let frac = (threshold - v_prev) / (v_curr - v_prev);
            Some(t_prev + frac * (t_curr - t_prev))
        } else {
            None
        }
    })
}

/// Time for the excess temperature over `ambient` to fall to half its initial value.
pub fn half_excess_time(times: &[f64], values: &[f64], ambient: f64) -> Option<f64> {
    let initial = *values.first()?;
    if initial <= ambient {
        return None;
    }
    crossing_time(times, values, ambient + 0.5 * (initial - ambient))
}

/// True if every sample is strictly below the previous one.
pub fn is_strictly_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[1] < pair[0])
}
