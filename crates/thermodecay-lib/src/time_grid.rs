//! Evenly spaced sample times.

use crate::error::{Error, Result};

/// `samples` evenly spaced values over `[start, end]`, both endpoints included.
///
/// The last element is `end` exactly, not `start + (n - 1)·step`, so
/// evaluation times never overshoot the integration span.
pub fn linspace(start: f64, end: f64, samples: usize) -> Result<Vec<f64>> {
    if samples < 2 {
        return Err(Error::InvalidTimeGrid {
            message: format!("need at least 2 samples, got {}", samples),
        });
    }
    if !start.is_finite() || !end.is_finite() {
        return Err(Error::InvalidTimeGrid {
            message: format!("bounds must be finite, got [{}, {}]", start, end),
        });
    }
    if end <= start {
        return Err(Error::InvalidTimeGrid {
            message: format!("end ({}) must be greater than start ({})", end, start),
        });
    }

    let step = (end - start) / (samples - 1) as f64;
    let mut times: Vec<f64> = (0..samples).map(|i| start + i as f64 * step).collect();
    times[samples - 1] = end;
    Ok(times)
}
