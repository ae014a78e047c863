use thiserror::Error;

/// Convenient result alias for the thermodecay library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A physical constant or simulation input was non-finite or out of range.
    #[error("invalid {name}: {value} (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// Raised when a sample grid cannot be constructed.
    #[error("invalid time grid: {message}")]
    InvalidTimeGrid { message: String },

    /// Raised when solver tolerances or step limits are unusable.
    #[error("invalid solver tolerance: {message}")]
    InvalidTolerance { message: String },

    /// Raised when an evaluation time lies outside the integration span or is out of order.
    #[error("evaluation time {t} is outside [{start}, {end}] or not ascending")]
    EvaluationTimeOutOfSpan { t: f64, start: f64, end: f64 },

    /// The adaptive step shrank below what floating point can resolve at `t`.
    #[error("step size underflow at t = {t} (h = {h:e})")]
    StepSizeUnderflow { t: f64, h: f64 },

    /// The integrated state became NaN or infinite.
    #[error("solution became non-finite at t = {t}")]
    NonFiniteState { t: f64 },

    /// The solver used its full step budget without reaching the end of the span.
    #[error("step limit of {max_steps} exceeded at t = {t}")]
    StepLimitExceeded { t: f64, max_steps: usize },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialisation errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Reject values that are NaN, infinite, zero or negative.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidParameter {
            name,
            value,
            expected: "finite and positive",
        });
    }
    Ok(value)
}
