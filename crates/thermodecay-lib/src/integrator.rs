//! Adaptive Dormand–Prince 5(4) integrator for scalar initial value problems.
//!
//! The solver advances with the fifth-order solution, estimates the local
//! error from the embedded fourth-order one, and reuses the last stage of an
//! accepted step as the first stage of the next. Requested evaluation times
//! are served by the method's fourth-order continuous extension over each
//! accepted step, so the step size is never constrained by the sampling grid.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Step acceptance safety factor.
const SAFETY: f64 = 0.9;
/// Smallest allowed shrink factor after a rejected step.
const MIN_FACTOR: f64 = 0.2;
/// Largest allowed growth factor after an accepted step.
const MAX_FACTOR: f64 = 10.0;
/// Order of the embedded error estimator.
const ERROR_ESTIMATOR_ORDER: f64 = 4.0;
const ERROR_EXPONENT: f64 = -1.0 / (ERROR_ESTIMATOR_ORDER + 1.0);

// Dormand–Prince tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights (also the last row of the tableau).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Fifth-order minus fourth-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// Continuous extension: y(t + σh) = y + h·Σ kᵢ·(Pᵢ₁σ + Pᵢ₂σ² + Pᵢ₃σ³ + Pᵢ₄σ⁴).
// The k2 row is all zeros and is omitted.
const DENSE: [[f64; 4]; 6] = [
    [
        1.0,
        -8048581381.0 / 2820520608.0,
        8663915743.0 / 2820520608.0,
        -12715105075.0 / 11282082432.0,
    ],
    [
        0.0,
        131558114200.0 / 32700410799.0,
        -68118460800.0 / 10900136933.0,
        87487479700.0 / 32700410799.0,
    ],
    [
        0.0,
        -1754552775.0 / 470086768.0,
        14199869525.0 / 1410260304.0,
        -10690763975.0 / 1880347072.0,
    ],
    [
        0.0,
        127303824393.0 / 49829197408.0,
        -318862633887.0 / 49829197408.0,
        701980252875.0 / 199316789632.0,
    ],
    [
        0.0,
        -282668133.0 / 205662961.0,
        2019193451.0 / 616988883.0,
        -1453857185.0 / 822651844.0,
    ],
    [
        0.0,
        40617522.0 / 29380423.0,
        -110615467.0 / 29380423.0,
        69997945.0 / 29380423.0,
    ],
];

/// Tolerances and limits for [`solve_ivp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Relative tolerance.
    pub rtol: f64,
    /// Absolute tolerance (K).
    pub atol: f64,
    /// Upper bound on a single step (s). `None` means unbounded.
    pub max_step: Option<f64>,
    /// Initial step (s). `None` selects one from the initial slope.
    pub first_step: Option<f64>,
    /// Maximum number of accepted steps.
    pub max_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-8,
            max_step: None,
            first_step: None,
            max_steps: 100_000,
        }
    }
}

impl SolverOptions {
    /// Reject tolerances the step controller cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(Error::InvalidTolerance {
                message: format!("rtol must be finite and positive, got {}", self.rtol),
            });
        }
        if !self.atol.is_finite() || self.atol < 0.0 {
            return Err(Error::InvalidTolerance {
                message: format!("atol must be finite and non-negative, got {}", self.atol),
            });
        }
        if let Some(max_step) = self.max_step {
            if max_step.is_nan() || max_step <= 0.0 {
                return Err(Error::InvalidTolerance {
                    message: format!("max_step must be positive, got {}", max_step),
                });
            }
        }
        if let Some(first_step) = self.first_step {
            if !first_step.is_finite() || first_step <= 0.0 {
                return Err(Error::InvalidTolerance {
                    message: format!("first_step must be finite and positive, got {}", first_step),
                });
            }
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidTolerance {
                message: "max_steps must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Work counters for a single integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStats {
    /// Right-hand side evaluations.
    pub evaluations: usize,
    /// Accepted steps.
    pub accepted_steps: usize,
    /// Rejected steps.
    pub rejected_steps: usize,
}

/// Values of the solution at the requested times.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
    pub stats: SolverStats,
}

/// Right-hand side wrapper that counts evaluations.
struct Rhs<F> {
    f: F,
    evaluations: usize,
}

impl<F: FnMut(f64, f64) -> f64> Rhs<F> {
    fn call(&mut self, t: f64, y: f64) -> f64 {
        self.evaluations += 1;
        (self.f)(t, y)
    }
}

/// Result of one Dormand–Prince trial step.
struct Step {
    h: f64,
    y: f64,
    f: f64,
    error: f64,
    /// Stages k1, k3, k4, k5, k6, k7 for the continuous extension.
    stages: [f64; 6],
}

impl Step {
    /// Solution at fraction `sigma` of the step, starting from `y0`.
    fn interpolate(&self, y0: f64, sigma: f64) -> f64 {
        let powers = [sigma, sigma * sigma, sigma.powi(3), sigma.powi(4)];
        let increment: f64 = self
            .stages
            .iter()
            .zip(DENSE.iter())
            .map(|(k, row)| {
                k * row
                    .iter()
                    .zip(powers.iter())
                    .map(|(p, s)| p * s)
                    .sum::<f64>()
            })
            .sum();
        y0 + self.h * increment
    }
}

fn dormand_prince_step<F: FnMut(f64, f64) -> f64>(
    rhs: &mut Rhs<F>,
    t: f64,
    y: f64,
    k1: f64,
    h: f64,
) -> Step {
    let k2 = rhs.call(t + C2 * h, y + h * (A21 * k1));
    let k3 = rhs.call(t + C3 * h, y + h * (A31 * k1 + A32 * k2));
    let k4 = rhs.call(t + C4 * h, y + h * (A41 * k1 + A42 * k2 + A43 * k3));
    let k5 = rhs.call(
        t + C5 * h,
        y + h * (A51 * k1 + A52 * k2 + A53 * k3 + A54 * k4),
    );
    let k6 = rhs.call(
        t + h,
        y + h * (A61 * k1 + A62 * k2 + A63 * k3 + A64 * k4 + A65 * k5),
    );
    let y_new = y + h * (B1 * k1 + B3 * k3 + B4 * k4 + B5 * k5 + B6 * k6);
    let k7 = rhs.call(t + h, y_new);
    let error = h * (E1 * k1 + E3 * k3 + E4 * k4 + E5 * k5 + E6 * k6 + E7 * k7);

    Step {
        h,
        y: y_new,
        f: k7,
        error,
        stages: [k1, k3, k4, k5, k6, k7],
    }
}

/// Pick a first step from the initial slope and its change over a probe step.
fn initial_step<F: FnMut(f64, f64) -> f64>(
    rhs: &mut Rhs<F>,
    t0: f64,
    y0: f64,
    f0: f64,
    interval: f64,
    options: &SolverOptions,
) -> f64 {
    let scale = options.atol + y0.abs() * options.rtol;
    let d0 = y0.abs() / scale;
    let d1 = f0.abs() / scale;

    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
    .min(interval);

    let f1 = rhs.call(t0 + h0, y0 + h0 * f0);
    if !f1.is_finite() {
        return h0;
    }
    let d2 = (f1 - f0).abs() / scale / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / (ERROR_ESTIMATOR_ORDER + 1.0))
    };

    (100.0 * h0).min(h1).min(interval)
}

fn validate_span(span: (f64, f64), t_eval: &[f64]) -> Result<()> {
    let (start, end) = span;
    if !start.is_finite() || !end.is_finite() || end <= start {
        return Err(Error::InvalidTimeGrid {
            message: format!("integration span [{}, {}] is not a forward interval", start, end),
        });
    }
    let mut previous = start;
    for &t in t_eval {
        if !t.is_finite() || t < previous || t > end {
            return Err(Error::EvaluationTimeOutOfSpan { t, start, end });
        }
        previous = t;
    }
    Ok(())
}

/// Integrate `dy/dt = f(t, y)` from `span.0` to `span.1` starting at `y0`,
/// reporting the solution at each time in `t_eval`.
///
/// `t_eval` must be ascending and lie inside the span. Samples at the start
/// of the span return `y0` exactly.
///
/// # Errors
///
/// - [`Error::InvalidTolerance`] / [`Error::InvalidTimeGrid`] /
///   [`Error::EvaluationTimeOutOfSpan`] for unusable inputs
/// - [`Error::NonFiniteState`] if the right-hand side blows up
/// - [`Error::StepSizeUnderflow`] if the error cannot be controlled
/// - [`Error::StepLimitExceeded`] if `max_steps` accepted steps do not reach the end
pub fn solve_ivp<F>(
    f: F,
    span: (f64, f64),
    y0: f64,
    t_eval: &[f64],
    options: &SolverOptions,
) -> Result<Solution>
where
    F: FnMut(f64, f64) -> f64,
{
    options.validate()?;
    validate_span(span, t_eval)?;
    let (t_start, t_end) = span;
    if !y0.is_finite() {
        return Err(Error::NonFiniteState { t: t_start });
    }

    let mut rhs = Rhs { f, evaluations: 0 };
    let mut stats = SolverStats::default();
    let mut values = Vec::with_capacity(t_eval.len());
    let mut next = 0;
    while next < t_eval.len() && t_eval[next] <= t_start {
        values.push(y0);
        next += 1;
    }

    let mut t = t_start;
    let mut y = y0;
    let mut f0 = rhs.call(t, y);
    if !f0.is_finite() {
        return Err(Error::NonFiniteState { t });
    }

    let max_step = options.max_step.unwrap_or(f64::INFINITY);
    let mut h_abs = match options.first_step {
        Some(h) => h,
        None => initial_step(&mut rhs, t, y, f0, t_end - t_start, options),
    }
    .min(max_step);

    while t < t_end {
        if stats.accepted_steps >= options.max_steps {
            return Err(Error::StepLimitExceeded {
                t,
                max_steps: options.max_steps,
            });
        }

        let min_step = 10.0 * f64::EPSILON * t.abs();
        let mut rejected = false;
        let mut saw_non_finite = false;

        let (t_new, step) = loop {
            if h_abs <= min_step {
                return Err(if saw_non_finite {
                    Error::NonFiniteState { t }
                } else {
                    Error::StepSizeUnderflow { t, h: h_abs }
                });
            }

            let t_new = if t + h_abs >= t_end { t_end } else { t + h_abs };
            let h = t_new - t;
            let step = dormand_prince_step(&mut rhs, t, y, f0, h);

            let scale = options.atol + options.rtol * y.abs().max(step.y.abs());
            let error_norm = (step.error / scale).abs();
            let finite = step.y.is_finite() && step.f.is_finite() && error_norm.is_finite();

            if finite && error_norm < 1.0 {
                let mut factor = if error_norm == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * error_norm.powf(ERROR_EXPONENT)).min(MAX_FACTOR)
                };
                if rejected {
                    factor = factor.min(1.0);
                }
                h_abs = (h * factor).min(max_step);
                break (t_new, step);
            }

            stats.rejected_steps += 1;
            rejected = true;
            if finite {
                h_abs = h * (SAFETY * error_norm.powf(ERROR_EXPONENT)).max(MIN_FACTOR);
            } else {
                saw_non_finite = true;
                h_abs = h * MIN_FACTOR;
            }
        };

        while next < t_eval.len() && t_eval[next] <= t_new {
            let te = t_eval[next];
            values.push(if te == t_new {
                step.y
            } else {
                step.interpolate(y, (te - t) / step.h)
            });
            next += 1;
        }

        t = t_new;
        y = step.y;
        f0 = step.f;
        stats.accepted_steps += 1;
    }

    stats.evaluations = rhs.evaluations;
    debug!(
        evaluations = stats.evaluations,
        accepted = stats.accepted_steps,
        rejected = stats.rejected_steps,
        "integration finished"
    );

    Ok(Solution {
        times: t_eval.to_vec(),
        values,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize, end: f64) -> Vec<f64> {
        (0..n).map(|i| end * i as f64 / (n - 1) as f64).collect()
    }

    #[test]
    fn exponential_decay_matches_closed_form() {
        let times = grid(21, 10.0);
        let solution =
            solve_ivp(|_, y| -0.5 * y, (0.0, 10.0), 2.0, &times, &SolverOptions::default())
                .unwrap();
        assert_eq!(solution.values.len(), times.len());
        for (t, y) in times.iter().zip(&solution.values) {
            let exact = 2.0 * (-0.5 * t).exp();
            assert!((y - exact).abs() < 1e-5, "t={} y={} exact={}", t, y, exact);
        }
    }

    #[test]
    fn time_dependent_rhs() {
        // dy/dt = cos(t), y(0) = 0 -> y = sin(t)
        let times = grid(11, 3.0);
        let options = SolverOptions {
            rtol: 1e-9,
            atol: 1e-10,
            ..SolverOptions::default()
        };
        let solution = solve_ivp(|t, _| t.cos(), (0.0, 3.0), 0.0, &times, &options).unwrap();
        for (t, y) in times.iter().zip(&solution.values) {
            assert!((y - t.sin()).abs() < 1e-7);
        }
    }

    #[test]
    fn first_sample_is_initial_value() {
        let times = grid(5, 1.0);
        let solution =
            solve_ivp(|_, y| -y, (0.0, 1.0), 7.25, &times, &SolverOptions::default()).unwrap();
        assert_eq!(solution.values[0], 7.25);
    }

    #[test]
    fn counts_work() {
        let times = grid(3, 1.0);
        let solution =
            solve_ivp(|_, y| -y, (0.0, 1.0), 1.0, &times, &SolverOptions::default()).unwrap();
        let stats = solution.stats;
        assert!(stats.accepted_steps > 0);
        // One initial slope, one probe, six stages per attempted step.
        assert_eq!(
            stats.evaluations,
            2 + 6 * (stats.accepted_steps + stats.rejected_steps)
        );
    }

    #[test]
    fn max_step_bounds_the_step() {
        let times = grid(2, 1.0);
        let options = SolverOptions {
            max_step: Some(0.1),
            ..SolverOptions::default()
        };
        let solution = solve_ivp(|_, _| 0.0, (0.0, 1.0), 1.0, &times, &options).unwrap();
        assert!(solution.stats.accepted_steps >= 10);
        assert_eq!(solution.values, vec![1.0, 1.0]);
    }

    #[test]
    fn step_limit_is_reported() {
        let times = grid(2, 1.0);
        let options = SolverOptions {
            max_step: Some(0.01),
            max_steps: 5,
            ..SolverOptions::default()
        };
        let err = solve_ivp(|_, y| -y, (0.0, 1.0), 1.0, &times, &options).unwrap_err();
        assert!(matches!(err, Error::StepLimitExceeded { max_steps: 5, .. }));
    }

    #[test]
    fn blow_up_is_an_error() {
        // dy/dt = y², y(0) = 1 has a pole at t = 1.
        let times = grid(2, 2.0);
        let err = solve_ivp(|_, y| y * y, (0.0, 2.0), 1.0, &times, &SolverOptions::default())
            .unwrap_err();
        assert!(
            matches!(
                err,
                Error::StepSizeUnderflow { .. }
                    | Error::NonFiniteState { .. }
                    | Error::StepLimitExceeded { .. }
            ),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn nan_rhs_is_rejected_up_front() {
        let times = grid(2, 1.0);
        let err = solve_ivp(|_, _| f64::NAN, (0.0, 1.0), 1.0, &times, &SolverOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NonFiniteState { .. }));
    }

    #[test]
    fn rejects_evaluation_times_outside_span() {
        let options = SolverOptions::default();
        assert!(matches!(
            solve_ivp(|_, y| -y, (0.0, 1.0), 1.0, &[0.0, 1.5], &options),
            Err(Error::EvaluationTimeOutOfSpan { .. })
        ));
        assert!(matches!(
            solve_ivp(|_, y| -y, (0.0, 1.0), 1.0, &[0.5, 0.25], &options),
            Err(Error::EvaluationTimeOutOfSpan { .. })
        ));
        assert!(matches!(
            solve_ivp(|_, y| -y, (1.0, 0.0), 1.0, &[], &options),
            Err(Error::InvalidTimeGrid { .. })
        ));
    }

    #[test]
    fn rejects_bad_tolerances() {
        let times = grid(2, 1.0);
        for options in [
            SolverOptions {
                rtol: 0.0,
                ..SolverOptions::default()
            },
            SolverOptions {
                atol: -1.0,
                ..SolverOptions::default()
            },
            SolverOptions {
                max_step: Some(0.0),
                ..SolverOptions::default()
            },
            SolverOptions {
                max_steps: 0,
                ..SolverOptions::default()
            },
        ] {
            assert!(matches!(
                solve_ivp(|_, y| -y, (0.0, 1.0), 1.0, &times, &options),
                Err(Error::InvalidTolerance { .. })
            ));
        }
    }

    #[test]
    fn dense_rows_sum_to_fifth_order_weights() {
        let weights = [B1, B3, B4, B5, B6, 0.0];
        for (row, b) in DENSE.iter().zip(weights) {
            let sum: f64 = row.iter().sum();
            assert!((sum - b).abs() < 1e-12, "row sums to {} not {}", sum, b);
        }
    }

    #[test]
    fn interpolation_matches_step_endpoints() {
        let mut rhs = Rhs {
            f: |_: f64, y: f64| -0.3 * y,
            evaluations: 0,
        };
        let step = dormand_prince_step(&mut rhs, 0.0, 5.0, -1.5, 0.4);
        assert_eq!(step.interpolate(5.0, 0.0), 5.0);
        assert!((step.interpolate(5.0, 1.0) - step.y).abs() < 1e-12);
        let exact = 5.0 * (-0.3_f64 * 0.2).exp();
        assert!((step.interpolate(5.0, 0.5) - exact).abs() < 1e-6);
    }
}
