//! End-to-end comparison run: coefficients, time grid, both integrations, metrics.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::coefficients::{Coefficients, PhysicalConstants};
use crate::constants::{INITIAL_TEMPERATURE_K, SAMPLE_COUNT, T_END_S, T_START_S};
use crate::error::{ensure_positive, Error, Result};
use crate::integrator::{solve_ivp, SolverOptions, SolverStats};
use crate::metrics::{compute_metrics, ComparisonMetrics};
use crate::models::CoolingModel;
use crate::time_grid::linspace;

/// Inputs for a comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub constants: PhysicalConstants,
    /// Starting temperature shared by both models (K).
    pub initial_temperature: f64,
    /// Start of the integration span (s).
    pub t_start: f64,
    /// End of the integration span (s).
    pub t_end: f64,
    /// Number of evenly spaced output samples.
    pub samples: usize,
    pub solver: SolverOptions,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            constants: PhysicalConstants::default(),
            initial_temperature: INITIAL_TEMPERATURE_K,
            t_start: T_START_S,
            t_end: T_END_S,
            samples: SAMPLE_COUNT,
            solver: SolverOptions::default(),
        }
    }
}

/// Temperatures of one model at every grid time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub model: CoolingModel,
    pub temperatures: Vec<f64>,
    pub stats: SolverStats,
}

/// Both trajectories on a shared time grid, with the inputs that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecayComparison {
    pub coefficients: Coefficients,
    pub initial_temperature: f64,
    pub times: Vec<f64>,
    pub full: Trajectory,
    pub fourier: Trajectory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ComparisonMetrics>,
}

impl DecayComparison {
    /// Trajectory for the given model.
    pub fn trajectory(&self, model: CoolingModel) -> &Trajectory {
        match model {
            CoolingModel::Full => &self.full,
            CoolingModel::Fourier => &self.fourier,
        }
    }

    /// `(time, full, fourier)` rows in grid order.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.times
            .iter()
            .zip(&self.full.temperatures)
            .zip(&self.fourier.temperatures)
            .map(|((t, full), fourier)| (*t, *full, *fourier))
    }
}

/// Integrate one model over `times`, starting from `initial_temperature` at `times[0]`.
pub fn integrate_model(
    model: CoolingModel,
    coefficients: &Coefficients,
    initial_temperature: f64,
    times: &[f64],
    options: &SolverOptions,
) -> Result<Trajectory> {
    let (start, end) = match (times.first(), times.last()) {
        (Some(start), Some(end)) => (*start, *end),
        _ => {
            return Err(Error::InvalidTimeGrid {
                message: "no sample times".to_string(),
            })
        }
    };

    let solution = solve_ivp(
        |t, temperature| model.rate(t, temperature, coefficients),
        (start, end),
        initial_temperature,
        times,
        options,
    )?;
    debug!(
        model = %model,
        evaluations = solution.stats.evaluations,
        accepted = solution.stats.accepted_steps,
        rejected = solution.stats.rejected_steps,
        "model integrated"
    );

    Ok(Trajectory {
        model,
        temperatures: solution.values,
        stats: solution.stats,
    })
}

/// Run both models with a shared initial condition and coefficient set.
pub fn run_comparison(config: &SimulationConfig) -> Result<DecayComparison> {
    ensure_positive("initial_temperature", config.initial_temperature)?;

    let coefficients = config.constants.coefficients();
    info!(
        a = coefficients.a,
        b = coefficients.b,
        t0 = coefficients.t0,
        "derived coefficients"
    );

    let times = linspace(config.t_start, config.t_end, config.samples)?;
    let full = integrate_model(
        CoolingModel::Full,
        &coefficients,
        config.initial_temperature,
        &times,
        &config.solver,
    )?;
    let fourier = integrate_model(
        CoolingModel::Fourier,
        &coefficients,
        config.initial_temperature,
        &times,
        &config.solver,
    )?;

    let metrics = compute_metrics(
        &times,
        &full.temperatures,
        &fourier.temperatures,
        coefficients.t0,
    );
    if let Some(m) = &metrics {
        info!(
            max_gap = m.max_gap,
            max_gap_time = m.max_gap_time,
            final_full = m.final_full,
            final_fourier = m.final_fourier,
            "comparison complete"
        );
    }

    Ok(DecayComparison {
        coefficients,
        initial_temperature: config.initial_temperature,
        times,
        full,
        fourier,
        metrics,
    })
}
