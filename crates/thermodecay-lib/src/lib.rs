//! Thermodecay library entry points.
//!
//! This crate derives the cooling coefficients of a small heated body, integrates
//! the full (radiation plus conduction) and Fourier (conduction only) cooling
//! laws over a shared time grid, and renders the two trajectories as reports
//! and SVG charts. The CLI should only depend on the functions exported here
//! instead of reimplementing behavior.

#![deny(warnings)]

pub mod coefficients;
pub mod constants;
pub mod error;
pub mod integrator;
pub mod metrics;
pub mod models;
pub mod output;
pub mod plot;
pub mod simulation;
pub mod time_grid;

pub use coefficients::{Coefficients, PhysicalConstants};
pub use error::{Error, Result};
pub use integrator::{solve_ivp, Solution, SolverOptions, SolverStats};
pub use metrics::{compute_metrics, is_strictly_decreasing, ComparisonMetrics};
pub use models::{fourier_rate, full_rate, CoolingModel};
pub use output::{render_report, ReportFormat};
pub use plot::{render_svg, write_svg};
pub use simulation::{
    integrate_model, run_comparison, DecayComparison, SimulationConfig, Trajectory,
};
pub use time_grid::linspace;
