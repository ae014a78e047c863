//! Simulate command handler: integrate both cooling models, report and plot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use thermodecay_cli::output::{chart_notice, style_text_report};
use thermodecay_cli::terminal::ColorPalette;
use thermodecay_lib::constants::{INITIAL_TEMPERATURE_K, SAMPLE_COUNT, T_END_S, T_START_S};
use thermodecay_lib::{
    render_report, run_comparison, write_svg, PhysicalConstants, ReportFormat, SimulationConfig,
    SolverOptions,
};

use crate::commands::coefficients::load_constants;

/// Chart file written when `--plot` is not given.
pub const DEFAULT_PLOT_PATH: &str = "temperature_decay.svg";

/// Arguments for the simulate command.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Starting temperature shared by both models (K).
    #[arg(long = "initial-temp", default_value_t = INITIAL_TEMPERATURE_K)]
    pub initial_temp: f64,
    /// End of the integration span (s).
    #[arg(long = "t-end", default_value_t = T_END_S)]
    pub t_end: f64,
    /// Number of evenly spaced samples, endpoints included.
    #[arg(long, default_value_t = SAMPLE_COUNT)]
    pub samples: usize,
    /// Relative tolerance of the adaptive solver.
    #[arg(long)]
    pub rtol: Option<f64>,
    /// Absolute tolerance of the adaptive solver (K).
    #[arg(long)]
    pub atol: Option<f64>,
    /// Largest step the solver may take (s).
    #[arg(long = "max-step")]
    pub max_step: Option<f64>,
    /// JSON file overriding some or all physical constants.
    #[arg(long)]
    pub constants: Option<PathBuf>,
    /// Where to write the SVG chart.
    #[arg(long, default_value = DEFAULT_PLOT_PATH, conflicts_with = "no_plot")]
    pub plot: PathBuf,
    /// Skip writing the chart.
    #[arg(long = "no-plot")]
    pub no_plot: bool,
    /// Report format: text, json or csv.
    #[arg(long, default_value = "text")]
    pub format: ReportFormat,
    /// Include the per-sample table in the text report.
    #[arg(long)]
    pub table: bool,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            initial_temp: INITIAL_TEMPERATURE_K,
            t_end: T_END_S,
            samples: SAMPLE_COUNT,
            rtol: None,
            atol: None,
            max_step: None,
            constants: None,
            plot: PathBuf::from(DEFAULT_PLOT_PATH),
            no_plot: false,
            format: ReportFormat::Text,
            table: false,
        }
    }
}

impl SimulateArgs {
    /// Build the library configuration, overriding solver defaults only where given.
    pub fn to_config(&self, constants: PhysicalConstants) -> SimulationConfig {
        let defaults = SolverOptions::default();
        SimulationConfig {
            constants,
            initial_temperature: self.initial_temp,
            t_start: T_START_S,
            t_end: self.t_end,
            samples: self.samples,
            solver: SolverOptions {
                rtol: self.rtol.unwrap_or(defaults.rtol),
                atol: self.atol.unwrap_or(defaults.atol),
                max_step: self.max_step.or(defaults.max_step),
                ..defaults
            },
        }
    }
}

/// Handle the simulate subcommand.
pub fn handle_simulate(args: &SimulateArgs, palette: &ColorPalette) -> Result<()> {
    let constants = load_constants(args.constants.as_deref())?;
    let config = args.to_config(constants);
    debug!(?config, "simulation configuration");

    let comparison = run_comparison(&config).context("temperature decay comparison failed")?;

    if !args.no_plot {
        write_svg(&comparison, &args.plot)
            .with_context(|| format!("failed to write chart to {}", args.plot.display()))?;
    }

    let report = render_report(&comparison, args.format, args.table)
        .with_context(|| format!("failed to render {} report", args.format.label()))?;

    match args.format {
        ReportFormat::Text => {
            print!("{}", style_text_report(&report, palette));
            if !args.no_plot {
                println!("{}", chart_notice(&args.plot, palette));
            }
        }
        ReportFormat::Json | ReportFormat::Csv => print!("{report}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args_match_library_defaults() {
        let config = SimulateArgs::default().to_config(PhysicalConstants::default());
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn solver_overrides_apply() {
        let args = SimulateArgs {
            rtol: Some(1e-9),
            max_step: Some(0.25),
            ..SimulateArgs::default()
        };
        let config = args.to_config(PhysicalConstants::default());
        assert_eq!(config.solver.rtol, 1e-9);
        assert_eq!(config.solver.atol, SolverOptions::default().atol);
        assert_eq!(config.solver.max_step, Some(0.25));
    }
}
