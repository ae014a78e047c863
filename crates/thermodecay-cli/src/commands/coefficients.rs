//! Coefficients command handler for printing the derived model coefficients.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use thermodecay_cli::output::{coefficients_json, coefficients_text};
use thermodecay_cli::terminal::ColorPalette;
use thermodecay_lib::{PhysicalConstants, ReportFormat};

/// Arguments for the coefficients command.
#[derive(Args, Debug, Clone)]
pub struct CoefficientsArgs {
    /// JSON file overriding some or all physical constants.
    #[arg(long)]
    pub constants: Option<PathBuf>,
    /// Output format: text or json.
    #[arg(long, default_value = "text")]
    pub format: ReportFormat,
}

/// Handle the coefficients subcommand.
pub fn handle_coefficients(args: &CoefficientsArgs, palette: &ColorPalette) -> Result<()> {
    let constants = load_constants(args.constants.as_deref())?;
    let coefficients = constants.coefficients();

    match args.format {
        ReportFormat::Text => print!("{}", coefficients_text(&constants, &coefficients, palette)),
        ReportFormat::Json => print!("{}", coefficients_json(&constants, &coefficients)?),
        ReportFormat::Csv => bail!("the coefficients command supports text or json output"),
    }
    Ok(())
}

/// Load physical constants from `path`, or the built-in literals when absent.
pub fn load_constants(path: Option<&Path>) -> Result<PhysicalConstants> {
    match path {
        Some(path) => PhysicalConstants::from_path(path)
            .with_context(|| format!("failed to load physical constants from {}", path.display())),
        None => Ok(PhysicalConstants::default()),
    }
}
