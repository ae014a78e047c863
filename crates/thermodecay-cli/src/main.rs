mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use thermodecay_cli::terminal::ColorPalette;

use crate::commands::coefficients::{handle_coefficients, CoefficientsArgs};
use crate::commands::simulate::{handle_simulate, SimulateArgs};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compare radiative and linearised cooling of a small thermal mass"
)]
struct Cli {
    /// Disable ANSI colors in text output.
    #[arg(long = "no-color", global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Integrate the Full and Fourier models, print the report and write the chart.
    Simulate(SimulateArgs),
    /// Print the derived coefficients (A, B, T0).
    Coefficients(CoefficientsArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let palette = ColorPalette::resolve(cli.no_color);

    match cli.command {
        Some(Command::Simulate(args)) => handle_simulate(&args, &palette),
        Some(Command::Coefficients(args)) => handle_coefficients(&args, &palette),
        None => handle_simulate(&SimulateArgs::default(), &palette),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
