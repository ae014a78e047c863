use std::fmt::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::simulation::DecayComparison;

/// Presentation style for turning a [`DecayComparison`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Coefficient tuple and a short summary, optionally followed by the sample table.
    Text,
    /// Pretty-printed JSON of the whole comparison.
    Json,
    /// `time_s,full_k,fourier_k` rows.
    Csv,
}

impl ReportFormat {
    /// Lower-case name used on the command line.
    pub fn label(self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!(
                "unknown report format '{other}' (expected text, json or csv)"
            )),
        }
    }
}

/// Render a comparison in the requested format.
///
/// `include_table` only affects [`ReportFormat::Text`].
pub fn render_report(
    comparison: &DecayComparison,
    format: ReportFormat,
    include_table: bool,
) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(comparison, include_table)),
        ReportFormat::Json => render_json(comparison),
        ReportFormat::Csv => render_csv(comparison),
    }
}

/// Human-readable report.
pub fn render_text(comparison: &DecayComparison, include_table: bool) -> String {
    let mut buffer = String::new();
    let _ = writeln!(buffer, "{}", comparison.coefficients);
    let _ = writeln!(
        buffer,
        "Initial temperature: {:.1} K, ambient: {:.1} K, {} samples over {:.1}-{:.1} s",
        comparison.initial_temperature,
        comparison.coefficients.t0,
        comparison.times.len(),
        comparison.times.first().copied().unwrap_or(0.0),
        comparison.times.last().copied().unwrap_or(0.0),
    );

    if let Some(m) = &comparison.metrics {
        let _ = writeln!(
            buffer,
            "Final temperature: Full {:.3} K, Fourier {:.3} K (gap {:.3} K)",
            m.final_full, m.final_fourier, m.final_gap
        );
        let _ = writeln!(
            buffer,
            "Largest gap: {:.3} K at t = {:.2} s",
            m.max_gap, m.max_gap_time
        );
        let _ = writeln!(
            buffer,
            "Half-excess time: Full {}, Fourier {}",
            format_optional_seconds(m.half_excess_time_full),
            format_optional_seconds(m.half_excess_time_fourier)
        );
    }

    for trajectory in [&comparison.full, &comparison.fourier] {
        let _ = writeln!(
            buffer,
            "Solver [{}]: {} evaluations, {} accepted / {} rejected steps",
            trajectory.model,
            trajectory.stats.evaluations,
            trajectory.stats.accepted_steps,
            trajectory.stats.rejected_steps
        );
    }

    if include_table {
        let _ = writeln!(buffer);
        let _ = writeln!(
            buffer,
            "{:>10} {:>14} {:>14} {:>10}",
            "Time (s)", "Full (K)", "Fourier (K)", "Gap (K)"
        );
        for (t, full, fourier) in comparison.rows() {
            let _ = writeln!(
                buffer,
                "{:>10.3} {:>14.4} {:>14.4} {:>10.4}",
                t,
                full,
                fourier,
                fourier - full
            );
        }
    }

    buffer
}

/// Pretty-printed JSON.
pub fn render_json(comparison: &DecayComparison) -> Result<String> {
    let mut json = serde_json::to_string_pretty(comparison)?;
    json.push('\n');
    Ok(json)
}

/// CSV with a header row.
pub fn render_csv(comparison: &DecayComparison) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["time_s", "full_k", "fourier_k"])?;
    for (t, full, fourier) in comparison.rows() {
        writer.serialize((t, full, fourier))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| {
        Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}

fn format_optional_seconds(value: Option<f64>) -> String {
    match value {
        Some(t) => format!("{:.2} s", t),
        None => "not reached".to_string(),
    }
}
