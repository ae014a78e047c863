//! Output formatting for the CLI.
//!
//! The library renders reports as plain text; this module adds terminal
//! styling on top and formats the `coefficients` command.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use thermodecay_lib::{Coefficients, PhysicalConstants};

use crate::terminal::ColorPalette;

/// Labels of the summary lines the library's text report emits.
const SUMMARY_LABELS: [&str; 4] = [
    "Initial temperature",
    "Final temperature",
    "Largest gap",
    "Half-excess time",
];

/// Apply terminal colors to a plain text report.
///
/// The coefficient tuple stays on the first line and keeps its exact text
/// between the escape codes.
pub fn style_text_report(report: &str, palette: &ColorPalette) -> String {
    let mut buffer = String::new();
    for (index, line) in report.lines().enumerate() {
        let styled = if index == 0 {
            palette.paint(palette.white_bold, line)
        } else if line.starts_with("Solver [") {
            palette.paint(palette.gray, line)
        } else if line.trim_start().starts_with("Time (s)") {
            palette.paint(palette.cyan, line)
        } else if let Some((label, rest)) = line.split_once(':') {
            if SUMMARY_LABELS.contains(&label) {
                format!("{}:{}", palette.paint(palette.cyan, label), rest)
            } else {
                line.to_string()
            }
        } else {
            line.to_string()
        };
        let _ = writeln!(buffer, "{styled}");
    }
    buffer
}

/// Notice printed after the chart file has been written.
pub fn chart_notice(path: &Path, palette: &ColorPalette) -> String {
    format!(
        "{} {} ({} = Full, {} = Fourier)",
        palette.paint(palette.green, "Chart written to"),
        path.display(),
        palette.paint(palette.blue, "blue"),
        palette.paint(palette.orange, "orange"),
    )
}

#[derive(Debug, Serialize)]
struct CoefficientReport<'a> {
    a: f64,
    b: f64,
    t0: f64,
    heat_capacity: f64,
    thermal_conductance: f64,
    constants: &'a PhysicalConstants,
}

/// Human-readable coefficient listing, starting with the `(A, B, T0)` tuple.
pub fn coefficients_text(
    constants: &PhysicalConstants,
    coefficients: &Coefficients,
    palette: &ColorPalette,
) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{}",
        palette.paint(palette.white_bold, &coefficients.to_string())
    );
    let rows = [
        ("A (radiative)", format!("{:e} K^-3 s^-1", coefficients.a)),
        ("B (conductive)", format!("{:?}", coefficients.b)),
        ("T0 (ambient)", format!("{:?} K", coefficients.t0)),
        ("Heat capacity", format!("{:?} J/K", constants.heat_capacity())),
        (
            "Thermal conductance",
            format!("{:?} W/K", constants.thermal_conductance()),
        ),
    ];
    for (label, value) in rows {
        let _ = writeln!(
            buffer,
            "{}{:width$} {}",
            palette.paint(palette.cyan, label),
            ":",
            value,
            width = 20 - label.len()
        );
    }
    buffer
}

/// Coefficients with their derived quantities as pretty JSON.
pub fn coefficients_json(
    constants: &PhysicalConstants,
    coefficients: &Coefficients,
) -> Result<String> {
    let report = CoefficientReport {
        a: coefficients.a,
        b: coefficients.b,
        t0: coefficients.t0,
        heat_capacity: constants.heat_capacity(),
        thermal_conductance: constants.thermal_conductance(),
        constants,
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const REPORT: &str = "(0.5, 0.25, 300.0)\n\
Largest gap: 1.000 K at t = 2.00 s\n\
Solver [Full]: 10 evaluations, 1 accepted / 0 rejected steps\n\
\n\
  Time (s)       Full (K)\n";

    #[test]
    fn plain_styling_leaves_report_untouched() {
        let styled = style_text_report(REPORT, &ColorPalette::plain());
        assert_eq!(styled, REPORT);
    }

    #[test]
    fn colored_styling_keeps_tuple_text() {
        let palette = ColorPalette::colored();
        let styled = style_text_report(REPORT, &palette);
        let first = styled.lines().next().unwrap();
        assert_eq!(first, "\x1b[1;97m(0.5, 0.25, 300.0)\x1b[0m");
        assert!(styled.contains("\x1b[36mLargest gap\x1b[0m: 1.000 K"));
        assert!(styled.contains("\x1b[90mSolver [Full]"));
    }

    #[test]
    fn chart_notice_names_path() {
        let notice = chart_notice(&PathBuf::from("out.svg"), &ColorPalette::plain());
        assert_eq!(
            notice,
            "Chart written to out.svg (blue = Full, orange = Fourier)"
        );
    }

    #[test]
    fn coefficient_listing_starts_with_tuple() {
        let constants = PhysicalConstants::default();
        let text = coefficients_text(
            &constants,
            &constants.coefficients(),
            &ColorPalette::plain(),
        );
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("(1.1985365853658537e-11, 0.09999999999999999, 300.0)")
        );
        assert_eq!(
            lines.next(),
            Some("A (radiative):       1.1985365853658537e-11 K^-3 s^-1")
        );
        assert!(text.contains("Heat capacity:       12.299999999999999 J/K"));
    }

    #[test]
    fn coefficient_json_includes_constants() {
        let constants = PhysicalConstants::default();
        let json = coefficients_json(&constants, &constants.coefficients()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["t0"], 300.0);
        assert_eq!(value["constants"]["support_length"], 0.1);
        assert!(value["a"].as_f64().unwrap() > 0.0);
    }
}
