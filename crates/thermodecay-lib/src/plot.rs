//! Static SVG line chart of the two trajectories.
//!
//! The chart is assembled as a string in a fixed viewBox: one polyline per
//! series, tick labels on both axes, axis titles, a legend and a title.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::CoolingModel;
use crate::simulation::DecayComparison;

/// Chart title.
pub const TITLE: &str = "Temperature Decay";
/// Horizontal axis label.
pub const X_LABEL: &str = "Time (s)";
/// Vertical axis label.
pub const Y_LABEL: &str = "Temperature (K)";

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const PLOT_LEFT: f64 = 90.0;
const PLOT_RIGHT: f64 = WIDTH - 30.0;
const PLOT_TOP: f64 = 60.0;
const PLOT_BOTTOM: f64 = HEIGHT - 70.0;
const TARGET_TICKS: usize = 6;

/// One line on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: &'static str,
    pub points: Vec<(f64, f64)>,
}

/// Line colour for each model.
pub fn model_color(model: CoolingModel) -> &'static str {
    match model {
        CoolingModel::Full => "#1f77b4",
        CoolingModel::Fourier => "#ff7f0e",
    }
}

/// Series for both models of a comparison, in legend order.
pub fn comparison_series(comparison: &DecayComparison) -> Vec<Series> {
    CoolingModel::ALL
        .iter()
        .map(|&model| Series {
            label: model.label().to_string(),
            color: model_color(model),
            points: comparison
                .times
                .iter()
                .copied()
                .zip(comparison.trajectory(model).temperatures.iter().copied())
                .collect(),
        })
        .collect()
}

/// Render the comparison chart as an SVG document.
pub fn render_svg(comparison: &DecayComparison) -> String {
    render_chart(&comparison_series(comparison), TITLE, X_LABEL, Y_LABEL)
}

/// Render the comparison chart and write it to `path`.
pub fn write_svg(comparison: &DecayComparison, path: &Path) -> Result<()> {
    fs::write(path, render_svg(comparison))?;
    info!(path = %path.display(), "chart written");
    Ok(())
}

/// Render arbitrary series with the given title and axis labels.
pub fn render_chart(series: &[Series], title: &str, x_label: &str, y_label: &str) -> String {
    let (x_min, x_max) = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)));
    let (y_min, y_max) = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
    let x_ticks = nice_ticks(x_min, x_max, TARGET_TICKS);
    let y_ticks = nice_ticks(y_min, y_max, TARGET_TICKS);
    let (x_lo, x_hi) = tick_bounds(&x_ticks, x_min, x_max);
    let (y_lo, y_hi) = tick_bounds(&y_ticks, y_min, y_max);

    let to_x = |x: f64| PLOT_LEFT + (x - x_lo) / (x_hi - x_lo) * (PLOT_RIGHT - PLOT_LEFT);
    let to_y = |y: f64| PLOT_BOTTOM - (y - y_lo) / (y_hi - y_lo) * (PLOT_BOTTOM - PLOT_TOP);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" font-family="sans-serif" role="img">"#
    );
    let _ = writeln!(svg, "<title>{}</title>", escape(title));
    let _ = writeln!(
        svg,
        r#"<rect x="0" y="0" width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="35" font-size="20" text-anchor="middle">{}</text>"#,
        (PLOT_LEFT + PLOT_RIGHT) / 2.0,
        escape(title)
    );

    // Grid and ticks
    for &tick in x_ticks.iter().filter(|t| **t >= x_lo && **t <= x_hi) {
        let x = to_x(tick);
        let _ = writeln!(
            svg,
            r##"<line x1="{x:.1}" y1="{PLOT_TOP:.1}" x2="{x:.1}" y2="{PLOT_BOTTOM:.1}" stroke="#e0e0e0"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
            PLOT_BOTTOM + 18.0,
            format_tick(tick)
        );
    }
    for &tick in y_ticks.iter().filter(|t| **t >= y_lo && **t <= y_hi) {
        let y = to_y(tick);
        let _ = writeln!(
            svg,
            r##"<line x1="{PLOT_LEFT:.1}" y1="{y:.1}" x2="{PLOT_RIGHT:.1}" y2="{y:.1}" stroke="#e0e0e0"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="end">{}</text>"#,
            PLOT_LEFT - 8.0,
            y + 4.0,
            format_tick(tick)
        );
    }

    // Axes
    let _ = writeln!(
        svg,
        r#"<rect x="{PLOT_LEFT:.1}" y="{PLOT_TOP:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
        PLOT_RIGHT - PLOT_LEFT,
        PLOT_BOTTOM - PLOT_TOP
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle">{}</text>"#,
        (PLOT_LEFT + PLOT_RIGHT) / 2.0,
        HEIGHT - 25.0,
        escape(x_label)
    );
    let y_mid = (PLOT_TOP + PLOT_BOTTOM) / 2.0;
    let _ = writeln!(
        svg,
        r#"<text x="25" y="{y_mid:.1}" font-size="14" text-anchor="middle" transform="rotate(-90 25 {y_mid:.1})">{}</text>"#,
        escape(y_label)
    );

    // Series
    for s in series {
        let points = s
            .points
            .iter()
            .map(|&(x, y)| format!("{:.2},{:.2}", to_x(x), to_y(y)))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            svg,
            r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            s.color, points
        );
    }

    // Legend
    let legend_x = PLOT_RIGHT - 130.0;
    for (i, s) in series.iter().enumerate() {
        let y = PLOT_TOP + 20.0 + i as f64 * 20.0;
        let _ = writeln!(
            svg,
            r#"<line x1="{legend_x:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{}" stroke-width="2"/>"#,
            legend_x + 30.0,
            s.color
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="13">{}</text>"#,
            legend_x + 38.0,
            y + 4.0,
            escape(&s.label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Data range, widened by one unit on each side when it collapses to a point.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max - min < f64::EPSILON * max.abs().max(1.0) {
        return (min - 1.0, max + 1.0);
    }
    (min, max)
}

/// Axis bounds: the outermost ticks enclosing the data.
fn tick_bounds(ticks: &[f64], min: f64, max: f64) -> (f64, f64) {
    match (ticks.first(), ticks.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => (lo.min(min), hi.max(max)),
        _ => (min, max),
    }
}

/// Round tick positions covering `[min, max]` with a 1-2-5 step.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if min.is_nan() || max.is_nan() || max <= min || target == 0 {
        return vec![min];
    }
    let raw_step = (max - min) / target as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    let step = magnitude
        * if normalized < 1.5 {
            1.0
        } else if normalized < 3.0 {
            2.0
        } else if normalized < 7.0 {
            5.0
        } else {
            10.0
        };

    let first = (min / step).floor() as i64;
    let last = (max / step).ceil() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

fn format_tick(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
