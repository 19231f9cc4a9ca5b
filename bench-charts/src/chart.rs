//! Chart definitions and JSON payloads for the canvas chart backend.

use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Series colours, cycled in row order.
const PALETTE: [&str; 6] = ["#1f77b4", "#2ca02c", "#ff7f0e", "#d62728", "#9467bd", "#8c564b"];

/// One measured variant as seen by the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    /// Variant label shown on the category axis and in the trade-off legend.
    pub label: String,
    /// Quality score (Poisson log loss, lower is better).
    pub quality: f64,
    /// Single-inference latency in milliseconds.
    pub latency_ms: f64,
    /// On-disk footprint in megabytes.
    pub size_mb: f64,
}

/// The four charts of a comparison report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Quality score by variant.
    Quality,
    /// Latency by variant.
    Latency,
    /// Footprint by variant.
    Size,
    /// Quality against latency.
    Tradeoff,
}

impl ChartKind {
    /// All charts, in the order they are rendered and written.
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Quality,
        ChartKind::Latency,
        ChartKind::Size,
        ChartKind::Tradeoff,
    ];

    /// Output file name for this chart.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Quality => "accuracy_comparison.png",
            Self::Latency => "latency_comparison.png",
            Self::Size => "model_size_comparison.png",
            Self::Tradeoff => "quality_vs_latency.png",
        }
    }

    /// Chart title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Quality => "Accuracy Comparison",
            Self::Latency => "Latency Comparison",
            Self::Size => "Model Size Comparison",
            Self::Tradeoff => "Quality vs Latency Trade-off (Pareto Curve)",
        }
    }

    /// Backend chart type name.
    pub fn chart_type(self) -> &'static str {
        match self {
            Self::Tradeoff => "scatter",
            _ => "bar",
        }
    }

    fn y_label(self) -> &'static str {
        match self {
            Self::Quality | Self::Tradeoff => "Poisson Log Loss (lower = better)",
            Self::Latency => "Latency (ms per inference)",
            Self::Size => "Model Size (MB)",
        }
    }

    /// Value plotted for a row on a bar chart; `None` for the scatter chart.
    fn bar_value(self, row: &ChartRow) -> Option<f64> {
        match self {
            Self::Quality => Some(row.quality),
            Self::Latency => Some(row.latency_ms),
            Self::Size => Some(row.size_mb),
            Self::Tradeoff => None,
        }
    }
}

/// Build the backend JSON payload for `kind` from `rows`, preserving order.
///
/// Bar charts carry the variant names as category ticks (`x_labels`). The
/// trade-off chart has one named series per variant so the legend names
/// every point.
///
/// # Errors
///
/// Returns [`ChartError::Empty`] when `rows` is empty and
/// [`ChartError::InvalidValue`] when a plotted value is not finite.
pub fn chart_payload(kind: ChartKind, rows: &[ChartRow]) -> Result<Value> {
    if rows.is_empty() {
        return Err(ChartError::Empty);
    }
    validate_rows(rows)?;

    let payload = match kind {
        ChartKind::Tradeoff => {
            let series: Vec<Value> = rows
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    json!({
                        "name": r.label,
                        "color": color(i),
                        "points": [{ "x": r.latency_ms, "y": r.quality, "label": r.label }],
                    })
                })
                .collect();
            json!({
                "title": kind.title(),
                "series": series,
                "x_label": "Latency (ms)",
                "y_label": kind.y_label(),
            })
        }
        _ => {
            let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
            let points: Vec<Value> = rows
                .iter()
                .enumerate()
                .filter_map(|(i, r)| {
                    kind.bar_value(r)
                        .map(|v| json!({ "x": i, "y": v, "label": r.label }))
                })
                .collect();
            json!({
                "title": kind.title(),
                "x_labels": labels,
                "series": [{ "name": kind.y_label(), "color": color(0), "points": points }],
                "y_label": kind.y_label(),
                "show_legend": false,
            })
        }
    };
    Ok(payload)
}

fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn validate_rows(rows: &[ChartRow]) -> Result<()> {
    for row in rows {
        for (field, value) in [
            ("quality", row.quality),
            ("latency", row.latency_ms),
            ("size", row.size_mb),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidValue(format!(
                    "{} {field} is {value}",
                    row.label
                )));
            }
        }
    }
    Ok(())
}
