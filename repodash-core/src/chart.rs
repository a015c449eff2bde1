//! Chart.js configuration objects
//!
//! The charting library is an external collaborator: this module only decides
//! which declarative configuration is handed to `new Chart(el, config)`.

use crate::model::FileType;
use serde::Serialize;

/// Doughnut slice colors; Chart.js cycles them past the seventh category
pub const FILE_TYPE_PALETTE: [&str; 7] = [
    "#59d1c9", "#f6ae2d", "#7c9cff", "#9f6fff", "#f96d9c", "#61c9f6", "#c7d36f",
];

const TREND_BORDER: &str = "#59d1c9";
const TREND_FILL: &str = "rgba(89, 209, 201, 0.15)";
const TREND_TENSION: f64 = 0.35;
const TREND_POINT_RADIUS: f64 = 2.0;
const AXIS_TICK: &str = "#9aa4b2";
const AXIS_GRID: &str = "rgba(255,255,255,0.05)";
const LEGEND_LABEL: &str = "#f4f6fb";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<Option<String>>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    pub background_color: Colors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f64>,
}

/// A single color or one color per data point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Colors {
    Single(String),
    Palette(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub responsive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
    pub plugins: Plugins,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub ticks: ColorOption,
    pub grid: ColorOption,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorOption {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub labels: ColorOption,
}

impl ColorOption {
    fn new(color: &str) -> Self {
        ColorOption {
            color: color.to_string(),
        }
    }
}

impl Axis {
    fn styled() -> Self {
        Axis {
            ticks: ColorOption::new(AXIS_TICK),
            grid: ColorOption::new(AXIS_GRID),
        }
    }
}

impl Plugins {
    fn styled() -> Self {
        Plugins {
            legend: Legend {
                labels: ColorOption::new(LEGEND_LABEL),
            },
        }
    }
}

impl ChartConfig {
    /// Serialize for embedding in a `<script>` block
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn labels(&self) -> &[Option<String>] {
        &self.data.labels
    }

    /// Points of the first dataset
    pub fn points(&self) -> &[Option<f64>] {
        self.data
            .datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[])
    }
}

/// Smoothed, filled line chart with one named series over `labels`
pub fn trend_chart(
    labels: &[Option<String>],
    values: &[Option<f64>],
    series_name: &str,
) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels: labels.to_vec(),
            datasets: vec![Dataset {
                label: Some(series_name.to_string()),
                data: values.to_vec(),
                border_color: Some(TREND_BORDER.to_string()),
                background_color: Colors::Single(TREND_FILL.to_string()),
                border_width: None,
                tension: Some(TREND_TENSION),
                fill: Some(true),
                point_radius: Some(TREND_POINT_RADIUS),
            }],
        },
        options: ChartOptions {
            responsive: true,
            scales: Some(Scales {
                x: Axis::styled(),
                y: Axis::styled(),
            }),
            plugins: Plugins::styled(),
        },
    }
}

/// Doughnut chart of file counts per extension, in input order
pub fn file_types_chart(file_types: &[FileType]) -> ChartConfig {
    let labels = file_types.iter().map(|t| t.extension.clone()).collect();
    let values = file_types.iter().map(|t| t.files).collect();

    ChartConfig {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels,
            datasets: vec![Dataset {
                label: None,
                data: values,
                border_color: None,
                background_color: Colors::Palette(
                    FILE_TYPE_PALETTE.iter().map(|c| c.to_string()).collect(),
                ),
                border_width: Some(0.0),
                tension: None,
                fill: None,
                point_radius: None,
            }],
        },
        options: ChartOptions {
            responsive: true,
            scales: None,
            plugins: Plugins::styled(),
        },
    }
}
