//! Renderer-facing chart document (Chart.js configuration shape).

use serde::Serialize;

use crate::chart_data::DerivedSeries;
use crate::chart_spec::{ChartKind, ChartSpec, LegendPosition};
use crate::palette::Rgba;

const DEFAULT_ASPECT_RATIO: f64 = 2.0;
const DEFAULT_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub data: RenderData,
    pub options: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderData {
    pub labels: Vec<String>,
    pub datasets: Vec<RenderDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Vec<Rgba>,
    pub border_color: Vec<Rgba>,
    pub border_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub aspect_ratio: f64,
    pub plugins: Plugins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
    pub datalabels: DataLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub display: bool,
    pub position: LegendPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataLabels {
    pub display: bool,
    pub color: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub weight: String,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scales {
    Cartesian { x: XScale, y: YScale },
    Radial { r: RadialScale },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YScale {
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacked: Option<bool>,
    pub title: AxisTitle,
    pub grid: Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XScale {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacked: Option<bool>,
    pub grid: Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadialScale {
    pub begin_at_zero: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub display: bool,
}

impl RenderSpec {
    /// Combine a chart's display options with its derived series.
    pub fn build(spec: &ChartSpec, series: &DerivedSeries) -> Self {
        let options = &spec.options;
        let begin_at_zero = options.begin_at_zero.unwrap_or(true);
        let stacked = options.stacked.unwrap_or(false);
        // zero or NaN means "unset"
        let aspect_ratio = options
            .aspect_ratio
            .filter(|ratio| *ratio != 0.0 && !ratio.is_nan());
        let grid = Grid {
            display: options.show_grid_lines,
        };
        let y_scale = |stacked: Option<bool>| YScale {
            begin_at_zero,
            stacked,
            title: AxisTitle {
                display: options.axis_title.as_deref().is_some_and(|t| !t.is_empty()),
                text: options.axis_title.clone().unwrap_or_default(),
            },
            grid: grid.clone(),
        };

        let scales = match spec.kind {
            ChartKind::Bar | ChartKind::Line => Some(Scales::Cartesian {
                x: XScale {
                    stacked: Some(stacked),
                    grid: grid.clone(),
                },
                y: y_scale(Some(stacked)),
            }),
            ChartKind::Scatter | ChartKind::Bubble => Some(Scales::Cartesian {
                x: XScale {
                    stacked: None,
                    grid: grid.clone(),
                },
                y: y_scale(None),
            }),
            ChartKind::Radar | ChartKind::PolarArea => Some(Scales::Radial {
                r: RadialScale { begin_at_zero },
            }),
            ChartKind::Pie | ChartKind::Doughnut => None,
        };

        Self {
            kind: spec.kind,
            title: spec.title.clone(),
            data: RenderData {
                labels: series.labels.clone(),
                datasets: vec![RenderDataset {
                    label: series.label.clone(),
                    data: series.values.clone(),
                    background_color: series.colors.iter().map(|c| c.fill).collect(),
                    border_color: series.colors.iter().map(|c| c.border).collect(),
                    border_width: 1,
                }],
            },
            options: RenderOptions {
                responsive: true,
                maintain_aspect_ratio: aspect_ratio.is_some(),
                aspect_ratio: aspect_ratio.unwrap_or(DEFAULT_ASPECT_RATIO),
                plugins: Plugins {
                    legend: Legend {
                        display: options.show_legend,
                        position: options.legend_position.unwrap_or_default(),
                    },
                    datalabels: DataLabels {
                        display: options.show_data_labels,
                        color: "#333".to_string(),
                        font: Font {
                            weight: "bold".to_string(),
                            size: options.font_size.unwrap_or(DEFAULT_FONT_SIZE),
                        },
                    },
                },
                scales,
                cutout: (spec.kind == ChartKind::Doughnut).then(|| "50%".to_string()),
            },
        }
    }
}
