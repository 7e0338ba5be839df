//! Chart binding configuration: which field plays which role, the chart kind,
//! and display options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::dataset::{Dataset, Row};
use crate::field::Field;
use crate::palette::{PaletteSet, DEFAULT_PALETTE};

/// Raised when a string names no known option value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {option} '{value}' (expected one of: {expected})")]
pub struct UnknownOption {
    pub option: &'static str,
    pub value: String,
    pub expected: String,
}

/// How the y values of one label are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Scatter,
    Doughnut,
    PolarArea,
    Radar,
    Bubble,
}

impl ChartKind {
    pub const ALL: [Self; 8] = [
        Self::Bar,
        Self::Line,
        Self::Pie,
        Self::Scatter,
        Self::Doughnut,
        Self::PolarArea,
        Self::Radar,
        Self::Bubble,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Scatter => "scatter",
            Self::Doughnut => "doughnut",
            Self::PolarArea => "polarArea",
            Self::Radar => "radar",
            Self::Bubble => "bubble",
        }
    }

    /// Pie slices show totals; every other kind plots the per-label mean.
    pub fn aggregation(self) -> Aggregation {
        match self {
            Self::Pie => Aggregation::Sum,
            _ => Aggregation::Mean,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOption {
                option: "chart kind",
                value: s.to_string(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Top,
    Right,
    Bottom,
    Left,
}

impl LegendPosition {
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl FromStr for LegendPosition {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOption {
                option: "legend position",
                value: s.to_string(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

/// Role a field can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    X,
    Y,
    Color,
    Filter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x-axis",
            Self::Y => "y-axis",
            Self::Color => "color",
            Self::Filter => "filter",
        })
    }
}

/// Unique chart identifier (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(String);

impl ChartId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ChartId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChartId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Presentation options passed through to the renderer. `None` means "use
/// the renderer's default".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOptions {
    pub show_legend: bool,
    pub show_data_labels: bool,
    pub show_grid_lines: bool,
    pub color_scheme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_position: Option<LegendPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_data_labels: false,
            show_grid_lines: true,
            color_scheme: DEFAULT_PALETTE.to_string(),
            axis_title: None,
            legend_position: None,
            begin_at_zero: None,
            stacked: None,
            font_size: None,
            aspect_ratio: None,
        }
    }
}

/// Equality filter on one field. A filter without a value is inactive: the
/// field has been attached but no value chosen yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: Field,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Problems found when checking a chart spec against a dataset. None of these
/// stop a chart from rendering; the affected binding is treated as unset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingIssue {
    #[error("{role} field '{name}' is not in the dataset")]
    UnknownField { role: Role, name: String },
    #[error("field '{name}' is filtered more than once")]
    DuplicateFilter { name: String },
    #[error("unknown color scheme '{name}', using '{DEFAULT_PALETTE}'")]
    UnknownColorScheme { name: String },
    #[error("font size must be positive, got {0}")]
    InvalidFontSize(f64),
    #[error("aspect ratio must be positive, got {0}")]
    InvalidAspectRatio(f64),
}

/// A chart's binding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub id: ChartId,
    pub title: String,
    pub kind: ChartKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Field>,
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
    pub options: DisplayOptions,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self::new("New Chart")
    }
}

/// An active equality filter resolved against the dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveFilter<'a> {
    pub field: &'a Field,
    pub value: &'a str,
}

/// The spec's bindings, resolved by name against a dataset. Anything naming a
/// field the dataset lacks is `None` (or dropped, for filters).
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings<'a> {
    pub x: Option<&'a Field>,
    pub y: Option<&'a Field>,
    pub color: Option<&'a Field>,
    pub filters: Vec<ActiveFilter<'a>>,
}

impl Bindings<'_> {
    /// True when the row satisfies every active filter.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters
            .iter()
            .all(|f| row.get(f.field).label() == f.value)
    }
}

impl ChartSpec {
    /// A fresh, unbound bar chart with default display options.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ChartId::new(),
            title: title.into(),
            kind: ChartKind::default(),
            x: None,
            y: None,
            color: None,
            filters: Vec::new(),
            options: DisplayOptions::default(),
        }
    }

    pub fn binding(&self, role: Role) -> Option<&Field> {
        match role {
            Role::X => self.x.as_ref(),
            Role::Y => self.y.as_ref(),
            Role::Color => self.color.as_ref(),
            Role::Filter => None,
        }
    }

    /// Resolve bindings by field name. The dataset's own field metadata is
    /// used, so a binding made against an older load picks up the current type.
    pub fn resolve<'a>(&'a self, dataset: &'a Dataset) -> Bindings<'a> {
        let lookup = |field: &Option<Field>| field.as_ref().and_then(|f| dataset.field(&f.name));
        let filters = self
            .filters
            .iter()
            .filter_map(|filter| {
                let value = filter.value.as_deref()?;
                let field = dataset.field(&filter.field.name)?;
                Some(ActiveFilter { field, value })
            })
            .collect();
        Bindings {
            x: lookup(&self.x),
            y: lookup(&self.y),
            color: lookup(&self.color),
            filters,
        }
    }

    /// Check the spec against a dataset and palette set.
    pub fn validate(&self, dataset: &Dataset, palettes: &PaletteSet) -> Vec<BindingIssue> {
        let mut issues = Vec::new();

        for role in [Role::X, Role::Y, Role::Color] {
            if let Some(field) = self.binding(role) {
                if dataset.field(&field.name).is_none() {
                    issues.push(BindingIssue::UnknownField {
                        role,
                        name: field.name.clone(),
                    });
                }
            }
        }

        let mut seen = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            let name = &filter.field.name;
            if dataset.field(name).is_none() {
                issues.push(BindingIssue::UnknownField {
                    role: Role::Filter,
                    name: name.clone(),
                });
            }
            if seen.contains(&name) {
                issues.push(BindingIssue::DuplicateFilter { name: name.clone() });
            } else {
                seen.push(name);
            }
        }

        let scheme = &self.options.color_scheme;
        if !scheme.is_empty() && !palettes.contains(scheme) {
            issues.push(BindingIssue::UnknownColorScheme {
                name: scheme.clone(),
            });
        }
        if let Some(size) = self.options.font_size {
            if size.is_nan() || size <= 0.0 {
                issues.push(BindingIssue::InvalidFontSize(size));
            }
        }
        if let Some(ratio) = self.options.aspect_ratio {
            if ratio.is_nan() || ratio <= 0.0 {
                issues.push(BindingIssue::InvalidAspectRatio(ratio));
            }
        }

        issues
    }
}
