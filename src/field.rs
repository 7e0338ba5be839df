//! Field metadata and semantic type inference.
//!
//! A field's type is decided once, at load time, from its column name and a
//! single sample value (the first row's value). Name keywords win over the
//! sample: a column called "Order Date" is a date no matter what it holds.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::dataset::Scalar;

const DATE_KEYWORDS: &[&str] = &["date", "time", "year", "month", "day"];

const MEASURE_KEYWORDS: &[&str] = &[
    "amount", "price", "cost", "revenue", "profit", "sales", "qty", "quantity", "count", "total",
    "sum", "avg", "average", "min", "max",
];

/// Formats tried, in order, when rendering a date-typed text value.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

fn keyword_pattern(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).expect("keyword alternation is a valid pattern")
}

static DATE_NAME: LazyLock<Regex> = LazyLock::new(|| keyword_pattern(DATE_KEYWORDS));
static MEASURE_NAME: LazyLock<Regex> = LazyLock::new(|| keyword_pattern(MEASURE_KEYWORDS));

/// Semantic role of a column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Categorical or free text; the fallback for anything unrecognized.
    #[default]
    Dimension,
    /// Numeric quantity that can be summed or averaged.
    Measure,
    Date,
}

impl FieldType {
    pub const ALL: [Self; 3] = [Self::Dimension, Self::Measure, Self::Date];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dimension => "dimension",
            Self::Measure => "measure",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column of the loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Original column position.
    pub index: usize,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, index: usize) -> Self {
        Self {
            name: name.into(),
            field_type,
            index,
        }
    }

    /// Build a field by running type inference over its name and sample value.
    pub fn infer(name: impl Into<String>, sample: &Scalar, index: usize) -> Self {
        let name = name.into();
        let field_type = infer_field_type(&name, sample);
        Self {
            name,
            field_type,
            index,
        }
    }

    pub fn is_dimension(&self) -> bool {
        self.field_type == FieldType::Dimension
    }

    pub fn is_measure(&self) -> bool {
        self.field_type == FieldType::Measure
    }

    pub fn is_date(&self) -> bool {
        self.field_type == FieldType::Date
    }
}

/// Infer the semantic type of a column. First match wins:
/// 1. name contains a date keyword -> `Date`
/// 2. sample is numeric, or name contains a measure keyword -> `Measure`
/// 3. otherwise -> `Dimension`
///
/// Keyword matching is a case-insensitive substring match, so "Mindset"
/// matches "min" and becomes a measure. That is accepted.
pub fn infer_field_type(column_name: &str, sample: &Scalar) -> FieldType {
    if DATE_NAME.is_match(column_name) {
        FieldType::Date
    } else if sample.is_number() || MEASURE_NAME.is_match(column_name) {
        FieldType::Measure
    } else {
        FieldType::Dimension
    }
}

/// Fields of the given type, in their original order.
pub fn filter_fields_by_type(fields: &[Field], field_type: FieldType) -> Vec<&Field> {
    fields
        .iter()
        .filter(|f| f.field_type == field_type)
        .collect()
}

/// Fields whose name contains `term` (case-insensitive). An empty term matches everything.
pub fn search_fields<'a>(fields: &'a [Field], term: &str) -> Vec<&'a Field> {
    let q = term.trim().to_lowercase();
    if q.is_empty() {
        return fields.iter().collect();
    }
    fields
        .iter()
        .filter(|f| f.name.to_lowercase().contains(&q))
        .collect()
}

/// Human-readable rendering of a value according to its field's type.
pub fn format_field_value(value: &Scalar, field: &Field) -> String {
    match (value, field.field_type) {
        (Scalar::Null, _) => "—".to_string(),
        (Scalar::Number(n), FieldType::Measure) => format_grouped(*n),
        (Scalar::Text(s), FieldType::Date) => parse_date_text(s)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| s.clone()),
        (other, _) => other.label(),
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Thousands-separated number with at most three fraction digits.
fn format_grouped(n: f64) -> String {
    if !n.is_finite() {
        return Scalar::Number(n).label();
    }
    let rounded = format!("{:.3}", n.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = n < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
