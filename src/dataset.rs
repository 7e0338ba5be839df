//! Typed, immutable tabular data: scalars, rows and the dataset that owns them.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::field::Field;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Number(f64),
    Text(String),
}

static NULL: Scalar = Scalar::Null;

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// String form used for grouping and labels. Nulls render as "null";
    /// whole numbers drop the fraction ("3", not "3.0").
    pub fn label(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        // also folds -0
        "0".to_string()
    } else if (1e-6..1e21).contains(&n.abs()) {
        n.to_string()
    } else {
        // exponent form outside the plain-decimal range: "1e+21", "1.5e-7"
        let exp = format!("{n:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Largest magnitude a text cell may have and still be read as a number;
/// beyond it integers lose precision and the cell is kept as text.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

static NUMERIC_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*-?(\d+\.?|\.\d+|\d+\.\d+)([eE][-+]?\d+)?\s*$")
        .expect("numeric cell pattern is valid")
});

impl Scalar {
    /// Type a raw cell as read from a delimited file. Empty cells are null,
    /// plain decimal numbers become numbers and everything else stays text
    /// exactly as written. Each cell is typed on its own, so one bad value
    /// never changes how its neighbours are read.
    pub fn from_cell(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Null;
        }
        if NUMERIC_CELL.is_match(raw) {
            if let Ok(n) = raw.trim().parse::<f64>() {
                if n.abs() < MAX_EXACT_INTEGER {
                    return Self::Number(n);
                }
            }
        }
        Self::Text(raw.to_string())
    }
}

/// Numeric value of a cell for aggregation. Numbers pass through, text is
/// parsed after trimming, and anything else (null, unparsable text, NaN)
/// counts as 0.
pub fn parse_numeric_or_zero(value: &Scalar) -> f64 {
    let n = match value {
        Scalar::Number(n) => *n,
        Scalar::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Scalar::Null => 0.0,
    };
    if n.is_nan() {
        0.0
    } else {
        n
    }
}

/// One row of a dataset, positionally aligned with the dataset's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Scalar>,
}

impl Row {
    /// Value for `field`, or null when the row has no cell at the field's position.
    pub fn get(&self, field: &Field) -> &Scalar {
        self.values.get(field.index).unwrap_or(&NULL)
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }
}

/// A loaded table. Immutable once built; a new load replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    fields: Vec<Field>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from header names and row cells, inferring each field's
    /// type from the first row. Rows shorter than the header are padded with
    /// nulls; extra trailing cells are dropped.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Scalar>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(eyre!("Column {} has an empty header name", i + 1));
            }
            if !seen.insert(name.as_str()) {
                return Err(eyre!("Duplicate column name '{}'", name));
            }
        }

        let width = columns.len();
        let rows: Vec<Row> = rows
            .into_iter()
            .map(|mut values| {
                values.resize(width, Scalar::Null);
                Row { values }
            })
            .collect();

        let fields = columns
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let sample = rows.first().map_or(&NULL, |row| &row.values[index]);
                Field::infer(name, sample, index)
            })
            .collect();

        Ok(Self { fields, rows })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Field with the given name, if the dataset has one.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
