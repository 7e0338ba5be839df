//! Chart-type suggestion from the types of the bound axis fields.

use crate::chart_spec::{ChartKind, ChartSpec};
use crate::dataset::Dataset;
use crate::field::{Field, FieldType};

/// Suggest a chart kind for an x/y pair. First match wins:
///
/// | x         | y         | kind      |
/// |-----------|-----------|-----------|
/// | missing   | any       | `bar`     |
/// | any       | missing   | `bar`     |
/// | dimension | measure   | `bar`     |
/// | date      | measure   | `line`    |
/// | dimension | dimension | `pie`     |
/// | measure   | measure   | `scatter` |
/// | otherwise |           | `bar`     |
pub fn suggest_chart_kind(x: Option<&Field>, y: Option<&Field>) -> ChartKind {
    let (Some(x), Some(y)) = (x, y) else {
        return ChartKind::Bar;
    };
    match (x.field_type, y.field_type) {
        (FieldType::Dimension, FieldType::Measure) => ChartKind::Bar,
        (FieldType::Date, FieldType::Measure) => ChartKind::Line,
        (FieldType::Dimension, FieldType::Dimension) => ChartKind::Pie,
        (FieldType::Measure, FieldType::Measure) => ChartKind::Scatter,
        _ => ChartKind::Bar,
    }
}

/// Suggestion for a spec's current axes, with types read from `dataset`.
/// Axes naming fields the dataset lacks count as missing.
pub fn suggest_for(spec: &ChartSpec, dataset: &Dataset) -> ChartKind {
    let bindings = spec.resolve(dataset);
    suggest_chart_kind(bindings.x, bindings.y)
}
