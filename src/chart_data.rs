//! Derive plotted series from a dataset and a chart spec: group rows by the
//! x value, reduce y per group, and assign palette colors.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::chart_spec::{Aggregation, ChartSpec};
use crate::dataset::{parse_numeric_or_zero, Dataset};
use crate::palette::{PaletteSet, SeriesColor};

/// Default cap on rows scanned per aggregation.
pub const DEFAULT_ROW_LIMIT: usize = 100_000;

/// Series label used when there is nothing to plot.
pub const NO_DATA_LABEL: &str = "No data";

/// Plot-ready series. `labels`, `values` and `colors` always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedSeries {
    /// The y field's name, or [`NO_DATA_LABEL`].
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<SeriesColor>,
}

impl DerivedSeries {
    pub fn empty() -> Self {
        Self {
            label: NO_DATA_LABEL.to_string(),
            labels: Vec::new(),
            values: Vec::new(),
            colors: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Default)]
struct Group {
    sum: f64,
    count: usize,
}

/// Aggregates datasets into series using a fixed palette set.
#[derive(Debug, Clone, Copy)]
pub struct SeriesAggregator<'a> {
    palettes: &'a PaletteSet,
    row_limit: usize,
}

impl<'a> SeriesAggregator<'a> {
    pub fn new(palettes: &'a PaletteSet) -> Self {
        Self {
            palettes,
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }

    /// Only the first `row_limit` rows are scanned (before filtering).
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }

    /// Compute the series for `spec` over `dataset`.
    ///
    /// Returns [`DerivedSeries::empty`] when the dataset has no rows or either
    /// axis is unbound (or names a field the dataset lacks). Labels are the
    /// distinct x values of the rows passing the spec's filters, in first-seen
    /// order. Pie charts sum y per label; every other kind averages it.
    pub fn aggregate(&self, dataset: &Dataset, spec: &ChartSpec) -> DerivedSeries {
        let bindings = spec.resolve(dataset);
        let (Some(x), Some(y)) = (bindings.x, bindings.y) else {
            return DerivedSeries::empty();
        };
        if dataset.is_empty() {
            return DerivedSeries::empty();
        }

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut labels: Vec<String> = Vec::new();
        let mut groups: Vec<Group> = Vec::new();
        let mut scanned = 0usize;

        for row in dataset.rows().iter().take(self.row_limit) {
            scanned += 1;
            if !bindings.matches(row) {
                continue;
            }
            let label = row.get(x).label();
            let slot = match index.get(&label) {
                Some(&slot) => slot,
                None => {
                    let slot = labels.len();
                    index.insert(label.clone(), slot);
                    labels.push(label);
                    groups.push(Group::default());
                    slot
                }
            };
            let group = &mut groups[slot];
            group.sum += parse_numeric_or_zero(row.get(y));
            group.count += 1;
        }

        let aggregation = spec.kind.aggregation();
        let values = groups
            .iter()
            .map(|g| match aggregation {
                Aggregation::Sum => g.sum,
                Aggregation::Mean if g.count == 0 => 0.0,
                Aggregation::Mean => g.sum / g.count as f64,
            })
            .collect();

        let palette = self.palettes.resolve(&spec.options.color_scheme);
        let colors = (0..labels.len()).map(|i| palette.color(i)).collect();

        debug!(
            chart = %spec.id,
            kind = %spec.kind,
            x = %x.name,
            y = %y.name,
            scanned,
            labels = labels.len(),
            palette = palette.name(),
            "aggregated series"
        );

        DerivedSeries {
            label: y.name.clone(),
            labels,
            values,
            colors,
        }
    }
}

/// Aggregate with the built-in palettes and the default row limit.
pub fn aggregate(dataset: &Dataset, spec: &ChartSpec) -> DerivedSeries {
    let palettes = PaletteSet::builtin();
    SeriesAggregator::new(&palettes).aggregate(dataset, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_spec::ChartKind;
    use crate::dataset::Scalar;

    fn sales() -> Dataset {
        Dataset::new(
            vec!["Region".into(), "Sales".into()],
            vec![
                vec!["A".into(), 3.0.into()],
                vec!["A".into(), 5.0.into()],
                vec!["B".into(), 2.0.into()],
            ],
        )
        .unwrap()
    }

    fn bound(ds: &Dataset, kind: ChartKind) -> ChartSpec {
        let mut spec = ChartSpec::new("t");
        spec.kind = kind;
        spec.x = ds.field("Region").cloned();
        spec.y = ds.field("Sales").cloned();
        spec
    }

    #[test]
    fn unbound_axes_yield_no_data() {
        let ds = sales();
        let mut spec = bound(&ds, ChartKind::Bar);
        spec.y = None;
        let series = aggregate(&ds, &spec);
        assert_eq!(series, DerivedSeries::empty());
        assert_eq!(series.label, "No data");
    }

    #[test]
    fn pie_sums_and_bar_averages() {
        let ds = sales();
        let pie = aggregate(&ds, &bound(&ds, ChartKind::Pie));
        assert_eq!(pie.labels, vec!["A", "B"]);
        assert_eq!(pie.values, vec![8.0, 2.0]);
        assert_eq!(pie.label, "Sales");

        let bar = aggregate(&ds, &bound(&ds, ChartKind::Bar));
        assert_eq!(bar.values, vec![4.0, 2.0]);
        let doughnut = aggregate(&ds, &bound(&ds, ChartKind::Doughnut));
        assert_eq!(doughnut.values, vec![4.0, 2.0]);
    }

    #[test]
    fn row_limit_caps_the_scan() {
        let ds = sales();
        let palettes = PaletteSet::builtin();
        let series = SeriesAggregator::new(&palettes)
            .with_row_limit(1)
            .aggregate(&ds, &bound(&ds, ChartKind::Pie));
        assert_eq!(series.labels, vec!["A"]);
        assert_eq!(series.values, vec![3.0]);

        let none = SeriesAggregator::new(&palettes)
            .with_row_limit(0)
            .aggregate(&ds, &bound(&ds, ChartKind::Pie));
        assert!(none.is_empty());
        assert_eq!(none.label, "Sales");
    }

    #[test]
    fn null_x_values_group_under_null() {
        let ds = Dataset::new(
            vec!["Region".into(), "Sales".into()],
            vec![
                vec![Scalar::Null, "x".into()],
                vec!["A".into(), Scalar::Null],
            ],
        )
        .unwrap();
        let series = aggregate(&ds, &bound(&ds, ChartKind::Bar));
        assert_eq!(series.labels, vec!["null", "A"]);
        assert_eq!(series.values, vec![0.0, 0.0]);
        assert_eq!(series.colors.len(), 2);
    }
}
