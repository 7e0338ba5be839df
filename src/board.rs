//! The set of charts over the currently loaded dataset.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::{debug, info, warn};

use crate::chart_data::{DerivedSeries, SeriesAggregator, DEFAULT_ROW_LIMIT};
use crate::chart_spec::{ChartId, ChartSpec};
use crate::config::AppConfig;
use crate::dataset::Dataset;
use crate::editor::ChartEditor;
use crate::palette::PaletteSet;
use crate::render_spec::RenderSpec;

/// Holds the loaded dataset and the committed spec of every chart, in
/// creation order.
#[derive(Debug, Clone)]
pub struct ChartBoard {
    dataset: Option<Dataset>,
    charts: Vec<ChartSpec>,
    palettes: PaletteSet,
    template: ChartSpec,
    row_limit: usize,
}

impl Default for ChartBoard {
    fn default() -> Self {
        Self {
            dataset: None,
            charts: Vec::new(),
            palettes: PaletteSet::builtin(),
            template: ChartSpec::default(),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

impl ChartBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board using the config's palettes, chart defaults and row limit.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut template = ChartSpec::new(config.chart.title.clone());
        template.kind = config.chart.kind;
        template.options = config.display_options();
        Ok(Self {
            dataset: None,
            charts: Vec::new(),
            palettes: config.palette_set()?,
            template,
            row_limit: config.performance.max_chart_rows,
        })
    }

    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }

    pub fn palettes(&self) -> &PaletteSet {
        &self.palettes
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Replace the dataset. Existing charts keep their bindings; any that no
    /// longer match a field are reported and plot as unbound.
    pub fn load_dataset(&mut self, dataset: Dataset) {
        info!(
            rows = dataset.len(),
            fields = dataset.fields().len(),
            charts = self.charts.len(),
            "dataset replaced"
        );
        for spec in &self.charts {
            for issue in spec.validate(&dataset, &self.palettes) {
                warn!(chart = %spec.id, "{}", issue);
            }
        }
        self.dataset = Some(dataset);
    }

    /// Add a chart with the configured defaults. Fails when no dataset is loaded.
    pub fn new_chart(&mut self) -> Result<ChartId> {
        if self.dataset.is_none() {
            return Err(eyre!("No data available"));
        }
        let spec = ChartSpec {
            id: ChartId::new(),
            ..self.template.clone()
        };
        let id = spec.id.clone();
        debug!(chart = %id, "new chart");
        self.charts.push(spec);
        Ok(id)
    }

    /// Returns false when no chart has this id.
    pub fn remove_chart(&mut self, id: &ChartId) -> bool {
        let before = self.charts.len();
        self.charts.retain(|c| &c.id != id);
        self.charts.len() != before
    }

    pub fn chart(&self, id: &ChartId) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| &c.id == id)
    }

    pub fn charts(&self) -> &[ChartSpec] {
        &self.charts
    }

    /// Open an editor on the committed copy of a chart.
    pub fn edit(&self, id: &ChartId) -> Result<ChartEditor> {
        self.chart(id)
            .cloned()
            .map(ChartEditor::open)
            .ok_or_else(|| eyre!("Unknown chart: {}", id))
    }

    /// Replace the committed spec with the same id and recompute its series.
    pub fn commit(&mut self, spec: ChartSpec) -> Result<DerivedSeries> {
        if let Some(dataset) = &self.dataset {
            for issue in spec.validate(dataset, &self.palettes) {
                warn!(chart = %spec.id, "{}", issue);
            }
        }
        let id = spec.id.clone();
        let slot = self
            .charts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| eyre!("Unknown chart: {}", id))?;
        *slot = spec;
        debug!(chart = %id, "committed chart");
        self.series(&id)
    }

    /// Apply an editor's draft and commit it to the board.
    pub fn apply(&mut self, editor: &mut ChartEditor) -> Result<DerivedSeries> {
        let spec = editor.apply().clone();
        self.commit(spec)
    }

    /// Current series for a chart. A board without data yields the empty series.
    pub fn series(&self, id: &ChartId) -> Result<DerivedSeries> {
        let spec = self
            .chart(id)
            .ok_or_else(|| eyre!("Unknown chart: {}", id))?;
        Ok(match &self.dataset {
            Some(dataset) => SeriesAggregator::new(&self.palettes)
                .with_row_limit(self.row_limit)
                .aggregate(dataset, spec),
            None => DerivedSeries::empty(),
        })
    }

    /// Renderer document for a chart.
    pub fn render(&self, id: &ChartId) -> Result<RenderSpec> {
        let spec = self
            .chart(id)
            .ok_or_else(|| eyre!("Unknown chart: {}", id))?;
        let series = self.series(id)?;
        Ok(RenderSpec::build(spec, &series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_spec::{ChartKind, Role};

    fn dataset() -> Dataset {
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

    #[test]
    fn new_chart_requires_data() {
        let mut board = ChartBoard::new();
        let err = board.new_chart().unwrap_err();
        assert_eq!(err.to_string(), "No data available");
        board.load_dataset(dataset());
        assert!(board.new_chart().is_ok());
    }

    #[test]
    fn unknown_ids_are_errors() {
        let board = ChartBoard::new();
        let id = ChartId::from("missing");
        assert!(board.edit(&id).is_err());
        assert!(board.series(&id).is_err());
        assert!(board.render(&id).is_err());
    }

    #[test]
    fn apply_commits_and_recomputes() {
        let mut board = ChartBoard::new();
        board.load_dataset(dataset());
        let id = board.new_chart().unwrap();
        assert!(board.series(&id).unwrap().is_empty());

        let mut editor = board.edit(&id).unwrap();
        let ds = board.dataset().unwrap().clone();
        editor.bind(Role::X, ds.field("Region").unwrap().clone());
        editor.bind(Role::Y, ds.field("Sales").unwrap().clone());
        // not yet committed
        assert!(board.series(&id).unwrap().is_empty());

        let series = board.apply(&mut editor).unwrap();
        assert_eq!(series.values, vec![4.0, 2.0]);
        assert_eq!(board.chart(&id).unwrap().kind, ChartKind::Bar);
    }

    #[test]
    fn remove_chart_by_id() {
        let mut board = ChartBoard::new();
        board.load_dataset(dataset());
        let a = board.new_chart().unwrap();
        let b = board.new_chart().unwrap();
        assert!(board.remove_chart(&a));
        assert!(!board.remove_chart(&a));
        assert_eq!(board.charts().len(), 1);
        assert_eq!(board.charts()[0].id, b);
    }
}
