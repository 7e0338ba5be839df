//! Draft/committed editing of a chart spec.
//!
//! Edits go to a draft copy. [`ChartEditor::apply`] publishes the draft;
//! [`ChartEditor::reset`] throws it away. Dropping an editor without applying
//! leaves the committed spec as it was.

use tracing::debug;

use crate::advisor::suggest_chart_kind;
use crate::chart_spec::{ChartKind, ChartSpec, DisplayOptions, FieldFilter, Role};
use crate::field::Field;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartEditor {
    committed: ChartSpec,
    draft: ChartSpec,
}

impl ChartEditor {
    pub fn open(committed: ChartSpec) -> Self {
        Self {
            draft: committed.clone(),
            committed,
        }
    }

    pub fn draft(&self) -> &ChartSpec {
        &self.draft
    }

    pub fn committed(&self) -> &ChartSpec {
        &self.committed
    }

    /// True when the draft differs from the committed spec.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    /// Bind `field` to `role`. For `Role::Filter` this adds an inactive filter
    /// (one per field). Binding an axis while the other axis is bound replaces
    /// the chart kind with the suggested one.
    pub fn bind(&mut self, role: Role, field: Field) {
        match role {
            Role::X => self.draft.x = Some(field),
            Role::Y => self.draft.y = Some(field),
            Role::Color => self.draft.color = Some(field),
            Role::Filter => {
                self.add_filter(field, None);
                return;
            }
        }
        if matches!(role, Role::X | Role::Y) {
            self.resuggest();
        }
    }

    /// Clear a role. For `Role::Filter` every filter is removed.
    pub fn unbind(&mut self, role: Role) {
        match role {
            Role::X => self.draft.x = None,
            Role::Y => self.draft.y = None,
            Role::Color => self.draft.color = None,
            Role::Filter => self.draft.filters.clear(),
        }
    }

    fn resuggest(&mut self) {
        if let (Some(x), Some(y)) = (&self.draft.x, &self.draft.y) {
            let kind = suggest_chart_kind(Some(x), Some(y));
            if kind != self.draft.kind {
                debug!(chart = %self.draft.id, from = %self.draft.kind, to = %kind, "suggested chart kind");
            }
            self.draft.kind = kind;
        }
    }

    /// Add a filter on `field`. A second filter on the same field replaces the
    /// first one's value instead of adding a duplicate.
    pub fn add_filter(&mut self, field: Field, value: Option<String>) {
        match self
            .draft
            .filters
            .iter_mut()
            .find(|f| f.field.name == field.name)
        {
            Some(existing) => existing.value = value,
            None => self.draft.filters.push(FieldFilter { field, value }),
        }
    }

    /// Set or clear the value of the filter on `field_name`. Returns false if
    /// no such filter exists.
    pub fn set_filter_value(&mut self, field_name: &str, value: Option<String>) -> bool {
        match self
            .draft
            .filters
            .iter_mut()
            .find(|f| f.field.name == field_name)
        {
            Some(filter) => {
                filter.value = value;
                true
            }
            None => false,
        }
    }

    /// Returns false if no filter on `field_name` exists.
    pub fn remove_filter(&mut self, field_name: &str) -> bool {
        let before = self.draft.filters.len();
        self.draft.filters.retain(|f| f.field.name != field_name);
        self.draft.filters.len() != before
    }

    /// Explicit kind choice. Stays in place until the next axis binding.
    pub fn set_kind(&mut self, kind: ChartKind) {
        self.draft.kind = kind;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn options_mut(&mut self) -> &mut DisplayOptions {
        &mut self.draft.options
    }

    /// Discard draft edits.
    pub fn reset(&mut self) {
        self.draft = self.committed.clone();
    }

    /// Commit the draft and return the new committed spec.
    pub fn apply(&mut self) -> &ChartSpec {
        self.committed = self.draft.clone();
        &self.committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    fn region() -> Field {
        Field::new("Region", FieldType::Dimension, 0)
    }

    fn sales() -> Field {
        Field::new("Sales", FieldType::Measure, 1)
    }

    fn month() -> Field {
        Field::new("Month", FieldType::Date, 2)
    }

    #[test]
    fn edits_stay_in_draft_until_apply() {
        let mut editor = ChartEditor::open(ChartSpec::new("t"));
        editor.bind(Role::X, region());
        editor.set_title("Sales by region");
        assert!(editor.is_dirty());
        assert!(editor.committed().x.is_none());

        let committed = editor.apply().clone();
        assert_eq!(committed.x, Some(region()));
        assert_eq!(committed.title, "Sales by region");
        assert!(!editor.is_dirty());
    }

    #[test]
    fn reset_restores_committed_values() {
        let mut spec = ChartSpec::new("t");
        spec.x = Some(region());
        let mut editor = ChartEditor::open(spec.clone());
        editor.unbind(Role::X);
        editor.options_mut().show_legend = false;
        editor.reset();
        assert_eq!(editor.draft(), &spec);
    }

    #[test]
    fn binding_both_axes_suggests_kind() {
        let mut editor = ChartEditor::open(ChartSpec::new("t"));
        editor.bind(Role::X, month());
        assert_eq!(editor.draft().kind, ChartKind::Bar);
        editor.bind(Role::Y, sales());
        assert_eq!(editor.draft().kind, ChartKind::Line);
        editor.bind(Role::X, region());
        assert_eq!(editor.draft().kind, ChartKind::Bar);
    }

    #[test]
    fn user_kind_survives_unrelated_edits() {
        let mut editor = ChartEditor::open(ChartSpec::new("t"));
        editor.bind(Role::X, region());
        editor.bind(Role::Y, sales());
        editor.set_kind(ChartKind::Doughnut);
        editor.bind(Role::Color, region());
        editor.add_filter(region(), Some("North".into()));
        editor.set_title("x");
        assert_eq!(editor.draft().kind, ChartKind::Doughnut);

        // an axis edit re-runs the suggestion
        editor.bind(Role::Y, sales());
        assert_eq!(editor.draft().kind, ChartKind::Bar);
    }

    #[test]
    fn filters_are_unique_per_field() {
        let mut editor = ChartEditor::open(ChartSpec::new("t"));
        editor.bind(Role::Filter, region());
        editor.add_filter(region(), Some("North".into()));
        assert_eq!(editor.draft().filters.len(), 1);
        assert_eq!(editor.draft().filters[0].value.as_deref(), Some("North"));

        assert!(editor.set_filter_value("Region", None));
        assert!(editor.draft().filters[0].value.is_none());
        assert!(!editor.set_filter_value("Sales", Some("1".into())));

        assert!(editor.remove_filter("Region"));
        assert!(!editor.remove_filter("Region"));
        assert!(editor.draft().filters.is_empty());
    }
}
