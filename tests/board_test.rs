mod common;

use csvviz::config::AppConfig;
use csvviz::source;
use csvviz::{ChartBoard, ChartKind, LegendPosition, OpenOptions, Role};
use tempfile::TempDir;

fn loaded_board(config: &AppConfig) -> (TempDir, ChartBoard) {
    let dir = TempDir::new().unwrap();
    let path = common::write_frame(dir.path(), "sales.csv", &mut common::sales_frame());
    let dataset = source::load(&path, &OpenOptions::new()).unwrap();
    let mut board = ChartBoard::from_config(config).unwrap();
    board.load_dataset(dataset);
    (dir, board)
}

#[test]
fn test_csv_to_render_document() {
    let (_dir, mut board) = loaded_board(&AppConfig::default());
    let id = board.new_chart().unwrap();
    let dataset = board.dataset().unwrap().clone();

    let mut editor = board.edit(&id).unwrap();
    editor.bind(Role::X, dataset.field("Order Date").unwrap().clone());
    editor.bind(Role::Y, dataset.field("Sales").unwrap().clone());
    assert_eq!(editor.draft().kind, ChartKind::Line);

    let series = board.apply(&mut editor).unwrap();
    assert_eq!(series.labels, vec!["2023-01-01", "2023-01-02", "2023-01-03"]);
    assert_eq!(series.values, vec![4.0, 4.5, 2.5]);

    let doc = serde_json::to_value(board.render(&id).unwrap()).unwrap();
    assert_eq!(doc["type"], "line");
    assert_eq!(doc["data"]["datasets"][0]["label"], "Sales");
    assert_eq!(doc["data"]["datasets"][0]["data"][1], 4.5);
    assert_eq!(doc["options"]["scales"]["y"]["beginAtZero"], true);
}

#[test]
fn test_new_chart_uses_config_defaults() {
    let mut config = AppConfig::default();
    config.chart.title = "Overview".into();
    config.chart.kind = ChartKind::Radar;
    config.chart.color_scheme = "pastel".into();
    config.chart.legend_position = Some(LegendPosition::Bottom);
    let (_dir, mut board) = loaded_board(&config);

    let id = board.new_chart().unwrap();
    let spec = board.chart(&id).unwrap();
    assert_eq!(spec.title, "Overview");
    assert_eq!(spec.kind, ChartKind::Radar);
    assert_eq!(spec.options.color_scheme, "pastel");
    assert_eq!(spec.options.legend_position, Some(LegendPosition::Bottom));
    assert!(spec.x.is_none());
}

#[test]
fn test_closing_editor_without_apply_keeps_committed() {
    let (_dir, mut board) = loaded_board(&AppConfig::default());
    let id = board.new_chart().unwrap();
    let dataset = board.dataset().unwrap().clone();

    {
        let mut editor = board.edit(&id).unwrap();
        editor.bind(Role::X, dataset.field("Region").unwrap().clone());
        editor.set_title("discarded");
    }

    let spec = board.chart(&id).unwrap();
    assert!(spec.x.is_none());
    assert_eq!(spec.title, "New Chart");
    assert!(board.series(&id).unwrap().is_empty());
}

#[test]
fn test_reset_then_apply_restores_committed() {
    let (_dir, mut board) = loaded_board(&AppConfig::default());
    let id = board.new_chart().unwrap();
    let dataset = board.dataset().unwrap().clone();

    let mut editor = board.edit(&id).unwrap();
    editor.bind(Role::X, dataset.field("Region").unwrap().clone());
    editor.bind(Role::Y, dataset.field("Sales").unwrap().clone());
    board.apply(&mut editor).unwrap();

    editor.set_kind(ChartKind::Pie);
    editor.unbind(Role::Y);
    editor.reset();
    let series = board.apply(&mut editor).unwrap();
    assert_eq!(board.chart(&id).unwrap().kind, ChartKind::Bar);
    assert_eq!(series.labels, vec!["North", "South", "East"]);
}

#[test]
fn test_reload_with_missing_field_degrades_to_no_data() {
    let (dir, mut board) = loaded_board(&AppConfig::default());
    let id = board.new_chart().unwrap();
    let dataset = board.dataset().unwrap().clone();

    let mut editor = board.edit(&id).unwrap();
    editor.bind(Role::X, dataset.field("Region").unwrap().clone());
    editor.bind(Role::Y, dataset.field("Sales").unwrap().clone());
    assert!(!board.apply(&mut editor).unwrap().is_empty());

    let other = common::write_text(dir.path(), "other.csv", "Region,Units\nNorth,1\n");
    board.load_dataset(source::load(&other, &OpenOptions::new()).unwrap());

    let series = board.series(&id).unwrap();
    assert!(series.is_empty());
    assert_eq!(series.label, "No data");
    // bindings survive the reload
    assert!(board.chart(&id).unwrap().y.is_some());
}

#[test]
fn test_row_limit_from_config() {
    let mut config = AppConfig::default();
    config.performance.max_chart_rows = 2;
    let (_dir, mut board) = loaded_board(&config);
    let id = board.new_chart().unwrap();
    let dataset = board.dataset().unwrap().clone();

    let mut editor = board.edit(&id).unwrap();
    editor.bind(Role::X, dataset.field("Region").unwrap().clone());
    editor.bind(Role::Y, dataset.field("Sales").unwrap().clone());
    let series = board.apply(&mut editor).unwrap();
    assert_eq!(series.labels, vec!["North"]);
    assert_eq!(series.values, vec![4.0]);
}
