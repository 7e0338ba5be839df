use csvviz::chart_data::DEFAULT_ROW_LIMIT;
use csvviz::config::{AppConfig, ChartConfig, ConfigManager, FileLoadingConfig};
use csvviz::{ChartBoard, ChartKind, LegendPosition};
use std::fs;
use tempfile::TempDir;

// Helper to create a temporary config directory for testing
fn setup_test_config_dir() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());
    (temp_dir, config_manager)
}

fn write_user_config(config_manager: &ConfigManager, content: &str) {
    config_manager
        .ensure_config_dir()
        .expect("Failed to create config dir");
    fs::write(config_manager.config_path("config.toml"), content)
        .expect("Failed to write config");
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.version, "0.1");

    assert_eq!(config.chart.title, "New Chart");
    assert_eq!(config.chart.kind, ChartKind::Bar);
    assert_eq!(config.chart.color_scheme, "default");
    assert!(config.chart.show_legend);
    assert!(!config.chart.show_data_labels);
    assert!(config.chart.show_grid_lines);
    assert!(config.chart.legend_position.is_none());

    assert_eq!(config.performance.max_chart_rows, DEFAULT_ROW_LIMIT);
    assert!(config.palettes.is_empty());
    assert!(!config.debug.enabled);
}

#[test]
fn test_generate_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let template = config_manager.generate_default_config();

    assert!(template.contains("[file_loading]"));
    assert!(template.contains("[chart]"));
    assert!(template.contains("[performance]"));
    assert!(template.contains("[[palettes]]"));
    assert!(template.contains("[debug]"));
    assert!(template.contains("version = \"0.1\""));
}

#[test]
fn test_write_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let config_path = config_manager
        .write_default_config(false)
        .expect("Failed to write config");

    assert!(config_path.exists());
    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[chart]"));

    // the written template loads back as the defaults
    let loaded = AppConfig::load_with(&config_manager).expect("Template should load");
    assert_eq!(loaded, AppConfig::default());
}

#[test]
fn test_write_config_without_force_fails_if_exists() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    config_manager
        .write_default_config(false)
        .expect("First write should succeed");

    let result = config_manager.write_default_config(false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("already exists"));
}

#[test]
fn test_write_config_with_force_overwrites() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let first_path = config_manager
        .write_default_config(false)
        .expect("First write should succeed");
    fs::write(&first_path, "garbage").expect("Failed to clobber config");

    let second_path = config_manager
        .write_default_config(true)
        .expect("Second write with force should succeed");

    assert_eq!(first_path, second_path);
    let content = fs::read_to_string(&second_path).expect("Failed to read config");
    assert!(content.contains("[chart]"));
}

#[test]
fn test_load_config_with_no_file() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    let config = AppConfig::load_with(&config_manager).expect("Should load default config");
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_load_minimal_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_user_config(
        &config_manager,
        r#"
version = "0.1"

[chart]
kind = "line"
show_legend = false
legend_position = "right"

[performance]
max_chart_rows = 500
"#,
    );

    let config = AppConfig::load_with(&config_manager).expect("Failed to load config");

    assert_eq!(config.chart.kind, ChartKind::Line);
    assert!(!config.chart.show_legend);
    assert_eq!(config.chart.legend_position, Some(LegendPosition::Right));
    assert_eq!(config.performance.max_chart_rows, 500);

    // unspecified values keep their defaults
    assert_eq!(config.chart.title, "New Chart");
    assert!(config.chart.show_grid_lines);
}

#[test]
fn test_load_rejects_unparsable_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_user_config(&config_manager, "[chart\nkind = ");

    let err = AppConfig::load_with(&config_manager).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_load_rejects_invalid_values() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_user_config(&config_manager, "[performance]\nmax_chart_rows = 0\n");

    let err = AppConfig::load_with(&config_manager).unwrap_err();
    assert!(err.to_string().contains("max_chart_rows"));
}

#[test]
fn test_merge_configs() {
    let mut base = AppConfig::default();
    let mut override_config = AppConfig::default();

    override_config.chart.color_scheme = "bold".to_string();
    override_config.chart.show_data_labels = true;
    override_config.performance.max_chart_rows = 42;
    override_config.debug.enabled = true;

    base.merge(override_config);

    assert_eq!(base.chart.color_scheme, "bold");
    assert!(base.chart.show_data_labels);
    assert_eq!(base.performance.max_chart_rows, 42);
    assert!(base.debug.enabled);

    // Check that unmodified values remain default
    assert_eq!(base.chart.kind, ChartKind::Bar);
    assert!(base.chart.show_legend);
}

#[test]
fn test_merge_option_fields() {
    let mut base = FileLoadingConfig::default();
    assert_eq!(base.delimiter, None);
    assert_eq!(base.has_header, None);

    let override_config = FileLoadingConfig {
        delimiter: Some(44),
        has_header: Some(true),
        skip_rows: Some(2),
        ..Default::default()
    };

    base.merge(override_config);

    assert_eq!(base.delimiter, Some(44));
    assert_eq!(base.has_header, Some(true));
    assert_eq!(base.skip_rows, Some(2));
    assert_eq!(base.compression, None);
}

#[test]
fn test_merge_does_not_override_with_defaults() {
    let mut base = ChartConfig {
        title: "Revenue".to_string(),
        kind: ChartKind::Pie,
        color_scheme: "pastel".to_string(),
        show_legend: false,
        show_data_labels: true,
        show_grid_lines: false,
        legend_position: Some(LegendPosition::Bottom),
        font_size: Some(10.0),
        aspect_ratio: Some(1.0),
    };
    let expected = base.clone();

    base.merge(ChartConfig::default());

    assert_eq!(base, expected);
}

#[test]
fn test_validate_config_invalid_version() {
    let config = AppConfig {
        version: "1.0".to_string(),
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Unsupported config version"));
}

#[test]
fn test_custom_palette_reaches_the_board() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_user_config(
        &config_manager,
        r##"
[chart]
color_scheme = "brand"
title = "Quarterly"

[[palettes]]
name = "brand"
colors = ["#112233", "#44556680"]
"##,
    );

    let config = AppConfig::load_with(&config_manager).expect("Failed to load config");
    let board = ChartBoard::from_config(&config).expect("Failed to build board");
    assert!(board.palettes().contains("brand"));
    assert!(board.palettes().contains("default"));

    let display = config.display_options();
    assert_eq!(display.color_scheme, "brand");
}

#[test]
fn test_palette_name_must_be_unique() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_user_config(
        &config_manager,
        r##"
[[palettes]]
name = "brand"
colors = ["#112233"]

[[palettes]]
name = "brand"
colors = ["#445566"]
"##,
    );

    let err = AppConfig::load_with(&config_manager).unwrap_err();
    assert!(err.to_string().contains("already defined"));
}
