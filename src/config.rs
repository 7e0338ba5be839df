use clap::ValueEnum;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chart_data::DEFAULT_ROW_LIMIT;
use crate::chart_spec::{ChartKind, DisplayOptions, LegendPosition};
use crate::palette::{Palette, PaletteSet, Rgba};
use crate::CompressionFormat;

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file or subdirectory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Ensure the config directory exists
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string
    pub fn generate_default_config(&self) -> String {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub file_loading: FileLoadingConfig,
    pub chart: ChartConfig,
    pub performance: PerformanceConfig,
    pub palettes: Vec<PaletteConfig>,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileLoadingConfig {
    pub delimiter: Option<u8>,
    pub has_header: Option<bool>,
    pub skip_rows: Option<usize>,
    pub compression: Option<String>,
}

/// Defaults applied to every new chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub title: String,
    pub kind: ChartKind,
    pub color_scheme: String,
    pub show_legend: bool,
    pub show_data_labels: bool,
    pub show_grid_lines: bool,
    pub legend_position: Option<LegendPosition>,
    pub font_size: Option<f64>,
    pub aspect_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Rows scanned per aggregation; later rows are ignored.
    pub max_chart_rows: usize,
}

/// A user-defined color scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    pub name: String,
    /// `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` or `rgba(r, g, b, a)`
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
}

// Default implementations
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            file_loading: FileLoadingConfig::default(),
            chart: ChartConfig::default(),
            performance: PerformanceConfig::default(),
            palettes: Vec::new(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        let options = DisplayOptions::default();
        Self {
            title: "New Chart".to_string(),
            kind: ChartKind::default(),
            color_scheme: options.color_scheme,
            show_legend: options.show_legend,
            show_data_labels: options.show_data_labels,
            show_grid_lines: options.show_grid_lines,
            legend_position: None,
            font_size: None,
            aspect_ratio: None,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_chart_rows: DEFAULT_ROW_LIMIT,
        }
    }
}

// Configuration loading and merging
impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        Self::load_with(&ConfigManager::new(app_name)?)
    }

    /// Load configuration using the given config directory
    pub fn load_with(manager: &ConfigManager) -> Result<Self> {
        let mut config = AppConfig::default();
        config.merge(Self::load_user_config(manager)?);
        config.validate()?;
        Ok(config)
    }

    /// Load user configuration from <config_dir>/config.toml
    fn load_user_config(manager: &ConfigManager) -> Result<AppConfig> {
        let config_path = manager.config_path("config.toml");

        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }

        self.file_loading.merge(other.file_loading);
        self.chart.merge(other.chart);
        self.performance.merge(other.performance);
        self.palettes.extend(other.palettes);
        self.debug.merge(other.debug);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        if self.performance.max_chart_rows == 0 {
            return Err(eyre!("max_chart_rows must be greater than 0"));
        }

        self.file_loading.compression_format()?;

        if let Some(size) = self.chart.font_size {
            if size.is_nan() || size <= 0.0 {
                return Err(eyre!("font_size must be greater than 0, got {}", size));
            }
        }
        if let Some(ratio) = self.chart.aspect_ratio {
            if ratio.is_nan() || ratio <= 0.0 {
                return Err(eyre!("aspect_ratio must be greater than 0, got {}", ratio));
            }
        }

        let palettes = self.palette_set()?;
        if !palettes.contains(&self.chart.color_scheme) {
            return Err(eyre!(
                "Unknown color_scheme: {}. Must be one of: {}",
                self.chart.color_scheme,
                palettes.names().join(", ")
            ));
        }

        Ok(())
    }

    /// Built-in palettes plus the ones defined under `[[palettes]]`.
    pub fn palette_set(&self) -> Result<PaletteSet> {
        let mut set = PaletteSet::builtin();
        for palette in &self.palettes {
            set.insert(palette.build()?)?;
        }
        Ok(set)
    }

    /// Display options for a new chart.
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            show_legend: self.chart.show_legend,
            show_data_labels: self.chart.show_data_labels,
            show_grid_lines: self.chart.show_grid_lines,
            color_scheme: self.chart.color_scheme.clone(),
            legend_position: self.chart.legend_position,
            font_size: self.chart.font_size,
            aspect_ratio: self.chart.aspect_ratio,
            ..DisplayOptions::default()
        }
    }
}

// Merge implementations for each config section
impl FileLoadingConfig {
    pub fn merge(&mut self, other: Self) {
        if other.delimiter.is_some() {
            self.delimiter = other.delimiter;
        }
        if other.has_header.is_some() {
            self.has_header = other.has_header;
        }
        if other.skip_rows.is_some() {
            self.skip_rows = other.skip_rows;
        }
        if other.compression.is_some() {
            self.compression = other.compression;
        }
    }

    /// The configured compression, if any.
    pub fn compression_format(&self) -> Result<Option<CompressionFormat>> {
        self.compression
            .as_deref()
            .map(|name| {
                CompressionFormat::from_str(name, true).map_err(|_| {
                    eyre!(
                        "Invalid compression: {}. Must be 'gzip', 'zstd', 'bzip2', or 'xz'",
                        name
                    )
                })
            })
            .transpose()
    }
}

impl ChartConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ChartConfig::default();
        if other.title != default.title {
            self.title = other.title;
        }
        if other.kind != default.kind {
            self.kind = other.kind;
        }
        if other.color_scheme != default.color_scheme {
            self.color_scheme = other.color_scheme;
        }
        if other.show_legend != default.show_legend {
            self.show_legend = other.show_legend;
        }
        if other.show_data_labels != default.show_data_labels {
            self.show_data_labels = other.show_data_labels;
        }
        if other.show_grid_lines != default.show_grid_lines {
            self.show_grid_lines = other.show_grid_lines;
        }
        if other.legend_position.is_some() {
            self.legend_position = other.legend_position;
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        if other.aspect_ratio.is_some() {
            self.aspect_ratio = other.aspect_ratio;
        }
    }
}

impl PerformanceConfig {
    pub fn merge(&mut self, other: Self) {
        let default = PerformanceConfig::default();
        if other.max_chart_rows != default.max_chart_rows {
            self.max_chart_rows = other.max_chart_rows;
        }
    }
}

impl PaletteConfig {
    /// Parse the colors into a palette. Borders are the fills at full opacity.
    pub fn build(&self) -> Result<Palette> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(eyre!("Palette name must not be empty"));
        }
        let fill = self
            .colors
            .iter()
            .map(|c| {
                c.parse::<Rgba>()
                    .map_err(|e| eyre!("Invalid color '{}' in palette '{}': {}", c, name, e))
            })
            .collect::<Result<Vec<_>>>()?;
        Palette::new(name, fill)
    }
}

impl DebugConfig {
    pub fn merge(&mut self, other: Self) {
        let default = DebugConfig::default();
        if other.enabled != default.enabled {
            self.enabled = other.enabled;
        }
    }
}

// Default configuration template
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");
