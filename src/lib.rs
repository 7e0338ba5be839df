//! csvviz: infer field types from CSV data and derive chart series from
//! field-to-role bindings.
//!
//! The pipeline is `source::load` (file to [`Dataset`], with a [`Field`] per
//! column) then a [`ChartSpec`] edited through a [`ChartEditor`], aggregated by
//! [`SeriesAggregator`] into a [`DerivedSeries`] and rendered as a
//! [`RenderSpec`] document.

pub mod advisor;
pub mod board;
pub mod chart_data;
pub mod chart_spec;
pub mod config;
pub mod dataset;
pub mod editor;
pub mod field;
pub mod logging;
pub mod palette;
pub mod render_spec;
pub mod source;

pub use advisor::suggest_chart_kind;
pub use board::ChartBoard;
pub use chart_data::{aggregate, DerivedSeries, SeriesAggregator};
pub use chart_spec::{
    BindingIssue, ChartId, ChartKind, ChartSpec, DisplayOptions, FieldFilter, LegendPosition, Role,
};
pub use config::{AppConfig, ConfigManager};
pub use dataset::{parse_numeric_or_zero, Dataset, Row, Scalar};
pub use editor::ChartEditor;
pub use field::{infer_field_type, Field, FieldType};
pub use palette::{Palette, PaletteSet, Rgba};
pub use render_spec::RenderSpec;

/// Re-export CLI definitions
pub use csvviz_cli::{Args, CompressionFormat};

/// Application name used for the config directory and log filter
pub const APP_NAME: &str = "csvviz";

/// How a file is read into a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenOptions {
    pub delimiter: Option<u8>,
    pub has_header: Option<bool>,
    pub skip_rows: Option<usize>,
    pub compression: Option<CompressionFormat>,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self {
            delimiter: None,
            has_header: None,
            skip_rows: None,
            compression: None,
        }
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = Some(skip_rows);
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = Some(has_header);
        self
    }

    pub fn with_compression(mut self, compression: CompressionFormat) -> Self {
        self.compression = Some(compression);
        self
    }
}

impl OpenOptions {
    /// Create OpenOptions from CLI args and config, with CLI args taking precedence
    pub fn from_args_and_config(args: &Args, config: &AppConfig) -> Self {
        let file_loading = &config.file_loading;
        let mut opts = OpenOptions::new();

        opts.delimiter = args.delimiter.or(file_loading.delimiter);
        opts.skip_rows = args.skip_rows.or(file_loading.skip_rows);

        // CLI no_header flag overrides config
        opts.has_header = match args.no_header {
            Some(no_header) => Some(!no_header),
            None => file_loading.has_header,
        };

        // An invalid config value is rejected by AppConfig::validate
        opts.compression = args
            .compression
            .or_else(|| file_loading.compression_format().ok().flatten());

        opts
    }
}
