//! CSV loading. Reads a (possibly compressed) delimited file with polars and
//! converts the frame into a typed [`Dataset`].
//!
//! Every column is read as text and each cell is typed on its own with
//! [`Scalar::from_cell`], so a stray `n/a` in a numeric column neither fails
//! the load nor turns its neighbours into text.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::dataset::{Dataset, Scalar};
use crate::{CompressionFormat, OpenOptions};

pub const EMPTY_DATA_MESSAGE: &str = "The CSV file contains no data or is improperly formatted.";

/// Load a dataset from `path`.
///
/// Compression comes from `options` or the file extension. `.tsv` and `.psv`
/// files (optionally compressed, e.g. `data.tsv.gz`) default to tab and pipe
/// delimiters unless `options.delimiter` is set.
pub fn load(path: &Path, options: &OpenOptions) -> Result<Dataset> {
    if !path.exists() {
        return Err(eyre!("File not found: {}", path.display()));
    }
    if std::fs::metadata(path)?.len() == 0 {
        return Err(eyre!(EMPTY_DATA_MESSAGE));
    }

    let compression = options
        .compression
        .or_else(|| CompressionFormat::from_extension(path));
    let delimiter = options
        .delimiter
        .or_else(|| delimiter_from_extension(path, compression.is_some()))
        .unwrap_or(b',');
    debug!(path = %path.display(), ?compression, delimiter = %char::from(delimiter), "reading csv");

    let read_options = csv_read_options(options, delimiter);
    let df = match compression {
        Some(CompressionFormat::Bzip2) => {
            let file = File::open(path)?;
            let mut decoder = bzip2::read::BzDecoder::new(BufReader::new(file));
            read_decompressed(&mut decoder, read_options)?
        }
        Some(CompressionFormat::Xz) => {
            let file = File::open(path)?;
            let mut decoder = xz2::read::XzDecoder::new(BufReader::new(file));
            read_decompressed(&mut decoder, read_options)?
        }
        // polars handles gzip and zstd itself
        Some(CompressionFormat::Gzip) | Some(CompressionFormat::Zstd) | None => read_options
            .try_into_reader_with_file_path(Some(path.into()))?
            .finish()?,
    };

    let dataset = dataset_from_frame(&df)?;
    if dataset.is_empty() {
        return Err(eyre!(EMPTY_DATA_MESSAGE));
    }
    info!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.fields().len(),
        "loaded dataset"
    );
    Ok(dataset)
}

fn csv_read_options(options: &OpenOptions, delimiter: u8) -> CsvReadOptions {
    let mut read_options = CsvReadOptions::default();
    if let Some(skip_rows) = options.skip_rows {
        read_options.skip_rows = skip_rows;
    }
    if let Some(has_header) = options.has_header {
        read_options.has_header = has_header;
    }
    // zero-length inference reads every column as String
    read_options.infer_schema_length = Some(0);
    read_options.map_parse_options(|opts| opts.with_separator(delimiter))
}

fn read_decompressed(decoder: &mut impl Read, read_options: CsvReadOptions) -> Result<DataFrame> {
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    if decompressed.is_empty() {
        return Err(eyre!(EMPTY_DATA_MESSAGE));
    }
    let df = CsvReader::new(std::io::Cursor::new(decompressed))
        .with_options(read_options)
        .finish()?;
    Ok(df)
}

/// Delimiter implied by a `.tsv`/`.psv` extension, looking past a compression
/// suffix when the file is compressed.
fn delimiter_from_extension(path: &Path, compressed: bool) -> Option<u8> {
    let inner = if compressed {
        Path::new(path.file_stem()?)
    } else {
        path
    };
    match inner.extension()?.to_str()?.to_lowercase().as_str() {
        "tsv" => Some(b'\t'),
        "psv" => Some(b'|'),
        _ => None,
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Convert a frame into typed rows. Numeric columns become numbers, string
/// columns are typed cell by cell, and every other dtype (booleans, dates) is
/// carried as text.
pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset> {
    let height = df.height();
    let mut names = Vec::with_capacity(df.width());
    let mut columns: Vec<Vec<Scalar>> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        names.push(column.name().to_string());
        let dtype = column.dtype();
        let values: Vec<Scalar> = if matches!(dtype, DataType::Null) {
            vec![Scalar::Null; height]
        } else if is_numeric(dtype) {
            let cast = column.cast(&DataType::Float64)?;
            cast.f64()?.into_iter().map(Scalar::from).collect()
        } else if matches!(dtype, DataType::String) {
            column
                .str()?
                .into_iter()
                .map(|v| v.map_or(Scalar::Null, Scalar::from_cell))
                .collect()
        } else {
            let cast = column.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map_or(Scalar::Null, Scalar::from))
                .collect()
        };
        columns.push(values);
    }

    let mut rows: Vec<Vec<Scalar>> = (0..height).map(|_| Vec::with_capacity(names.len())).collect();
    for values in columns {
        for (row, value) in rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    Dataset::new(names, rows)
}
