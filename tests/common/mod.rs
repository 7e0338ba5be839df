#![allow(dead_code)]

use csvviz::{Dataset, Scalar};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Write raw text to `dir/name` and return the path.
pub fn write_text(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Write a frame as CSV to `dir/name` and return the path.
pub fn write_frame(dir: &Path, name: &str, df: &mut DataFrame) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    path
}

/// A small sales table: region, channel, amount and order date.
pub fn sales_frame() -> DataFrame {
    df!(
        "Region" => &["North", "North", "South", "East", "South", "North"],
        "Channel" => &["Online", "Store", "Online", "Online", "Store", "Online"],
        "Sales" => &[3.0, 5.0, 2.0, 7.0, 4.0, 1.0],
        "Order Date" => &["2023-01-01", "2023-01-01", "2023-01-02", "2023-01-02", "2023-01-03", "2023-01-03"]
    )
    .unwrap()
}

/// Dataset with `Label`/`Value` columns from (label, value) pairs.
pub fn labelled(pairs: &[(&str, f64)]) -> Dataset {
    Dataset::new(
        vec!["Label".into(), "Value".into()],
        pairs
            .iter()
            .map(|(label, value)| vec![Scalar::from(*label), Scalar::from(*value)])
            .collect(),
    )
    .unwrap()
}
