//! Shared fixtures: a throwaway `data/raw` directory and CSV writers.

#![allow(dead_code)]

use polars::prelude::*;
use qdp_core::{PriceTable, Validator, ValidatorConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: &str = "Date,Open,High,Low,Close,Adj Close,Volume";

/// A temp root with `data/raw` inside it, removed on drop.
pub struct RawDir {
    _root: TempDir,
    pub dir: PathBuf,
}

impl RawDir {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("data").join("raw");
        std::fs::create_dir_all(&dir).unwrap();
        Self { _root: root, dir }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, name: &str, content: &str) {
        std::fs::write(self.dir.join(name), content).unwrap();
    }

    /// Write rows as CSV through the `csv` crate, quoting where needed.
    pub fn write_records(&self, name: &str, header: &[&str], rows: &[Vec<String>]) {
        let mut wtr = csv::Writer::from_path(self.dir.join(name)).unwrap();
        wtr.write_record(header).unwrap();
        for row in rows {
            wtr.write_record(row).unwrap();
        }
        wtr.flush().unwrap();
    }

    pub fn validator(&self) -> Validator {
        Validator::new(ValidatorConfig::default().with_data_dir(&self.dir))
    }
}

/// One well-formed price row for `date`.
pub fn price_row(date: &str, close: f64) -> String {
    format!(
        "{date},{open},{high},{low},{close},{close},{volume}",
        open = close - 0.5,
        high = close + 1.0,
        low = close - 1.0,
        volume = 1_000_000
    )
}

/// A CSV with the standard header and one row per date.
pub fn price_csv(dates: &[&str]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for (i, date) in dates.iter().enumerate() {
        out.push_str(&price_row(date, 100.0 + i as f64));
        out.push('\n');
    }
    out
}

/// Render a validated table back to CSV rows, `Date` first.
pub fn table_records(table: &PriceTable) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = vec!["Date".to_string()];
    header.extend(table.column_names());

    let mut rows: Vec<Vec<String>> = table
        .index()
        .iter()
        .map(|date| vec![date.to_string()])
        .collect();

    for column in table.frame().get_columns() {
        let cells: Vec<String> = match column.dtype() {
            DataType::Float64 => column
                .f64()
                .unwrap()
                .into_iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default())
                .collect(),
            DataType::Int64 => column
                .i64()
                .unwrap()
                .into_iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default())
                .collect(),
            _ => column
                .str()
                .unwrap()
                .into_iter()
                .map(|v| v.unwrap_or_default().to_string())
                .collect(),
        };
        for (row, cell) in rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    (header, rows)
}
