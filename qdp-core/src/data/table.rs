//! The validated price table.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use crate::data::schema::INDEX_COLUMN;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01, for polars `Date` encoding.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

/// A daily price table that passed validation.
///
/// The date index is held apart from the value frame, one entry per row. It is
/// unique, strictly ascending, and has no missing entries. The frame holds
/// `open, high, low, close, adj_close, volume` in that order, followed by any
/// extra columns as text.
#[derive(Debug, Clone)]
pub struct PriceTable {
    source: String,
    index: Vec<NaiveDate>,
    frame: DataFrame,
}

impl PriceTable {
    pub(crate) fn new(source: String, index: Vec<NaiveDate>, frame: DataFrame) -> Self {
        debug_assert_eq!(index.len(), frame.height());
        Self {
            source,
            index,
            frame,
        }
    }

    /// File name the table was read from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    /// Value columns, without the index.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.index.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.index.last().copied()
    }

    /// A single frame with a leading `date` column of polars `Date` type.
    ///
    /// Fails with `PolarsError::Duplicate` when a retained extra column is
    /// itself named `date`; the table stays usable through [`Self::index`]
    /// and [`Self::frame`].
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        if self.frame.column(INDEX_COLUMN).is_ok() {
            return Err(PolarsError::Duplicate(
                format!(
                    "column '{INDEX_COLUMN}' in {} clashes with the date index",
                    self.source
                )
                .into(),
            ));
        }

        let days: Vec<i32> = self
            .index
            .iter()
            .map(|date| date.num_days_from_ce() - UNIX_EPOCH_CE_DAYS)
            .collect();
        let dates = Column::new(INDEX_COLUMN.into(), days).cast(&DataType::Date)?;

        let mut columns = Vec::with_capacity(self.frame.width() + 1);
        columns.push(dates);
        columns.extend(self.frame.get_columns().iter().cloned());
        DataFrame::new(columns)
    }

    /// Deterministic BLAKE3 digest over the index, column names, and every cell.
    ///
    /// Two tables with the same content in the same order hash identically,
    /// regardless of which file they came from.
    pub fn fingerprint(&self) -> PolarsResult<String> {
        let mut hasher = blake3::Hasher::new();

        for date in &self.index {
            hasher.update(date.to_string().as_bytes());
        }

        for column in self.frame.get_columns() {
            hash_cell(&mut hasher, Some(column.name().as_bytes()));
            hash_cell(&mut hasher, Some(column.dtype().to_string().as_bytes()));
            match column.dtype() {
                DataType::Float64 => {
                    for value in column.f64()? {
                        hash_cell(&mut hasher, value.map(f64::to_le_bytes).as_ref());
                    }
                }
                DataType::Int64 => {
                    for value in column.i64()? {
                        hash_cell(&mut hasher, value.map(i64::to_le_bytes).as_ref());
                    }
                }
                _ => {
                    let text = column.cast(&DataType::String)?;
                    for value in text.str()? {
                        hash_cell(&mut hasher, value.map(str::as_bytes));
                    }
                }
            }
        }

        Ok(hasher.finalize().to_hex().to_string())
    }
}

fn hash_cell(hasher: &mut blake3::Hasher, cell: Option<impl AsRef<[u8]>>) {
    match cell {
        Some(bytes) => {
            let bytes = bytes.as_ref();
            hasher.update(&[1]);
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        None => {
            hasher.update(&[0]);
        }
    }
}
