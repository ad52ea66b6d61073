use polars::prelude::*;
use std::collections::HashSet;

use crate::data::error::ValidationError;
use crate::data::ingest::RawColumn;

/// Name of the date column in frames handed to downstream consumers.
pub const INDEX_COLUMN: &str = "date";

/// Canonical price columns, in output order.
pub const PRICE_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "adj_close"];

pub const VOLUME_COLUMN: &str = "volume";

/// The six required columns, in output order.
pub const CANONICAL_COLUMNS: [&str; 6] = ["open", "high", "low", "close", "adj_close", "volume"];

/// Expected schema for daily price data
pub struct PriceSchema;

impl PriceSchema {
    /// Normalize a raw header: drop byte-order marks, trim, lower-case, spaces to underscores.
    pub fn normalize_header(raw: &str) -> String {
        raw.replace('\u{feff}', "")
            .trim()
            .to_lowercase()
            .replace(' ', "_")
    }

    /// Whether a raw header names the date column, tolerating BOM and padding.
    pub fn is_date_header(raw: &str, date_column: &str) -> bool {
        raw.replace('\u{feff}', "").trim() == date_column
    }

    pub fn is_canonical(name: &str) -> bool {
        CANONICAL_COLUMNS.contains(&name)
    }

    /// Fail if two normalized names collide.
    pub fn check_unique(names: &[String], file: &str) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(names.len());

        let mut collisions: Vec<String> = Vec::new();
        for name in names {
            if !seen.insert(name.as_str()) && !collisions.contains(name) {
                collisions.push(name.clone());
            }
        }

        if collisions.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::DuplicateColumns {
                columns: collisions,
                file: file.to_string(),
            })
        }
    }

    /// Canonical columns absent from `names`, in canonical order.
    pub fn missing(names: &[String]) -> Vec<String> {
        CANONICAL_COLUMNS
            .iter()
            .filter(|required| !names.iter().any(|name| name == *required))
            .map(|required| required.to_string())
            .collect()
    }

    /// Non-canonical columns, in their original relative order.
    pub fn extras(names: &[String]) -> Vec<String> {
        names
            .iter()
            .filter(|name| !Self::is_canonical(name))
            .cloned()
            .collect()
    }
}

/// A text column that failed numeric coercion, with its first bad cell.
#[derive(Debug, Clone, PartialEq)]
pub struct BadCell {
    pub column: String,
    pub row: usize,
    pub value: String,
}

impl std::fmt::Display for BadCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[row {}] = {:?}", self.column, self.row, self.value)
    }
}

fn first_bad_cell<T>(
    name: &str,
    cells: &[Option<String>],
    parse: impl Fn(&str) -> Option<T>,
) -> Option<BadCell> {
    cells.iter().enumerate().find_map(|(row, cell)| {
        let value = cell.as_deref()?.trim();
        if value.is_empty() || parse(value).is_some() {
            return None;
        }
        Some(BadCell {
            column: name.to_string(),
            row,
            value: value.to_string(),
        })
    })
}

fn parse_cells<T>(cells: &[Option<String>], parse: impl Fn(&str) -> Option<T>) -> Vec<Option<T>> {
    cells
        .iter()
        .map(|cell| {
            cell.as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .and_then(&parse)
        })
        .collect()
}

/// Coerce a price column to `Float64`. Empty cells become nulls.
pub fn coerce_price(name: &str, column: &RawColumn) -> Result<Column, BadCell> {
    let parse = |value: &str| value.parse::<f64>().ok();
    if let Some(bad) = first_bad_cell(name, &column.cells, parse) {
        return Err(bad);
    }
    Ok(Column::new(name.into(), parse_cells(&column.cells, parse)))
}

/// Coerce the volume column: `Int64` when every present cell is an integer,
/// otherwise `Float64`.
pub fn coerce_volume(column: &RawColumn) -> Result<Column, BadCell> {
    let as_int = |value: &str| value.parse::<i64>().ok();
    if first_bad_cell(VOLUME_COLUMN, &column.cells, as_int).is_none() {
        return Ok(Column::new(
            VOLUME_COLUMN.into(),
            parse_cells(&column.cells, as_int),
        ));
    }
    coerce_price(VOLUME_COLUMN, column)
}

/// Keep an extra column as text, untouched.
pub fn passthrough(name: &str, column: &RawColumn) -> Column {
    let cells: Vec<Option<&str>> = column.cells.iter().map(|cell| cell.as_deref()).collect();
    Column::new(name.into(), cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(header: &str, cells: &[&str]) -> RawColumn {
        RawColumn {
            header: header.to_string(),
            cells: cells
                .iter()
                .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                .collect(),
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_normalize_header_handles_bom_and_padding() {
        assert_eq!(PriceSchema::normalize_header(" \u{feff}Adj Close "), "adj_close");
        assert_eq!(PriceSchema::normalize_header("\u{feff}Open"), "open");
        assert_eq!(PriceSchema::normalize_header("VOLUME"), "volume");
        assert_eq!(PriceSchema::normalize_header("Stock Splits"), "stock_splits");
    }

    #[test]
    fn test_date_header_match_is_case_sensitive() {
        assert!(PriceSchema::is_date_header("\u{feff}Date", "Date"));
        assert!(PriceSchema::is_date_header(" Date ", "Date"));
        assert!(!PriceSchema::is_date_header("date", "Date"));
    }

    #[test]
    fn test_missing_lists_canonical_order() {
        let found = names(&["close", "open", "high"]);
        assert_eq!(PriceSchema::missing(&found), names(&["low", "adj_close", "volume"]));
    }

    #[test]
    fn test_extras_keep_relative_order() {
        let found = names(&["dividends", "open", "stock_splits", "close"]);
        assert_eq!(PriceSchema::extras(&found), names(&["dividends", "stock_splits"]));
    }

    #[test]
    fn test_check_unique_rejects_collisions() {
        let found = names(&["close", "open", "close", "volume", "volume", "close"]);
        let err = PriceSchema::check_unique(&found, "SPY.csv").unwrap_err();
        match err {
            ValidationError::DuplicateColumns { columns, .. } => {
                assert_eq!(columns, names(&["close", "volume"]));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_unique_allows_extra_named_date() {
        let found = names(&["open", "high", "low", "close", "adj_close", "volume", "date"]);
        assert!(PriceSchema::check_unique(&found, "SPY.csv").is_ok());
    }

    #[test]
    fn test_coerce_price_parses_floats_and_nulls() {
        let column = coerce_price("close", &raw("Close", &["1.5", "", " 2 "])).unwrap();
        assert_eq!(column.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = column.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.5), None, Some(2.0)]);
    }

    #[test]
    fn test_coerce_price_reports_first_bad_cell() {
        let bad = coerce_price("close", &raw("Close", &["1.5", "N/A", "1,234"])).unwrap_err();
        assert_eq!(bad.row, 1);
        assert_eq!(bad.value, "N/A");
        assert_eq!(bad.to_string(), r#"close[row 1] = "N/A""#);
    }

    #[test]
    fn test_coerce_volume_prefers_integers() {
        let column = coerce_volume(&raw("Volume", &["100", "", "300"])).unwrap();
        assert_eq!(column.dtype(), &DataType::Int64);

        let column = coerce_volume(&raw("Volume", &["100", "250.5"])).unwrap();
        assert_eq!(column.dtype(), &DataType::Float64);
    }

    #[test]
    fn test_coerce_volume_rejects_thousand_separators() {
        let bad = coerce_volume(&raw("Volume", &["1,000"])).unwrap_err();
        assert_eq!(bad.column, "volume");
        assert_eq!(bad.value, "1,000");
    }

    #[test]
    fn test_passthrough_stays_text() {
        let column = passthrough("dividends", &raw("Dividends", &["0.25", ""]));
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.name().as_str(), "dividends");
    }
}
