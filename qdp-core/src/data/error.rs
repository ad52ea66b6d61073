//! Structured error types for validation.
//!
//! Every variant names the source file (or the resolved path) and the specific
//! offending value or column, so a failure can be diagnosed from the message alone.

use chrono::NaiveDate;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Broad failure category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing directory, empty name, or missing file.
    NotFound,
    /// The file exists but could not be read as CSV, or the frame could not be built.
    Io,
    /// Bad dates or a broken column set.
    InvalidValue,
    /// A canonical column holds non-numeric data.
    InvalidType,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("data directory not found: {}", path.display())]
    DataDirNotFound { path: PathBuf },

    #[error("you must provide a non-empty file name")]
    EmptyName,

    #[error("CSV file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read CSV {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: PolarsError,
    },

    #[error("failed to assemble validated table for {file}: {source}")]
    Assemble {
        file: String,
        #[source]
        source: PolarsError,
    },

    #[error("no '{column}' column in {file}; found columns: {found:?}")]
    MissingDateColumn {
        column: String,
        found: Vec<String>,
        file: String,
    },

    #[error("unparseable dates detected: {count} rows in {file} (e.g., {example:?})")]
    UnparseableDates {
        count: usize,
        example: String,
        file: String,
    },

    #[error("duplicate dates in index (e.g., {date}) in {file}")]
    DuplicateDate { date: NaiveDate, file: String },

    #[error("dates not sorted ascending around {prev} -> {next} in {file}")]
    NotAscending {
        prev: NaiveDate,
        next: NaiveDate,
        file: String,
    },

    #[error("column names collide after normalization {columns:?} in {file}")]
    DuplicateColumns { columns: Vec<String>, file: String },

    #[error("missing required columns {missing:?} in {file}; found columns: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
        file: String,
    },

    #[error(
        "non-numeric price columns {columns:?} in {file} (first bad cell: {example}); \
         check thousand separators/locale or bad cells"
    )]
    NonNumericPrices {
        columns: Vec<String>,
        example: String,
        file: String,
    },

    #[error(
        "'volume' must be numeric in {file} (first bad cell: {example}); \
         check thousand separators/locale or bad cells"
    )]
    NonNumericVolume { example: String, file: String },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DataDirNotFound { .. } | Self::EmptyName | Self::FileNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::Read { .. } | Self::Assemble { .. } => ErrorKind::Io,
            Self::MissingDateColumn { .. }
            | Self::UnparseableDates { .. }
            | Self::DuplicateDate { .. }
            | Self::NotAscending { .. }
            | Self::DuplicateColumns { .. }
            | Self::MissingColumns { .. } => ErrorKind::InvalidValue,
            Self::NonNumericPrices { .. } | Self::NonNumericVolume { .. } => {
                ErrorKind::InvalidType
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ascending_message_names_both_dates_and_file() {
        let err = ValidationError::NotAscending {
            prev: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            next: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            file: "SPY.csv".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2020-01-02 -> 2020-01-01"));
        assert!(msg.contains("SPY.csv"));
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn missing_columns_message_lists_missing_and_found() {
        let err = ValidationError::MissingColumns {
            missing: vec!["volume".into()],
            found: vec!["open".into(), "close".into()],
            file: "SPY.csv".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains(r#"["volume"]"#));
        assert!(msg.contains(r#"["open", "close"]"#));
    }

    #[test]
    fn type_errors_hint_at_locale() {
        let err = ValidationError::NonNumericVolume {
            example: r#"volume[row 1] = "1,000""#.into(),
            file: "SPY.csv".into(),
        };
        assert!(err.to_string().contains("thousand separators"));
        assert_eq!(err.kind(), ErrorKind::InvalidType);
    }

    #[test]
    fn resource_errors_are_not_found() {
        assert_eq!(ValidationError::EmptyName.kind(), ErrorKind::NotFound);
        let err = ValidationError::FileNotFound {
            path: PathBuf::from("/tmp/data/raw/SPY.csv"),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("/tmp/data/raw/SPY.csv"));
    }
}
