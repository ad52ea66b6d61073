//! The validation gate.
//!
//! Checks run in a fixed order and the first failure aborts:
//! 1. path resolution (directory, name, file)
//! 2. CSV read with every column as text
//! 3. date index parse, tz strip, and truncation to whole days
//! 4. index completeness, uniqueness, strict ascending order
//! 5. header normalization
//! 6. required canonical columns
//! 7. extra columns (kept, with a warning)
//! 8. canonical-then-extras ordering
//! 9. numeric types for prices and volume

use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ValidatorConfig;
use crate::data::canonicalize::{Canonicalizer, NamedColumn};
use crate::data::error::ValidationError;
use crate::data::index::{check_index, parse_index};
use crate::data::ingest::{source_name, text_columns, DataIngestor, RawColumn};
use crate::data::schema::PriceSchema;
use crate::data::table::PriceTable;

/// Non-fatal finding attached to a successful validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// Columns outside the canonical six were kept after them, unchecked.
    ExtraColumns { columns: Vec<String>, file: String },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtraColumns { columns, file } => {
                write!(f, "extra columns retained for {file}: {columns:?}")
            }
        }
    }
}

/// A validated table together with the warnings raised while producing it.
#[derive(Debug, Clone)]
pub struct Validated {
    pub table: PriceTable,
    pub warnings: Vec<ValidationWarning>,
}

/// Reads one CSV file from the configured directory and validates it.
#[derive(Debug, Clone)]
pub struct Validator {
    ingestor: DataIngestor,
    date_column: String,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            ingestor: DataIngestor::new(config.data_dir),
            date_column: config.date_column,
        }
    }

    /// Resolve, read, and validate `name` under the data directory.
    pub fn validate(&self, name: &str) -> Result<Validated, ValidationError> {
        let path = self.ingestor.resolve(name)?;
        let raw = self.ingestor.read_csv(&path)?;
        self.validate_frame(&raw, &source_name(&path))
    }

    /// Run the content checks over an already-read frame.
    ///
    /// `file` is only used in diagnostics.
    pub fn validate_frame(&self, raw: &DataFrame, file: &str) -> Result<Validated, ValidationError> {
        let columns = text_columns(raw).map_err(|source| ValidationError::Read {
            file: file.to_string(),
            source,
        })?;

        let (date_cells, value_columns) = self.split_date_column(columns, file)?;

        let index = parse_index(&date_cells, file)?;
        check_index(&index, file)?;
        debug!(file, rows = index.len(), "date index is clean");

        let named: Vec<NamedColumn> = value_columns
            .into_iter()
            .map(|raw| NamedColumn {
                name: PriceSchema::normalize_header(&raw.header),
                raw,
            })
            .collect();
        let names: Vec<String> = named.iter().map(|c| c.name.clone()).collect();

        PriceSchema::check_unique(&names, file)?;

        let missing = PriceSchema::missing(&names);
        if !missing.is_empty() {
            return Err(ValidationError::MissingColumns {
                missing,
                found: names,
                file: file.to_string(),
            });
        }

        let mut warnings = Vec::new();
        let extras = PriceSchema::extras(&names);
        if !extras.is_empty() {
            warn!(file, columns = ?extras, "extra columns retained");
            warnings.push(ValidationWarning::ExtraColumns {
                columns: extras,
                file: file.to_string(),
            });
        }

        let frame = Canonicalizer::canonicalize(&named, file)?;
        info!(file, rows = frame.height(), columns = frame.width(), "validated");

        Ok(Validated {
            table: PriceTable::new(file.to_string(), index, frame),
            warnings,
        })
    }

    /// Pull the date column out of the raw columns, leaving the rest in file order.
    fn split_date_column(
        &self,
        mut columns: Vec<RawColumn>,
        file: &str,
    ) -> Result<(Vec<Option<String>>, Vec<RawColumn>), ValidationError> {
        let position = columns
            .iter()
            .position(|c| PriceSchema::is_date_header(&c.header, &self.date_column));

        match position {
            Some(i) => {
                let date = columns.remove(i);
                Ok((date.cells, columns))
            }
            None => Err(ValidationError::MissingDateColumn {
                column: self.date_column.clone(),
                found: columns.into_iter().map(|c| c.header).collect(),
                file: file.to_string(),
            }),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}
