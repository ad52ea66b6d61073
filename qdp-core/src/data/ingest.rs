//! Path resolution and the CSV read.
//!
//! The reader infers no types: every column comes back as text and the
//! validator coerces it later.

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::data::error::ValidationError;

/// Resolves file names under a raw-data directory and reads them as text frames.
#[derive(Debug, Clone)]
pub struct DataIngestor {
    data_dir: PathBuf,
}

impl DataIngestor {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolve `name` to an existing regular file under the data directory.
    ///
    /// The name is joined as given; no extension is appended.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ValidationError> {
        if !self.data_dir.is_dir() {
            return Err(ValidationError::DataDirNotFound {
                path: absolute(&self.data_dir),
            });
        }

        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let path = self.data_dir.join(name);
        if !path.is_file() {
            return Err(ValidationError::FileNotFound {
                path: absolute(&path),
            });
        }

        debug!(path = %path.display(), "resolved input file");
        Ok(path)
    }

    /// Read a CSV file with a header row, every column as text.
    ///
    /// The file handle lives only for the duration of this call.
    pub fn read_csv(&self, path: &Path) -> Result<DataFrame, ValidationError> {
        let file_name = source_name(path);
        let read_err = |source: PolarsError| ValidationError::Read {
            file: file_name.clone(),
            source,
        };

        let file = File::open(path).map_err(|e| read_err(e.into()))?;
        let options = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0));
        let df = options
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(read_err)?;

        debug!(file = %file_name, rows = df.height(), columns = df.width(), "read raw CSV");
        Ok(df)
    }
}

/// One column of the raw file: its header as written and its cells as text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub header: String,
    pub cells: Vec<Option<String>>,
}

/// Flatten a frame into text columns, in file order.
pub fn text_columns(df: &DataFrame) -> PolarsResult<Vec<RawColumn>> {
    df.get_columns()
        .iter()
        .map(|column| {
            let text = column.cast(&DataType::String)?;
            let cells = text
                .str()?
                .into_iter()
                .map(|cell| cell.map(str::to_string))
                .collect();
            Ok(RawColumn {
                header: column.name().to_string(),
                cells,
            })
        })
        .collect()
}

/// File name used in diagnostics.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Anchor a relative path at the working directory for error messages.
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
