//! Validator configuration.
//!
//! The raw-data directory is passed in explicitly rather than assumed from the
//! process working directory. The default still points at `data/raw`, which a
//! relative path resolves against the working directory at validation time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default directory holding raw price files.
pub const DEFAULT_DATA_DIR: &str = "data/raw";

/// Default name of the row-key column in the CSV header.
pub const DEFAULT_DATE_COLUMN: &str = "Date";

/// Settings for a [`crate::data::Validator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Directory the file name is resolved against.
    pub data_dir: PathBuf,
    /// Header of the column used as the date index.
    pub date_column: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
        }
    }
}

impl ValidatorConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
