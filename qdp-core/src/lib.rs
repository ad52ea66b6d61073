//! QDP Core: validation gate for historical daily price files.
//!
//! Given a file name, this crate reads one CSV from a raw-data directory and
//! returns a table with:
//! - a date index that is complete, unique, strictly ascending, and tz-naive
//! - the columns `open, high, low, close, adj_close, volume` first, in that order
//! - numeric prices and volume
//! - any extra columns kept afterwards as text, reported as a warning
//!
//! Any violation is a hard failure with a specific [`data::ValidationError`].

pub mod config;
pub mod data;

pub use config::{ConfigError, ValidatorConfig};
pub use data::{PriceTable, Validated, ValidationError, ValidationWarning, Validator};
