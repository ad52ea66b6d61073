//! Price file ingestion and validation

pub mod canonicalize;
pub mod error;
pub mod index;
pub mod ingest;
pub mod schema;
pub mod table;
pub mod validator;

pub use canonicalize::Canonicalizer;
pub use error::{ErrorKind, ValidationError};
pub use ingest::DataIngestor;
pub use schema::{PriceSchema, CANONICAL_COLUMNS};
pub use table::PriceTable;
pub use validator::{Validated, ValidationWarning, Validator};
