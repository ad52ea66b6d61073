use polars::prelude::*;

use crate::data::error::ValidationError;
use crate::data::ingest::RawColumn;
use crate::data::schema::{
    coerce_price, coerce_volume, passthrough, PriceSchema, CANONICAL_COLUMNS, PRICE_COLUMNS,
    VOLUME_COLUMN,
};

/// A raw column under its normalized name.
#[derive(Debug, Clone)]
pub struct NamedColumn {
    pub name: String,
    pub raw: RawColumn,
}

/// Canonicalizer for price columns
pub struct Canonicalizer;

impl Canonicalizer {
    /// Output order: the canonical six, then extras in their original relative order.
    pub fn column_order(names: &[String]) -> Vec<String> {
        CANONICAL_COLUMNS
            .iter()
            .map(|name| name.to_string())
            .chain(PriceSchema::extras(names))
            .collect()
    }

    /// Assemble the typed value frame in canonical order.
    ///
    /// Assumes the canonical columns are present and names are unique; the
    /// validator checks both before calling this. Price columns that fail
    /// coercion are all reported together, before the volume check.
    pub fn canonicalize(columns: &[NamedColumn], file: &str) -> Result<DataFrame, ValidationError> {
        let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
        let lookup = |name: &str| columns.iter().find(|c| c.name == name).map(|c| &c.raw);

        let mut out: Vec<Column> = Vec::with_capacity(columns.len());
        let mut bad_prices = Vec::new();
        for name in PRICE_COLUMNS {
            let Some(raw) = lookup(name) else { continue };
            match coerce_price(name, raw) {
                Ok(column) => out.push(column),
                Err(bad) => bad_prices.push(bad),
            }
        }

        if let Some(first) = bad_prices.first() {
            return Err(ValidationError::NonNumericPrices {
                columns: bad_prices.iter().map(|bad| bad.column.clone()).collect(),
                example: first.to_string(),
                file: file.to_string(),
            });
        }

        if let Some(raw) = lookup(VOLUME_COLUMN) {
            let volume = coerce_volume(raw).map_err(|bad| ValidationError::NonNumericVolume {
                example: bad.to_string(),
                file: file.to_string(),
            })?;
            out.push(volume);
        }

        for name in PriceSchema::extras(&names) {
            if let Some(raw) = lookup(&name) {
                out.push(passthrough(&name, raw));
            }
        }

        DataFrame::new(out).map_err(|source| ValidationError::Assemble {
            file: file.to_string(),
            source,
        })
    }
}
