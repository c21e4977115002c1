//! Catalog ingestion.
//!
//! Assessments enter the system here. A CSV catalog with `Name`, `URL`,
//! `Category` and `Description` columns is decoded into
//! [`RawCatalogRecord`]s, cleaned, and frozen into a read-only [`Catalog`].
//!
//! ## What cleaning does
//!
//! - Trims every field and drops rows without a name or URL
//! - Drops repeated names, then repeated URLs (first occurrence wins)
//! - Fills a missing category with `Other` (or a keyword guess when
//!   [`CatalogConfig::infer_missing_categories`] is set)
//! - Maps category labels onto the closed [`Category`] set
//!
//! Loading logs a single structured `catalog_loaded` event with the
//! [`CleanReport`] counters, or `catalog_load_failure` on error.
//!
//! ## Example
//!
//! ```
//! use ingest::{load_catalog, CatalogConfig, Category};
//!
//! let csv = "Name,URL,Category,Description\n\
//!            Core Java,https://example.com/java,Coding,Object-oriented programming\n\
//!            Verify Numerical,https://example.com/num,Cognitive Ability,\n";
//! let (catalog, report) = load_catalog(csv.as_bytes(), &CatalogConfig::default()).unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.items()[1].category, Category::CognitiveAbility);
//! assert_eq!(report.dropped(), 0);
//! ```
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use tracing::{info, warn, Level};

mod catalog;
mod config;
mod error;
mod types;

pub use crate::catalog::{Catalog, CleanReport};
pub use crate::config::CatalogConfig;
pub use crate::error::IngestError;
pub use crate::types::{CatalogId, CatalogItem, Category, RawCatalogRecord};

const REQUIRED_COLUMNS: [&str; 2] = ["Name", "URL"];

/// Decodes a CSV catalog from any reader and cleans it.
pub fn load_catalog<R: Read>(
    reader: R,
    cfg: &CatalogConfig,
) -> Result<(Catalog, CleanReport), IngestError> {
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "ingest.load_catalog");
    let _guard = span.enter();

    match load_catalog_inner(reader, cfg) {
        Ok((catalog, report)) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                rows_read = report.rows_read,
                kept = report.kept,
                missing_name_or_url = report.missing_name_or_url,
                duplicate_name = report.duplicate_name,
                duplicate_url = report.duplicate_url,
                category_defaulted = report.category_defaulted,
                elapsed_micros,
                "catalog_loaded"
            );
            Ok((catalog, report))
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "catalog_load_failure");
            Err(err)
        }
    }
}

/// Opens `path` and loads it with [`load_catalog`].
pub fn load_catalog_from_path(
    path: impl AsRef<Path>,
    cfg: &CatalogConfig,
) -> Result<(Catalog, CleanReport), IngestError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|err| IngestError::Io(format!("{}: {err}", path.display())))?;
    load_catalog(file, cfg)
}

fn load_catalog_inner<R: Read>(
    reader: R,
    cfg: &CatalogConfig,
) -> Result<(Catalog, CleanReport), IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(IngestError::MissingColumn(column));
        }
    }

    let records = rdr
        .deserialize::<RawCatalogRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    Catalog::from_records(records, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_cleans_csv() {
        let csv = "Name,URL,Category,Description\n\
                   Core Java,https://x/java,Coding,OOP\n\
                   Core Java,https://x/java2,Coding,dup name\n\
                   ,https://x/none,Coding,no name\n\
                   OPQ,https://x/opq,,personality\n";
        let (catalog, report) =
            load_catalog(csv.as_bytes(), &CatalogConfig::default()).expect("catalog loads");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[1].category, Category::Other);
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.duplicate_name, 1);
        assert_eq!(report.missing_name_or_url, 1);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let csv = "Name,URL,Category,Description\n\
                   \"SQL, Advanced\",https://x/sql,Coding,\"joins, windows\"\n";
        let (catalog, _) =
            load_catalog(csv.as_bytes(), &CatalogConfig::default()).expect("catalog loads");
        assert_eq!(catalog.items()[0].name, "SQL, Advanced");
        assert_eq!(catalog.items()[0].description, "joins, windows");
    }

    #[test]
    fn description_column_is_optional() {
        let csv = "Name,URL,Category\nA,https://x/a,Language\n";
        let (catalog, _) =
            load_catalog(csv.as_bytes(), &CatalogConfig::default()).expect("catalog loads");
        assert_eq!(catalog.items()[0].description, "");
    }

    #[test]
    fn missing_url_column_rejected() {
        let csv = "Name,Category\nA,Coding\n";
        let res = load_catalog(csv.as_bytes(), &CatalogConfig::default());
        assert_eq!(res.err(), Some(IngestError::MissingColumn("URL")));
    }

    #[test]
    fn missing_file_is_io_error() {
        let res = load_catalog_from_path("/nonexistent/catalog.csv", &CatalogConfig::default());
        assert!(matches!(res, Err(IngestError::Io(_))));
    }
}
