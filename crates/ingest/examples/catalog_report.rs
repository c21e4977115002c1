//! Loads a catalog CSV and prints what cleaning kept and dropped.
//!
//! ```text
//! cargo run -p assessrec-ingest --example catalog_report -- data/catalog.csv
//! ```

use ingest::{load_catalog_from_path, CatalogConfig};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/catalog.csv".to_string());

    let (catalog, report) = match load_catalog_from_path(&path, &CatalogConfig::default()) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("failed to load {path}: {err}");
            std::process::exit(1);
        }
    };

    println!("{path}: {} rows read, {} kept", report.rows_read, report.kept);
    println!("  missing name or url: {}", report.missing_name_or_url);
    println!("  duplicate name:      {}", report.duplicate_name);
    println!("  duplicate url:       {}", report.duplicate_url);
    println!("  category defaulted:  {}", report.category_defaulted);

    for (category, count) in catalog.category_counts() {
        println!("{:<24} {count}", category.label());
    }
}
