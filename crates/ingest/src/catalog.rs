use std::collections::HashSet;

use serde::Serialize;

use crate::config::CatalogConfig;
use crate::error::IngestError;
use crate::types::{CatalogId, CatalogItem, Category, RawCatalogRecord};

/// Counts of rows removed during cleaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_read: usize,
    pub kept: usize,
    pub missing_name_or_url: usize,
    pub duplicate_name: usize,
    pub duplicate_url: usize,
    pub category_defaulted: usize,
}

impl CleanReport {
    pub fn dropped(&self) -> usize {
        self.missing_name_or_url + self.duplicate_name + self.duplicate_url
    }
}

/// The read-only assessment catalog.
///
/// Items are stored in cleaned row order and `items[i].id == CatalogId(i)`
/// always holds.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Cleans raw rows and assigns ids in surviving order.
    ///
    /// Cleaning trims every field, drops rows whose name or URL is blank,
    /// drops repeated names and then repeated URLs (first occurrence wins,
    /// each step can be switched off), and fills a missing category with
    /// `Other` or an inferred one.
    pub fn from_records<I>(
        records: I,
        cfg: &CatalogConfig,
    ) -> Result<(Catalog, CleanReport), IngestError>
    where
        I: IntoIterator<Item = RawCatalogRecord>,
    {
        cfg.validate()?;

        let mut report = CleanReport::default();
        let mut seen_names: HashSet<String> = HashSet::new();
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut items = Vec::new();

        for record in records {
            report.rows_read += 1;

            let (Some(name), Some(url)) = (non_blank(record.name), non_blank(record.url)) else {
                report.missing_name_or_url += 1;
                continue;
            };
            if cfg.dedupe_names && !seen_names.insert(name.clone()) {
                report.duplicate_name += 1;
                continue;
            }
            if cfg.dedupe_urls && !seen_urls.insert(url.clone()) {
                report.duplicate_url += 1;
                continue;
            }

            let mut description = non_blank(record.description).unwrap_or_default();
            if let Some(limit) = cfg.max_description_chars {
                if let Some((cut, _)) = description.char_indices().nth(limit) {
                    description.truncate(cut);
                }
            }

            let category = match non_blank(record.category) {
                Some(label) => Category::from_label(&label),
                None => {
                    report.category_defaulted += 1;
                    if cfg.infer_missing_categories {
                        Category::infer_from_text(&format!("{name} {description}"))
                    } else {
                        Category::Other
                    }
                }
            };

            items.push(CatalogItem {
                id: CatalogId(items.len()),
                name,
                url,
                category,
                description,
            });
        }

        if items.is_empty() {
            return Err(IngestError::EmptyCatalog);
        }
        report.kept = items.len();
        Ok((Catalog { items }, report))
    }

    pub fn get(&self, id: CatalogId) -> Option<&CatalogItem> {
        self.items.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Per-item embedding text in id order, ready for a batch embed call.
    pub fn embedding_texts(&self) -> Vec<String> {
        self.items.iter().map(CatalogItem::embedding_text).collect()
    }

    /// Number of items per category, in category order.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|category| {
                let count = self
                    .items
                    .iter()
                    .filter(|item| item.category == *category)
                    .count();
                (*category, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}
