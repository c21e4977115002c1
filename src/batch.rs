//! CSV input and output for batch prediction and evaluation.
//!
//! - Query files have a `Query` column.
//! - Labeled files add an `Assessment_url` column holding one or more
//!   `|`-separated URLs. Rows repeating the same query are merged.
//! - Prediction files are written as `Query,predictions,urls` with names and
//!   URLs joined by `|`.
use std::collections::HashMap;
use std::io::{Read, Write};

use matcher::{Recommendation, Recommender};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::PipelineError;

#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(rename = "Query")]
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabeledRow {
    #[serde(rename = "Query")]
    query: Option<String>,
    #[serde(rename = "Assessment_url", default)]
    assessment_url: Option<String>,
}

/// A query with its relevant assessment URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledQuery {
    pub query: String,
    pub gold_urls: Vec<String>,
}

/// One output row of batch prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRow {
    #[serde(rename = "Query")]
    pub query: String,
    pub predictions: String,
    pub urls: String,
}

impl PredictionRow {
    pub fn new(query: impl Into<String>, recs: &[Recommendation]) -> Self {
        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        let urls: Vec<&str> = recs.iter().map(|r| r.url.as_str()).collect();
        Self {
            query: query.into(),
            predictions: names.join("|"),
            urls: urls.join("|"),
        }
    }
}

fn require_column<R: Read>(
    reader: &mut csv::Reader<R>,
    column: &'static str,
) -> Result<(), PipelineError> {
    let headers = reader.headers()?;
    if headers.iter().any(|h| h.trim() == column) {
        Ok(())
    } else {
        Err(PipelineError::MissingColumn(column))
    }
}

/// Reads the `Query` column. Blank queries are skipped.
pub fn read_queries<R: Read>(reader: R) -> Result<Vec<String>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    require_column(&mut reader, "Query")?;

    let mut queries = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize::<QueryRow>() {
        match row?.query.filter(|q| !q.trim().is_empty()) {
            Some(query) => queries.push(query),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "blank_queries_skipped");
    }
    Ok(queries)
}

/// Reads `Query` and `Assessment_url`, merging rows that share a query.
/// Queries keep their first-seen order.
pub fn read_labeled_queries<R: Read>(reader: R) -> Result<Vec<LabeledQuery>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    require_column(&mut reader, "Query")?;
    require_column(&mut reader, "Assessment_url")?;

    let mut labeled: Vec<LabeledQuery> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for row in reader.deserialize::<LabeledRow>() {
        let row = row?;
        let Some(query) = row.query.filter(|q| !q.trim().is_empty()) else {
            continue;
        };
        let urls = row
            .assessment_url
            .unwrap_or_default()
            .split('|')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        match positions.get(&query) {
            Some(&pos) => labeled[pos].gold_urls.extend(urls),
            None => {
                positions.insert(query.clone(), labeled.len());
                labeled.push(LabeledQuery {
                    query,
                    gold_urls: urls,
                });
            }
        }
    }
    Ok(labeled)
}

pub fn write_predictions<W: Write>(writer: W, rows: &[PredictionRow]) -> Result<(), PipelineError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Recommends for each query in order with diversification on.
pub async fn predict(
    engine: &Recommender,
    queries: &[String],
    k: usize,
) -> Result<Vec<PredictionRow>, PipelineError> {
    let mut rows = Vec::with_capacity(queries.len());
    for query in queries {
        let recs = engine.recommend(query, k, true).await?;
        rows.push(PredictionRow::new(query.as_str(), &recs));
    }
    info!(queries = rows.len(), k, "predictions_complete");
    Ok(rows)
}
