//! Error types produced by the ingest crate.
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`Io`](IngestError::Io) | the catalog file cannot be opened or read |
//! | [`Csv`](IngestError::Csv) | a row cannot be decoded or headers are malformed |
//! | [`MissingColumn`](IngestError::MissingColumn) | a required header is absent |
//! | [`EmptyCatalog`](IngestError::EmptyCatalog) | no row survives cleaning |
//! | [`InvalidConfig`](IngestError::InvalidConfig) | a [`CatalogConfig`](crate::CatalogConfig) fails validation |
use thiserror::Error;

/// Errors raised while loading or cleaning an assessment catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("catalog i/o error: {0}")]
    Io(String),
    #[error("catalog decode error: {0}")]
    Csv(String),
    #[error("catalog is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("catalog has no usable rows after cleaning")]
    EmptyCatalog,
    #[error("invalid catalog config: {0}")]
    InvalidConfig(String),
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err.to_string())
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io) = err.kind() {
            return IngestError::Io(io.to_string());
        }
        IngestError::Csv(err.to_string())
    }
}
