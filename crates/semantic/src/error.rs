use thiserror::Error;

/// Errors surfaced by embedders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Configuration is inconsistent (unknown mode, missing API URL, zero dimension).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// The embedding endpoint could not be reached or answered with a non-success status.
    #[error("embedding request failed: {0}")]
    Request(String),
    /// The endpoint answered but the body was not a usable set of embeddings.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = SemanticError::InvalidConfig("api_url is required".into());
        assert_eq!(
            err.to_string(),
            "invalid semantic config: api_url is required"
        );

        let err = SemanticError::Request("HTTP error 503".into());
        assert!(err.to_string().contains("503"));
    }
}
