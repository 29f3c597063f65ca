use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Failures the pipeline can surface to callers. Oracle unavailability is
/// deliberately absent: it is folded into confirmation outcomes by the fail
/// policy and never propagates (data-absence likewise maps to an empty
/// report, not an error).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error("snapshot failure: {0}")]
    Snapshot(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Message safe to show an end user without leaking internals.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Embedding(_) => "The embedding backend failed. Please retry shortly.",
            Self::Snapshot(_) => "The catalog snapshot could not be read.",
            Self::Configuration(_) => "The service is misconfigured.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_errors_convert_transparently() {
        let error: ApplicationError = EmbeddingError::Provider("model offline".to_string()).into();
        assert_eq!(error.to_string(), "embedding provider failure: model offline");
        assert_eq!(error.user_message(), "The embedding backend failed. Please retry shortly.");
    }

    #[test]
    fn snapshot_errors_keep_their_detail() {
        let error = ApplicationError::Snapshot("products.csv missing".to_string());
        assert!(error.to_string().contains("products.csv missing"));
    }
}
