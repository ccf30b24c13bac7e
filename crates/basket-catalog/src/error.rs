use basket_core::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl IngestError {
    /// Wraps the failure as a per-source error for the comparison engine.
    #[must_use]
    pub fn into_source_error(self, label: &str) -> SourceError {
        SourceError::Unavailable {
            label: label.to_string(),
            reason: self.to_string(),
        }
    }
}
