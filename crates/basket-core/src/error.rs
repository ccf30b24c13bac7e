use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("basket must contain at least one product name")]
    EmptyBasket,
}

/// Why a raw catalog record could not become a `CatalogEntry`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryRejection {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("price '{raw}' is not a valid non-negative amount")]
    InvalidPrice { raw: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read retailers file {path}: {source}")]
    RetailersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse retailers file: {0}")]
    RetailersFileParse(#[source] serde_yaml::Error),

    #[error("retailers validation failed: {0}")]
    Validation(String),
}
