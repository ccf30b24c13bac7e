use std::path::{Path, PathBuf};

use basket_core::{CatalogSource, RawCatalogRecord, SourceError};

use crate::keywords::effective_keywords;
use crate::{parse_promotion_text, IngestError};

/// Plain text extracted from a promotional catalogue or receipt, parsed with
/// [`parse_promotion_text`] on every fetch.
#[derive(Debug, Clone)]
pub struct TextFileSource {
    label: String,
    store: Option<String>,
    path: PathBuf,
    keywords: Vec<String>,
}

impl TextFileSource {
    /// An empty `keywords` list selects [`crate::DEFAULT_KEYWORDS`].
    #[must_use]
    pub fn new(label: &str, store: Option<&str>, path: &Path, keywords: &[String]) -> Self {
        Self {
            label: label.to_string(),
            store: store.map(ToOwned::to_owned),
            path: path.to_path_buf(),
            keywords: effective_keywords(keywords),
        }
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl CatalogSource for TextFileSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn default_store(&self) -> Option<&str> {
        self.store.as_deref()
    }

    fn fetch(&self) -> Result<Vec<RawCatalogRecord>, SourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| {
            IngestError::Read {
                path: self.path.display().to_string(),
                source,
            }
            .into_source_error(&self.label)
        })?;
        Ok(parse_promotion_text(&text, None, &self.keywords))
    }
}
