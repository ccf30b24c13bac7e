use std::path::{Path, PathBuf};

use basket_core::{CatalogSource, RawCatalogRecord, SourceError};
use basket_db::{DbError, PoolConfig};
use tokio::runtime::Handle;

/// The `products` table of a SQLite database, read fresh on every fetch.
///
/// Fetching blocks on the ambient tokio runtime, so it must happen off the
/// async worker threads; [`crate::fetch_concurrently`] runs it on the
/// blocking pool.
#[derive(Debug, Clone)]
pub struct ProductTableSource {
    label: String,
    store: Option<String>,
    path: PathBuf,
}

impl ProductTableSource {
    #[must_use]
    pub fn new(label: &str, store: Option<&str>, path: &Path) -> Self {
        Self {
            label: label.to_string(),
            store: store.map(ToOwned::to_owned),
            path: path.to_path_buf(),
        }
    }

    fn unavailable(&self, reason: impl Into<String>) -> SourceError {
        SourceError::Unavailable {
            label: self.label.clone(),
            reason: reason.into(),
        }
    }
}

impl CatalogSource for ProductTableSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn default_store(&self) -> Option<&str> {
        self.store.as_deref()
    }

    fn fetch(&self) -> Result<Vec<RawCatalogRecord>, SourceError> {
        let handle = Handle::try_current()
            .map_err(|_| self.unavailable("product tables can only be read inside a tokio runtime"))?;

        let rows = handle
            .block_on(async {
                let pool = basket_db::open_existing(&self.path, PoolConfig::single_connection())
                    .await?;
                let rows = basket_db::list_products(&pool, None).await;
                pool.close().await;
                rows
            })
            .map_err(|e: DbError| {
                self.unavailable(format!("failed to read {}: {e}", self.path.display()))
            })?;

        tracing::debug!(source = %self.label, records = rows.len(), "read product table");
        Ok(rows.into_iter().map(RawCatalogRecord::from).collect())
    }
}
