//! Concurrent source fetching with a per-source deadline.

use std::sync::Arc;
use std::time::Duration;

use basket_core::{CatalogSource, FetchedSource, SourceError};
use futures::future::join_all;

/// Fetches every source on the blocking pool and waits for all of them.
///
/// Results keep the order of `sources`, so catalog concatenation stays
/// deterministic however the fetches interleave. A source that exceeds
/// `timeout` becomes [`SourceError::Timeout`]; its blocking task is left to
/// finish in the background and its records are discarded.
pub async fn fetch_concurrently(
    sources: &[Arc<dyn CatalogSource>],
    timeout: Duration,
) -> Vec<FetchedSource> {
    let fetches = sources.iter().map(|source| {
        let source = Arc::clone(source);
        async move {
            let label = source.label().to_string();
            let task = tokio::task::spawn_blocking({
                let source = Arc::clone(&source);
                move || FetchedSource::fetch(source.as_ref())
            });

            match tokio::time::timeout(timeout, task).await {
                Ok(Ok(fetched)) => fetched,
                Ok(Err(join_error)) => {
                    tracing::error!(source = %label, error = %join_error, "source fetch task failed");
                    FetchedSource::failed(
                        label.clone(),
                        SourceError::Unavailable {
                            label,
                            reason: format!("fetch task failed: {join_error}"),
                        },
                    )
                }
                Err(_) => {
                    tracing::warn!(source = %label, timeout_secs = timeout.as_secs(), "source fetch timed out");
                    FetchedSource::failed(
                        label.clone(),
                        SourceError::Timeout {
                            label,
                            secs: timeout.as_secs(),
                        },
                    )
                }
            }
        }
    });

    join_all(fetches).await
}
