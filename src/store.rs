//! Cached access to the dataset file.
//!
//! The CSV is parsed on first use and kept in a moka cache for the configured
//! TTL. Concurrent requests that miss the cache wait on a single load instead
//! of each reading the file. Failed loads are not cached, so uploading the
//! missing file fixes the dashboard on the next request. The file is never
//! watched; changes show up once the entry expires or is invalidated.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::instrument;

use crate::config::DataConfig;
use crate::dataset::{Dataset, DatasetError};

#[derive(Clone)]
pub struct DatasetStore {
    path: PathBuf,
    cache: Cache<PathBuf, Arc<Dataset>>,
}

impl DatasetStore {
    pub fn new(config: &DataConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();

        Self {
            path: config.path.clone(),
            cache,
        }
    }

    /// Return the cached dataset, loading it from disk on a miss.
    #[instrument(name = "store::get", skip(self), fields(path = %self.path.display()))]
    pub async fn get(&self) -> Result<Arc<Dataset>, Arc<DatasetError>> {
        let path = self.path.clone();
        self.cache
            .try_get_with(self.path.clone(), async move {
                let shown = path.display().to_string();
                let dataset = tokio::task::spawn_blocking(move || Dataset::load(&path))
                    .await
                    .map_err(|e| DatasetError::Io(io::Error::other(e)))??;

                tracing::info!(path = %shown, records = dataset.len(), "Loaded dataset");
                Ok::<_, DatasetError>(Arc::new(dataset))
            })
            .await
    }

    /// Load the dataset ahead of the first request.
    ///
    /// A failure is only logged: the server keeps running and the dashboard
    /// reports the problem until the file becomes readable.
    pub async fn preload(&self) {
        if let Err(e) = self.get().await {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Dataset not available at startup"
            );
        }
    }

    /// Drop the cached dataset so the next request reads the file again.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&self.path).await;
    }
}
