//! Shared application state for request handlers.

use std::sync::Arc;
use tera::Tera;

use crate::config::AppConfig;
use crate::store::DatasetStore;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration, Tera template engine, and the
/// cached dataset store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub store: DatasetStore,
}

impl AppState {
    /// Creates a new application state from the given configuration, templates, and store.
    pub fn new(config: AppConfig, tera: Tera, store: DatasetStore) -> Self {
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            store,
        }
    }
}
