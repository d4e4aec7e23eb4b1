//! Application state shared across handlers.

use std::sync::Arc;

use tower_sessions_sqlx_store::SqliteStore;

use crate::cms::ContentSource;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the content source and the session store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    content: ContentSource,
    sessions: SqliteStore,
}

impl AppState {
    /// Create a new application state, picking the content source from
    /// configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig, sessions: SqliteStore) -> Self {
        let content = ContentSource::from_config(&config);
        Self::with_content(config, content, sessions)
    }

    /// Create a new application state with an explicit content source.
    #[must_use]
    pub fn with_content(
        config: StorefrontConfig,
        content: ContentSource,
        sessions: SqliteStore,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                sessions,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the content source.
    #[must_use]
    pub fn content(&self) -> &ContentSource {
        &self.inner.content
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn sessions(&self) -> &SqliteStore {
        &self.inner.sessions
    }
}
