//! Session middleware configuration.
//!
//! Sets up SQLite-backed sessions using tower-sessions. The session only
//! carries the visitor's cart, and it outlives server restarts.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::task::JoinHandle;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fsc_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// How often expired sessions are purged from the store.
const EXPIRED_DELETION_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Open the session database and create the sessions table if needed.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database cannot be opened,
/// or the migration fails.
pub async fn connect_session_store(database_url: &str) -> Result<SqliteStore, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    let store = SqliteStore::new(pool);
    store.migrate().await?;
    Ok(store)
}

/// Spawn the background task that deletes expired sessions.
///
/// The task runs until aborted.
#[must_use]
pub fn spawn_expired_session_deletion(store: SqliteStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store
            .continuously_delete_expired(EXPIRED_DELETION_INTERVAL)
            .await
        {
            tracing::error!(error = %e, "Expired session deletion stopped");
        }
    })
}

/// Create the session layer over the SQLite store.
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<SqliteStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time::{Duration as CookieDuration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};
    use tower_sessions::session_store::SessionStore;

    use super::*;

    fn record(expiry_date: OffsetDateTime) -> Record {
        Record {
            id: Id::default(),
            data: std::collections::HashMap::new(),
            expiry_date,
        }
    }

    #[tokio::test]
    async fn test_sessions_persist_in_the_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("sessions.db").display());

        let mut saved = record(OffsetDateTime::now_utc() + CookieDuration::days(1));
        connect_session_store(&url)
            .await
            .unwrap()
            .create(&mut saved)
            .await
            .unwrap();

        let reopened = connect_session_store(&url).await.unwrap();
        let loaded = reopened.load(&saved.id).await.unwrap();
        assert_eq!(loaded.map(|r| r.id), Some(saved.id));
    }

    #[tokio::test]
    async fn test_expired_sessions_are_deleted() {
        let store = connect_session_store("sqlite::memory:").await.unwrap();
        let mut expired = record(OffsetDateTime::now_utc() - CookieDuration::minutes(1));
        store.create(&mut expired).await.unwrap();

        store.delete_expired().await.unwrap();

        assert!(store.load(&expired.id).await.unwrap().is_none());
    }
}
