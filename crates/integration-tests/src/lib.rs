//! Integration tests for the foxsportscards1of1 storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p foxsports-integration-tests
//! ```
//!
//! Nothing external is needed: router tests drive the axum `Router`
//! in-process against the bundled content with sessions in a temporary
//! SQLite file, and CMS client tests run against a `wiremock` server.
//!
//! # Test Categories
//!
//! - `storefront_routes` - pages, cart flow and security headers
//! - `cms_client` - Sanity query client against a mock API

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use foxsports_storefront::cms::ContentSource;
use foxsports_storefront::config::StorefrontConfig;
use foxsports_storefront::middleware::connect_session_store;
use foxsports_storefront::state::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

/// A response with its body already read.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

/// An in-process storefront that remembers its session cookie, like a
/// browser would.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    _sessions_dir: Option<TempDir>,
}

impl TestApp {
    /// A storefront serving the bundled fallback content.
    ///
    /// # Panics
    ///
    /// Panics if the session database cannot be created.
    pub async fn new() -> Self {
        Self::with_content(ContentSource::Fallback).await
    }

    /// A storefront serving `content`, with sessions in a fresh temporary
    /// database.
    ///
    /// # Panics
    ///
    /// Panics if the session database cannot be created.
    pub async fn with_content(content: ContentSource) -> Self {
        let dir = tempfile::tempdir().expect("temporary directory");
        let url = session_database_url(&dir);
        Self::build(content, &url, Some(dir)).await
    }

    /// A storefront keeping sessions in the database at `url`. Two
    /// instances over the same URL behave like one server before and after
    /// a restart.
    ///
    /// # Panics
    ///
    /// Panics if the session database cannot be opened.
    pub async fn with_session_database(content: ContentSource, url: &str) -> Self {
        Self::build(content, url, None).await
    }

    async fn build(content: ContentSource, url: &str, sessions_dir: Option<TempDir>) -> Self {
        let sessions = connect_session_store(url)
            .await
            .expect("session database");
        let state = AppState::with_content(StorefrontConfig::local(), content, sessions);
        Self {
            router: foxsports_storefront::app(state),
            cookie: None,
            _sessions_dir: sessions_dir,
        }
    }

    /// The session cookie (`name=value`) the last response set, if any.
    #[must_use]
    pub fn session_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Present `cookie` on every following request, like a returning browser.
    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self.request("GET", path).body(Body::empty());
        self.send(request.expect("valid request")).await
    }

    /// Send a urlencoded form POST.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn post_form(&mut self, path: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()));
        self.send(request.expect("valid request")).await
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// A `sqlite://` URL for a sessions database inside `dir`.
#[must_use]
pub fn session_database_url(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("sessions.db").display())
}
