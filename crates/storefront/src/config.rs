//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_SITE_URL` - Site link appended to order messages (default: base URL)
//! - `STOREFRONT_UTC_OFFSET_HOURS` - Store-local UTC offset for date labels (default: -4)
//!
//! ## Sessions
//! - `SESSION_DATABASE_URL` - SQLite database holding visitor sessions and
//!   their carts (default: sqlite://foxsports-sessions.db)
//!
//! ## Messaging checkout
//! - `WHATSAPP_NUMBER` - Destination number, international format without `+`
//! - `WHATSAPP_HOST` - Deep-link host (default: wa.me)
//!
//! ## CMS (Sanity)
//! - `SANITY_PROJECT_ID`, `SANITY_DATASET` - When either is missing the
//!   bundled fallback content is served instead
//! - `SANITY_API_VERSION` - GROQ API version (default: 2024-10-01)
//! - `SANITY_READ_TOKEN` - Optional read token
//! - `SANITY_USE_CDN` - Query the API CDN (default: true)
//! - `SANITY_API_HOST` - Override the API origin
//! - `CMS_CACHE_TTL_SECONDS` - Content cache TTL (default: 60)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default WhatsApp destination for order confirmations.
const DEFAULT_WHATSAPP_NUMBER: &str = "18492617328";

/// Session database next to the working directory.
const DEFAULT_SESSION_DATABASE_URL: &str = "sqlite://foxsports-sessions.db";

/// Santo Domingo does not observe daylight saving time.
const DEFAULT_UTC_OFFSET_HOURS: i32 = -4;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Site link appended to order messages
    pub site_url: String,
    /// Store-local offset for release and drop date labels
    pub utc_offset: FixedOffset,
    /// SQLite URL of the session store
    pub session_database_url: String,
    /// Messaging checkout configuration
    pub whatsapp: WhatsAppConfig,
    /// CMS configuration; `None` serves the bundled fallback content
    pub cms: Option<CmsConfig>,
    /// TTL for cached CMS responses
    pub cms_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// WhatsApp deep-link configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppConfig {
    /// Destination number, international format without `+`
    pub number: String,
    /// Deep-link host
    pub host: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            host: "wa.me".to_string(),
        }
    }
}

/// Sanity CMS configuration.
///
/// Implements `Debug` manually to redact the read token.
#[derive(Clone)]
pub struct CmsConfig {
    /// Sanity project ID
    pub project_id: String,
    /// Dataset name (e.g., production)
    pub dataset: String,
    /// GROQ API version date
    pub api_version: String,
    /// Optional read token for private datasets
    pub read_token: Option<SecretString>,
    /// Query the API CDN instead of the live API
    pub use_cdn: bool,
    /// Origin override (e.g., a proxy)
    pub api_host: Option<String>,
}

impl std::fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field(
                "read_token",
                &self.read_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("use_cdn", &self.use_cdn)
            .field("api_host", &self.api_host)
            .finish()
    }
}

impl CmsConfig {
    /// Origin of the query API.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(host) = &self.api_host {
            return host.trim_end_matches('/').to_string();
        }
        let api = if self.use_cdn { "apicdn" } else { "api" };
        format!("https://{}.{api}.sanity.io", self.project_id)
    }

    /// Full URL of the GROQ query endpoint.
    #[must_use]
    pub fn query_endpoint(&self) -> String {
        format!(
            "{}/v{}/data/query/{}",
            self.origin(),
            self.api_version,
            self.dataset
        )
    }

    /// Base URL of the image CDN for this project and dataset.
    #[must_use]
    pub fn image_base_url(&self) -> String {
        format!(
            "https://cdn.sanity.io/images/{}/{}",
            self.project_id, self.dataset
        )
    }

    fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(project_id), Some(dataset)) = (
            get_optional_env("SANITY_PROJECT_ID"),
            get_optional_env("SANITY_DATASET"),
        ) else {
            return Ok(None);
        };

        Ok(Some(Self {
            project_id,
            dataset,
            api_version: get_env_or_default("SANITY_API_VERSION", "2024-10-01"),
            read_token: get_optional_env("SANITY_READ_TOKEN").map(SecretString::from),
            use_cdn: parse_bool("SANITY_USE_CDN", &get_env_or_default("SANITY_USE_CDN", "true"))?,
            api_host: get_optional_env("SANITY_API_HOST"),
        }))
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = parse_url(
            "STOREFRONT_BASE_URL",
            &get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000"),
        )?;
        let site_url = match get_optional_env("STOREFRONT_SITE_URL") {
            Some(value) => parse_url("STOREFRONT_SITE_URL", &value)?,
            None => base_url.clone(),
        };
        let utc_offset = parse_utc_offset(&get_env_or_default(
            "STOREFRONT_UTC_OFFSET_HOURS",
            &DEFAULT_UTC_OFFSET_HOURS.to_string(),
        ))?;

        let session_database_url =
            get_env_or_default("SESSION_DATABASE_URL", DEFAULT_SESSION_DATABASE_URL);
        if !session_database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidEnvVar(
                "SESSION_DATABASE_URL".to_string(),
                "expected a sqlite: URL".to_string(),
            ));
        }

        let whatsapp = WhatsAppConfig {
            number: parse_phone_number(&get_env_or_default(
                "WHATSAPP_NUMBER",
                DEFAULT_WHATSAPP_NUMBER,
            ))?,
            host: get_env_or_default("WHATSAPP_HOST", "wa.me"),
        };

        let cms = CmsConfig::from_env()?;
        let cms_cache_ttl = get_env_or_default("CMS_CACHE_TTL_SECONDS", "60")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CMS_CACHE_TTL_SECONDS".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            base_url,
            site_url,
            utc_offset,
            session_database_url,
            whatsapp,
            cms,
            cms_cache_ttl,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration suitable for tests and local development: fallback
    /// content, in-memory sessions, default messaging number, no error
    /// tracking.
    #[must_use]
    pub fn local() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            site_url: "http://localhost:3000".to_string(),
            utc_offset: default_utc_offset(),
            session_database_url: "sqlite::memory:".to_string(),
            whatsapp: WhatsAppConfig::default(),
            cms: None,
            cms_cache_ttl: Duration::from_secs(60),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as absent.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Validate an absolute URL, returning it without a trailing slash.
fn parse_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "URL must have a host".to_string(),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn parse_utc_offset(value: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = |reason: String| {
        ConfigError::InvalidEnvVar("STOREFRONT_UTC_OFFSET_HOURS".to_string(), reason)
    };
    let hours = value
        .trim()
        .parse::<i32>()
        .map_err(|e| invalid(e.to_string()))?;
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| invalid(format!("offset out of range: {hours}")))
}

/// Strip a leading `+` and reject anything that is not a digit.
fn parse_phone_number(value: &str) -> Result<String, ConfigError> {
    let number = value.trim().trim_start_matches('+');
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            "WHATSAPP_NUMBER".to_string(),
            "expected digits only, international format".to_string(),
        ));
    }
    Ok(number.to_string())
}

fn default_utc_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cms() -> CmsConfig {
        CmsConfig {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-10-01".to_string(),
            read_token: Some(SecretString::from("sk_super_secret_token")),
            use_cdn: true,
            api_host: None,
        }
    }

    #[test]
    fn test_query_endpoint_uses_cdn() {
        assert_eq!(
            cms().query_endpoint(),
            "https://abc123.apicdn.sanity.io/v2024-10-01/data/query/production"
        );
    }

    #[test]
    fn test_query_endpoint_live_api() {
        let config = CmsConfig {
            use_cdn: false,
            ..cms()
        };
        assert_eq!(
            config.query_endpoint(),
            "https://abc123.api.sanity.io/v2024-10-01/data/query/production"
        );
    }

    #[test]
    fn test_query_endpoint_host_override() {
        let config = CmsConfig {
            api_host: Some("http://127.0.0.1:9999/".to_string()),
            ..cms()
        };
        assert_eq!(
            config.query_endpoint(),
            "http://127.0.0.1:9999/v2024-10-01/data/query/production"
        );
    }

    #[test]
    fn test_image_base_url() {
        assert_eq!(
            cms().image_base_url(),
            "https://cdn.sanity.io/images/abc123/production"
        );
    }

    #[test]
    fn test_cms_config_debug_redacts_token() {
        let debug_output = format!("{:?}", cms());
        assert!(debug_output.contains("abc123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_super_secret_token"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_parse_utc_offset() {
        let offset = parse_utc_offset("-4").unwrap();
        assert_eq!(offset.local_minus_utc(), -4 * 3600);
        assert!(parse_utc_offset("abc").is_err());
        assert!(parse_utc_offset("30").is_err());
    }

    #[test]
    fn test_parse_phone_number() {
        assert_eq!(parse_phone_number("+18492617328").unwrap(), "18492617328");
        assert!(parse_phone_number("849-261").is_err());
        assert!(parse_phone_number("").is_err());
    }

    #[test]
    fn test_parse_url_strips_trailing_slash() {
        assert_eq!(
            parse_url("X", "https://foxsportscards.pages.dev/").unwrap(),
            "https://foxsportscards.pages.dev"
        );
        assert!(parse_url("X", "not a url").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig::local();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(!config.is_secure());
        assert_eq!(config.utc_offset.local_minus_utc(), -4 * 3600);
    }
}
