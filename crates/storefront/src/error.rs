//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cart::CartStorageError;
use crate::cms::CmsError;
use crate::filters;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Content source failed.
    #[error("CMS error: {0}")]
    Cms(#[from] CmsError),

    /// Cart could not be read or persisted.
    #[error("Cart storage error: {0}")]
    CartStorage(#[from] CartStorageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The product is not on sale yet.
    #[error("Purchase locked: {0}")]
    PurchaseLocked(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Shown for unknown routes and products.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate;

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Cms(CmsError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Cms(_) => StatusCode::BAD_GATEWAY,
            Self::CartStorage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PurchaseLocked(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        if status == StatusCode::NOT_FOUND {
            return (status, NotFoundTemplate).into_response();
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::CartStorage(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Cms(_) => "External service error".to_string(),
            Self::PurchaseLocked(_) => {
                "Esta pieza aún no está disponible para la venta".to_string()
            }
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
