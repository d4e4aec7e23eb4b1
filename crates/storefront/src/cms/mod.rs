//! Content source for products, drops and testimonials.
//!
//! Content comes from Sanity when a project is configured and from the
//! bundled fallback document otherwise. Handlers only see [`ContentSource`].

mod client;
pub mod documents;
mod fallback;
pub mod normalize;
pub mod queries;

use std::sync::{Arc, Once};

use foxsports_core::{HomeDrop, Product, Testimonial};
use thiserror::Error;

pub use client::SanityClient;
pub use fallback::{FALLBACK, FallbackContent};

use crate::config::StorefrontConfig;

/// Errors from the content source.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse CMS response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Drops and testimonials for the homepage.
#[derive(Debug, Clone, Default)]
pub struct HomepageContent {
    pub drops: Arc<Vec<HomeDrop>>,
    pub testimonials: Arc<Vec<Testimonial>>,
}

static FALLBACK_NOTICE: Once = Once::new();

fn warn_fallback() {
    FALLBACK_NOTICE.call_once(|| {
        tracing::warn!("No CMS project configured, serving bundled fallback content");
    });
}

/// Where content is read from.
#[derive(Clone)]
pub enum ContentSource {
    Sanity(SanityClient),
    Fallback,
}

impl ContentSource {
    /// Sanity when configured, the bundled content otherwise.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        config.cms.as_ref().map_or(Self::Fallback, |cms| {
            Self::Sanity(SanityClient::new(cms, config.cms_cache_ttl))
        })
    }

    /// All products in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    pub async fn all_products(&self) -> Result<Arc<Vec<Product>>, CmsError> {
        match self {
            Self::Sanity(client) => client.all_products().await,
            Self::Fallback => {
                warn_fallback();
                Ok(Arc::clone(&FALLBACK.products))
            }
        }
    }

    /// A single product by slug.
    ///
    /// # Errors
    ///
    /// Returns `CmsError::NotFound` for an unknown slug, or another error if
    /// the CMS request fails.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, CmsError> {
        match self {
            Self::Sanity(client) => client.product_by_slug(slug).await,
            Self::Fallback => {
                warn_fallback();
                FALLBACK
                    .products
                    .iter()
                    .find(|product| product.slug == slug)
                    .cloned()
                    .ok_or_else(|| CmsError::NotFound(slug.to_string()))
            }
        }
    }

    /// Drops and testimonials, fetched concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if either CMS request fails.
    pub async fn homepage_content(&self) -> Result<HomepageContent, CmsError> {
        match self {
            Self::Sanity(client) => {
                let (drops, testimonials) =
                    tokio::try_join!(client.home_drops(), client.testimonials())?;
                Ok(HomepageContent {
                    drops,
                    testimonials,
                })
            }
            Self::Fallback => {
                warn_fallback();
                Ok(HomepageContent {
                    drops: Arc::clone(&FALLBACK.drops),
                    testimonials: Arc::clone(&FALLBACK.testimonials),
                })
            }
        }
    }
}
