//! Sanity HTTP query API client.
//!
//! Issues GROQ queries with `reqwest` and caches normalized results in
//! `moka` for the configured TTL.

use std::sync::Arc;
use std::time::Duration;

use foxsports_core::{HomeDrop, Product, Testimonial};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::CmsError;
use super::documents::{HomeDropDocument, ProductDocument, TestimonialDocument};
use super::normalize::{self, Normalizer};
use super::queries;
use crate::config::CmsConfig;

/// Cached, already-normalized query results.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Box<Product>),
    Drops(Arc<Vec<HomeDrop>>),
    Testimonials(Arc<Vec<Testimonial>>),
}

/// Envelope of every query response.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// Client for the Sanity query API.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    endpoint: String,
    read_token: Option<SecretString>,
    normalizer: Normalizer,
    cache: Cache<String, CacheValue>,
}

impl SanityClient {
    /// Create a new client.
    #[must_use]
    pub fn new(config: &CmsConfig, cache_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        Self {
            inner: Arc::new(SanityClientInner {
                client: reqwest::Client::new(),
                endpoint: config.query_endpoint(),
                read_token: config.read_token.clone(),
                normalizer: Normalizer::new(Some(config.image_base_url())),
                cache,
            }),
        }
    }

    /// Run a GROQ query and return the raw `result`.
    async fn query(&self, query: &str, slug: Option<&str>) -> Result<Value, CmsError> {
        let mut params = vec![
            ("query".to_string(), query.to_string()),
            ("perspective".to_string(), "published".to_string()),
        ];
        if let Some(slug) = slug {
            // GROQ parameters are JSON-encoded.
            params.push(("$slug".to_string(), serde_json::to_string(slug)?));
        }

        let mut request = self.inner.client.get(&self.inner.endpoint).query(&params);
        if let Some(token) = &self.inner.read_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Sanity API returned non-success status"
            );
            return Err(CmsError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let envelope: QueryResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Sanity response"
            );
            CmsError::Parse(e)
        })?;

        Ok(envelope.result)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// All published products, featured first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_products(&self) -> Result<Arc<Vec<Product>>, CmsError> {
        let cache_key = "products".to_string();
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let result = self.query(queries::ALL_PRODUCTS, None).await?;
        let products: Arc<Vec<Product>> = Arc::new(
            normalize::documents::<ProductDocument>(result, "product")
                .into_iter()
                .map(|doc| self.inner.normalizer.product(doc))
                .collect(),
        );

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// A single product by slug.
    ///
    /// # Errors
    ///
    /// Returns `CmsError::NotFound` if no product has this slug, or another
    /// error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, CmsError> {
        let cache_key = format!("product:{slug}");
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let result = self.query(queries::PRODUCT_BY_SLUG, Some(slug)).await?;
        if result.is_null() {
            return Err(CmsError::NotFound(slug.to_string()));
        }

        let doc: ProductDocument = serde_json::from_value(result)?;
        let product = self.inner.normalizer.product(doc);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    // =========================================================================
    // Homepage Methods
    // =========================================================================

    /// Homepage drops, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn home_drops(&self) -> Result<Arc<Vec<HomeDrop>>, CmsError> {
        let cache_key = "home_drops".to_string();
        if let Some(CacheValue::Drops(drops)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for home drops");
            return Ok(drops);
        }

        let result = self.query(queries::HOME_DROPS, None).await?;
        let drops = Arc::new(
            normalize::documents::<HomeDropDocument>(result, "homeDrop")
                .into_iter()
                .map(normalize::home_drop)
                .collect::<Vec<_>>(),
        );

        self.inner
            .cache
            .insert(cache_key, CacheValue::Drops(Arc::clone(&drops)))
            .await;
        Ok(drops)
    }

    /// Testimonials in editorial order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn testimonials(&self) -> Result<Arc<Vec<Testimonial>>, CmsError> {
        let cache_key = "testimonials".to_string();
        if let Some(CacheValue::Testimonials(testimonials)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for testimonials");
            return Ok(testimonials);
        }

        let result = self.query(queries::TESTIMONIALS, None).await?;
        let testimonials = Arc::new(
            normalize::documents::<TestimonialDocument>(result, "testimonial")
                .into_iter()
                .map(normalize::testimonial)
                .collect::<Vec<_>>(),
        );

        self.inner
            .cache
            .insert(cache_key, CacheValue::Testimonials(Arc::clone(&testimonials)))
            .await;
        Ok(testimonials)
    }
}
