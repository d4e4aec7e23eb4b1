//! Canonical product entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::price::format_currency;
use super::slug::Slug;
use super::status::ProductStatus;

/// Image shown when a product has no resolvable gallery image.
pub const PLACEHOLDER_IMAGE_URL: &str = "/hero.jpg";

/// A gallery image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl ProductImage {
    /// The placeholder entry used when a gallery is empty.
    #[must_use]
    pub fn placeholder(alt: &str) -> Self {
        Self {
            url: PLACEHOLDER_IMAGE_URL.to_string(),
            alt: Some(alt.to_string()),
            label: Some("placeholder".to_string()),
        }
    }
}

/// A catalog product, fully populated.
///
/// Produced by the storefront's CMS normalizer; every optional CMS field has
/// already been defaulted. Snapshots are immutable per fetch and are stored
/// as-is inside cart lines, so this type round-trips through serde without
/// losing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub slug: Slug,
    pub title: String,
    pub price: f64,
    pub currency: String,
    /// Never empty.
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub short_description: Option<String>,
    /// Plain-text paragraphs of the long description.
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    /// Only meaningful when `status` is `Upcoming`.
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub inventory: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub whatsapp_message: Option<String>,
    #[serde(default)]
    pub hero_video_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// First gallery image.
    #[must_use]
    pub fn cover(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    /// Cover image URL, falling back to the placeholder.
    #[must_use]
    pub fn cover_url(&self) -> &str {
        self.cover().map_or(PLACEHOLDER_IMAGE_URL, |img| img.url.as_str())
    }

    /// Cover alt text, falling back to the title.
    #[must_use]
    pub fn cover_alt(&self) -> &str {
        self.cover()
            .and_then(|img| img.alt.as_deref())
            .unwrap_or(&self.title)
    }

    /// Eyebrow label: sport, else product type, else a generic label.
    #[must_use]
    pub fn kind_label(&self) -> &str {
        self.sport
            .as_deref()
            .or(self.product_type.as_deref())
            .unwrap_or("Coleccionable")
    }

    /// Unit price formatted in the product's currency.
    #[must_use]
    pub fn display_price(&self) -> String {
        format_currency(self.price, &self.currency)
    }
}
