//! CMS documents to domain types.
//!
//! Normalization never fails: missing fields get defaults and malformed
//! values are dropped. A document that does not even deserialize is skipped
//! with a warning by the caller.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use foxsports_core::{
    BannerAction, DEFAULT_CURRENCY, HomeDrop, Product, ProductImage, ProductStatus, Slug,
    Testimonial,
};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::documents::{
    GalleryImageDocument, HomeDropDocument, PortableTextBlock, ProductDocument,
    TestimonialDocument,
};
use crate::release::parse_release_date;

/// Matches Sanity image asset ids: `image-<id>-<w>x<h>-<ext>`.
static IMAGE_ASSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^image-([A-Za-z0-9]+)-(\d+x\d+)-([a-z0-9]+)$").expect("Invalid regex")
});

/// Resolves image asset references to CDN URLs.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    /// `https://cdn.sanity.io/images/<project>/<dataset>`, when known.
    image_base_url: Option<String>,
}

impl Normalizer {
    #[must_use]
    pub const fn new(image_base_url: Option<String>) -> Self {
        Self { image_base_url }
    }

    /// CDN URL for an asset id, or `None` if it cannot be resolved.
    #[must_use]
    pub fn image_url(&self, asset_id: &str) -> Option<String> {
        let base = self.image_base_url.as_deref()?;
        let caps = IMAGE_ASSET_RE.captures(asset_id)?;
        Some(format!(
            "{base}/{}-{}.{}?auto=format&fit=max",
            &caps[1], &caps[2], &caps[3]
        ))
    }

    /// Map a product document.
    #[must_use]
    pub fn product(&self, doc: ProductDocument) -> Product {
        let title = doc.title.unwrap_or_default();
        let id = doc.id.filter(|id| !id.is_empty()).unwrap_or(doc.doc_id);
        let slug = doc
            .slug
            .filter(|slug| !slug.is_empty())
            .unwrap_or_else(|| id.clone());

        let mut images: Vec<ProductImage> = doc
            .gallery
            .unwrap_or_default()
            .into_iter()
            .filter_map(|image| self.gallery_image(image, &title))
            .collect();
        if images.is_empty() {
            images.push(ProductImage::placeholder(&title));
        }

        let category = doc.product_type.clone().or_else(|| doc.sport.clone());

        Product {
            id,
            slug: Slug::from_cms(slug),
            price: doc.price.filter(|p| p.is_finite() && *p >= 0.0).unwrap_or(0.0),
            currency: doc
                .currency
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            images,
            short_description: doc.short_description,
            description: doc.description.map(flatten_description).unwrap_or_default(),
            highlights: doc.highlights.unwrap_or_default(),
            status: ProductStatus::from_cms(doc.status.as_deref()),
            release_date: doc.release_date.as_deref().and_then(parse_release_date),
            sport: doc.sport,
            product_type: doc.product_type,
            rarity: doc.rarity,
            year: doc.year,
            certification: doc.certification,
            inventory: doc.inventory.and_then(|n| u32::try_from(n).ok()),
            tags: doc
                .tags
                .unwrap_or_default()
                .into_iter()
                .filter(|tag| !tag.trim().is_empty())
                .collect(),
            whatsapp_message: doc.whatsapp_message,
            hero_video_url: doc.hero_video_url,
            featured: doc.featured.unwrap_or(false),
            category,
            title,
        }
    }

    fn gallery_image(&self, image: GalleryImageDocument, title: &str) -> Option<ProductImage> {
        let asset_url = image
            .asset
            .as_ref()
            .and_then(|asset| asset.asset_id())
            .and_then(|id| self.image_url(id));
        let direct_url = image.url.filter(|url| !url.is_empty());

        Some(ProductImage {
            url: asset_url.or(direct_url)?,
            alt: Some(image.alt.unwrap_or_else(|| title.to_string())),
            label: image.display_name,
        })
    }
}

/// Map a home drop document.
#[must_use]
pub fn home_drop(doc: HomeDropDocument) -> HomeDrop {
    HomeDrop {
        id: doc.doc_id,
        title: doc.title.unwrap_or_default(),
        scheduled_at: doc.scheduled_at.as_deref().and_then(parse_release_date),
        status_label: doc.status_label.unwrap_or_default(),
        description: doc.description.unwrap_or_default(),
        cta_label: doc.cta_label,
        cta_href: doc.cta_href,
        secondary_cta_label: doc.secondary_cta_label,
        secondary_cta_href: doc.secondary_cta_href,
        show_in_banner: doc.show_in_banner.unwrap_or(false),
        banner_message: doc.banner_message,
        banner_cta_label: doc.banner_cta_label,
        banner_action: BannerAction::from_cms(doc.banner_action.as_deref()),
        banner_href: doc.banner_href,
    }
}

/// Map a testimonial document.
#[must_use]
pub fn testimonial(doc: TestimonialDocument) -> Testimonial {
    Testimonial {
        id: doc.doc_id,
        quote: doc.quote.unwrap_or_default(),
        author: doc.author.unwrap_or_default(),
        location: doc.location,
    }
}

/// Flatten portable text into plain paragraphs.
///
/// A plain string is split on blank lines. Non-`block` blocks and empty
/// paragraphs are skipped.
#[must_use]
pub fn flatten_description(value: Value) -> Vec<String> {
    match value {
        Value::String(text) => text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(blocks) => blocks
            .into_iter()
            .filter_map(|block| serde_json::from_value::<PortableTextBlock>(block).ok())
            .filter(|block| block.kind.as_deref().is_none_or(|kind| kind == "block"))
            .map(|block| {
                block
                    .children
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|span| span.text)
                    .collect::<String>()
            })
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Deserialize a list of raw documents one by one, skipping the ones that
/// do not fit `T`.
#[must_use]
pub fn documents<T: DeserializeOwned>(value: Value, kind: &str) -> Vec<T> {
    let Value::Array(items) = value else {
        if !value.is_null() {
            tracing::warn!(kind, "Expected a list of CMS documents");
        }
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(kind, error = %e, "Skipping malformed CMS document");
                None
            }
        })
        .collect()
}

/// Parse a CMS timestamp for ordering. Unparseable values sort as oldest.
#[must_use]
pub fn created_at(value: Option<&str>) -> DateTime<Utc> {
    value
        .and_then(parse_release_date)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
