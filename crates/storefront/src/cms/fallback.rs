//! Bundled content served when no CMS project is configured.

use std::cmp::Reverse;
use std::sync::{Arc, LazyLock};

use foxsports_core::{HomeDrop, Product, Testimonial};
use serde::Deserialize;
use serde_json::Value;

use super::documents::{HomeDropDocument, ProductDocument, TestimonialDocument};
use super::normalize::{self, Normalizer};

const FALLBACK_JSON: &str = include_str!("../../content/fallback.json");

/// Sorts after every explicitly ordered testimonial.
const UNORDERED_TESTIMONIAL: i64 = 9999;

#[derive(Debug, Default, Deserialize)]
struct FallbackDocuments {
    #[serde(default)]
    products: Value,
    #[serde(default)]
    drops: Value,
    #[serde(default)]
    testimonials: Value,
}

/// Normalized fallback content, in the same order the CMS queries return.
#[derive(Debug, Default)]
pub struct FallbackContent {
    pub products: Arc<Vec<Product>>,
    pub drops: Arc<Vec<HomeDrop>>,
    pub testimonials: Arc<Vec<Testimonial>>,
}

pub static FALLBACK: LazyLock<FallbackContent> = LazyLock::new(|| load(FALLBACK_JSON));

fn load(raw: &str) -> FallbackContent {
    let documents: FallbackDocuments = match serde_json::from_str(raw) {
        Ok(documents) => documents,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse bundled fallback content");
            FallbackDocuments::default()
        }
    };

    let normalizer = Normalizer::default();

    let mut products = normalize::documents::<ProductDocument>(documents.products, "product");
    products.sort_by_key(|doc| {
        (
            Reverse(doc.featured.unwrap_or(false)),
            Reverse(normalize::created_at(doc.created_at.as_deref())),
        )
    });
    let products = products
        .into_iter()
        .filter(|doc| doc.slug.as_deref().is_some_and(|slug| !slug.is_empty()))
        .map(|doc| normalizer.product(doc))
        .collect();

    let mut drops: Vec<HomeDrop> =
        normalize::documents::<HomeDropDocument>(documents.drops, "homeDrop")
            .into_iter()
            .map(normalize::home_drop)
            .collect();
    // Unscheduled drops go last.
    drops.sort_by_key(|drop| (drop.scheduled_at.is_none(), drop.scheduled_at));

    let mut testimonials =
        normalize::documents::<TestimonialDocument>(documents.testimonials, "testimonial");
    testimonials.sort_by_key(|doc| {
        (
            doc.order.unwrap_or(UNORDERED_TESTIMONIAL),
            Reverse(normalize::created_at(doc.created_at.as_deref())),
        )
    });
    let testimonials = testimonials
        .into_iter()
        .map(normalize::testimonial)
        .collect();

    FallbackContent {
        products: Arc::new(products),
        drops: Arc::new(drops),
        testimonials: Arc::new(testimonials),
    }
}
