//! Shared fixtures for unit tests.

use foxsports_core::{Product, ProductImage, ProductStatus, Slug};

/// A minimal available product priced at RD$1,000.
pub fn product(slug: &str, title: &str) -> Product {
    Product {
        id: slug.to_string(),
        slug: Slug::from_cms(slug),
        title: title.to_string(),
        price: 1000.0,
        currency: "DOP".to_string(),
        images: vec![ProductImage::placeholder(title)],
        short_description: None,
        description: Vec::new(),
        highlights: Vec::new(),
        status: ProductStatus::Available,
        release_date: None,
        sport: None,
        product_type: None,
        rarity: None,
        year: None,
        certification: None,
        inventory: None,
        tags: Vec::new(),
        whatsapp_message: None,
        hero_video_url: None,
        featured: false,
        category: None,
    }
}
