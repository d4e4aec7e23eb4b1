//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for the catalog domain.

pub mod home;
pub mod price;
pub mod product;
pub mod slug;
pub mod status;

pub use home::{BannerAction, HomeDrop, Testimonial};
pub use price::{DEFAULT_CURRENCY, format_currency};
pub use product::{PLACEHOLDER_IMAGE_URL, Product, ProductImage};
pub use slug::{Slug, SlugError};
pub use status::ProductStatus;
