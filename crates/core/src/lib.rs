//! foxsportscards core - Shared domain types.
//!
//! This crate provides the types every other component of the storefront
//! works with:
//! - `storefront` - Server-rendered catalog, cart and messaging checkout
//! - `integration-tests` - Black-box tests of the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks. Anything loosely typed coming from the CMS is turned
//! into these types at the storefront's normalization boundary and never
//! travels further.
//!
//! # Modules
//!
//! - [`types`] - Products, statuses, slugs, homepage content and price formatting
//! - [`text`] - Accent-insensitive text normalization for matching

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod text;
pub mod types;

pub use text::normalize_text;
pub use types::*;
