//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                  - Home page
//! GET  /health                            - Health check
//!
//! # Catalog
//! GET  /catalogo                          - Catalog (?q= search, ?filtro= filter)
//! GET  /lanzamientos                      - Upcoming releases
//! GET  /producto/{slug}                   - Product detail
//! GET  /producto/{slug}/cuenta-regresiva  - Release countdown (SSE)
//!
//! # Cart
//! GET  /carrito                           - Cart page
//! POST /carrito/agregar                   - Add to cart (redirects to cart)
//! POST /carrito/quitar                    - Remove line (redirects to cart)
//! POST /carrito/vaciar                    - Empty cart (redirects to cart)
//! GET  /carrito/cantidad                  - Cart count badge (fragment)
//! GET  /carrito/whatsapp                  - Redirect to WhatsApp with the order
//! ```

pub mod cart;
pub mod catalog;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(products::show))
        .route("/{slug}/cuenta-regresiva", get(products::countdown))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/agregar", post(cart::add))
        .route("/quitar", post(cart::remove))
        .route("/vaciar", post(cart::clear))
        .route("/cantidad", get(cart::count))
        .route("/whatsapp", get(cart::whatsapp))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog pages
        .route("/catalogo", get(catalog::index))
        .route("/lanzamientos", get(catalog::releases))
        // Product routes
        .nest("/producto", product_routes())
        // Cart routes
        .nest("/carrito", cart_routes())
}
