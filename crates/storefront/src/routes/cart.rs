//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Mutations are plain form posts
//! that redirect back to the cart page; the badge fragment is fetched
//! separately so any page can refresh it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{Cart, CartLine, CartStore, SessionCartStorage};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::order::{CART_CHECKOUT_INTRO, OrderLine, OrderOptions, build_whatsapp_url};
use crate::release;
use crate::state::AppState;

/// Path of the cart page.
pub const CART_PATH: &str = "/carrito";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub slug: String,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: String,
    pub image_alt: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            slug: line.product.slug.to_string(),
            title: line.product.title.clone(),
            quantity: line.qty,
            price: line.product.display_price(),
            line_price: line.display_subtotal(),
            image_url: line.product.cover_url().to_string(),
            image_alt: line.product.cover_alt().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            total: cart.display_total(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    pub qty: Option<u32>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub slug: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

async fn load_cart(session: Session) -> Result<CartStore<SessionCartStorage>> {
    Ok(CartStore::load(SessionCartStorage::new(session)).await?)
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let store = load_cart(session).await?;
    Ok(CartShowTemplate {
        cart: CartView::from(store.cart()),
    })
}

/// Add a product to the cart.
///
/// The product is re-read from the content source so the cart holds a fresh
/// snapshot. Locked products are refused.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state.content().product_by_slug(&form.slug).await?;

    let evaluation = release::evaluate(
        product.status,
        product.release_date,
        Utc::now(),
        state.config().utc_offset,
    );
    if evaluation.is_purchase_locked {
        return Err(AppError::PurchaseLocked(form.slug));
    }

    let mut store = load_cart(session).await?;
    store.add(product, form.qty.unwrap_or(1)).await?;
    add_breadcrumb("cart", "Added to cart", Some(&[("slug", form.slug.as_str())]));

    Ok(Redirect::to(CART_PATH).into_response())
}

/// Remove a product from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut store = load_cart(session).await?;
    store.remove(&form.slug).await?;
    Ok(Redirect::to(CART_PATH).into_response())
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Response> {
    let mut store = load_cart(session).await?;
    store.clear().await?;
    Ok(Redirect::to(CART_PATH).into_response())
}

/// Get cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let store = load_cart(session).await?;
    Ok(CartCountTemplate {
        count: store.cart().item_count(),
    })
}

/// Redirect to the messaging app with the order summary.
#[instrument(skip(state, session))]
pub async fn whatsapp(State(state): State<AppState>, session: Session) -> Result<Response> {
    let store = load_cart(session).await?;
    let lines: Vec<OrderLine> = store.cart().items.iter().map(OrderLine::from).collect();
    if lines.is_empty() {
        return Ok(Redirect::to(CART_PATH).into_response());
    }

    let config = state.config();
    let url = build_whatsapp_url(
        &config.whatsapp.host,
        &config.whatsapp.number,
        &lines,
        OrderOptions {
            intro_message: Some(CART_CHECKOUT_INTRO),
            site_url: Some(&config.site_url),
        },
    );
    add_breadcrumb("cart", "Checkout via WhatsApp", None);

    Ok(Redirect::to(&url).into_response())
}
