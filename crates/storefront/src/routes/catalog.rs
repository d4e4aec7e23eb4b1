//! Catalog and releases route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use super::products::ProductCardView;
use crate::catalog::{
    ALL_FILTER, CatalogFilter, filter_options, sort_for_catalog, upcoming_releases,
    visible_products,
};
use crate::error::Result;
use crate::filters;
use crate::release::format_release_label;
use crate::state::AppState;

/// Catalog query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search.
    pub q: Option<String>,
    /// Active filter chip.
    pub filtro: Option<String>,
}

/// A filter chip.
#[derive(Clone)]
pub struct FilterChipView {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub products: Vec<ProductCardView>,
    pub chips: Vec<FilterChipView>,
    pub search: String,
    pub active_filter: String,
}

/// Build the link for a filter chip, keeping the current search.
fn chip_href(label: &str, search: &str) -> String {
    let mut href = format!("/catalogo?filtro={}", urlencoding::encode(label));
    if !search.is_empty() {
        href.push_str("&q=");
        href.push_str(&urlencoding::encode(search));
    }
    href
}

/// Display the catalog.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse> {
    let products = state.content().all_products().await?;

    let search = query.q.unwrap_or_default().trim().to_string();
    let active_filter = query
        .filtro
        .filter(|token| !token.trim().is_empty())
        .unwrap_or_else(|| ALL_FILTER.to_string());
    let filter = CatalogFilter::parse(&active_filter);

    let mut visible = visible_products(&products, &search, &filter);
    sort_for_catalog(&mut visible);

    let chips = filter_options(&products)
        .into_iter()
        .map(|label| FilterChipView {
            href: chip_href(&label, &search),
            active: CatalogFilter::parse(&label) == filter,
            label,
        })
        .collect();

    Ok(CatalogTemplate {
        products: visible.into_iter().map(ProductCardView::from).collect(),
        chips,
        search,
        active_filter,
    })
}

/// An upcoming product with its release date.
#[derive(Clone)]
pub struct ReleaseCardView {
    pub card: ProductCardView,
    pub release_label: Option<String>,
}

/// Releases page template.
#[derive(Template, WebTemplate)]
#[template(path = "releases.html")]
pub struct ReleasesTemplate {
    pub releases: Vec<ReleaseCardView>,
}

/// Display upcoming releases.
#[instrument(skip(state))]
pub async fn releases(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = state.content().all_products().await?;
    let offset = state.config().utc_offset;

    let releases = upcoming_releases(&products)
        .into_iter()
        .map(|product| ReleaseCardView {
            card: ProductCardView::from(product),
            release_label: product
                .release_date
                .map(|date| format_release_label(date, offset)),
        })
        .collect();

    Ok(ReleasesTemplate { releases })
}
