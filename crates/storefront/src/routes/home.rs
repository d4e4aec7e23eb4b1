//! Home page route handler.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use foxsports_core::{HomeDrop, Product, Testimonial};
use tracing::instrument;

use super::products::ProductCardView;
use crate::cms::HomepageContent;
use crate::filters;
use crate::home::{
    Banner, HOME_SEGMENTS, MORE_LIMIT, drop_date_label, resolve_banner, select_segments,
    spotlight,
};
use crate::release;
use crate::state::AppState;

/// The hero product.
#[derive(Clone)]
pub struct SpotlightView {
    pub card: ProductCardView,
    pub short_description: Option<String>,
    pub status_label: &'static str,
}

/// A homepage segment.
#[derive(Clone)]
pub struct SegmentView {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub products: Vec<ProductCardView>,
}

/// A drop on the agenda.
#[derive(Clone)]
pub struct DropView {
    pub title: String,
    pub date_label: Option<String>,
    pub status_label: String,
    pub description: String,
    pub cta: Option<LinkView>,
    pub secondary_cta: Option<LinkView>,
}

/// A labelled link.
#[derive(Clone)]
pub struct LinkView {
    pub label: String,
    pub href: String,
    pub external: bool,
}

impl LinkView {
    fn new(label: Option<&String>, href: Option<&String>) -> Option<Self> {
        let (label, href) = (label?, href?);
        Some(Self {
            label: label.clone(),
            external: href.starts_with("http://") || href.starts_with("https://"),
            href: href.clone(),
        })
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub banner: Option<Banner>,
    pub spotlight: Option<SpotlightView>,
    pub segments: Vec<SegmentView>,
    pub more: Vec<ProductCardView>,
    pub drops: Vec<DropView>,
    pub testimonials: Arc<Vec<Testimonial>>,
}

fn drop_view(drop: &HomeDrop, offset: chrono::FixedOffset) -> DropView {
    DropView {
        title: drop.title.clone(),
        date_label: drop.scheduled_at.map(|at| drop_date_label(at, offset)),
        status_label: drop.status_label.clone(),
        description: drop.description.clone(),
        cta: LinkView::new(drop.cta_label.as_ref(), drop.cta_href.as_ref()),
        secondary_cta: LinkView::new(
            drop.secondary_cta_label.as_ref(),
            drop.secondary_cta_href.as_ref(),
        ),
    }
}

fn spotlight_view(product: &Product, offset: chrono::FixedOffset) -> SpotlightView {
    let evaluation = release::evaluate(
        product.status,
        product.release_date,
        chrono::Utc::now(),
        offset,
    );
    SpotlightView {
        card: ProductCardView::from(product),
        short_description: product.short_description.clone(),
        status_label: evaluation.status_label,
    }
}

/// Display the home page.
///
/// Content failures are logged and render as empty sections.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let offset = state.config().utc_offset;

    let products = state.content().all_products().await.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch products: {e}");
        Arc::default()
    });

    let content = state
        .content()
        .homepage_content()
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to fetch homepage content: {e}");
            HomepageContent::default()
        });

    let hero = spotlight(&products);
    let selection = select_segments(&HOME_SEGMENTS, &products, hero, MORE_LIMIT);

    HomeTemplate {
        banner: resolve_banner(&content.drops, offset),
        spotlight: hero.map(|product| spotlight_view(product, offset)),
        segments: selection
            .segments
            .iter()
            .map(|segment| SegmentView {
                key: segment.definition.key,
                title: segment.definition.title,
                description: segment.definition.description,
                products: segment
                    .products
                    .iter()
                    .copied()
                    .map(ProductCardView::from)
                    .collect(),
            })
            .collect(),
        more: selection
            .more
            .iter()
            .copied()
            .map(ProductCardView::from)
            .collect(),
        drops: content
            .drops
            .iter()
            .map(|drop| drop_view(drop, offset))
            .collect(),
        testimonials: content.testimonials,
    }
}
