//! Product route handlers.

use std::convert::Infallible;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use chrono::Utc;
use foxsports_core::{Product, ProductImage};
use futures::stream::{self, Stream};
use tokio::sync::watch;
use tracing::instrument;

use crate::catalog::recommendations;
use crate::error::Result;
use crate::filters;
use crate::order::{OrderLine, OrderOptions, ProductLinkMode, build_whatsapp_url};
use crate::release::{self, CountdownTicker, ReleaseEvaluation};
use crate::state::AppState;

/// Product card display data, shared by every listing.
#[derive(Clone)]
pub struct ProductCardView {
    pub slug: String,
    pub title: String,
    pub kind_label: String,
    pub price: String,
    pub image_url: String,
    pub image_alt: String,
    pub status: String,
    pub badge: Option<&'static str>,
    pub year: Option<i32>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            slug: product.slug.to_string(),
            title: product.title.clone(),
            kind_label: product.kind_label().to_string(),
            price: product.display_price(),
            image_url: product.cover_url().to_string(),
            image_alt: product.cover_alt().to_string(),
            status: product.status.to_string(),
            badge: product.status.badge(),
            year: product.year,
        }
    }
}

/// Gallery image display data.
#[derive(Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
    pub label: Option<String>,
}

impl ImageView {
    fn from_image(image: &ProductImage, title: &str) -> Self {
        Self {
            url: image.url.clone(),
            alt: image.alt.clone().unwrap_or_else(|| title.to_string()),
            label: image.label.clone(),
        }
    }
}

/// Product detail display data.
pub struct ProductDetailView {
    pub slug: String,
    pub title: String,
    pub kind_label: String,
    pub price: String,
    pub images: Vec<ImageView>,
    pub short_description: Option<String>,
    pub description: Vec<String>,
    pub highlights: Vec<String>,
    pub tags: Vec<String>,
    pub year: Option<i32>,
    pub certification: Option<String>,
    pub rarity: Option<String>,
    pub inventory: Option<u32>,
    pub hero_video_url: Option<String>,
    pub status: String,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            slug: product.slug.to_string(),
            title: product.title.clone(),
            kind_label: product.kind_label().to_string(),
            price: product.display_price(),
            images: product
                .images
                .iter()
                .map(|image| ImageView::from_image(image, &product.title))
                .collect(),
            short_description: product.short_description.clone(),
            description: product.description.clone(),
            highlights: product.highlights.clone(),
            tags: product.tags.clone(),
            year: product.year,
            certification: product.certification.clone(),
            rarity: product.rarity.clone(),
            inventory: product.inventory,
            hero_video_url: product.hero_video_url.clone(),
            status: product.status.to_string(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub release: ReleaseEvaluation,
    pub whatsapp_url: String,
    pub whatsapp_label: &'static str,
    pub recommendations: Vec<ProductCardView>,
}

/// Display product detail page.
#[instrument(skip(state), fields(slug = %slug))]
pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Response> {
    let product = state.content().product_by_slug(&slug).await?;
    let config = state.config();

    let release = release::evaluate(
        product.status,
        product.release_date,
        Utc::now(),
        config.utc_offset,
    );

    let mode = ProductLinkMode::for_lock(release.is_purchase_locked);
    let whatsapp_url = build_whatsapp_url(
        &config.whatsapp.host,
        &config.whatsapp.number,
        &[OrderLine::from(&product)],
        OrderOptions {
            intro_message: Some(mode.intro(&product)),
            site_url: Some(&config.site_url),
        },
    );

    // Recommendations are optional; a failing catalog fetch leaves them empty.
    let recommendations = match state.content().all_products().await {
        Ok(products) => recommendations(&product, &products)
            .into_iter()
            .map(ProductCardView::from)
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch recommendations: {e}");
            Vec::new()
        }
    };

    Ok(ProductShowTemplate {
        product: ProductDetailView::from(&product),
        release,
        whatsapp_url,
        whatsapp_label: mode.label(),
        recommendations,
    }
    .into_response())
}

// =============================================================================
// Countdown stream
// =============================================================================

/// SSE event name for a countdown tick.
const COUNTDOWN_EVENT: &str = "countdown";
/// SSE event name sent once the product is released.
const UNLOCKED_EVENT: &str = "unlocked";

struct CountdownStream {
    // Dropping the ticker stops its task.
    _ticker: CountdownTicker,
    receiver: watch::Receiver<ReleaseEvaluation>,
    primed: bool,
}

fn countdown_event(evaluation: &ReleaseEvaluation) -> Event {
    match evaluation.countdown_label() {
        Some(label) if evaluation.is_purchase_locked => {
            Event::default().event(COUNTDOWN_EVENT).data(label)
        }
        _ => Event::default()
            .event(UNLOCKED_EVENT)
            .data(evaluation.status_label),
    }
}

fn countdown_events(
    ticker: CountdownTicker,
) -> impl Stream<Item = std::result::Result<Event, Infallible>> {
    let initial = CountdownStream {
        receiver: ticker.subscribe(),
        _ticker: ticker,
        primed: false,
    };

    stream::unfold(Some(initial), |state| async move {
        let mut state = state?;
        if state.primed {
            state.receiver.changed().await.ok()?;
        } else {
            state.primed = true;
        }

        let evaluation = state.receiver.borrow_and_update().clone();
        let event = countdown_event(&evaluation);
        let next = evaluation.is_purchase_locked.then_some(state);
        Some((Ok(event), next))
    })
}

/// Stream the release countdown as Server-Sent Events.
///
/// Sends a `countdown` event every second while the product is locked and a
/// final `unlocked` event once it is released. Products that are not locked
/// get the `unlocked` event straight away.
#[instrument(skip(state), fields(slug = %slug))]
pub async fn countdown(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response> {
    let product = state.content().product_by_slug(&slug).await?;
    let offset = state.config().utc_offset;

    let Some(ticker) = CountdownTicker::start(product.status, product.release_date, offset) else {
        let evaluation = release::evaluate(product.status, product.release_date, Utc::now(), offset);
        let event = countdown_event(&evaluation);
        let once = stream::once(async move { Ok::<_, Infallible>(event) });
        return Ok(Sse::new(once).into_response());
    };

    Ok(Sse::new(countdown_events(ticker))
        .keep_alive(KeepAlive::default())
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use chrono::{DateTime, FixedOffset, TimeDelta};
    use foxsports_core::ProductStatus;
    use futures::StreamExt;

    use super::*;
    use crate::test_support::product;

    fn offset() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    #[test]
    fn test_card_view_uses_cover_and_badge() {
        let mut item = product("wemby", "Wemby Rookie");
        item.status = ProductStatus::Reserved;
        item.sport = Some("NBA".to_string());

        let card = ProductCardView::from(&item);
        assert_eq!(card.image_url, "/hero.jpg");
        assert_eq!(card.image_alt, "Wemby Rookie");
        assert_eq!(card.badge, Some("Reservado"));
        assert_eq!(card.kind_label, "NBA");
        assert_eq!(card.status, "reserved");
    }

    #[test]
    fn test_countdown_event_names() {
        let now: DateTime<Utc> = "2025-11-01T00:00:00Z".parse().unwrap();
        let locked = release::evaluate(
            ProductStatus::Upcoming,
            Some(now + TimeDelta::hours(3)),
            now,
            offset(),
        );
        let unlocked = release::evaluate(ProductStatus::Upcoming, Some(now), now, offset());

        // Event has no accessors; compare the wire form.
        let locked_wire = format!("{:?}", countdown_event(&locked));
        assert!(locked_wire.contains(COUNTDOWN_EVENT));
        assert!(locked_wire.contains("Disponible en 3 h"));

        let unlocked_wire = format!("{:?}", countdown_event(&unlocked));
        assert!(unlocked_wire.contains(UNLOCKED_EVENT));
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_stream_ends_after_unlock() {
        let start: DateTime<Utc> = "2025-11-01T00:00:00Z".parse().unwrap();
        let release_at = start + TimeDelta::seconds(2);
        let now = Arc::new(Mutex::new(start));

        let clock = {
            let now = Arc::clone(&now);
            move || *now.lock().unwrap()
        };
        let ticker = CountdownTicker::start_with_clock(
            ProductStatus::Upcoming,
            Some(release_at),
            offset(),
            clock,
        )
        .unwrap();

        let advance = {
            let now = Arc::clone(&now);
            tokio::spawn(async move {
                for _ in 0..3 {
                    tokio::time::sleep(Duration::from_millis(1000)).await;
                    let mut guard = now.lock().unwrap();
                    *guard += TimeDelta::seconds(1);
                }
            })
        };

        let events: Vec<_> = countdown_events(ticker).collect().await;
        advance.await.unwrap();

        assert!(events.len() >= 2);
        let last = format!("{:?}", events.last().unwrap().as_ref().unwrap());
        assert!(last.contains(UNLOCKED_EVENT));
    }
}
