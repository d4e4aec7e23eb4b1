//! Homepage segment selection.
//!
//! Segments are filled greedily in definition order. A product claimed by an
//! earlier segment is skipped by later ones, so the output segments never
//! share a product unless a definition opts out of deduplication.

use std::collections::HashSet;

use foxsports_core::{Product, ProductStatus, normalize_text};

/// How a homepage segment picks its products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDefinition {
    /// Anchor id and template key.
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// A product matches if it carries any of these tags (normalized).
    pub tags: &'static [&'static str],
    /// Featured products match regardless of tags.
    pub include_featured: bool,
    pub limit: usize,
    /// Allowed statuses. Empty allows every status.
    pub statuses: &'static [ProductStatus],
    /// Ignore and do not update the claimed set.
    pub allow_duplicates: bool,
}

impl SegmentDefinition {
    fn allows_status(&self, status: ProductStatus) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&status)
    }

    fn matches(&self, product: &Product) -> bool {
        if self.include_featured && product.featured {
            return true;
        }
        product.tags.iter().any(|tag| {
            let tag = normalize_text(tag);
            self.tags.iter().any(|wanted| normalize_text(wanted) == tag)
        })
    }
}

/// Homepage segments, in priority order.
pub static HOME_SEGMENTS: [SegmentDefinition; 4] = [
    SegmentDefinition {
        key: "lanzamientos",
        title: "Próximos lanzamientos",
        description: "Preventas y drops programados. Asegura tu pieza antes de que salga al mercado.",
        tags: &["lanzamiento", "preventa"],
        include_featured: false,
        limit: 4,
        statuses: &[ProductStatus::Upcoming, ProductStatus::Available],
        allow_duplicates: false,
    },
    SegmentDefinition {
        key: "destacados",
        title: "Destacados",
        description: "Las piezas que el equipo recomienda esta semana.",
        tags: &[],
        include_featured: true,
        limit: 4,
        statuses: &[ProductStatus::Available, ProductStatus::Reserved],
        allow_duplicates: false,
    },
    SegmentDefinition {
        key: "nba",
        title: "Grails NBA",
        description: "Rookies serializados, autos on-card y parallels SSP listos para grading o vault.",
        tags: &["nba", "basketball", "baloncesto"],
        include_featured: false,
        limit: 4,
        statuses: &[],
        allow_duplicates: false,
    },
    SegmentDefinition {
        key: "tcg",
        title: "TCG",
        description: "Charizard, Lugia y piezas exclusivas PSA 10 / BGS 9.5 con historial transparente.",
        tags: &["tcg", "pokemon"],
        include_featured: false,
        limit: 4,
        statuses: &[],
        allow_duplicates: false,
    },
];

/// Cap of the trailing "Más piezas" gallery.
pub const MORE_LIMIT: usize = 8;

/// A filled, non-empty segment.
#[derive(Debug, Clone)]
pub struct HomeSegment<'a> {
    pub definition: &'a SegmentDefinition,
    pub products: Vec<&'a Product>,
}

/// Result of [`select_segments`].
#[derive(Debug, Clone, Default)]
pub struct SegmentSelection<'a> {
    pub segments: Vec<HomeSegment<'a>>,
    /// Unclaimed, unsold products.
    pub more: Vec<&'a Product>,
}

/// Partition `products` into segments.
///
/// The spotlight product is claimed before any segment runs. Empty segments
/// are dropped. Whatever is left and not sold fills the `more` gallery.
#[must_use]
pub fn select_segments<'a>(
    definitions: &'a [SegmentDefinition],
    products: &'a [Product],
    spotlight: Option<&'a Product>,
    more_limit: usize,
) -> SegmentSelection<'a> {
    let mut claimed: HashSet<&'a str> = spotlight
        .map(|product| product.slug.as_str())
        .into_iter()
        .collect();

    let mut segments = Vec::new();
    for definition in definitions {
        let selected: Vec<&Product> = products
            .iter()
            .filter(|product| definition.allows_status(product.status))
            .filter(|product| {
                definition.allow_duplicates || !claimed.contains(product.slug.as_str())
            })
            .filter(|product| definition.matches(product))
            .take(definition.limit)
            .collect();

        if selected.is_empty() {
            continue;
        }

        if !definition.allow_duplicates {
            claimed.extend(selected.iter().map(|product| product.slug.as_str()));
        }
        segments.push(HomeSegment {
            definition,
            products: selected,
        });
    }

    let more = products
        .iter()
        .filter(|product| !product.status.is_sold() && !claimed.contains(product.slug.as_str()))
        .take(more_limit)
        .collect();

    SegmentSelection { segments, more }
}
