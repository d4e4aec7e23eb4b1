//! Catalog filtering, search and ordering.
//!
//! Everything here is a pure function over an already-fetched product list.
//! Text comparison always goes through [`normalize_text`], so accents and
//! case never affect a match.

use std::collections::{BTreeMap, HashSet};

use foxsports_core::{Product, ProductStatus, normalize_text};

/// Filter token that disables status and facet filtering.
pub const ALL_FILTER: &str = "Todos";

/// Fixed status filters, in display order.
pub const STATUS_FILTERS: [(&str, ProductStatus); 4] = [
    ("Disponibles", ProductStatus::Available),
    ("Reservados", ProductStatus::Reserved),
    ("Próximos", ProductStatus::Upcoming),
    ("Vendidos", ProductStatus::Sold),
];

/// Number of recommendations shown on a product page.
pub const RECOMMENDATION_LIMIT: usize = 3;

/// The active catalog filter, resolved from a user-supplied token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogFilter {
    All,
    Status(ProductStatus),
    /// A sport, product type or tag, already normalized.
    Facet(String),
}

impl CatalogFilter {
    /// Resolve a filter token. Status names win over facets that normalize
    /// to the same text.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let normalized = normalize_text(token.trim());
        if normalized.is_empty() || normalized == normalize_text(ALL_FILTER) {
            return Self::All;
        }

        STATUS_FILTERS
            .iter()
            .find(|(label, _)| normalize_text(label) == normalized)
            .map_or(Self::Facet(normalized), |(_, status)| Self::Status(*status))
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => product.status == *status,
            Self::Facet(facet) => facet_values(product).any(|value| normalize_text(value) == *facet),
        }
    }
}

fn facet_values(product: &Product) -> impl Iterator<Item = &str> {
    product
        .sport
        .as_deref()
        .into_iter()
        .chain(product.product_type.as_deref())
        .chain(product.tags.iter().map(String::as_str))
        .filter(|value| !value.is_empty())
}

/// Build the filter chips: `Todos`, the status filters, then every sport,
/// product type and tag in the catalog.
///
/// Dynamic values are keyed by their normalized form (a later spelling
/// replaces an earlier one) and sorted alphabetically. The merged list is
/// then deduplicated by normalized form, keeping the first occurrence.
#[must_use]
pub fn filter_options(products: &[Product]) -> Vec<String> {
    let mut collected: BTreeMap<String, &str> = BTreeMap::new();
    for product in products {
        for value in facet_values(product) {
            collected.insert(normalize_text(value), value);
        }
    }

    // Keyed by normalized text, so iteration is already alphabetical.
    let dynamic = collected.into_values();

    let merged = std::iter::once(ALL_FILTER)
        .chain(STATUS_FILTERS.iter().map(|(label, _)| *label))
        .chain(dynamic);

    let mut seen = HashSet::new();
    merged
        .filter(|option| seen.insert(normalize_text(option)))
        .map(str::to_string)
        .collect()
}

/// Products matching both the active filter and the search term.
///
/// An empty search term matches everything. Otherwise the term must be a
/// substring of the title, the short description or any tag.
#[must_use]
pub fn visible_products<'a>(
    products: &'a [Product],
    search_term: &str,
    filter: &CatalogFilter,
) -> Vec<&'a Product> {
    let search = normalize_text(search_term.trim());

    products
        .iter()
        .filter(|product| filter.matches(product) && matches_search(product, &search))
        .collect()
}

fn matches_search(product: &Product, normalized_search: &str) -> bool {
    if normalized_search.is_empty() {
        return true;
    }

    std::iter::once(product.title.as_str())
        .chain(product.short_description.as_deref())
        .chain(product.tags.iter().map(String::as_str))
        .any(|value| normalize_text(value).contains(normalized_search))
}

/// Order for the catalog page: available, reserved, upcoming, sold.
///
/// The sort is stable, so CMS order is kept within each status.
pub fn sort_for_catalog(products: &mut [&Product]) {
    products.sort_by_key(|product| product.status.catalog_priority());
}

/// Upcoming products, newest edition first. A missing year sorts last.
#[must_use]
pub fn upcoming_releases(products: &[Product]) -> Vec<&Product> {
    let mut upcoming: Vec<&Product> = products
        .iter()
        .filter(|product| product.status == ProductStatus::Upcoming)
        .collect();
    upcoming.sort_by_key(|product| std::cmp::Reverse(product.year.unwrap_or(0)));
    upcoming
}

/// Other products to suggest on a product page.
///
/// Products sharing the sport or product type come first, then the rest of
/// the catalog in CMS order. Two products that both lack a sport count as
/// sharing it.
#[must_use]
pub fn recommendations<'a>(current: &Product, products: &'a [Product]) -> Vec<&'a Product> {
    let pool = products.iter().filter(|item| item.slug != current.slug);
    let related = pool
        .clone()
        .filter(|item| item.sport == current.sport || item.product_type == current.product_type);

    let mut seen = HashSet::new();
    related
        .chain(pool)
        .filter(|item| seen.insert(item.slug.as_str()))
        .take(RECOMMENDATION_LIMIT)
        .collect()
}
