//! GROQ queries.

/// Projection shared by the product queries.
macro_rules! product_fields {
    () => {
        r#"
  _id,
  _createdAt,
  "id": coalesce(id, _id),
  title,
  "slug": slug.current,
  shortDescription,
  description,
  highlights,
  price,
  currency,
  status,
  releaseDate,
  sport,
  productType,
  rarity,
  year,
  certification,
  inventory,
  tags,
  whatsappMessage,
  featured,
  "heroVideoUrl": heroVideo.asset->url,
  gallery[]{
    _key,
    alt,
    displayName,
    "url": asset->url,
    asset
  }
"#
    };
}

/// Every published product with a slug, featured first, newest first.
pub const ALL_PRODUCTS: &str = concat!(
    r#"*[_type == "product" && defined(slug.current)] | order(coalesce(featured, false) desc, _createdAt desc) {"#,
    product_fields!(),
    "}"
);

/// A single product by slug. Takes `$slug`.
pub const PRODUCT_BY_SLUG: &str = concat!(
    r#"*[_type == "product" && slug.current == $slug][0] {"#,
    product_fields!(),
    "}"
);

/// Homepage drops, soonest first.
pub const HOME_DROPS: &str = r#"*[_type == "homeDrop"] | order(scheduledAt asc) {
  _id,
  title,
  scheduledAt,
  statusLabel,
  description,
  ctaLabel,
  ctaHref,
  secondaryCtaLabel,
  secondaryCtaHref,
  showInBanner,
  bannerMessage,
  bannerCtaLabel,
  bannerAction,
  bannerHref
}"#;

/// Testimonials in manual order, newest first within the same order.
pub const TESTIMONIALS: &str = r#"*[_type == "testimonial"] | order(coalesce(order, 9999) asc, _createdAt desc) {
  _id,
  _createdAt,
  order,
  quote,
  author,
  location
}"#;
