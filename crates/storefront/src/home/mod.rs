//! Homepage composition: spotlight, segments, banner and drop agenda.

pub mod segments;

pub use segments::{
    HOME_SEGMENTS, HomeSegment, MORE_LIMIT, SegmentDefinition, SegmentSelection, select_segments,
};

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use foxsports_core::{BannerAction, HomeDrop, Product};

/// In-page anchor of the drop agenda.
pub const AGENDA_ANCHOR: &str = "#agenda-drops";

const BANNER_CTA_FALLBACK: &str = "Ver agenda";

/// Messages longer than this scroll as a marquee.
const MARQUEE_THRESHOLD: usize = 48;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "ENE", "FEB", "MAR", "ABR", "MAY", "JUN", "JUL", "AGO", "SEP", "OCT", "NOV", "DIC",
];

/// The first unsold product, else the first product.
#[must_use]
pub fn spotlight(products: &[Product]) -> Option<&Product> {
    products
        .iter()
        .find(|product| !product.status.is_sold())
        .or_else(|| products.first())
}

/// `DD MON` in store-local time, e.g. `04 NOV`.
#[must_use]
pub fn drop_date_label(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = instant.with_timezone(&offset);
    let month = MONTH_ABBREVIATIONS
        .get(local.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{:02} {month}", local.day())
}

/// The homepage announcement strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub cta_label: String,
    pub href: String,
    /// Opens in a new tab.
    pub external: bool,
    pub marquee: bool,
}

/// Build the banner from the first drop flagged for it.
///
/// Multiple flagged drops are not an error; CMS order decides.
#[must_use]
pub fn resolve_banner(drops: &[HomeDrop], offset: FixedOffset) -> Option<Banner> {
    let drop = drops.iter().find(|drop| drop.show_in_banner)?;

    let href = match drop.banner_action {
        Some(BannerAction::Agenda) => AGENDA_ANCHOR.to_string(),
        Some(BannerAction::Cta) => drop
            .cta_href
            .clone()
            .unwrap_or_else(|| AGENDA_ANCHOR.to_string()),
        Some(BannerAction::Custom) => drop
            .banner_href
            .clone()
            .unwrap_or_else(|| AGENDA_ANCHOR.to_string()),
        None => drop
            .cta_href
            .clone()
            .unwrap_or_else(|| AGENDA_ANCHOR.to_string()),
    };

    let message = drop.banner_message.clone().unwrap_or_else(|| {
        let date = drop
            .scheduled_at
            .map(|at| drop_date_label(at, offset))
            .unwrap_or_default();
        [date.as_str(), drop.status_label.as_str(), drop.title.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" • ")
    });

    let cta_label = drop
        .banner_cta_label
        .as_deref()
        .or(drop.cta_label.as_deref())
        .unwrap_or(BANNER_CTA_FALLBACK)
        .to_string();

    Some(Banner {
        marquee: message.chars().count() > MARQUEE_THRESHOLD,
        external: href.starts_with("http://") || href.starts_with("https://"),
        message,
        cta_label,
        href,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use foxsports_core::ProductStatus;

    use super::*;
    use crate::test_support::product;

    fn santo_domingo() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    fn drop(id: &str) -> HomeDrop {
        HomeDrop {
            id: id.to_string(),
            title: "TCG Crown Zenith Showcase".to_string(),
            scheduled_at: Some("2025-11-04T16:00:00Z".parse().unwrap()),
            status_label: "Lista de espera".to_string(),
            description: String::new(),
            cta_label: None,
            cta_href: None,
            secondary_cta_label: None,
            secondary_cta_href: None,
            show_in_banner: true,
            banner_message: None,
            banner_cta_label: None,
            banner_action: None,
            banner_href: None,
        }
    }

    #[test]
    fn test_spotlight_skips_sold() {
        let mut sold = product("sold", "Sold");
        sold.status = ProductStatus::Sold;
        let products = vec![sold.clone(), product("open", "Open")];
        assert_eq!(spotlight(&products).unwrap().slug, "open");

        let all_sold = vec![sold];
        assert_eq!(spotlight(&all_sold).unwrap().slug, "sold");
        assert!(spotlight(&[]).is_none());
    }

    #[test]
    fn test_drop_date_label_uses_store_time() {
        let offset = santo_domingo();
        assert_eq!(drop_date_label("2025-11-04T16:00:00Z".parse().unwrap(), offset), "04 NOV");
        assert_eq!(drop_date_label("2025-10-01T02:00:00Z".parse().unwrap(), offset), "30 SEP");
    }

    #[test]
    fn test_banner_default_message() {
        let banner = resolve_banner(&[drop("a")], santo_domingo()).unwrap();
        assert_eq!(banner.message, "04 NOV • Lista de espera • TCG Crown Zenith Showcase");
        assert_eq!(banner.href, AGENDA_ANCHOR);
        assert_eq!(banner.cta_label, "Ver agenda");
        assert!(!banner.external);
    }

    #[test]
    fn test_banner_first_flagged_drop_wins() {
        let mut hidden = drop("hidden");
        hidden.show_in_banner = false;
        let mut first = drop("first");
        first.banner_message = Some("primero".to_string());
        let mut second = drop("second");
        second.banner_message = Some("segundo".to_string());

        let banner = resolve_banner(&[hidden, first, second], santo_domingo()).unwrap();
        assert_eq!(banner.message, "primero");
    }

    #[test]
    fn test_banner_none_without_flag() {
        let mut d = drop("a");
        d.show_in_banner = false;
        assert!(resolve_banner(&[d], santo_domingo()).is_none());
    }

    #[test]
    fn test_banner_actions() {
        let mut d = drop("a");
        d.cta_href = Some("https://wa.me/18492617328".to_string());
        d.banner_href = Some("/lanzamientos".to_string());

        d.banner_action = Some(BannerAction::Agenda);
        assert_eq!(resolve_banner(&[d.clone()], santo_domingo()).unwrap().href, AGENDA_ANCHOR);

        d.banner_action = Some(BannerAction::Cta);
        let banner = resolve_banner(&[d.clone()], santo_domingo()).unwrap();
        assert_eq!(banner.href, "https://wa.me/18492617328");
        assert!(banner.external);

        d.banner_action = Some(BannerAction::Custom);
        assert_eq!(resolve_banner(&[d.clone()], santo_domingo()).unwrap().href, "/lanzamientos");

        d.banner_action = None;
        assert_eq!(
            resolve_banner(&[d], santo_domingo()).unwrap().href,
            "https://wa.me/18492617328"
        );
    }

    #[test]
    fn test_banner_cta_label_precedence() {
        let mut d = drop("a");
        d.cta_label = Some("Apartar cupo".to_string());
        assert_eq!(resolve_banner(&[d.clone()], santo_domingo()).unwrap().cta_label, "Apartar cupo");
        d.banner_cta_label = Some("Reservar cupo".to_string());
        assert_eq!(resolve_banner(&[d], santo_domingo()).unwrap().cta_label, "Reservar cupo");
    }
}
