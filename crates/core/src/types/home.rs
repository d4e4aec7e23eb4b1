//! Homepage content records sourced from the CMS.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the homepage banner's call-to-action does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerAction {
    /// Scroll to the drop agenda on the same page.
    Agenda,
    /// Follow the drop's primary CTA link.
    Cta,
    /// Follow the banner's own link.
    Custom,
}

impl BannerAction {
    /// Parse a CMS value; unknown values are dropped.
    #[must_use]
    pub fn from_cms(value: Option<&str>) -> Option<Self> {
        match value? {
            "agenda" => Some(Self::Agenda),
            "cta" => Some(Self::Cta),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// A scheduled drop shown on the homepage agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeDrop {
    pub id: String,
    pub title: String,
    /// `None` when the CMS value could not be parsed.
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status_label: String,
    pub description: String,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub secondary_cta_label: Option<String>,
    pub secondary_cta_href: Option<String>,
    /// Not enforced to be unique across drops; the first flagged drop wins.
    pub show_in_banner: bool,
    pub banner_message: Option<String>,
    pub banner_cta_label: Option<String>,
    pub banner_action: Option<BannerAction>,
    pub banner_href: Option<String>,
}

/// A customer testimonial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub quote: String,
    pub author: String,
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_action_from_cms() {
        assert_eq!(BannerAction::from_cms(Some("agenda")), Some(BannerAction::Agenda));
        assert_eq!(BannerAction::from_cms(Some("custom")), Some(BannerAction::Custom));
        assert_eq!(BannerAction::from_cms(Some("popup")), None);
        assert_eq!(BannerAction::from_cms(None), None);
    }
}
