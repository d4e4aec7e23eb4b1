//! Product availability status.

use serde::{Deserialize, Serialize};

/// Availability of a product in the catalog.
///
/// Maps to the CMS `status` field; absent or unknown values default to
/// [`ProductStatus::Available`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Available,
    Reserved,
    Sold,
    Upcoming,
}

impl ProductStatus {
    /// All statuses in catalog display order.
    pub const ALL: [Self; 4] = [Self::Available, Self::Reserved, Self::Upcoming, Self::Sold];

    /// Parse a CMS status value, falling back to `Available`.
    #[must_use]
    pub fn from_cms(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// Sort priority on the catalog page: available first, sold last.
    #[must_use]
    pub const fn catalog_priority(self) -> u8 {
        match self {
            Self::Available => 0,
            Self::Reserved => 1,
            Self::Upcoming => 2,
            Self::Sold => 3,
        }
    }

    /// Short badge shown on product cards; `None` for available products.
    #[must_use]
    pub const fn badge(self) -> Option<&'static str> {
        match self {
            Self::Available => None,
            Self::Reserved => Some("Reservado"),
            Self::Sold => Some("Vendido"),
            Self::Upcoming => Some("Próximo"),
        }
    }

    /// Whether the piece is gone for good.
    #[must_use]
    pub const fn is_sold(self) -> bool {
        matches!(self, Self::Sold)
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Reserved => write!(f, "reserved"),
            Self::Sold => write!(f, "sold"),
            Self::Upcoming => write!(f, "upcoming"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "sold" => Ok(Self::Sold),
            "upcoming" => Ok(Self::Upcoming),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}
