//! Raw CMS document shapes.
//!
//! These mirror what the GROQ projections return. Only `_id` is required:
//! every other field goes through a [`lenient`] deserializer, so a value of
//! the wrong type becomes `None` instead of rejecting the whole document.
//! [`super::normalize`] turns them into domain types.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub doc_id: String,
    #[serde(rename = "_createdAt", default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub short_description: Option<String>,
    /// Portable-text blocks, or a plain string.
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub highlights: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub sport: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub certification: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub inventory: Option<i64>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub whatsapp_message: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub hero_video_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub gallery: Option<Vec<GalleryImageDocument>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageDocument {
    #[serde(rename = "_key", default, deserialize_with = "lenient::string")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub asset: Option<AssetReference>,
}

/// An image asset, either as a reference or dereferenced.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetReference {
    #[serde(rename = "_ref", default, deserialize_with = "lenient::string")]
    pub reference: Option<String>,
    #[serde(rename = "_id", default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
}

impl AssetReference {
    /// The `image-…` identifier, whichever form carries it.
    #[must_use]
    pub fn asset_id(&self) -> Option<&str> {
        self.reference.as_deref().or(self.id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeDropDocument {
    #[serde(rename = "_id")]
    pub doc_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub scheduled_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status_label: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cta_label: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cta_href: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub secondary_cta_label: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub secondary_cta_href: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub show_in_banner: Option<bool>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub banner_message: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub banner_cta_label: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub banner_action: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub banner_href: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialDocument {
    #[serde(rename = "_id")]
    pub doc_id: String,
    #[serde(rename = "_createdAt", default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub quote: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: Option<String>,
}

/// A portable-text block. Only `block` blocks carry text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortableTextBlock {
    #[serde(rename = "_type", default, deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub children: Option<Vec<PortableTextSpan>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortableTextSpan {
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: Option<String>,
}

/// Field deserializers that never fail.
///
/// Each one reads the raw JSON value and keeps it only when it can be read
/// as the target type.
pub mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    /// Strings only. Empty strings are kept; callers decide what they mean.
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match raw(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    /// Numbers, or strings holding a number.
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(as_f64(&raw(deserializer)?))
    }

    /// Whole numbers. `1986.0` and `"1986"` are accepted; fractions and
    /// out-of-range values are not.
    pub fn integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<i64>,
    {
        let value = raw(deserializer)?;
        let whole = match &value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_f64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        Ok(whole.and_then(|n| T::try_from(n).ok()))
    }

    pub fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        Ok(raw(deserializer)?.as_bool())
    }

    /// A list of strings. Non-string entries are dropped.
    pub fn strings<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        Ok(match raw(deserializer)? {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        })
    }

    /// A list of `T`. Entries that do not fit are dropped.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match raw(deserializer)? {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            ),
            _ => None,
        })
    }

    /// Any `T`, or `None` if the value does not fit.
    pub fn value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(serde_json::from_value(raw(deserializer)?).ok())
    }

    fn as_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite())
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn whole_f64(n: f64) -> Option<i64> {
        (n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15).then_some(n as i64)
    }
}
