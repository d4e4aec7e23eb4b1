//! Product slug type.
//!
//! The slug is the sole external identity of a product: URLs, cart lines and
//! caches are all keyed by it.

use core::fmt;
use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input is empty or whitespace only.
    #[error("slug cannot be empty")]
    Empty,
    /// The input contains a path separator or whitespace.
    #[error("slug contains an invalid character: {0:?}")]
    InvalidChar(char),
}

/// A product slug.
///
/// ## Examples
///
/// ```
/// use foxsports_core::Slug;
///
/// assert!(Slug::parse("luka-doncic-prizm-psa-10").is_ok());
/// assert!(Slug::parse("").is_err());
/// assert!(Slug::parse("a/b").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Parse a `Slug` from a URL path segment or form field.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains `/`, `?`, `#` or
    /// whitespace.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SlugError::Empty);
        }

        if let Some(c) = trimmed
            .chars()
            .find(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
        {
            return Err(SlugError::InvalidChar(c));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap a CMS-provided identifier without validation.
    ///
    /// CMS slugs are validated at authoring time; re-validating them here
    /// would drop products the editors can see.
    #[must_use]
    pub fn from_cms(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Slug {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Slug {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let slug = Slug::parse("  wemby-rookie  ").unwrap();
        assert_eq!(slug.as_str(), "wemby-rookie");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(Slug::parse("   "), Err(SlugError::Empty));
    }

    #[test]
    fn test_parse_rejects_separators() {
        assert_eq!(Slug::parse("a/b"), Err(SlugError::InvalidChar('/')));
        assert_eq!(Slug::parse("a b"), Err(SlugError::InvalidChar(' ')));
    }

    #[test]
    fn test_compares_with_str() {
        let slug = Slug::from_cms("charizard-psa-10");
        assert!(slug == "charizard-psa-10");
    }

    #[test]
    fn test_serde_transparent() {
        let slug = Slug::from_cms("mj-fleer");
        let json = serde_json::to_string(&slug).unwrap();
        assert_eq!(json, "\"mj-fleer\"");
        let back: Slug = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slug);
    }
}
