//! URL handling module for Ripple-Seek
//!
//! This module provides the [`Address`] type, the normalized absolute URL that
//! identifies a fetchable document, and the normalization rules behind it.

mod normalize;

use crate::{UrlError, UrlResult};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use url::Url;

pub use normalize::normalize_url;

/// A normalized absolute HTTP(S) URL
///
/// Two links that normalize to the same string are the same `Address`, which
/// is what the visited set deduplicates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(Url);

impl Address {
    /// Parses and normalizes an absolute URL
    ///
    /// # Examples
    ///
    /// ```
    /// use ripple_seek::url::Address;
    ///
    /// let address = Address::parse("https://Example.com/docs#intro").unwrap();
    /// assert_eq!(address.as_str(), "https://example.com/docs");
    /// ```
    pub fn parse(input: &str) -> UrlResult<Self> {
        normalize_url(input).map(Self)
    }

    /// Resolves a (possibly relative) link target against this address
    pub fn join(&self, href: &str) -> UrlResult<Self> {
        let joined = self
            .0
            .join(href.trim())
            .map_err(|e| UrlError::Parse(e.to_string()))?;
        normalize::normalize_parsed(joined).map(Self)
    }

    /// Returns the address as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Address {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Address {
        Address::parse("https://example.com/docs/guide").unwrap()
    }

    #[test]
    fn test_join_relative_path() {
        let joined = base().join("intro").unwrap();
        assert_eq!(joined.as_str(), "https://example.com/docs/intro");
    }

    #[test]
    fn test_join_root_relative() {
        let joined = base().join("/about").unwrap();
        assert_eq!(joined.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_join_absolute() {
        let joined = base().join("http://other.org/x#frag").unwrap();
        assert_eq!(joined.as_str(), "http://other.org/x");
    }

    #[test]
    fn test_join_parent() {
        let joined = base().join("../index.html").unwrap();
        assert_eq!(joined.as_str(), "https://example.com/index.html");
    }

    #[test]
    fn test_join_rejects_other_schemes() {
        assert!(matches!(
            base().join("mailto:someone@example.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_equal_after_normalization() {
        let a = Address::parse("https://EXAMPLE.com/p?b=1&a=2#x").unwrap();
        let b = Address::parse("https://example.com/p?a=2&b=1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_str_and_display() {
        let address: Address = "https://example.com/".parse().unwrap();
        assert_eq!(address.to_string(), "https://example.com/");
    }

    #[test]
    fn test_serializes_as_string() {
        let address = Address::parse("https://example.com/a").unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"https://example.com/a\"");
    }
}
