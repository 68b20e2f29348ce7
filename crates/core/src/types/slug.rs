//! URL-safe shop identifiers derived from shop names.

use serde::{Deserialize, Serialize};

/// A shop slug.
///
/// Derived by lower-casing the shop name and replacing each space with a
/// hyphen. No other characters are touched, so `"Moj Shop"` becomes
/// `"moj-shop"` and `"MojShop"` becomes `"mojshop"`.
///
/// ```
/// use megashop_core::Slug;
///
/// assert_eq!(Slug::from_name("Moj Shop").as_str(), "moj-shop");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a human shop name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self(name.trim().to_lowercase().replace(' ', "-"))
    }

    /// Wrap a slug read back from storage.
    #[must_use]
    pub const fn from_stored(slug: String) -> Self {
        Self(slug)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Synthesize the public display URL for a shop that was created without one.
///
/// The host label is the lower-cased name with all spaces removed, under the
/// `.sk` marketplace domain.
#[must_use]
pub fn default_shop_url(name: &str) -> String {
    format!("https://{}.sk", name.trim().to_lowercase().replace(' ', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_hyphenates() {
        assert_eq!(Slug::from_name("MojShop").as_str(), "mojshop");
        assert_eq!(Slug::from_name("Acme Tools SK").as_str(), "acme-tools-sk");
    }

    #[test]
    fn test_trims_before_deriving() {
        assert_eq!(Slug::from_name("  Kvety  ").as_str(), "kvety");
    }

    #[test]
    fn test_keeps_other_characters() {
        assert_eq!(Slug::from_name("Čaj & Káva").as_str(), "čaj-&-káva");
    }

    #[test]
    fn test_default_shop_url() {
        assert_eq!(default_shop_url("Moj Shop"), "https://mojshop.sk");
    }
}
