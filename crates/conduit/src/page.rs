//! Page numbers and their reconciliation rules.

use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Page(NonZeroU32);

impl Page {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Create a page number, rejecting zero.
    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    /// The page number as an integer.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Number of items preceding this page for the given page size.
    #[must_use]
    pub fn offset(self, limit: u32) -> u64 {
        u64::from(self.get() - 1) * u64::from(limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Page {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| Error::invalid_page(value))
    }
}

impl From<Page> for u32 {
    fn from(page: Page) -> Self {
        page.get()
    }
}

impl FromStr for Page {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| Error::invalid_page(s))
    }
}

/// Pick the page that drives the current render.
///
/// A page carried by the URL wins whenever it differs from the stored one;
/// otherwise the stored page is used.
#[must_use]
pub fn resolve_effective_page(stored: Page, url: Option<Page>) -> Page {
    match url {
        Some(url_page) if url_page != stored => url_page,
        _ => stored,
    }
}

/// Number of pages needed to show `total` items, `limit` per page.
#[must_use]
pub fn page_count(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32) -> Page {
        Page::new(n).unwrap()
    }

    #[test]
    fn test_page_rejects_zero() {
        assert!(Page::new(0).is_none());
        assert_eq!(Page::new(1), Some(Page::FIRST));
        assert_eq!(Page::default(), Page::FIRST);
    }

    #[test]
    fn test_page_from_str() {
        assert_eq!("3".parse::<Page>().unwrap(), page(3));
        assert_eq!(" 7 ".parse::<Page>().unwrap(), page(7));
        assert!("0".parse::<Page>().is_err());
        assert!("-2".parse::<Page>().is_err());
        assert!("abc".parse::<Page>().is_err());
        assert!("".parse::<Page>().is_err());
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(Page::FIRST.offset(20), 0);
        assert_eq!(page(3).offset(20), 40);
    }

    #[test]
    fn test_page_serde() {
        assert_eq!(serde_json::to_string(&page(4)).unwrap(), "4");
        assert_eq!(serde_json::from_str::<Page>("2").unwrap(), page(2));
        assert!(serde_json::from_str::<Page>("0").is_err());
    }

    #[test]
    fn test_resolve_effective_page() {
        for stored in 1..=4 {
            for url in 1..=4 {
                let resolved = resolve_effective_page(page(stored), Some(page(url)));
                assert_eq!(resolved, page(url));
            }
            assert_eq!(resolve_effective_page(page(stored), None), page(stored));
        }
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(25, 20), 2);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(21, 20), 2);
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(10, 0), 0);
    }
}
