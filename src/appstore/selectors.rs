//! CSS selectors for App Store listing pages.
//!
//! Update this file when the App Store changes its listing markup, and add a
//! fixture under `tests/fixtures/` with the new layout.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the numbered in-app purchase list of a listing.
pub mod listing {
    use super::*;

    /// One numbered list entry (one subscription tier).
    pub static ITEM: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("li.list-with-numbers__item").unwrap());

    /// Tier name inside an entry.
    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.list-with-numbers__item__title").unwrap());

    /// Displayed price inside an entry.
    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.list-with-numbers__item__price").unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_selectors_parse() {
        let _ = &*listing::ITEM;
        let _ = &*listing::TITLE;
        let _ = &*listing::PRICE;
    }
}
