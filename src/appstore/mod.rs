//! App Store-specific modules for storefronts, HTTP client and listing parsing.

pub mod client;
pub mod parser;
pub mod selectors;
pub mod storefront;

pub use client::{AppStoreClient, StorefrontFetch};
pub use parser::{extract_price_labels, PriceLabel};
pub use storefront::StorefrontCode;
