//! storefront-prices - App Store subscription prices across storefronts
//!
//! Fetches an app's listing page from each configured storefront, extracts the
//! in-app purchase price labels and normalizes them into comparable numbers
//! with a currency code.

pub mod appstore;
pub mod commands;
pub mod config;
pub mod format;
pub mod pricing;

pub use appstore::storefront::{StorefrontCode, StorefrontInfo, KNOWN_STOREFRONTS};
pub use config::Config;
pub use pricing::{LocaleRules, PriceDetail, PriceOutcome, PriceValue, StorefrontResult};
