//! Price-text normalization: label splitting, currency resolution, locale
//! rules and per-storefront aggregation.

pub mod aggregate;
pub mod currency;
pub mod models;
pub mod normalize;
pub mod split;

pub use aggregate::{aggregate, fetch_failed, inspect_label, parse_label, LabelParse};
pub use models::{ParsedPrice, PriceDetail, PriceOutcome, PriceValue, StorefrontResult};
pub use normalize::{normalize, LocaleRules, NormalizeError};
pub use split::{split_label, SplitLabel};
