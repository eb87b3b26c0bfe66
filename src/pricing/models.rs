//! Data models for normalized storefront prices.

use crate::appstore::storefront::StorefrontCode;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency placeholder for storefronts with no configured default.
pub const UNKNOWN_CURRENCY: &str = "Unknown";

/// A canonical price number.
///
/// Zero-decimal currencies (JPY, KRW, ...) carry a whole number; everything
/// else is rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Whole(i64),
    Decimal(f64),
}

impl PriceValue {
    /// Returns the value as f64.
    pub fn as_f64(&self) -> f64 {
        match self {
            PriceValue::Whole(v) => *v as f64,
            PriceValue::Decimal(v) => *v,
        }
    }
}

impl fmt::Display for PriceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceValue::Whole(v) => write!(f, "{}", v),
            PriceValue::Decimal(v) => write!(f, "{:.2}", v),
        }
    }
}

/// One label's recovered price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedPrice {
    /// Currency derived from the label's own marker, if it had one we recognize
    pub currency: Option<String>,
    /// Normalized amount
    pub value: PriceValue,
}

/// The three subscription tiers of a listing, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceDetail {
    pub plus_monthly: PriceValue,
    pub pro_monthly: PriceValue,
    pub plus_yearly: PriceValue,
}

impl PriceDetail {
    /// Number of tiers, and so of prices a listing page must yield.
    pub const TIERS: usize = 3;

    /// Maps exactly [`Self::TIERS`] values onto the tiers by position.
    ///
    /// The listing page carries no tier key next to each price, so the order
    /// of the page's numbered list decides which value lands in which tier.
    pub fn from_positional(values: &[PriceValue]) -> Option<Self> {
        let tiers: &[PriceValue; Self::TIERS] = values.try_into().ok()?;
        let [plus_monthly, pro_monthly, plus_yearly] = *tiers;
        Some(Self { plus_monthly, pro_monthly, plus_yearly })
    }
}

/// Price detail of one storefront, or why it is missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceOutcome {
    Found(PriceDetail),
    NotFound,
    Error,
}

impl PriceOutcome {
    const NOT_FOUND: &'static str = "Not Found";
    const ERROR: &'static str = "Error";

    /// Returns the detail when prices were found.
    pub fn detail(&self) -> Option<&PriceDetail> {
        match self {
            PriceOutcome::Found(detail) => Some(detail),
            _ => None,
        }
    }

    /// Returns the marker string used for missing details.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            PriceOutcome::Found(_) => None,
            PriceOutcome::NotFound => Some(Self::NOT_FOUND),
            PriceOutcome::Error => Some(Self::ERROR),
        }
    }
}

impl Serialize for PriceOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PriceOutcome::Found(detail) => detail.serialize(serializer),
            PriceOutcome::NotFound => serializer.serialize_str(Self::NOT_FOUND),
            PriceOutcome::Error => serializer.serialize_str(Self::ERROR),
        }
    }
}

impl<'de> Deserialize<'de> for PriceOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Detail(PriceDetail),
            Marker(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Detail(detail) => Ok(PriceOutcome::Found(detail)),
            Repr::Marker(s) if s == Self::NOT_FOUND => Ok(PriceOutcome::NotFound),
            Repr::Marker(s) if s == Self::ERROR => Ok(PriceOutcome::Error),
            Repr::Marker(s) => Err(de::Error::custom(format!("unknown price_detail marker: {}", s))),
        }
    }
}

/// Final record for one storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontResult {
    pub country_code: StorefrontCode,
    pub currency: String,
    pub price_detail: PriceOutcome,
}

impl StorefrontResult {
    /// Creates a result whose currency falls back to "Unknown" when empty.
    pub fn new(
        country_code: StorefrontCode,
        currency: impl Into<String>,
        price_detail: PriceOutcome,
    ) -> Self {
        let currency = currency.into();
        let currency =
            if currency.trim().is_empty() { UNKNOWN_CURRENCY.to_string() } else { currency };
        Self { country_code, currency, price_detail }
    }

    /// Returns true if all three tiers were recovered.
    pub fn is_found(&self) -> bool {
        matches!(self.price_detail, PriceOutcome::Found(_))
    }
}
