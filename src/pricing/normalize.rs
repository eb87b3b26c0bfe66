//! Locale-aware conversion of numeric price text into canonical values.

use crate::appstore::storefront::{StorefrontCode, KNOWN_STOREFRONTS};
use crate::config::Config;
use crate::pricing::models::{PriceValue, UNKNOWN_CURRENCY};
use regex_lite::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::num::ParseFloatError;
use std::sync::LazyLock;
use thiserror::Error;

/// First run of digits and periods that holds at least one digit.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9.]*[0-9][0-9.]*").unwrap());

/// Why a numeric text produced no value.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("no digits in price text '{text}'")]
    NoDigits { text: String },

    #[error("cannot parse '{text}' as a number: {source}")]
    Unparsable {
        text: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("price '{text}' is out of range")]
    NonFinite { text: String },

    #[error("price '{text}' is too large for a whole amount")]
    TooLarge { text: String },
}

/// Immutable lookup tables for punctuation and precision rules.
///
/// Built once from [`Config`] at startup and handed to everything that
/// normalizes prices.
#[derive(Debug, Clone)]
pub struct LocaleRules {
    currencies: BTreeMap<String, String>,
    comma_decimal: BTreeSet<String>,
    zero_decimal: BTreeSet<String>,
}

impl LocaleRules {
    /// Freezes the configured tables. Configured currencies are layered over
    /// the built-in storefront table.
    pub fn from_config(config: &Config) -> Self {
        let mut currencies: BTreeMap<String, String> = KNOWN_STOREFRONTS
            .iter()
            .map(|info| (info.code.to_string(), info.currency.to_string()))
            .collect();

        for (code, currency) in &config.currencies {
            currencies
                .insert(code.trim().to_ascii_lowercase(), currency.trim().to_ascii_uppercase());
        }

        Self {
            currencies,
            comma_decimal: config
                .comma_decimal
                .iter()
                .map(|code| code.trim().to_ascii_lowercase())
                .collect(),
            zero_decimal: config
                .zero_decimal
                .iter()
                .map(|code| code.trim().to_ascii_uppercase())
                .collect(),
        }
    }

    /// Returns the configured currency for a storefront, or "Unknown".
    pub fn default_currency(&self, storefront: &StorefrontCode) -> &str {
        self.currencies
            .get(storefront.as_str())
            .map(String::as_str)
            .filter(|currency| !currency.is_empty())
            .unwrap_or(UNKNOWN_CURRENCY)
    }

    /// Returns whether the storefront writes `1.234,56`.
    pub fn uses_comma_decimal(&self, storefront: &StorefrontCode) -> bool {
        self.comma_decimal.contains(storefront.as_str())
    }

    /// Returns whether the currency has no fractional unit.
    pub fn is_zero_decimal(&self, currency: &str) -> bool {
        self.zero_decimal.contains(currency)
    }
}

impl Default for LocaleRules {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Normalizes numeric price text for a storefront and currency.
///
/// Comma-decimal storefronts drop every period and turn commas into the
/// decimal point; all others drop every comma. Spaces and apostrophes
/// between digits are grouping and are dropped too. The first digit/period
/// run is parsed; zero-decimal currencies are truncated to a whole number,
/// everything else is rounded half away from zero to two places.
pub fn normalize(
    numeric: &str,
    storefront: &StorefrontCode,
    currency: &str,
    rules: &LocaleRules,
) -> Result<PriceValue, NormalizeError> {
    let ungrouped = strip_digit_grouping(numeric);
    let transformed = if rules.uses_comma_decimal(storefront) {
        ungrouped.replace('.', "").replace(',', ".")
    } else {
        ungrouped.replace(',', "")
    };

    let digits = NUMBER
        .find(&transformed)
        .ok_or_else(|| NormalizeError::NoDigits { text: numeric.to_string() })?
        .as_str();

    let value: f64 = digits
        .parse()
        .map_err(|source| NormalizeError::Unparsable { text: digits.to_string(), source })?;

    if !value.is_finite() {
        return Err(NormalizeError::NonFinite { text: digits.to_string() });
    }

    if rules.is_zero_decimal(currency) {
        let whole = value.trunc();
        // `i64::MAX as f64` rounds up to 2^63, which no i64 holds.
        if whole >= i64::MAX as f64 {
            return Err(NormalizeError::TooLarge { text: digits.to_string() });
        }
        Ok(PriceValue::Whole(whole as i64))
    } else {
        Ok(PriceValue::Decimal((value * 100.0).round() / 100.0))
    }
}

/// Drops spaces and apostrophes sitting between two digits ("1 990" -> "1990").
fn strip_digit_grouping(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let is_digit_at = |i: usize| chars.get(i).is_some_and(|c| c.is_ascii_digit());

    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            let grouping = matches!(c, ' ' | '\'' | '\u{2019}');
            !(grouping && i > 0 && is_digit_at(i - 1) && is_digit_at(i + 1))
        })
        .map(|(_, &c)| c)
        .collect()
}
