//! App Store storefront codes and the built-in storefront table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Two-letter App Store storefront identifier, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorefrontCode(String);

impl StorefrontCode {
    /// Returns the code as a lowercase string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the built-in metadata for this storefront, if it is one of the
    /// storefronts shipped with the tool.
    pub fn info(&self) -> Option<&'static StorefrontInfo> {
        KNOWN_STOREFRONTS.iter().find(|info| info.code == self.0)
    }

    /// Returns the Accept-Language header value for this storefront.
    pub fn accept_language(&self) -> &'static str {
        self.info().map(|info| info.accept_language).unwrap_or("en-US,en;q=0.9")
    }
}

impl fmt::Display for StorefrontCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StorefrontCode {
    type Err = StorefrontParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_lowercase()))
        } else {
            Err(StorefrontParseError(s.to_string()))
        }
    }
}

impl TryFrom<String> for StorefrontCode {
    type Error = StorefrontParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StorefrontCode> for String {
    fn from(code: StorefrontCode) -> Self {
        code.0
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid storefront code '{0}'. Expected two letters, e.g. us, de, jp")]
pub struct StorefrontParseError(String);

/// Static description of a storefront shipped with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorefrontInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub currency: &'static str,
    pub accept_language: &'static str,
}

const fn storefront(
    code: &'static str,
    name: &'static str,
    currency: &'static str,
    accept_language: &'static str,
) -> StorefrontInfo {
    StorefrontInfo { code, name, currency, accept_language }
}

/// Storefronts swept by default, in output order.
pub static KNOWN_STOREFRONTS: &[StorefrontInfo] = &[
    storefront("us", "United States", "USD", "en-US,en;q=0.9"),
    storefront("vn", "Vietnam", "VND", "vi-VN,vi;q=0.9,en;q=0.8"),
    storefront("cn", "China", "CNY", "zh-CN,zh;q=0.9,en;q=0.8"),
    storefront("hk", "Hong Kong", "HKD", "zh-HK,zh;q=0.9,en;q=0.8"),
    storefront("jp", "Japan", "JPY", "ja-JP,ja;q=0.9,en;q=0.8"),
    storefront("kr", "South Korea", "KRW", "ko-KR,ko;q=0.9,en;q=0.8"),
    storefront("de", "Germany", "EUR", "de-DE,de;q=0.9,en;q=0.8"),
    storefront("fr", "France", "EUR", "fr-FR,fr;q=0.9,en;q=0.8"),
    storefront("it", "Italy", "EUR", "it-IT,it;q=0.9,en;q=0.8"),
    storefront("es", "Spain", "EUR", "es-ES,es;q=0.9,en;q=0.8"),
    storefront("ru", "Russia", "RUB", "ru-RU,ru;q=0.9,en;q=0.8"),
    storefront("in", "India", "INR", "en-IN,en;q=0.9,hi;q=0.8"),
    storefront("id", "Indonesia", "IDR", "id-ID,id;q=0.9,en;q=0.8"),
    storefront("th", "Thailand", "THB", "th-TH,th;q=0.9,en;q=0.8"),
    storefront("my", "Malaysia", "MYR", "en-MY,ms;q=0.9,en;q=0.8"),
    storefront("sg", "Singapore", "SGD", "en-SG,en;q=0.9"),
    storefront("ph", "Philippines", "PHP", "en-PH,en;q=0.9"),
    storefront("au", "Australia", "AUD", "en-AU,en;q=0.9"),
    storefront("gb", "United Kingdom", "GBP", "en-GB,en;q=0.9"),
    storefront("ca", "Canada", "CAD", "en-CA,en;q=0.9,fr;q=0.8"),
];

/// Storefronts that write `1.234,56`: period groups thousands, comma marks decimals.
pub static DEFAULT_COMMA_DECIMAL: &[&str] = &[
    "at", "be", "br", "de", "dk", "es", "fi", "fr", "id", "it", "nl", "no", "pl", "pt",
    "ru", "se", "tr", "vn",
];

/// Currencies whose prices are shown without a fractional part.
pub static DEFAULT_ZERO_DECIMAL: &[&str] =
    &["CLP", "COP", "HUF", "IDR", "ISK", "JPY", "KRW", "PYG", "TWD", "UGX", "VND"];
