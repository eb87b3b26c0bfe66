//! Maps currency markers found in price labels to ISO codes.

use tracing::debug;

/// Markers that identify exactly one currency.
static UNAMBIGUOUS: &[(&str, &str)] = &[
    ("€", "EUR"),
    ("£", "GBP"),
    ("₩", "KRW"),
    ("₫", "VND"),
    ("đ", "VND"),
    ("₹", "INR"),
    ("₽", "RUB"),
    ("฿", "THB"),
    ("₱", "PHP"),
    ("₺", "TRY"),
    ("₪", "ILS"),
    ("₴", "UAH"),
    ("₦", "NGN"),
    ("R$", "BRL"),
    ("US$", "USD"),
    ("HK$", "HKD"),
    ("S$", "SGD"),
    ("A$", "AUD"),
    ("AU$", "AUD"),
    ("C$", "CAD"),
    ("CA$", "CAD"),
    ("NT$", "TWD"),
    ("MX$", "MXN"),
    ("NZ$", "NZD"),
    ("RM", "MYR"),
    ("Rp", "IDR"),
    ("Rs", "INR"),
    ("Rs.", "INR"),
    ("zł", "PLN"),
    ("Kč", "CZK"),
    ("Ft", "HUF"),
    ("lei", "RON"),
];

/// Symbols shared by several currencies: (symbol, primary, family).
///
/// A shared symbol resolves to the storefront's own currency when that
/// currency belongs to the family, otherwise to the primary (if any).
static SHARED: &[(&str, Option<&str>, &[&str])] = &[
    (
        "$",
        Some("USD"),
        &["USD", "AUD", "CAD", "HKD", "SGD", "NZD", "MXN", "TWD", "CLP", "COP", "ARS"],
    ),
    ("¥", Some("JPY"), &["JPY", "CNY"]),
    ("￥", Some("JPY"), &["JPY", "CNY"]),
    ("元", Some("CNY"), &["CNY"]),
    ("kr", None, &["SEK", "NOK", "DKK", "ISK"]),
    ("kr.", None, &["SEK", "NOK", "DKK", "ISK"]),
];

/// Resolves a label's currency marker to an ISO code.
///
/// `default_currency` is the storefront's configured currency and only
/// matters for shared symbols. Returns `None` for markers we cannot place.
pub fn resolve_marker(marker: &str, default_currency: &str) -> Option<String> {
    let marker = marker.trim();

    if marker.len() == 3 && marker.chars().all(|c| c.is_ascii_uppercase()) {
        return Some(marker.to_string());
    }

    if let Some((_, code)) = UNAMBIGUOUS.iter().find(|(symbol, _)| *symbol == marker) {
        return Some(code.to_string());
    }

    if let Some((_, primary, family)) = SHARED.iter().find(|(symbol, _, _)| *symbol == marker) {
        if family.contains(&default_currency) {
            return Some(default_currency.to_string());
        }
        return primary.map(String::from);
    }

    debug!("Unrecognized currency marker: {}", marker);
    None
}
