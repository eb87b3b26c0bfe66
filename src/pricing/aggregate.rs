//! Per-storefront aggregation of price labels into a final result.

use crate::appstore::storefront::StorefrontCode;
use crate::pricing::currency::resolve_marker;
use crate::pricing::models::{ParsedPrice, PriceDetail, PriceOutcome, PriceValue, StorefrontResult};
use crate::pricing::normalize::{normalize, LocaleRules, NormalizeError};
use crate::pricing::split::{split_label, SplitLabel};
use tracing::{debug, trace, warn};

/// Every intermediate step of parsing one label.
#[derive(Debug)]
pub struct LabelParse {
    pub split: SplitLabel,
    /// Currency resolved from the label's own marker
    pub detected: Option<String>,
    /// Currency the precision rules ran with: detected, else the storefront default
    pub currency: String,
    pub value: Result<PriceValue, NormalizeError>,
}

/// Splits, resolves and normalizes one raw label, keeping each step.
///
/// The label's own marker decides the currency when we recognize it;
/// otherwise the storefront default drives the precision rules.
pub fn inspect_label(
    label: &str,
    storefront: &StorefrontCode,
    rules: &LocaleRules,
) -> LabelParse {
    let default_currency = rules.default_currency(storefront);
    let split = split_label(label);
    let detected =
        split.marker.as_deref().and_then(|marker| resolve_marker(marker, default_currency));

    let currency = detected.clone().unwrap_or_else(|| default_currency.to_string());
    let value = normalize(&split.numeric, storefront, &currency, rules);

    LabelParse { split, detected, currency, value }
}

/// Parses one raw label into its value and detected currency.
pub fn parse_label(
    label: &str,
    storefront: &StorefrontCode,
    rules: &LocaleRules,
) -> Result<ParsedPrice, NormalizeError> {
    let LabelParse { detected, value, .. } = inspect_label(label, storefront, rules);
    Ok(ParsedPrice { currency: detected, value: value? })
}

/// Builds the result for a storefront from its labels in page order.
///
/// Unparsable labels are dropped. Exactly [`PriceDetail::TIERS`] recovered
/// prices fill the tiers by position and the currency is voted from the
/// detected markers; any other count yields "Not Found" with the default
/// currency.
pub fn aggregate<S: AsRef<str>>(
    storefront: &StorefrontCode,
    labels: &[S],
    rules: &LocaleRules,
) -> StorefrontResult {
    let default_currency = rules.default_currency(storefront);

    let parsed: Vec<ParsedPrice> = labels
        .iter()
        .filter_map(|label| {
            let label = label.as_ref();
            match parse_label(label, storefront, rules) {
                Ok(price) => {
                    trace!("{}: '{}' -> {}", storefront, label, price.value);
                    Some(price)
                }
                Err(e) => {
                    debug!("{}: dropping price label '{}': {}", storefront, label, e);
                    None
                }
            }
        })
        .collect();

    let values: Vec<_> = parsed.iter().map(|price| price.value).collect();
    let Some(detail) = PriceDetail::from_positional(&values) else {
        warn!(
            "{}: expected {} prices, recovered {} from {} labels",
            storefront,
            PriceDetail::TIERS,
            values.len(),
            labels.len()
        );
        return StorefrontResult::new(storefront.clone(), default_currency, PriceOutcome::NotFound);
    };

    let currency = majority_currency(parsed.iter().filter_map(|price| price.currency.as_deref()))
        .unwrap_or_else(|| default_currency.to_string());

    StorefrontResult::new(storefront.clone(), currency, PriceOutcome::Found(detail))
}

/// Result for a storefront whose page could not be fetched.
pub fn fetch_failed(storefront: &StorefrontCode, rules: &LocaleRules) -> StorefrontResult {
    let currency = rules.default_currency(storefront);
    StorefrontResult::new(storefront.clone(), currency, PriceOutcome::Error)
}

/// Most frequent currency; ties go to the one seen first.
pub fn majority_currency<'a>(detected: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for currency in detected {
        match counts.iter_mut().find(|(seen, _)| *seen == currency) {
            Some((_, count)) => *count += 1,
            None => counts.push((currency, 1)),
        }
    }

    // Strict comparison keeps the earliest entry on ties.
    let mut best: Option<(&str, usize)> = None;
    for (currency, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((currency, count));
        }
    }

    best.map(|(currency, _)| currency.to_string())
}
