//! One-shot normalization of a single price label.

use crate::appstore::StorefrontCode;
use crate::config::Config;
use crate::pricing::{inspect_label, LabelParse, LocaleRules, PriceValue};
use serde::Serialize;

/// Everything the pipeline derives from one label under one storefront.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelReport {
    pub label: String,
    pub storefront: StorefrontCode,
    /// Marker as split off the label, before resolution
    pub marker: Option<String>,
    /// Currency used for precision rules
    pub currency: String,
    /// Whether `currency` came from the label rather than the storefront default
    pub detected: bool,
    pub numeric_text: String,
    pub value: Option<PriceValue>,
    pub error: Option<String>,
}

/// Runs a label through the pricing pipeline without any network access.
pub struct LabelCommand {
    rules: LocaleRules,
}

impl LabelCommand {
    /// Creates a new label command.
    pub fn new(config: &Config) -> Self {
        Self { rules: LocaleRules::from_config(config) }
    }

    /// Splits, resolves and normalizes `label` as shown on `storefront`.
    pub fn execute(&self, label: &str, storefront: &StorefrontCode) -> LabelReport {
        let LabelParse { split, detected, currency, value } =
            inspect_label(label, storefront, &self.rules);

        let (value, error) = match value {
            Ok(value) => (Some(value), None),
            Err(e) => (None, Some(e.to_string())),
        };

        LabelReport {
            label: label.to_string(),
            storefront: storefront.clone(),
            marker: split.marker,
            currency,
            detected: detected.is_some(),
            numeric_text: split.numeric,
            value,
            error,
        }
    }
}
