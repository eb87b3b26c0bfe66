//! HTML parser for App Store listing pages.

use crate::appstore::selectors::listing;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Raw price text of one list entry, with the tier name shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLabel {
    /// Tier name (e.g. "ChatGPT Plus"), informational only
    pub title: Option<String>,
    /// Price exactly as displayed
    pub price: String,
}

impl AsRef<str> for PriceLabel {
    fn as_ref(&self) -> &str {
        &self.price
    }
}

/// Extracts the price labels of a listing page in page order.
///
/// Entries without a price element are skipped.
pub fn extract_price_labels(html: &str) -> Vec<PriceLabel> {
    let document = Html::parse_document(html);

    let labels: Vec<PriceLabel> = document
        .select(&listing::ITEM)
        .filter_map(|item| {
            let Some(price) = item.select(&listing::PRICE).next().map(element_text) else {
                trace!("Skipping list entry without price");
                return None;
            };
            let title = item.select(&listing::TITLE).next().map(element_text);
            Some(PriceLabel { title: title.filter(|t| !t.is_empty()), price })
        })
        .collect();

    debug!("Extracted {} price labels", labels.len());
    labels
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, price: &str) -> String {
        format!(
            r#"<li class="list-with-numbers__item">
                <span class="list-with-numbers__item__title"><span>{}</span></span>
                <span class="list-with-numbers__item__price">{}</span>
            </li>"#,
            title, price
        )
    }

    fn page(entries: &[String]) -> String {
        format!(
            r#"<html><body><ol class="list-with-numbers">{}</ol></body></html>"#,
            entries.join("\n")
        )
    }

    #[test]
    fn test_extracts_in_page_order() {
        let html = page(&[
            entry("ChatGPT Plus", "$19.99"),
            entry("ChatGPT Pro", "$199.99"),
            entry("ChatGPT Plus", "$199.99"),
        ]);

        let labels = extract_price_labels(&html);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0].title.as_deref(), Some("ChatGPT Plus"));
        assert_eq!(labels[0].price, "$19.99");
        assert_eq!(labels[1].title.as_deref(), Some("ChatGPT Pro"));
        assert_eq!(labels[1].price, "$199.99");
        assert_eq!(labels[2].price, "$199.99");
    }

    #[test]
    fn test_trims_whitespace_and_keeps_entities() {
        let html = page(&[entry("  Plus  ", "\n  22,99&nbsp;€  \n")]);
        let labels = extract_price_labels(&html);
        assert_eq!(labels[0].title.as_deref(), Some("Plus"));
        assert_eq!(labels[0].price, "22,99\u{a0}€");
    }

    #[test]
    fn test_skips_entries_without_price() {
        let html = r#"<html><body><ol>
            <li class="list-with-numbers__item">
                <span class="list-with-numbers__item__title">No price here</span>
            </li>
            <li class="list-with-numbers__item">
                <span class="list-with-numbers__item__price">$4.99</span>
            </li>
        </ol></body></html>"#;

        let labels = extract_price_labels(html);
        assert_eq!(labels.len(), 1);
        assert!(labels[0].title.is_none());
        assert_eq!(labels[0].price, "$4.99");
    }

    #[test]
    fn test_page_without_list() {
        let html = "<html><body><h1>Not available in your country</h1></body></html>";
        assert!(extract_price_labels(html).is_empty());
        assert!(extract_price_labels("").is_empty());
    }

    #[test]
    fn test_label_as_ref() {
        let label = PriceLabel { title: None, price: "₩29,000".to_string() };
        assert_eq!(label.as_ref(), "₩29,000");
    }
}
