//! Output formatting for storefront results (table, JSON, markdown, CSV) and
//! the JSON results file.

use crate::commands::LabelReport;
use crate::config::OutputFormat;
use crate::pricing::{PriceOutcome, StorefrontResult};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Formats storefront results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the results of a sweep.
    pub fn format_results(&self, results: &[StorefrontResult]) -> String {
        if results.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No storefronts processed.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => to_json(results).unwrap_or_else(|_| "[]".to_string()),
            OutputFormat::Table => self.table_results(results),
            OutputFormat::Markdown => self.markdown_results(results),
            OutputFormat::Csv => self.csv_results(results),
        }
    }

    /// Formats the breakdown of a single label.
    pub fn format_label(&self, report: &LabelReport) -> String {
        match self.format {
            OutputFormat::Json => to_json(report).unwrap_or_else(|_| "{}".to_string()),
            OutputFormat::Table => self.table_label(report),
            OutputFormat::Markdown => self.markdown_label(report),
            OutputFormat::Csv => self.csv_label(report),
        }
    }

    /// Price columns for a result: the three tiers, or the marker followed by blanks.
    fn price_cells(outcome: &PriceOutcome) -> [String; 3] {
        match outcome {
            PriceOutcome::Found(detail) => [
                detail.plus_monthly.to_string(),
                detail.pro_monthly.to_string(),
                detail.plus_yearly.to_string(),
            ],
            other => {
                [other.marker().unwrap_or_default().to_string(), String::new(), String::new()]
            }
        }
    }

    // Table formatting

    fn table_results(&self, results: &[StorefrontResult]) -> String {
        let code_width = 4;
        let currency_width = 8;
        let price_width = 12;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<code_width$}  {:<currency_width$}  {:>price_width$}  {:>price_width$}  {:>price_width$}",
            "Code", "Currency", "Plus/mo", "Pro/mo", "Plus/yr"
        ));
        lines.push(format!(
            "{:-<code_width$}  {:-<currency_width$}  {:-<price_width$}  {:-<price_width$}  {:-<price_width$}",
            "", "", "", "", ""
        ));

        for result in results {
            let [plus_monthly, pro_monthly, plus_yearly] = Self::price_cells(&result.price_detail);
            lines.push(
                format!(
                    "{:<code_width$}  {:<currency_width$}  {:>price_width$}  {:>price_width$}  {:>price_width$}",
                    result.country_code.as_str(),
                    result.currency,
                    plus_monthly,
                    pro_monthly,
                    plus_yearly
                )
                .trim_end()
                .to_string(),
            );
        }

        let found = results.iter().filter(|r| r.is_found()).count();
        lines.push(String::new());
        lines.push(format!("Total: {} storefronts ({} with prices)", results.len(), found));

        lines.join("\n")
    }

    fn table_label(&self, report: &LabelReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Label:      {}", report.label));
        lines.push(format!("Storefront: {}", report.storefront));
        lines.push(format!("Marker:     {}", report.marker.as_deref().unwrap_or("(none)")));
        lines.push(format!(
            "Currency:   {} ({})",
            report.currency,
            if report.detected { "from label" } else { "storefront default" }
        ));
        lines.push(format!("Numeric:    {}", report.numeric_text));

        match (&report.value, &report.error) {
            (Some(value), _) => lines.push(format!("Value:      {}", value)),
            (None, Some(error)) => lines.push(format!("Error:      {}", error)),
            (None, None) => lines.push("Value:      N/A".to_string()),
        }

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_results(&self, results: &[StorefrontResult]) -> String {
        let mut lines = Vec::new();

        lines.push("| Storefront | Currency | Plus monthly | Pro monthly | Plus yearly |".to_string());
        lines.push("|------------|----------|--------------|-------------|-------------|".to_string());

        for result in results {
            let [plus_monthly, pro_monthly, plus_yearly] = Self::price_cells(&result.price_detail);
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                result.country_code, result.currency, plus_monthly, pro_monthly, plus_yearly
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} storefronts*", results.len()));

        lines.join("\n")
    }

    fn markdown_label(&self, report: &LabelReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## `{}`", report.label));
        lines.push(String::new());
        lines.push(format!("- **Storefront:** {}", report.storefront));
        if let Some(marker) = &report.marker {
            lines.push(format!("- **Marker:** `{}`", marker));
        }
        lines.push(format!("- **Currency:** {}", report.currency));
        lines.push(format!("- **Numeric:** `{}`", report.numeric_text));
        if let Some(value) = &report.value {
            lines.push(format!("- **Value:** {}", value));
        }
        if let Some(error) = &report.error {
            lines.push(format!("- **Error:** {}", error));
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "country_code,currency,status,plus_monthly,pro_monthly,plus_yearly".to_string()
    }

    fn csv_results(&self, results: &[StorefrontResult]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for result in results {
            let (status, prices) = match &result.price_detail {
                PriceOutcome::Found(detail) => (
                    "Found",
                    format!(
                        "{},{},{}",
                        detail.plus_monthly, detail.pro_monthly, detail.plus_yearly
                    ),
                ),
                other => (other.marker().unwrap_or_default(), ",,".to_string()),
            };

            lines.push(format!(
                "{},{},{},{}",
                result.country_code,
                Self::csv_escape(&result.currency),
                status,
                prices
            ));
        }

        lines.join("\n")
    }

    fn csv_label(&self, report: &LabelReport) -> String {
        let value = report.value.map(|v| v.to_string()).unwrap_or_default();
        let error = report.error.as_deref().map(Self::csv_escape).unwrap_or_default();

        [
            "label,storefront,marker,currency,numeric_text,value,error".to_string(),
            format!(
                "{},{},{},{},{},{},{}",
                Self::csv_escape(&report.label),
                report.storefront,
                report.marker.as_deref().map(Self::csv_escape).unwrap_or_default(),
                report.currency,
                Self::csv_escape(&report.numeric_text),
                value,
                error
            ),
        ]
        .join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Serializes a value as JSON with four-space indentation.
///
/// Non-ASCII characters are written as-is.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).context("Failed to serialize results")?;
    String::from_utf8(buf).context("Serialized results are not valid UTF-8")
}

/// Writes the results file, replacing any previous one.
pub fn write_json_file(path: impl AsRef<Path>, results: &[StorefrontResult]) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(results)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write results file: {}", path.display()))?;

    debug!("Wrote {} results to {}", results.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{PriceDetail, PriceValue};

    fn found(code: &str, currency: &str, values: [PriceValue; 3]) -> StorefrontResult {
        let detail = PriceDetail::from_positional(&values).unwrap();
        StorefrontResult::new(code.parse().unwrap(), currency, PriceOutcome::Found(detail))
    }

    fn make_results() -> Vec<StorefrontResult> {
        vec![
            found(
                "us",
                "USD",
                [PriceValue::Decimal(19.99), PriceValue::Decimal(199.99), PriceValue::Decimal(199.99)],
            ),
            found(
                "jp",
                "JPY",
                [PriceValue::Whole(3000), PriceValue::Whole(30000), PriceValue::Whole(30000)],
            ),
            StorefrontResult::new("gb".parse().unwrap(), "GBP", PriceOutcome::NotFound),
            StorefrontResult::new("kr".parse().unwrap(), "KRW", PriceOutcome::Error),
        ]
    }

    fn make_report() -> LabelReport {
        LabelReport {
            label: "€1.234,50".to_string(),
            storefront: "de".parse().unwrap(),
            marker: Some("€".to_string()),
            currency: "EUR".to_string(),
            detected: true,
            numeric_text: "1.234,50".to_string(),
            value: Some(PriceValue::Decimal(1234.5)),
            error: None,
        }
    }

    // JSON format tests

    #[test]
    fn test_json_results() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.format_results(&make_results());

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0]["country_code"], "us");
        assert_eq!(entries[0]["price_detail"]["plus_monthly"], 19.99);
        assert_eq!(entries[1]["price_detail"]["plus_yearly"], 30000);
        assert_eq!(entries[2]["price_detail"], "Not Found");
        assert_eq!(entries[3]["price_detail"], "Error");
    }

    #[test]
    fn test_json_four_space_indent() {
        let output = to_json(&make_results()[..1]).unwrap();
        assert!(output.starts_with("[\n    {\n        \"country_code\": \"us\""));
    }

    #[test]
    fn test_json_keeps_non_ascii() {
        let output = to_json(&make_report()).unwrap();
        assert!(output.contains("\"€1.234,50\""));
        assert!(!output.contains("\\u"));
    }

    #[test]
    fn test_json_empty() {
        let formatter = Formatter::new(OutputFormat::Json);
        assert_eq!(formatter.format_results(&[]), "[]");
    }

    // Table format tests

    #[test]
    fn test_table_results() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_results(&make_results());

        assert!(output.contains("Code"));
        assert!(output.contains("Plus/yr"));
        assert!(output.contains("----"));
        assert!(output.contains("19.99"));
        assert!(output.contains("30000"));
        assert!(output.contains("Not Found"));
        assert!(output.contains("Error"));
        assert!(output.contains("Total: 4 storefronts (2 with prices)"));
    }

    #[test]
    fn test_table_empty() {
        let formatter = Formatter::new(OutputFormat::Table);
        assert_eq!(formatter.format_results(&[]), "No storefronts processed.");
    }

    #[test]
    fn test_table_label() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_label(&make_report());

        assert!(output.contains("Label:      €1.234,50"));
        assert!(output.contains("Marker:     €"));
        assert!(output.contains("Currency:   EUR (from label)"));
        assert!(output.contains("Value:      1234.50"));
    }

    #[test]
    fn test_table_label_error() {
        let formatter = Formatter::new(OutputFormat::Table);
        let report = LabelReport {
            marker: None,
            detected: false,
            value: None,
            error: Some("no digits in price text 'Free'".to_string()),
            ..make_report()
        };
        let output = formatter.format_label(&report);

        assert!(output.contains("Marker:     (none)"));
        assert!(output.contains("storefront default"));
        assert!(output.contains("Error:      no digits"));
    }

    // Markdown format tests

    #[test]
    fn test_markdown_results() {
        let formatter = Formatter::new(OutputFormat::Markdown);
        let output = formatter.format_results(&make_results());

        assert!(output.contains("| Storefront | Currency |"));
        assert!(output.contains("| us | USD | 19.99 | 199.99 | 199.99 |"));
        assert!(output.contains("| gb | GBP | Not Found |  |  |"));
        assert!(output.contains("*4 storefronts*"));
    }

    #[test]
    fn test_markdown_label() {
        let formatter = Formatter::new(OutputFormat::Markdown);
        let output = formatter.format_label(&make_report());

        assert!(output.contains("## `€1.234,50`"));
        assert!(output.contains("- **Value:** 1234.50"));
    }

    // CSV format tests

    #[test]
    fn test_csv_results() {
        let formatter = Formatter::new(OutputFormat::Csv);
        let output = formatter.format_results(&make_results());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "country_code,currency,status,plus_monthly,pro_monthly,plus_yearly");
        assert_eq!(lines[1], "us,USD,Found,19.99,199.99,199.99");
        assert_eq!(lines[2], "jp,JPY,Found,3000,30000,30000");
        assert_eq!(lines[3], "gb,GBP,Not Found,,,");
        assert_eq!(lines[4], "kr,KRW,Error,,,");
    }

    #[test]
    fn test_csv_empty() {
        let formatter = Formatter::new(OutputFormat::Csv);
        assert!(formatter.format_results(&[]).starts_with("country_code,"));
    }

    #[test]
    fn test_csv_label_escapes() {
        let formatter = Formatter::new(OutputFormat::Csv);
        let output = formatter.format_label(&make_report());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "\"€1.234,50\",de,€,EUR,\"1.234,50\",1234.50,");
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(Formatter::csv_escape("simple"), "simple");
        assert_eq!(Formatter::csv_escape("with,comma"), "\"with,comma\"");
        assert_eq!(Formatter::csv_escape("with\"quote"), "\"with\"\"quote\"");
    }

    // Results file tests

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("app_store_prices.json");

        write_json_file(&path, &make_results()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("]\n"));
        let parsed: Vec<StorefrontResult> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, make_results());
    }

    #[test]
    fn test_write_json_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.json");
        std::fs::write(&path, "stale content that is longer than the new file").unwrap();

        write_json_file(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }
}
