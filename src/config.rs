//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::appstore::storefront::{
    StorefrontCode, DEFAULT_COMMA_DECIMAL, DEFAULT_ZERO_DECIMAL, KNOWN_STOREFRONTS,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Numeric App Store id of the listing (the digits after `id` in the URL)
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// URL slug of the listing (e.g. "chatgpt")
    #[serde(default = "default_app_slug")]
    pub app_slug: String,

    /// Storefronts to sweep, in output order
    #[serde(default = "default_storefronts")]
    pub storefronts: Vec<StorefrontCode>,

    /// Default currency per storefront, layered over the built-in table
    #[serde(default)]
    pub currencies: BTreeMap<String, String>,

    /// Storefronts that use comma as decimal separator
    #[serde(default = "default_comma_decimal")]
    pub comma_decimal: Vec<String>,

    /// Currencies rendered without a fractional part
    #[serde(default = "default_zero_decimal")]
    pub zero_decimal: Vec<String>,

    /// Pause between storefronts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to the pause (0 to this value)
    #[serde(default)]
    pub delay_jitter_ms: u64,

    /// Per-request deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Where the JSON result file is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Stdout format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_app_id() -> String {
    "6448311069".to_string()
}

fn default_app_slug() -> String {
    "chatgpt".to_string()
}

fn default_storefronts() -> Vec<StorefrontCode> {
    KNOWN_STOREFRONTS.iter().filter_map(|info| info.code.parse().ok()).collect()
}

fn default_comma_decimal() -> Vec<String> {
    DEFAULT_COMMA_DECIMAL.iter().map(|s| s.to_string()).collect()
}

fn default_zero_decimal() -> Vec<String> {
    DEFAULT_ZERO_DECIMAL.iter().map(|s| s.to_string()).collect()
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_output() -> PathBuf {
    PathBuf::from("app_store_prices.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            app_slug: default_app_slug(),
            storefronts: default_storefronts(),
            currencies: BTreeMap::new(),
            comma_decimal: default_comma_decimal(),
            zero_decimal: default_zero_decimal(),
            delay_ms: default_delay_ms(),
            delay_jitter_ms: 0,
            timeout_secs: default_timeout_secs(),
            proxy: None,
            output: default_output(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("storefront-prices").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(app_id) = std::env::var("SFP_APP_ID") {
            self.app_id = app_id;
        }

        if let Ok(proxy) = std::env::var("SFP_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("SFP_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        if let Ok(output) = std::env::var("SFP_OUTPUT") {
            self.output = PathBuf::from(output);
        }

        if let Ok(list) = std::env::var("SFP_STOREFRONTS") {
            let parsed: Result<Vec<StorefrontCode>, _> =
                list.split(',').filter(|s| !s.trim().is_empty()).map(str::parse).collect();
            match parsed {
                Ok(codes) if !codes.is_empty() => self.storefronts = codes,
                _ => debug!("Ignoring invalid SFP_STOREFRONTS value: {}", list),
            }
        }

        self
    }

    /// Checks the values a sweep cannot run without.
    pub fn validate(&self) -> Result<()> {
        let app_id = self.app_id.trim();
        if app_id.is_empty() || !app_id.chars().all(|c| c.is_ascii_digit()) {
            anyhow::bail!(
                "Invalid app id: '{}'. Set app_id in config.toml or SFP_APP_ID to the digits after 'id' in the App Store URL.",
                self.app_id
            );
        }

        if self.app_slug.trim().is_empty() {
            anyhow::bail!("Missing app slug. Set app_slug in config.toml (e.g. \"chatgpt\").");
        }

        if self.storefronts.is_empty() {
            anyhow::bail!("No storefronts configured. Set storefronts in config.toml or SFP_STOREFRONTS.");
        }

        Ok(())
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
