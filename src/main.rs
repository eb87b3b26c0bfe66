//! storefront-prices - App Store subscription prices across storefronts
//!
//! Sweeps an app's listing over many country storefronts with TLS fingerprint
//! emulation and writes normalized prices to a JSON file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storefront_prices::appstore::StorefrontCode;
use storefront_prices::commands::{LabelCommand, SweepCommand};
use storefront_prices::config::{Config, OutputFormat};
use storefront_prices::format::{write_json_file, Formatter};
use storefront_prices::pricing::LocaleRules;
use storefront_prices::KNOWN_STOREFRONTS;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "storefront-prices",
    version,
    about = "Compare App Store subscription prices across storefronts",
    long_about = "Fetches an app's App Store listing in each storefront, extracts the in-app purchase prices and normalizes them per locale."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Pause between storefronts in milliseconds
    #[arg(long, global = true)]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch prices from every configured storefront
    #[command(alias = "f")]
    Fetch {
        /// Storefronts to sweep (comma-separated), overriding the config
        #[arg(short, long, value_delimiter = ',')]
        storefronts: Option<Vec<StorefrontCode>>,

        /// JSON results file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Numeric App Store id of the listing
        #[arg(long)]
        app_id: Option<String>,

        /// URL slug of the listing
        #[arg(long)]
        app_slug: Option<String>,
    },

    /// Normalize a single price label without fetching anything
    #[command(alias = "l")]
    Label {
        /// Price label as displayed (e.g. "22,99 €")
        label: String,

        /// Storefront the label was shown on
        #[arg(short, long, default_value = "us")]
        storefront: StorefrontCode,
    },

    /// List built-in storefronts and their locale rules
    Storefronts,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Fetch { storefronts, output, app_id, app_slug } => {
            if let Some(storefronts) = storefronts {
                config.storefronts = storefronts;
            }
            if let Some(output) = output {
                config.output = output;
            }
            if let Some(app_id) = app_id {
                config.app_id = app_id;
            }
            if let Some(app_slug) = app_slug {
                config.app_slug = app_slug;
            }

            let cmd = SweepCommand::new(config.clone());
            let results = cmd.execute().await?;

            write_json_file(&config.output, &results)?;

            let formatter = Formatter::new(config.format);
            println!("{}", formatter.format_results(&results));
            eprintln!("Saved {} storefronts to {}", results.len(), config.output.display());
        }

        Commands::Label { label, storefront } => {
            let cmd = LabelCommand::new(&config);
            let report = cmd.execute(&label, &storefront);

            let formatter = Formatter::new(config.format);
            println!("{}", formatter.format_label(&report));
        }

        Commands::Storefronts => {
            let rules = LocaleRules::from_config(&config);

            println!("Built-in storefronts:\n");
            println!("{:<6} {:<16} {:<10} {:<10}", "Code", "Name", "Currency", "Decimals");
            println!("{:-<6} {:-<16} {:-<10} {:-<10}", "", "", "", "");

            for info in KNOWN_STOREFRONTS {
                let Ok(code) = info.code.parse::<StorefrontCode>() else {
                    continue;
                };
                let currency = rules.default_currency(&code);
                let decimals = if rules.is_zero_decimal(currency) {
                    "none"
                } else if rules.uses_comma_decimal(&code) {
                    "1.234,56"
                } else {
                    "1,234.56"
                };

                println!("{:<6} {:<16} {:<10} {:<10}", info.code, info.name, currency, decimals);
            }
        }
    }

    Ok(())
}
