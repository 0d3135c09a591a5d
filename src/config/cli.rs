use super::defaults::*;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "price-scrape-etl")]
#[command(about = "Scrape listing prices, clean them and plot a histogram")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_START_URL)]
    pub start_url: String,

    #[arg(long, value_delimiter = ',', default_value = DEFAULT_ALLOWED_DOMAIN)]
    pub allowed_domains: Vec<String>,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_RAW_FILE)]
    pub raw_file: String,

    #[arg(long, default_value = DEFAULT_CLEANED_FILE)]
    pub cleaned_file: String,

    #[arg(long, default_value = DEFAULT_CONTAINER_SELECTOR)]
    pub container_selector: String,

    #[arg(long, default_value = DEFAULT_NAME_SELECTOR)]
    pub name_selector: String,

    #[arg(long, default_value = DEFAULT_PRICE_SELECTOR)]
    pub price_selector: String,

    #[arg(long, default_value = crate::core::cleaner::DEFAULT_PRICE_SUFFIX)]
    pub price_suffix: String,

    #[arg(long, default_value = crate::core::reporter::DEFAULT_CURRENCY_UNIT)]
    pub currency_unit: String,

    #[arg(long, default_value_t = crate::core::reporter::DEFAULT_BIN_COUNT)]
    pub bins: usize,

    #[arg(long, help = "Export the histogram as SVG (relative to --output-path) instead of showing it")]
    pub chart_output: Option<String>,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn start_url(&self) -> &str {
        &self.start_url
    }

    fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn raw_file(&self) -> &str {
        &self.raw_file
    }

    fn cleaned_file(&self) -> &str {
        &self.cleaned_file
    }

    fn container_selector(&self) -> &str {
        &self.container_selector
    }

    fn name_selector(&self) -> &str {
        &self.name_selector
    }

    fn price_selector(&self) -> &str {
        &self.price_selector
    }

    fn price_suffix(&self) -> &str {
        &self.price_suffix
    }

    fn currency_unit(&self) -> &str {
        &self.currency_unit
    }

    fn bin_count(&self) -> usize {
        self.bins
    }

    fn chart_output(&self) -> Option<&str> {
        self.chart_output.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["price-scrape-etl"]);

        assert_eq!(config.start_url(), DEFAULT_START_URL);
        assert_eq!(config.allowed_domains(), ["divan.ru".to_string()]);
        assert_eq!(config.raw_file(), "raw_prices.csv");
        assert_eq!(config.cleaned_file(), "cleaned_prices.csv");
        assert_eq!(config.price_suffix(), "₽/мес.");
        assert_eq!(config.bin_count(), 20);
        assert_eq!(config.chart_output(), None);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_and_validation() {
        let config = CliConfig::parse_from([
            "price-scrape-etl",
            "--allowed-domains",
            "divan.ru,www.divan.ru",
            "--bins",
            "0",
            "--chart-output",
            "hist.svg",
        ]);

        assert_eq!(config.allowed_domains().len(), 2);
        assert_eq!(config.chart_output(), Some("hist.svg"));
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["price-scrape-etl", "--chart-output", "hist.png"]);
        assert!(config.validate().is_err());
    }
}
