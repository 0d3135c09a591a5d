use super::defaults::*;
use crate::core::cleaner::DEFAULT_PRICE_SUFFIX;
use crate::core::reporter::{DEFAULT_BIN_COUNT, DEFAULT_CURRENCY_UNIT};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub clean: CleanConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub start_url: String,
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_price")]
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanConfig {
    #[serde(default = "default_price_suffix")]
    pub price_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_currency_unit")]
    pub currency_unit: String,
    #[serde(default = "default_bins")]
    pub bins: usize,
    pub chart_output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_raw_file")]
    pub raw_file: String,
    #[serde(default = "default_cleaned_file")]
    pub cleaned_file: String,
}

fn default_allowed_domains() -> Vec<String> {
    vec![DEFAULT_ALLOWED_DOMAIN.to_string()]
}

fn default_container() -> String {
    DEFAULT_CONTAINER_SELECTOR.to_string()
}

fn default_name() -> String {
    DEFAULT_NAME_SELECTOR.to_string()
}

fn default_price() -> String {
    DEFAULT_PRICE_SELECTOR.to_string()
}

fn default_price_suffix() -> String {
    DEFAULT_PRICE_SUFFIX.to_string()
}

fn default_currency_unit() -> String {
    DEFAULT_CURRENCY_UNIT.to_string()
}

fn default_bins() -> usize {
    DEFAULT_BIN_COUNT
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_raw_file() -> String {
    DEFAULT_RAW_FILE.to_string()
}

fn default_cleaned_file() -> String {
    DEFAULT_CLEANED_FILE.to_string()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: default_container(),
            name: default_name(),
            price: default_price(),
        }
    }
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            price_suffix: default_price_suffix(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_unit: default_currency_unit(),
            bins: default_bins(),
            chart_output: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            raw_file: default_raw_file(),
            cleaned_file: default_cleaned_file(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validate_provider(self)
    }
}

impl ConfigProvider for TomlConfig {
    fn start_url(&self) -> &str {
        &self.source.start_url
    }

    fn allowed_domains(&self) -> &[String] {
        &self.source.allowed_domains
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn raw_file(&self) -> &str {
        &self.load.raw_file
    }

    fn cleaned_file(&self) -> &str {
        &self.load.cleaned_file
    }

    fn container_selector(&self) -> &str {
        &self.selectors.container
    }

    fn name_selector(&self) -> &str {
        &self.selectors.name
    }

    fn price_selector(&self) -> &str {
        &self.selectors.price
    }

    fn price_suffix(&self) -> &str {
        &self.clean.price_suffix
    }

    fn currency_unit(&self) -> &str {
        &self.report.currency_unit
    }

    fn bin_count(&self) -> usize {
        self.report.bins
    }

    fn chart_output(&self) -> Option<&str> {
        self.report.chart_output.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[pipeline]
name = "divan-sofas"

[source]
start_url = "https://www.divan.ru/category/divany-i-kresla"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "divan-sofas");
        assert_eq!(config.allowed_domains(), ["divan.ru".to_string()]);
        assert_eq!(config.container_selector(), "div._Ud0k");
        assert_eq!(config.price_suffix(), "₽/мес.");
        assert_eq!(config.bin_count(), 20);
        assert_eq!(config.raw_file(), "raw_prices.csv");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[pipeline]
name = "armchairs"
description = "Armchair prices"
version = "1.0.0"

[source]
start_url = "https://www.divan.ru/category/kresla"
allowed_domains = ["divan.ru", "www.divan.ru"]
timeout_seconds = 10

[selectors]
container = "div.card"
name = "div.title span"
price = "div.price span"

[clean]
price_suffix = "руб."

[report]
currency_unit = "RUB"
bins = 15
chart_output = "armchairs.svg"

[load]
output_path = "./armchairs"
raw_file = "raw.csv"
cleaned_file = "clean.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.allowed_domains().len(), 2);
        assert_eq!(config.name_selector(), "div.title span");
        assert_eq!(config.bin_count(), 15);
        assert_eq!(config.chart_output(), Some("armchairs.svg"));
        assert_eq!(config.output_path(), "./armchairs");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PRICE_ETL_TEST_OUTPUT", "/tmp/price-etl");

        let toml_content = r#"
[pipeline]
name = "env"

[source]
start_url = "https://www.divan.ru/category/divany-i-kresla"

[load]
output_path = "${PRICE_ETL_TEST_OUTPUT}"
raw_file = "${PRICE_ETL_TEST_UNSET_VAR}.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/price-etl");
        assert_eq!(config.raw_file(), "${PRICE_ETL_TEST_UNSET_VAR}.csv");

        std::env::remove_var("PRICE_ETL_TEST_OUTPUT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "bad"

[source]
start_url = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[pipeline]
name = "bad-bins"

[source]
start_url = "https://www.divan.ru/"

[report]
bins = 0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_source_is_parse_error() {
        let err = TomlConfig::from_toml_str("[pipeline]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[source]
start_url = "https://www.divan.ru/category/divany-i-kresla"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
    }
}
