use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_domains, validate_file_extension, validate_non_empty_string, validate_path,
    validate_range, validate_url,
};

pub const DEFAULT_START_URL: &str = "https://www.divan.ru/category/divany-i-kresla";
pub const DEFAULT_ALLOWED_DOMAIN: &str = "divan.ru";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_RAW_FILE: &str = "raw_prices.csv";
pub const DEFAULT_CLEANED_FILE: &str = "cleaned_prices.csv";
pub const DEFAULT_CONTAINER_SELECTOR: &str = "div._Ud0k";
pub const DEFAULT_NAME_SELECTOR: &str = "div.lsooF span";
pub const DEFAULT_PRICE_SELECTOR: &str = "div.pY3d2 span";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

pub const MAX_BIN_COUNT: usize = 1000;
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

/// 兩種設定來源共用的檢查
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_url("start_url", config.start_url())?;
    validate_domains("allowed_domains", config.allowed_domains())?;

    validate_path("output_path", config.output_path())?;
    validate_path("raw_file", config.raw_file())?;
    validate_path("cleaned_file", config.cleaned_file())?;

    validate_non_empty_string("container_selector", config.container_selector())?;
    validate_non_empty_string("name_selector", config.name_selector())?;
    validate_non_empty_string("price_selector", config.price_selector())?;

    validate_range("bins", config.bin_count(), 1, MAX_BIN_COUNT)?;
    validate_range(
        "timeout_seconds",
        config.request_timeout().as_secs(),
        1,
        MAX_TIMEOUT_SECONDS,
    )?;

    if let Some(chart) = config.chart_output() {
        validate_path("chart_output", chart)?;
        validate_file_extension("chart_output", chart, &["svg"])?;
    }

    Ok(())
}
