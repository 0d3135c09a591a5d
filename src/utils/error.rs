use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Fetching {url} returned status {status}")]
    FetchStatusError { url: String, status: u16 },

    #[error("URL {url} is outside the allowed domains [{allowed}]")]
    DomainNotAllowedError { url: String, allowed: String },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Invalid CSS selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Chart rendering failed: {message}")]
    ChartError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::HttpError(_)
            | EtlError::FetchStatusError { .. }
            | EtlError::DomainNotAllowedError { .. } => ErrorCategory::Network,
            EtlError::UrlError(_)
            | EtlError::SelectorError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_) | EtlError::ChartError { .. } => ErrorCategory::Data,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::HttpError(e) if e.is_timeout() => {
                "The page did not answer in time; raise --timeout-seconds or retry later"
            }
            EtlError::HttpError(_) => "Check the network connection and that the site is reachable",
            EtlError::FetchStatusError { .. } => {
                "The site rejected the request; open the start URL in a browser to confirm it exists"
            }
            EtlError::DomainNotAllowedError { .. } => {
                "Add the host to --allowed-domains or point --start-url at an allowed host"
            }
            EtlError::SelectorError { .. } => "Fix the CSS selector syntax",
            EtlError::CsvError(_) => "Delete the raw CSV file and run the scrape again",
            EtlError::IoError(_) => "Check that the output directory exists and is writable",
            EtlError::ChartError { .. } => "Check the chart output path or use terminal display",
            EtlError::UrlError(_)
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the configuration values and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch the listing page: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Could not process scraped data: {}", self),
            ErrorCategory::System => format!("File system error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
