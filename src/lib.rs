pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{toml_config::TomlConfig, LocalStorage};

pub use core::{etl::EtlEngine, pipeline::PricePipeline};
pub use domain::model::{CleanOutcome, CleanedRecord, Histogram, PriceReport, RawRecord};
pub use utils::error::{EtlError, Result};
