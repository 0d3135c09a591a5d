#[cfg(feature = "cli")]
pub mod cli;
pub mod defaults;
pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use defaults::validate_provider;
pub use storage::LocalStorage;
