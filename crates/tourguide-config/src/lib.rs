//! Tour guide configuration.
//!
//! TOML-based configuration with full validation. Every section has
//! defaults, so an empty file (or no file at all) yields a working setup
//! for the Tây Ninh guide. Secrets such as the model API key are read from
//! the environment, never from this file.
//!
//! ```rust,no_run
//! use tourguide_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    DataConfig, LogLevel, LoggingConfig, PromptConfig, ProviderConfig, RateLimitConfig,
    ServerConfig, TourGuideConfig, WeatherConfig, CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use tourguide_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default file if none exists.
pub fn load_config() -> Result<TourGuideConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<TourGuideConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &TourGuideConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
