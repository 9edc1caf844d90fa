//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod data;
mod prompt;
mod provider;
mod rate_limit;
mod server;
mod system;
mod weather;

pub use data::*;
pub use prompt::*;
pub use provider::*;
pub use rate_limit::*;
pub use server::*;
pub use system::*;
pub use weather::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TourGuideConfig {
    pub provider: ProviderConfig,
    pub rate_limit: RateLimitConfig,
    pub prompt: PromptConfig,
    pub data: DataConfig,
    pub weather: WeatherConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}
