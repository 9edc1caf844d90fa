//! Weather panel settings.

use serde::{Deserialize, Serialize};

/// Fixed-coordinate weather lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub enabled: bool,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Cache lifetime in seconds (valid range: 60-3600).
    pub cache_ttl_secs: u32,
    pub timeout_secs: u32,
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            location_name: "Tân An".into(),
            latitude: 10.7788,
            longitude: 106.3533,
            cache_ttl_secs: 300,
            timeout_secs: 10,
            base_url: "https://api.open-meteo.com/v1/forecast".into(),
        }
    }
}
