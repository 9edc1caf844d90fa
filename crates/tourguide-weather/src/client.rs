//! Open-Meteo client with a per-coordinate TTL cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tourguide_common::CollaboratorError;
use tracing::{debug, warn};

use crate::forecast::{parse_forecast, Forecast, WeatherReport};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Coordinates rounded to 1e-4 degrees.
type CacheKey = (i64, i64);

fn cache_key(lat: f64, lon: f64) -> CacheKey {
    ((lat * 1e4).round() as i64, (lon * 1e4).round() as i64)
}

struct CacheEntry {
    fetched_at: Instant,
    forecast: Forecast,
}

pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    ttl: Duration,
    cache: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl WeatherClient {
    pub fn new() -> Result<Self, CollaboratorError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| CollaboratorError::Weather(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            ttl: Duration::from_secs(300),
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub(crate) fn forecast_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}?latitude={lat}&longitude={lon}&current_weather=true&hourly=precipitation_probability&timezone=auto",
            self.base_url
        )
    }

    /// Current weather at a coordinate. Never fails: any error is logged
    /// and reported as [`WeatherReport::Unknown`].
    pub async fn get_weather(&self, lat: f64, lon: f64) -> WeatherReport {
        let key = cache_key(lat, lon);
        if let Some(forecast) = self.cached(key).await {
            debug!(lat, lon, "Weather served from cache");
            return WeatherReport::Known(forecast);
        }

        match self.fetch(lat, lon).await {
            Ok(forecast) => {
                self.store(key, forecast.clone()).await;
                WeatherReport::Known(forecast)
            }
            Err(e) => {
                warn!(lat, lon, error = %e, "Weather lookup failed");
                WeatherReport::Unknown
            }
        }
    }

    async fn cached(&self, key: CacheKey) -> Option<Forecast> {
        let mut cache = self.cache.lock().await;
        let fresh = cache
            .get(&key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.forecast.clone());
        if fresh.is_none() {
            cache.remove(&key);
        }
        fresh
    }

    async fn store(&self, key: CacheKey, forecast: Forecast) {
        self.cache.lock().await.insert(
            key,
            CacheEntry {
                fetched_at: Instant::now(),
                forecast,
            },
        );
    }

    async fn fetch(&self, lat: f64, lon: f64) -> Result<Forecast, CollaboratorError> {
        let url = self.forecast_url(lat, lon);
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CollaboratorError::Weather(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::Weather(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CollaboratorError::Weather(e.to_string()))?;
        parse_forecast(&body)
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.lock().await.len()
    }
}
