//! Current weather for the guide's home location.
//!
//! Backed by the Open-Meteo forecast API. Results are cached per
//! coordinate for a short TTL; failures degrade to [`WeatherReport::Unknown`]
//! and are never cached.

mod client;
mod forecast;

pub use client::{WeatherClient, DEFAULT_BASE_URL};
pub use forecast::{parse_forecast, Forecast, WeatherReport};
