//! Full configuration validation.
//!
//! Checks numeric ranges and required strings, collecting every problem
//! into a single `ConfigError`.

mod helpers;


use crate::schema::TourGuideConfig;
use tourguide_common::ConfigError;

use helpers::{validate_non_empty, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TourGuideConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_non_empty(&mut errors, "provider.model", &config.provider.model);
    validate_non_empty(&mut errors, "provider.api_key_env", &config.provider.api_key_env);
    validate_range(&mut errors, "provider.timeout_secs", config.provider.timeout_secs, 1, 300);
    if let Some(max) = config.provider.max_output_tokens {
        validate_range(&mut errors, "provider.max_output_tokens", max, 1, 65_536);
    }

    validate_range(
        &mut errors,
        "rate_limit.max_requests_per_window",
        config.rate_limit.max_requests_per_window,
        1,
        100,
    );
    validate_range(
        &mut errors,
        "rate_limit.window_secs",
        config.rate_limit.window_secs,
        1,
        3600,
    );

    validate_non_empty(&mut errors, "prompt.system_prompt", &config.prompt.system_prompt);
    if let Some(budget) = config.prompt.context_token_budget {
        validate_range(&mut errors, "prompt.context_token_budget", budget, 16, 32_768);
    }

    validate_range(&mut errors, "data.max_images", config.data.max_images, 0, 12);

    validate_range_f64(&mut errors, "weather.latitude", config.weather.latitude, -90.0, 90.0);
    validate_range_f64(
        &mut errors,
        "weather.longitude",
        config.weather.longitude,
        -180.0,
        180.0,
    );
    validate_range(
        &mut errors,
        "weather.cache_ttl_secs",
        config.weather.cache_ttl_secs,
        60,
        3600,
    );
    validate_range(&mut errors, "weather.timeout_secs", config.weather.timeout_secs, 1, 60);

    validate_range(
        &mut errors,
        "server.session_idle_secs",
        config.server.session_idle_secs,
        60,
        86_400,
    );
    validate_range(
        &mut errors,
        "server.hello_timeout_secs",
        config.server.hello_timeout_secs,
        1,
        120,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
