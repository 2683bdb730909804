use super::defaults;
use super::session::SessionConfig;
use super::validation::ConfigValidationError;
use super::LoggingConfig;
use serde::Deserialize;
use std::time::Duration;

const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
const MIN_BOOKING_WINDOW_DAYS: i64 = 1;
const MAX_BOOKING_WINDOW_DAYS: i64 = 365;

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    api: ApiConfig,
    #[serde(default)]
    booking: BookingConfig,
    #[serde(default)]
    session: SessionConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    /// Validate the configuration against defined limits
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let base_url = self.api.base_url();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            errors.push(ConfigValidationError::ApiBaseUrl {
                configured: base_url.to_string(),
            });
        }

        let timeout = self.api.timeout_secs();
        if !(MIN_REQUEST_TIMEOUT_SECS..=MAX_REQUEST_TIMEOUT_SECS).contains(&timeout) {
            errors.push(ConfigValidationError::RequestTimeout {
                configured: timeout,
                min_limit: MIN_REQUEST_TIMEOUT_SECS,
                max_limit: MAX_REQUEST_TIMEOUT_SECS,
            });
        }

        let window = self.booking.max_days_ahead();
        if !(MIN_BOOKING_WINDOW_DAYS..=MAX_BOOKING_WINDOW_DAYS).contains(&window) {
            errors.push(ConfigValidationError::BookingWindow {
                configured: window,
                min_limit: MIN_BOOKING_WINDOW_DAYS,
                max_limit: MAX_BOOKING_WINDOW_DAYS,
            });
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    // Configuration section accessors
    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    pub fn booking(&self) -> &BookingConfig {
        &self.booking
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApiConfig {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(defaults::DEFAULT_API_BASE_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
            .unwrap_or(defaults::DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BookingConfig {
    max_days_ahead: Option<i64>,
}

impl BookingConfig {
    pub fn max_days_ahead(&self) -> i64 {
        self.max_days_ahead
            .unwrap_or(defaults::DEFAULT_MAX_DAYS_AHEAD)
    }
}
