use super::app::AppConfig;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid api.base_url: {configured:?}")]
    ApiBaseUrl { configured: String },
    #[error("Invalid api.timeout_secs: {configured} (min: {min_limit}, max: {max_limit})")]
    RequestTimeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("Invalid booking.max_days_ahead: {configured} (min: {min_limit}, max: {max_limit})")]
    BookingWindow {
        configured: i64,
        min_limit: i64,
        max_limit: i64,
    },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::ApiBaseUrl { configured } => {
                format!(
                    "API base URL is not usable!\n\n\
                    Your configured value: {configured}\n\n\
                    Please set api.base_url in config.toml to an http(s) URL."
                )
            }
            ConfigValidationError::RequestTimeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Request timeout out of range!\n\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: {min_limit} - {max_limit} seconds\n\n\
                    Please update api.timeout_secs in config.toml."
                )
            }
            ConfigValidationError::BookingWindow {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Booking window out of range!\n\n\
                    Your configured value: {configured} days\n\
                    Valid range: {min_limit} - {max_limit} days\n\n\
                    Please update booking.max_days_ahead in config.toml."
                )
            }
        }
    }
}

/// Result of loading the application configuration.
#[derive(Debug, Clone)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}
