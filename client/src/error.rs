use crate::components::common::{Msg, NotificationActivityMsg};
use std::fmt::Display;
use std::sync::mpsc::Sender;

/// Application-wide error types for the Bookly client core.
///
/// Each variant classifies one failure domain so the reporting layer can
/// choose an appropriate user-facing response. Variants carry a display
/// message that is already safe to show to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Booking API request failures (network, rejection, decoding).
    Api(String),
    /// Authentication and credential handling failures.
    Auth(String),
    /// Input that failed validation before any request was made.
    Validation(String),
    /// Application state inconsistencies and illegal transitions.
    State(String),
    /// Configuration loading and validation errors.
    Config(String),
    /// Inter-component communication failures.
    Channel(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Api(msg) => write!(f, "API Error: {msg}"),
            AppError::Auth(msg) => write!(f, "Authentication Error: {msg}"),
            AppError::Validation(msg) => write!(f, "Validation Error: {msg}"),
            AppError::State(msg) => write!(f, "State Error: {msg}"),
            AppError::Config(msg) => write!(f, "Configuration Error: {msg}"),
            AppError::Channel(msg) => write!(f, "Channel Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<api::ApiError> for AppError {
    fn from(err: api::ApiError) -> Self {
        AppError::Api(err.user_message())
    }
}

impl From<api::auth::CredentialStoreError> for AppError {
    fn from(err: api::auth::CredentialStoreError) -> Self {
        AppError::Auth(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Error severity levels for appropriate user-facing response
#[derive(Debug, Clone)]
pub enum ErrorSeverity {
    /// Warning severity - show warning notification and log
    Warning,
    /// High severity - show error notification and log
    Error,
    /// Critical severity - show error notification, log, and potentially exit
    Critical,
}

/// Context information for errors
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
    pub user_message: String,
    pub technical_details: Option<String>,
    pub suggestion: Option<String>,
    pub severity: ErrorSeverity,
}

impl ErrorContext {
    /// Create new error context with component and operation.
    /// Uses a generic message; use `.with_message()` for custom messages.
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            user_message: format!("An error occurred in {component}. Please try again."),
            technical_details: None,
            suggestion: None,
            severity: ErrorSeverity::Error,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.user_message = message.to_string();
        self
    }

    pub fn with_technical_details(mut self, details: &str) -> Self {
        self.technical_details = Some(details.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Contextual error with rich information
#[derive(Debug, Clone)]
pub struct ContextualError {
    pub error: AppError,
    pub context: ErrorContext,
}

impl ContextualError {
    pub fn new(error: AppError, context: ErrorContext) -> Self {
        Self { error, context }
    }
}

impl Display for ContextualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.context.user_message, self.error)
    }
}

/// Central error reporting system.
///
/// Logs every reported error with its context and forwards a user-facing
/// notification over the main message channel.
#[derive(Clone)]
pub struct ErrorReporter {
    tx: Sender<Msg>,
}

impl ErrorReporter {
    pub fn new(tx: Sender<Msg>) -> Self {
        Self { tx }
    }

    /// Report a simple error with basic context
    pub fn report_simple(&self, error: AppError, component: &str, operation: &str) {
        let context =
            ErrorContext::new(component, operation).with_technical_details(&error.to_string());
        self.report(error, context);
    }

    /// Report a warning (shows warning notification)
    pub fn report_warning(&self, error: AppError, component: &str, operation: &str) {
        let context = ErrorContext::new(component, operation).with_severity(ErrorSeverity::Warning);
        self.report(error, context);
    }

    /// Report message sending errors (mpsc channel errors)
    pub fn report_send_error(&self, context: &str, error: impl Display) {
        let app_error = AppError::Channel(format!("Failed to send {context}: {error}"));
        self.report_simple(app_error, "MessageChannel", "send_message");
    }

    /// Report error with full context
    pub fn report(&self, error: AppError, context: ErrorContext) {
        let contextual_error = ContextualError::new(error, context.clone());

        match context.severity {
            ErrorSeverity::Warning => {
                log::warn!(
                    "[{}:{}] {} {}",
                    context.component,
                    context.operation,
                    contextual_error,
                    format_additional_context(&context)
                );
            }
            ErrorSeverity::Error => {
                log::error!(
                    "[{}:{}] {} {}",
                    context.component,
                    context.operation,
                    contextual_error,
                    format_additional_context(&context)
                );
            }
            ErrorSeverity::Critical => {
                log::error!(
                    "[CRITICAL] [{}:{}] {} {}",
                    context.component,
                    context.operation,
                    contextual_error,
                    format_additional_context(&context)
                );
            }
        }

        let notification = match context.severity {
            ErrorSeverity::Warning => {
                NotificationActivityMsg::Warning(format_user_message(&context))
            }
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                NotificationActivityMsg::Error(format_user_message(&context))
            }
        };
        if let Err(e) = self.tx.send(Msg::NotificationActivity(notification)) {
            log::error!("Failed to send error notification: {e}");
        }
    }
}

fn format_additional_context(context: &ErrorContext) -> String {
    let mut parts = Vec::new();

    if let Some(ref technical_details) = context.technical_details {
        parts.push(format!("Technical: {technical_details}"));
    }

    if let Some(ref suggestion) = context.suggestion {
        parts.push(format!("Suggestion: {suggestion}"));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("\n{}", parts.join("\n"))
    }
}

/// Format a user-friendly message for display.
fn format_user_message(context: &ErrorContext) -> String {
    let mut message = context.user_message.clone();

    if let Some(ref suggestion) = context.suggestion {
        message.push_str(&format!("\n\nSuggestion: {suggestion}"));
    }

    message
}
