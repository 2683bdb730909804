use crate::components::common::{LoadingActivityMsg, Msg};
use crate::error::{AppError, ErrorReporter};
use std::fmt::Display;
use std::future::Future;
use std::sync::mpsc::Sender;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Task manager for executing async operations with loading indicators and
/// error handling.
///
/// Operations run on the tokio runtime and report back over the main
/// message channel. Every foreground operation is bracketed by loading
/// start/stop messages and bounded by a timeout; a shared cancellation
/// token tears down everything still in flight on shutdown.
#[derive(Clone)]
pub struct TaskManager {
    tx_to_main: Sender<Msg>,
    error_reporter: ErrorReporter,
    shutdown_token: CancellationToken,
    timeout: Duration,
}

impl TaskManager {
    pub fn new(tx_to_main: Sender<Msg>, error_reporter: ErrorReporter) -> Self {
        Self {
            tx_to_main,
            error_reporter,
            shutdown_token: CancellationToken::new(),
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Execute an async operation with loading indicator and timeout
    /// support. Operation failures are routed to the error reporter; the
    /// loading indicator is stopped no matter how the operation ends.
    pub fn execute<F, R>(&self, loading_message: impl Display, operation: F)
    where
        F: Future<Output = Result<R, AppError>> + Send + 'static,
        R: Send + 'static,
    {
        Self::send_message_or_report_error(
            &self.tx_to_main,
            Msg::LoadingActivity(LoadingActivityMsg::Start(loading_message.to_string())),
            "loading start",
            &self.error_reporter,
        );

        let tx_to_main = self.tx_to_main.clone();
        let error_reporter = self.error_reporter.clone();
        let shutdown_token = self.shutdown_token.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let result = tokio::select! {
                result = tokio::time::timeout(timeout, operation) => match result {
                    Ok(operation_result) => operation_result,
                    Err(_) => {
                        log::warn!("Operation timed out after {timeout:?}");
                        Err(AppError::State(format!(
                            "Operation timed out after {} seconds",
                            timeout.as_secs()
                        )))
                    }
                },
                _ = shutdown_token.cancelled() => {
                    log::debug!("Operation cancelled by shutdown");
                    return;
                }
            };

            Self::send_message_or_report_error(
                &tx_to_main,
                Msg::LoadingActivity(LoadingActivityMsg::Stop),
                "loading stop",
                &error_reporter,
            );

            if let Err(error) = result {
                error_reporter.report_simple(error, "TaskManager", "async_operation");
            }
        });
    }

    /// Execute without loading indicator messages. Failures still reach
    /// the error reporter.
    pub fn execute_background<F, R>(&self, operation: F)
    where
        F: Future<Output = Result<R, AppError>> + Send + 'static,
        R: Send + 'static,
    {
        let error_reporter = self.error_reporter.clone();
        let shutdown_token = self.shutdown_token.clone();

        tokio::spawn(async move {
            tokio::select! {
                result = operation => {
                    if let Err(error) = result {
                        error_reporter.report_simple(error, "TaskManager", "async_operation_bg");
                    }
                }
                _ = shutdown_token.cancelled() => {}
            }
        });
    }

    /// Cancels every operation still in flight. Used on application exit.
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
    }

    /// Helper method to send a message to the main thread or report error if it fails
    pub fn send_message_or_report_error(
        tx: &Sender<Msg>,
        msg: Msg,
        context: &str,
        error_reporter: &ErrorReporter,
    ) {
        if let Err(e) = tx.send(msg) {
            error_reporter.report_send_error(context, e);
        }
    }
}
