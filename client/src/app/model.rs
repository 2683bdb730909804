use crate::app::booking::BookingWorkflow;
use crate::app::task_manager::TaskManager;
use crate::components::common::Msg;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult, ErrorReporter};
use crate::services::session_guard::{Navigator, SessionGuard, SessionPolicy};
use api::auth::{CredentialStore, UserProfile};
use api::{ApiClient, BookingApi};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

/// A user-facing notification emitted through the message channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

/// Most recent notifications kept for the embedding shell to render.
const NOTIFICATION_BACKLOG: usize = 32;

/// Central application model.
///
/// Owns the booking workflow, the session guard, and the channel that
/// background tasks report into. The embedding shell feeds user intent in
/// as [`Msg`] values via [`update`](Model::update) and renders from the
/// public state afterwards.
pub struct Model {
    pub workflow: BookingWorkflow,
    pub appointments: Vec<api::models::Appointment>,
    pub signed_in: Option<UserProfile>,
    pub notifications: Vec<Notification>,
    pub loading_message: Option<String>,
    pub pending_confirmation_action: Option<Box<Msg>>,
    pub quit: bool,
    pub redraw: bool,

    pub api: Arc<dyn BookingApi>,
    pub credentials: Arc<CredentialStore>,
    pub session_guard: Arc<SessionGuard>,
    pub navigator: Arc<dyn Navigator>,
    pub task_manager: TaskManager,
    pub error_reporter: ErrorReporter,
    pub tx_to_main: Sender<Msg>,
    rx_to_main: Receiver<Msg>,
}

impl Model {
    /// Builds a model from explicit dependencies. Restores a persisted
    /// session when the credential store holds one.
    pub fn new(
        api: Arc<dyn BookingApi>,
        credentials: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
        policy: SessionPolicy,
        max_days_ahead: i64,
    ) -> Self {
        let (tx_to_main, rx_to_main) = channel();
        let error_reporter = ErrorReporter::new(tx_to_main.clone());
        let task_manager = TaskManager::new(tx_to_main.clone(), error_reporter.clone());
        let session_guard = Arc::new(SessionGuard::new(
            policy,
            credentials.clone(),
            api.clone(),
            navigator.clone(),
        ));

        let signed_in = credentials.load().map(|credential| {
            api.set_bearer(credential.token.expose());
            log::info!("Restored session for {}", credential.user.email);
            credential.user
        });

        Self {
            workflow: BookingWorkflow::new(Vec::new(), max_days_ahead),
            appointments: Vec::new(),
            signed_in,
            notifications: Vec::new(),
            loading_message: None,
            pending_confirmation_action: None,
            quit: false,
            redraw: true,
            api,
            credentials,
            session_guard,
            navigator,
            task_manager,
            error_reporter,
            tx_to_main,
            rx_to_main,
        }
    }

    /// Builds a model against the real HTTP client from loaded
    /// configuration.
    pub fn from_config(config: &AppConfig, navigator: Arc<dyn Navigator>) -> AppResult<Self> {
        let api = ApiClient::new(config.api().base_url(), config.api().timeout())
            .map_err(|e| AppError::Config(e.user_message()))?;
        let credentials = CredentialStore::new().map_err(AppError::from)?;

        Ok(Self::new(
            Arc::new(api),
            Arc::new(credentials),
            navigator,
            config.session().policy(),
            config.booking().max_days_ahead(),
        ))
    }

    /// Processes one message, returning a follow-up message to feed back
    /// in, if the transition produced one.
    pub fn update(&mut self, msg: Option<Msg>) -> Option<Msg> {
        let msg = msg?;
        self.redraw = true;
        match msg {
            Msg::AppClose => {
                self.task_manager.shutdown();
                self.quit = true;
                None
            }
            Msg::ForceRedraw => None,
            Msg::AuthActivity(msg) => self.update_auth(msg),
            Msg::BookingActivity(msg) => self.update_booking(msg),
            Msg::AppointmentActivity(msg) => self.update_appointments(msg),
            Msg::NotificationActivity(msg) => self.update_notification(msg),
            Msg::PopupActivity(msg) => self.update_popup(msg),
            Msg::LoadingActivity(msg) => self.update_loading(msg),
            Msg::Error(error) => {
                self.error_reporter
                    .report_simple(error, "Application", "update");
                None
            }
        }
    }

    /// Processes a message and every follow-up it chains into.
    pub fn process(&mut self, msg: Msg) {
        let mut next = Some(msg);
        while next.is_some() {
            next = self.update(next);
        }
    }

    /// Drains messages sent by background tasks. Returns how many were
    /// processed.
    pub fn process_pending_messages(&mut self) -> usize {
        let mut processed = 0;
        loop {
            match self.rx_to_main.try_recv() {
                Ok(msg) => {
                    self.process(msg);
                    processed += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::error!("Main message channel disconnected");
                    self.quit = true;
                    break;
                }
            }
        }
        processed
    }

    pub(crate) fn push_notification(&mut self, kind: NotificationKind, message: String) {
        self.notifications.push(Notification { kind, message });
        if self.notifications.len() > NOTIFICATION_BACKLOG {
            let overflow = self.notifications.len() - NOTIFICATION_BACKLOG;
            self.notifications.drain(..overflow);
        }
    }
}
