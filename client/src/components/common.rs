use crate::error::AppError;
use api::auth::{Credential, Role};
use api::models::{Appointment, AppointmentStatus, Service, TimeSlot};
use chrono::{DateTime, NaiveDate, Utc};

/// Top-level message type processed by the application model.
///
/// Every state change flows through here, whether it originates from the
/// embedding shell (user intent) or from a background task (network result).
#[derive(Debug, PartialEq)]
pub enum Msg {
    AppClose,
    ForceRedraw,
    AuthActivity(AuthActivityMsg),
    BookingActivity(BookingActivityMsg),
    AppointmentActivity(AppointmentActivityMsg),
    NotificationActivity(NotificationActivityMsg),
    PopupActivity(PopupActivityMsg),
    LoadingActivity(LoadingActivityMsg),
    Error(AppError),
}

#[derive(Debug, PartialEq)]
pub enum AuthActivityMsg {
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        role: Role,
    },
    /// Login or registration succeeded; the credential pair is ready to
    /// persist and install.
    SignedIn(Credential),
    SignInFailed(String),
    Logout,
}

#[derive(Debug, PartialEq)]
pub enum BookingActivityMsg {
    LoadServices,
    ServicesLoaded(Vec<Service>),
    ServiceSelected(i64),
    ServiceCleared,
    DateSelected(NaiveDate),
    DateCleared,
    /// Availability result tagged with the fetch epoch it answers.
    SlotsLoaded { epoch: u64, slots: Vec<TimeSlot> },
    SlotsFetchFailed { epoch: u64, message: String },
    SlotSelected(TimeSlot),
    /// User asked to book; opens the confirmation gate.
    BookRequested,
    ConfirmSubmission,
    DismissConfirmation,
    SubmissionSucceeded(Appointment),
    SubmissionFailed(String),
}

#[derive(Debug, PartialEq)]
pub enum AppointmentActivityMsg {
    Load(Option<AppointmentStatus>),
    Loaded(Vec<Appointment>),
    LoadFailed(String),
    CancelRequested(i64),
    CancelConfirmed(i64),
    /// User asked to move an appointment; opens the confirmation gate.
    RescheduleRequested {
        id: i64,
        start_time: DateTime<Utc>,
    },
    RescheduleConfirmed {
        id: i64,
        start_time: DateTime<Utc>,
    },
    Updated(Appointment),
    UpdateFailed(String),
}

/// Transient user-facing notifications (toasts in a graphical shell).
#[derive(Debug, PartialEq)]
pub enum NotificationActivityMsg {
    Success(String),
    Error(String),
    Info(String),
    Warning(String),
}

#[derive(Debug, PartialEq)]
pub enum PopupActivityMsg {
    /// Ask the user to confirm before dispatching `on_confirm`.
    ShowConfirmation {
        title: String,
        message: String,
        on_confirm: Box<Msg>,
    },
    ConfirmationResult(bool),
}

#[derive(Debug, PartialEq)]
pub enum LoadingActivityMsg {
    Start(String),
    Update(String),
    Stop,
}

impl Default for Msg {
    fn default() -> Self {
        Self::ForceRedraw
    }
}
