//! Booking workflow state machine.
//!
//! Pure state: transitions mutate the workflow and return the side effects
//! the caller must perform (fetch availability, open the confirmation gate,
//! submit the booking). No I/O happens here, which keeps every invariant
//! testable without a server.
//!
//! Two invariants shape the design:
//! - Cascading invalidation: changing an earlier selection always clears
//!   every later one, so a submission can never combine stale parts.
//! - Single-flight submission: once a booking is in flight, no second
//!   submission, slot change, or dismissal is accepted until it resolves.

use api::models::{BookingIntent, Service, TimeSlot};
use chrono::{Local, NaiveDate};
use std::fmt;

/// Progress through the guided booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStage {
    /// Nothing selected yet.
    Empty,
    ServiceChosen,
    /// Date picked; availability requested or resolved.
    DateChosen,
    SlotsLoaded,
    SlotChosen,
    /// Confirmation gate is open.
    AwaitingConfirmation,
    /// Creation request in flight.
    Submitting,
    Succeeded,
}

/// Availability for the currently selected service/date pair.
///
/// `Empty` is deliberately distinct from `Failed`: a day with no free
/// slots is an answer, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotsState {
    NotRequested,
    Loading { epoch: u64 },
    Loaded(Vec<TimeSlot>),
    Empty,
    Failed(String),
}

/// Submission progress as derived from the stage and stored failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    AwaitingConfirmation,
    Submitting,
    Succeeded,
    /// Failed with selections intact; the stored message is displayable.
    Failed(String),
}

/// Side effect a transition asks the caller to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingEffect {
    FetchSlots {
        epoch: u64,
        service_id: i64,
        date: NaiveDate,
    },
    RequestConfirmation {
        prompt: String,
    },
    Submit {
        intent: BookingIntent,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingError {
    UnknownService(i64),
    DateOutOfRange {
        selected: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },
    SlotUnavailable,
    /// Selection is missing a piece the transition needs.
    IncompleteSelection,
    /// The transition does not apply in the current stage. Callers treat
    /// this as a silent no-op for repeated confirm/dismiss actions.
    NotAllowed(&'static str),
    UnresolvableSlot(String),
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::UnknownService(id) => write!(f, "Unknown service: {id}"),
            BookingError::DateOutOfRange {
                selected,
                earliest,
                latest,
            } => write!(
                f,
                "Date {selected} is outside the bookable window ({earliest} to {latest})"
            ),
            BookingError::SlotUnavailable => {
                write!(f, "That time slot is not in the current availability")
            }
            BookingError::IncompleteSelection => {
                write!(f, "Please select a service, date, and time slot first")
            }
            BookingError::NotAllowed(what) => write!(f, "Not allowed right now: {what}"),
            BookingError::UnresolvableSlot(msg) => write!(f, "Unusable time slot: {msg}"),
        }
    }
}

impl std::error::Error for BookingError {}

/// The booking workflow for one session of the guided flow.
pub struct BookingWorkflow {
    services: Vec<Service>,
    service: Option<Service>,
    date: Option<NaiveDate>,
    slot: Option<TimeSlot>,
    slots: SlotsState,
    stage: BookingStage,
    fetch_epoch: u64,
    failure: Option<String>,
    today: NaiveDate,
    max_days_ahead: i64,
}

impl BookingWorkflow {
    pub fn new(services: Vec<Service>, max_days_ahead: i64) -> Self {
        Self::with_today(services, max_days_ahead, Local::now().date_naive())
    }

    /// Construction with an explicit "today", so the bookable window is
    /// deterministic under test.
    pub fn with_today(services: Vec<Service>, max_days_ahead: i64, today: NaiveDate) -> Self {
        Self {
            services,
            service: None,
            date: None,
            slot: None,
            slots: SlotsState::NotRequested,
            stage: BookingStage::Empty,
            fetch_epoch: 0,
            failure: None,
            today,
            max_days_ahead,
        }
    }

    pub fn set_services(&mut self, services: Vec<Service>) {
        self.services = services;
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn stage(&self) -> BookingStage {
        self.stage
    }

    pub fn selected_service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn selected_slot(&self) -> Option<&TimeSlot> {
        self.slot.as_ref()
    }

    pub fn slots(&self) -> &SlotsState {
        &self.slots
    }

    pub fn fetch_epoch(&self) -> u64 {
        self.fetch_epoch
    }

    /// Last recoverable failure message, if the workflow is showing one.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Submission progress derived from stage and stored failure.
    pub fn submission(&self) -> SubmissionState {
        match self.stage {
            BookingStage::AwaitingConfirmation => SubmissionState::AwaitingConfirmation,
            BookingStage::Submitting => SubmissionState::Submitting,
            BookingStage::Succeeded => SubmissionState::Succeeded,
            BookingStage::SlotChosen => match &self.failure {
                Some(message) => SubmissionState::Failed(message.clone()),
                None => SubmissionState::Idle,
            },
            _ => SubmissionState::Idle,
        }
    }

    /// Selects a service, cascading away any date, slot, and availability
    /// chosen under the previous service.
    pub fn select_service(&mut self, service_id: i64) -> Result<(), BookingError> {
        if self.stage == BookingStage::Submitting {
            return Err(BookingError::NotAllowed("submission in flight"));
        }
        let service = self
            .services
            .iter()
            .find(|s| s.id == service_id)
            .cloned()
            .ok_or(BookingError::UnknownService(service_id))?;

        self.service = Some(service);
        self.date = None;
        self.slot = None;
        self.slots = SlotsState::NotRequested;
        self.failure = None;
        self.stage = BookingStage::ServiceChosen;
        Ok(())
    }

    pub fn clear_service(&mut self) {
        if self.stage == BookingStage::Submitting {
            return;
        }
        self.service = None;
        self.date = None;
        self.slot = None;
        self.slots = SlotsState::NotRequested;
        self.failure = None;
        self.stage = BookingStage::Empty;
    }

    /// Selects a date within the bookable window and asks the caller to
    /// fetch availability. Any previously chosen slot is cascaded away
    /// and older in-flight fetches are invalidated by the epoch bump.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<BookingEffect, BookingError> {
        if self.stage == BookingStage::Submitting {
            return Err(BookingError::NotAllowed("submission in flight"));
        }
        let service = self
            .service
            .as_ref()
            .ok_or(BookingError::IncompleteSelection)?;

        let earliest = self.today;
        let latest = self.today + chrono::Duration::days(self.max_days_ahead);
        if date < earliest || date > latest {
            return Err(BookingError::DateOutOfRange {
                selected: date,
                earliest,
                latest,
            });
        }

        let service_id = service.id;
        self.date = Some(date);
        self.slot = None;
        self.failure = None;
        self.fetch_epoch += 1;
        self.slots = SlotsState::Loading {
            epoch: self.fetch_epoch,
        };
        self.stage = BookingStage::DateChosen;
        Ok(BookingEffect::FetchSlots {
            epoch: self.fetch_epoch,
            service_id,
            date,
        })
    }

    pub fn clear_date(&mut self) {
        if self.stage == BookingStage::Submitting {
            return;
        }
        self.date = None;
        self.slot = None;
        self.slots = SlotsState::NotRequested;
        self.failure = None;
        if self.service.is_some() {
            self.stage = BookingStage::ServiceChosen;
        } else {
            self.stage = BookingStage::Empty;
        }
    }

    /// Applies an availability result. Returns false when the result is
    /// stale (its epoch is not the one currently awaited) and was
    /// discarded without touching any state.
    pub fn apply_slots(&mut self, epoch: u64, slots: Vec<TimeSlot>) -> bool {
        if self.slots != (SlotsState::Loading { epoch }) {
            return false;
        }
        if slots.is_empty() {
            self.slots = SlotsState::Empty;
            self.stage = BookingStage::DateChosen;
        } else {
            self.slots = SlotsState::Loaded(slots);
            self.stage = BookingStage::SlotsLoaded;
        }
        true
    }

    /// Applies an availability fetch failure, subject to the same epoch
    /// staleness rule as [`apply_slots`](Self::apply_slots).
    pub fn apply_fetch_failure(&mut self, epoch: u64, message: &str) -> bool {
        if self.slots != (SlotsState::Loading { epoch }) {
            return false;
        }
        self.slots = SlotsState::Failed(message.to_string());
        self.failure = Some(message.to_string());
        self.stage = BookingStage::DateChosen;
        true
    }

    /// Selects a slot out of the currently loaded availability.
    pub fn select_slot(&mut self, slot: TimeSlot) -> Result<(), BookingError> {
        if self.stage == BookingStage::Submitting {
            return Err(BookingError::NotAllowed("submission in flight"));
        }
        if self.service.is_none() || self.date.is_none() {
            return Err(BookingError::IncompleteSelection);
        }
        match &self.slots {
            SlotsState::Loaded(available) if available.contains(&slot) => {
                self.slot = Some(slot);
                self.failure = None;
                self.stage = BookingStage::SlotChosen;
                Ok(())
            }
            _ => Err(BookingError::SlotUnavailable),
        }
    }

    /// Opens the confirmation gate. Returns the prompt to show, or None
    /// when there is nothing to confirm in the current stage.
    pub fn request_confirmation(&mut self) -> Option<BookingEffect> {
        if self.stage != BookingStage::SlotChosen {
            return None;
        }
        let (service, date, slot) = match (&self.service, self.date, &self.slot) {
            (Some(service), Some(date), Some(slot)) => (service, date, slot),
            _ => return None,
        };

        let prompt = format!(
            "Book {} on {} at {}?",
            service.name,
            date.format("%Y-%m-%d"),
            slot.time
        );
        self.stage = BookingStage::AwaitingConfirmation;
        Some(BookingEffect::RequestConfirmation { prompt })
    }

    /// Closes the confirmation gate without submitting. Returns false
    /// when the dismissal was ignored, which happens while a submission
    /// is in flight.
    pub fn dismiss_confirmation(&mut self) -> bool {
        if self.stage != BookingStage::AwaitingConfirmation {
            return false;
        }
        self.stage = BookingStage::SlotChosen;
        true
    }

    /// Confirms the gated submission. Exactly one [`BookingEffect::Submit`]
    /// is produced per open gate; repeated confirms while submitting are
    /// rejected with [`BookingError::NotAllowed`].
    pub fn confirm_submission(&mut self) -> Result<BookingEffect, BookingError> {
        if self.stage == BookingStage::Submitting {
            return Err(BookingError::NotAllowed("submission in flight"));
        }
        if self.stage != BookingStage::AwaitingConfirmation {
            return Err(BookingError::NotAllowed("no confirmation pending"));
        }
        let (service, slot) = match (&self.service, &self.slot) {
            (Some(service), Some(slot)) => (service, slot),
            _ => return Err(BookingError::IncompleteSelection),
        };

        let start_time = slot
            .resolve_instant()
            .map_err(|e| BookingError::UnresolvableSlot(e.user_message()))?;
        let intent = BookingIntent::new(service.id, start_time);

        self.failure = None;
        self.stage = BookingStage::Submitting;
        Ok(BookingEffect::Submit { intent })
    }

    /// Records a successful submission. Selections stay intact for the
    /// success view.
    pub fn submission_succeeded(&mut self) {
        if self.stage == BookingStage::Submitting {
            self.stage = BookingStage::Succeeded;
        }
    }

    /// Records a failed submission: back to the chosen slot with every
    /// selection intact, storing the message for display.
    pub fn submission_failed(&mut self, message: &str) {
        if self.stage == BookingStage::Submitting {
            self.failure = Some(message.to_string());
            self.stage = BookingStage::SlotChosen;
        }
    }
}
