//! End-to-end booking flow tests against a fake API: the guided
//! service/date/slot cascade, the confirmation gate, and submission
//! outcomes, all driven through the application model.

use api::auth::{Credential, CredentialStore, Role};
use api::models::{
    Appointment, AppointmentPatch, AppointmentStatus, BookingIntent, Service, TimeSlot,
};
use api::{ApiError, BookingApi};
use async_trait::async_trait;
use bookly::app::booking::{BookingStage, BookingWorkflow, SlotsState, SubmissionState};
use bookly::app::model::Model;
use bookly::components::common::{
    AppointmentActivityMsg, BookingActivityMsg, Msg, PopupActivityMsg,
};
use bookly::config::AppConfig;
use bookly::services::session_guard::Navigator;
use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

mod support {
    use super::*;

    pub struct FakeApi {
        pub services: Vec<Service>,
        pub availability: Mutex<HashMap<NaiveDate, Vec<TimeSlot>>>,
        pub availability_delays: Mutex<HashMap<NaiveDate, Duration>>,
        pub create_result: Mutex<Result<Appointment, ApiError>>,
        pub create_delay: Duration,
        pub create_calls: Mutex<Vec<BookingIntent>>,
        pub update_calls: Mutex<Vec<(i64, AppointmentPatch)>>,
        pub bearer: Mutex<Option<String>>,
    }

    impl FakeApi {
        pub fn new(services: Vec<Service>) -> Self {
            Self {
                services,
                availability: Mutex::new(HashMap::new()),
                availability_delays: Mutex::new(HashMap::new()),
                create_result: Mutex::new(Ok(appointment(1))),
                create_delay: Duration::from_millis(0),
                create_calls: Mutex::new(Vec::new()),
                update_calls: Mutex::new(Vec::new()),
                bearer: Mutex::new(None),
            }
        }

        pub fn with_availability(self, date: NaiveDate, slots: Vec<TimeSlot>) -> Self {
            self.availability.lock().unwrap().insert(date, slots);
            self
        }

        pub fn with_availability_delay(self, date: NaiveDate, delay: Duration) -> Self {
            self.availability_delays.lock().unwrap().insert(date, delay);
            self
        }

        pub fn with_create_result(self, result: Result<Appointment, ApiError>) -> Self {
            *self.create_result.lock().unwrap() = result;
            self
        }

        pub fn with_create_delay(mut self, delay: Duration) -> Self {
            self.create_delay = delay;
            self
        }

        pub fn create_calls(&self) -> Vec<BookingIntent> {
            self.create_calls.lock().unwrap().clone()
        }

        pub fn update_calls(&self) -> Vec<(i64, AppointmentPatch)> {
            self.update_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BookingApi for FakeApi {
        fn set_bearer(&self, token: &str) {
            *self.bearer.lock().unwrap() = Some(token.to_string());
        }

        fn clear_bearer(&self) {
            *self.bearer.lock().unwrap() = None;
        }

        async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
            Ok(self.services.clone())
        }

        async fn get_availability(
            &self,
            _service_id: i64,
            date: NaiveDate,
        ) -> Result<Vec<TimeSlot>, ApiError> {
            let delay = self
                .availability_delays
                .lock()
                .unwrap()
                .get(&date)
                .copied()
                .unwrap_or_default();
            if !delay.is_zero() {
                sleep(delay).await;
            }
            Ok(self
                .availability
                .lock()
                .unwrap()
                .get(&date)
                .cloned()
                .unwrap_or_default())
        }

        async fn create_appointment(&self, intent: &BookingIntent) -> Result<Appointment, ApiError> {
            if !self.create_delay.is_zero() {
                sleep(self.create_delay).await;
            }
            self.create_calls.lock().unwrap().push(intent.clone());
            self.create_result.lock().unwrap().clone()
        }

        async fn list_appointments(
            &self,
            _status: Option<AppointmentStatus>,
        ) -> Result<Vec<Appointment>, ApiError> {
            Ok(Vec::new())
        }

        async fn update_appointment(
            &self,
            id: i64,
            patch: &AppointmentPatch,
        ) -> Result<Appointment, ApiError> {
            self.update_calls.lock().unwrap().push((id, patch.clone()));
            Ok(appointment(id))
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<Credential, ApiError> {
            unimplemented!("not exercised by the booking flow")
        }

        async fn register(
            &self,
            _email: &str,
            _password: &str,
            _role: Role,
        ) -> Result<Credential, ApiError> {
            unimplemented!("not exercised by the booking flow")
        }
    }

    pub struct RecordingNavigator {
        pub location: Mutex<String>,
        pub navigations: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        pub fn at(location: &str) -> Self {
            Self {
                location: Mutex::new(location.to_string()),
                navigations: Mutex::new(Vec::new()),
            }
        }
    }

    impl Navigator for RecordingNavigator {
        fn current_location(&self) -> String {
            self.location.lock().unwrap().clone()
        }

        fn navigate_to(&self, route: &str) {
            *self.location.lock().unwrap() = route.to_string();
            self.navigations.lock().unwrap().push(route.to_string());
        }
    }

    pub fn service(id: i64, name: &str) -> Service {
        Service {
            id,
            name: name.to_string(),
            description: None,
            duration_minutes: 30,
            price: 40.0,
            address: None,
            image_url: None,
            created_at: None,
        }
    }

    pub fn appointment(id: i64) -> Appointment {
        Appointment {
            id,
            user_id: 1,
            service_id: 1,
            service_name: Some("Haircut".to_string()),
            start_time: "2025-03-10T09:00:00".to_string(),
            end_time: "2025-03-10T09:30:00".to_string(),
            status: AppointmentStatus::Confirmed,
            created_at: None,
        }
    }

    pub fn slot(datetime: &str, time: &str) -> TimeSlot {
        TimeSlot {
            datetime: datetime.to_string(),
            time: time.to_string(),
        }
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    /// Builds a model over the fakes with a deterministic "today" of
    /// 2025-03-01.
    pub fn model_with(
        api: Arc<FakeApi>,
        navigator: Arc<RecordingNavigator>,
        dir: &tempfile::TempDir,
    ) -> Model {
        let store = Arc::new(CredentialStore::with_path(
            dir.path().join("credentials.json"),
        ));
        let policy = AppConfig::default().session().policy();
        let mut model = Model::new(api, store, navigator, policy, 30);
        model.workflow = BookingWorkflow::with_today(Vec::new(), 30, date(2025, 3, 1));
        model
    }

    /// Waits for the in-flight background task bracketed by loading
    /// start/stop to finish, processing everything it sent.
    ///
    /// Counts processed messages instead of sampling `loading_message`: a
    /// fast task can put both the start and stop messages in the channel
    /// before the first drain, so the indicator is never observably set.
    /// The bracket is at least two messages, so once that many are through
    /// and no loading indicator remains, the task has reported everything.
    pub async fn settle(model: &mut Model) {
        let mut processed = 0;
        for _ in 0..400 {
            processed += model.process_pending_messages();
            if processed >= 2 && model.loading_message.is_none() {
                model.process_pending_messages();
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("background task did not settle");
    }

    /// Drives the model through service 1 on 2025-03-10 at 09:00 up to
    /// SlotChosen.
    pub async fn drive_to_slot_chosen(model: &mut Model) {
        model.process(Msg::BookingActivity(BookingActivityMsg::LoadServices));
        settle(model).await;

        model.process(Msg::BookingActivity(BookingActivityMsg::ServiceSelected(1)));
        model.process(Msg::BookingActivity(BookingActivityMsg::DateSelected(
            date(2025, 3, 10),
        )));
        settle(model).await;
        assert_eq!(model.workflow.stage(), BookingStage::SlotsLoaded);

        model.process(Msg::BookingActivity(BookingActivityMsg::SlotSelected(
            slot("2025-03-10T09:00:00Z", "09:00"),
        )));
        assert_eq!(model.workflow.stage(), BookingStage::SlotChosen);
    }
}

use support::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn complete_flow_issues_exactly_one_creation_request() {
    let api = Arc::new(
        FakeApi::new(vec![service(1, "Haircut")]).with_availability(
            date(2025, 3, 10),
            vec![
                slot("2025-03-10T09:00:00Z", "09:00"),
                slot("2025-03-10T10:00:00Z", "10:00"),
            ],
        ),
    );
    let navigator = Arc::new(RecordingNavigator::at("/book"));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut model = model_with(api.clone(), navigator.clone(), &dir);

    drive_to_slot_chosen(&mut model).await;

    model.process(Msg::BookingActivity(BookingActivityMsg::BookRequested));
    assert!(model.pending_confirmation_action.is_some());

    model.process(Msg::PopupActivity(PopupActivityMsg::ConfirmationResult(
        true,
    )));
    settle(&mut model).await;

    let calls = api.create_calls();
    assert_eq!(calls.len(), 1, "exactly one creation request");
    assert_eq!(
        serde_json::to_value(&calls[0]).expect("serializes"),
        serde_json::json!({
            "service_id": 1,
            "start_time": "2025-03-10T09:00:00Z",
        })
    );

    assert_eq!(model.workflow.stage(), BookingStage::Succeeded);
    assert_eq!(model.appointments.len(), 1);
    assert_eq!(navigator.current_location(), "/my-appointments");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rejected_submission_is_recoverable_and_keeps_selections() {
    // A 401 on the appointments endpoint is a business rejection, not an
    // expired session.
    let api = Arc::new(
        FakeApi::new(vec![service(1, "Haircut")])
            .with_availability(
                date(2025, 3, 10),
                vec![slot("2025-03-10T09:00:00Z", "09:00")],
            )
            .with_create_result(Err(ApiError::Rejected {
                status: 401,
                code: Some("FORBIDDEN".to_string()),
                message: "You cannot book this service".to_string(),
            })),
    );
    let navigator = Arc::new(RecordingNavigator::at("/book"));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut model = model_with(api.clone(), navigator.clone(), &dir);

    drive_to_slot_chosen(&mut model).await;
    model.process(Msg::BookingActivity(BookingActivityMsg::BookRequested));
    model.process(Msg::PopupActivity(PopupActivityMsg::ConfirmationResult(
        true,
    )));
    settle(&mut model).await;

    assert_eq!(model.workflow.stage(), BookingStage::SlotChosen);
    assert_eq!(
        model.workflow.submission(),
        SubmissionState::Failed("You cannot book this service".to_string())
    );
    assert!(model.workflow.selected_service().is_some());
    assert!(model.workflow.selected_date().is_some());
    assert!(model.workflow.selected_slot().is_some());

    // No sign-out, no redirect.
    assert!(navigator.navigations.lock().unwrap().is_empty());
    assert!(api.bearer.lock().unwrap().is_none());

    // Retry works from where the user left off.
    api.create_calls.lock().unwrap().clear();
    *api.create_result.lock().unwrap() = Ok(appointment(2));
    model.process(Msg::BookingActivity(BookingActivityMsg::BookRequested));
    model.process(Msg::PopupActivity(PopupActivityMsg::ConfirmationResult(
        true,
    )));
    settle(&mut model).await;

    assert_eq!(api.create_calls().len(), 1);
    assert_eq!(model.workflow.stage(), BookingStage::Succeeded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rapid_confirms_submit_at_most_once() {
    let api = Arc::new(
        FakeApi::new(vec![service(1, "Haircut")])
            .with_availability(
                date(2025, 3, 10),
                vec![slot("2025-03-10T09:00:00Z", "09:00")],
            )
            .with_create_delay(Duration::from_millis(100)),
    );
    let navigator = Arc::new(RecordingNavigator::at("/book"));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut model = model_with(api.clone(), navigator.clone(), &dir);

    drive_to_slot_chosen(&mut model).await;
    model.process(Msg::BookingActivity(BookingActivityMsg::BookRequested));

    // Hammer the confirm action while the first submission is in flight.
    model.process(Msg::PopupActivity(PopupActivityMsg::ConfirmationResult(
        true,
    )));
    model.process(Msg::BookingActivity(BookingActivityMsg::ConfirmSubmission));
    model.process(Msg::BookingActivity(BookingActivityMsg::ConfirmSubmission));
    model.process(Msg::PopupActivity(PopupActivityMsg::ConfirmationResult(
        true,
    )));
    settle(&mut model).await;

    assert_eq!(api.create_calls().len(), 1, "single-flight submission");
    assert_eq!(model.workflow.stage(), BookingStage::Succeeded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dismiss_is_ignored_while_submission_is_in_flight() {
    let api = Arc::new(
        FakeApi::new(vec![service(1, "Haircut")])
            .with_availability(
                date(2025, 3, 10),
                vec![slot("2025-03-10T09:00:00Z", "09:00")],
            )
            .with_create_delay(Duration::from_millis(100)),
    );
    let navigator = Arc::new(RecordingNavigator::at("/book"));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut model = model_with(api.clone(), navigator.clone(), &dir);

    drive_to_slot_chosen(&mut model).await;
    model.process(Msg::BookingActivity(BookingActivityMsg::BookRequested));
    model.process(Msg::PopupActivity(PopupActivityMsg::ConfirmationResult(
        true,
    )));

    assert_eq!(model.workflow.stage(), BookingStage::Submitting);
    model.process(Msg::PopupActivity(PopupActivityMsg::ConfirmationResult(
        false,
    )));
    model.process(Msg::BookingActivity(BookingActivityMsg::DismissConfirmation));
    assert_eq!(model.workflow.stage(), BookingStage::Submitting);

    settle(&mut model).await;
    assert_eq!(model.workflow.stage(), BookingStage::Succeeded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stale_availability_results_are_discarded() {
    let api = Arc::new(
        FakeApi::new(vec![service(1, "Haircut")])
            .with_availability(
                date(2025, 3, 10),
                vec![slot("2025-03-10T09:00:00Z", "09:00")],
            )
            .with_availability_delay(date(2025, 3, 10), Duration::from_millis(150))
            .with_availability(
                date(2025, 3, 11),
                vec![slot("2025-03-11T14:00:00Z", "14:00")],
            ),
    );
    let navigator = Arc::new(RecordingNavigator::at("/book"));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut model = model_with(api.clone(), navigator.clone(), &dir);

    model.process(Msg::BookingActivity(BookingActivityMsg::LoadServices));
    settle(&mut model).await;
    model.process(Msg::BookingActivity(BookingActivityMsg::ServiceSelected(1)));

    // Pick a slow date, then immediately switch to a fast one. The slow
    // result arrives last but answers a superseded selection.
    model.process(Msg::BookingActivity(BookingActivityMsg::DateSelected(
        date(2025, 3, 10),
    )));
    model.process(Msg::BookingActivity(BookingActivityMsg::DateSelected(
        date(2025, 3, 11),
    )));

    sleep(Duration::from_millis(300)).await;
    model.process_pending_messages();

    assert_eq!(model.workflow.selected_date(), Some(date(2025, 3, 11)));
    assert_eq!(
        *model.workflow.slots(),
        SlotsState::Loaded(vec![slot("2025-03-11T14:00:00Z", "14:00")])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_availability_is_not_an_error() {
    let api = Arc::new(FakeApi::new(vec![service(1, "Haircut")]));
    let navigator = Arc::new(RecordingNavigator::at("/book"));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut model = model_with(api.clone(), navigator.clone(), &dir);

    model.process(Msg::BookingActivity(BookingActivityMsg::LoadServices));
    settle(&mut model).await;
    model.process(Msg::BookingActivity(BookingActivityMsg::ServiceSelected(1)));
    model.process(Msg::BookingActivity(BookingActivityMsg::DateSelected(
        date(2025, 3, 12),
    )));
    settle(&mut model).await;

    assert_eq!(*model.workflow.slots(), SlotsState::Empty);
    assert!(model.workflow.failure().is_none());
    assert!(
        model
            .notifications
            .iter()
            .all(|n| n.kind != bookly::app::model::NotificationKind::Error),
        "no error notification for an empty day"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reschedule_goes_through_the_confirmation_gate() {
    let api = Arc::new(FakeApi::new(vec![service(1, "Haircut")]));
    let navigator = Arc::new(RecordingNavigator::at("/my-appointments"));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut model = model_with(api.clone(), navigator.clone(), &dir);
    model.appointments.push(appointment(1));

    let new_start = Utc.with_ymd_and_hms(2025, 3, 12, 14, 0, 0).unwrap();
    model.process(Msg::AppointmentActivity(
        AppointmentActivityMsg::RescheduleRequested {
            id: 1,
            start_time: new_start,
        },
    ));

    // Nothing is patched until the user confirms.
    assert!(model.pending_confirmation_action.is_some());
    assert!(api.update_calls().is_empty());

    // Dismissing the dialog drops the request entirely.
    model.process(Msg::PopupActivity(PopupActivityMsg::ConfirmationResult(
        false,
    )));
    assert!(model.pending_confirmation_action.is_none());
    assert!(api.update_calls().is_empty());

    // Asking again and confirming issues exactly one patch.
    model.process(Msg::AppointmentActivity(
        AppointmentActivityMsg::RescheduleRequested {
            id: 1,
            start_time: new_start,
        },
    ));
    model.process(Msg::PopupActivity(PopupActivityMsg::ConfirmationResult(
        true,
    )));
    settle(&mut model).await;

    let calls = api.update_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, 1);
    assert_eq!(calls[0].1.start_time, Some(new_start));
    assert_eq!(calls[0].1.status, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn out_of_window_date_is_rejected_locally() {
    let api = Arc::new(FakeApi::new(vec![service(1, "Haircut")]));
    let navigator = Arc::new(RecordingNavigator::at("/book"));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut model = model_with(api.clone(), navigator.clone(), &dir);

    model.process(Msg::BookingActivity(BookingActivityMsg::LoadServices));
    settle(&mut model).await;
    model.process(Msg::BookingActivity(BookingActivityMsg::ServiceSelected(1)));

    // 31 days out: beyond the inclusive 30-day window.
    model.process(Msg::BookingActivity(BookingActivityMsg::DateSelected(
        date(2025, 4, 1),
    )));
    model.process_pending_messages();

    assert_eq!(model.workflow.selected_date(), None);
    assert_eq!(*model.workflow.slots(), SlotsState::NotRequested);
    assert!(
        model
            .notifications
            .iter()
            .any(|n| n.kind == bookly::app::model::NotificationKind::Warning)
    );
}
