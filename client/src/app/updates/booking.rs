use crate::app::booking::{BookingEffect, BookingError};
use crate::app::model::Model;
use crate::app::task_manager::TaskManager;
use crate::components::common::{
    BookingActivityMsg, Msg, NotificationActivityMsg, PopupActivityMsg,
};
use crate::error::AppError;
use crate::services::session_guard::FailureKind;
use api::Endpoint;
use api::models::BookingIntent;
use chrono::NaiveDate;

impl Model {
    pub fn update_booking(&mut self, msg: BookingActivityMsg) -> Option<Msg> {
        match msg {
            BookingActivityMsg::LoadServices => {
                self.load_services();
                None
            }
            BookingActivityMsg::ServicesLoaded(services) => {
                self.workflow.set_services(services);
                None
            }
            BookingActivityMsg::ServiceSelected(service_id) => {
                if let Err(e) = self.workflow.select_service(service_id) {
                    self.report_booking_warning(e, "select_service");
                }
                None
            }
            BookingActivityMsg::ServiceCleared => {
                self.workflow.clear_service();
                None
            }
            BookingActivityMsg::DateSelected(date) => match self.workflow.select_date(date) {
                Ok(effect) => self.run_booking_effect(effect),
                Err(e) => {
                    self.report_booking_warning(e, "select_date");
                    None
                }
            },
            BookingActivityMsg::DateCleared => {
                self.workflow.clear_date();
                None
            }
            BookingActivityMsg::SlotsLoaded { epoch, slots } => {
                if !self.workflow.apply_slots(epoch, slots) {
                    log::debug!("Discarding stale availability result (epoch {epoch})");
                }
                None
            }
            BookingActivityMsg::SlotsFetchFailed { epoch, message } => {
                if self.workflow.apply_fetch_failure(epoch, &message) {
                    Some(Msg::NotificationActivity(NotificationActivityMsg::Error(
                        message,
                    )))
                } else {
                    log::debug!("Discarding stale availability failure (epoch {epoch})");
                    None
                }
            }
            BookingActivityMsg::SlotSelected(slot) => {
                if let Err(e) = self.workflow.select_slot(slot) {
                    self.report_booking_warning(e, "select_slot");
                }
                None
            }
            BookingActivityMsg::BookRequested => {
                let effect = self.workflow.request_confirmation()?;
                self.run_booking_effect(effect)
            }
            BookingActivityMsg::ConfirmSubmission => match self.workflow.confirm_submission() {
                Ok(effect) => self.run_booking_effect(effect),
                Err(BookingError::NotAllowed(reason)) => {
                    log::debug!("Ignoring confirm: {reason}");
                    None
                }
                Err(e) => {
                    self.report_booking_warning(e, "confirm_submission");
                    None
                }
            },
            BookingActivityMsg::DismissConfirmation => {
                if !self.workflow.dismiss_confirmation() {
                    log::debug!("Ignoring dismiss while submission is in flight");
                }
                None
            }
            BookingActivityMsg::SubmissionSucceeded(appointment) => {
                self.workflow.submission_succeeded();
                log::info!("Appointment {} booked", appointment.id);
                self.appointments.push(appointment);
                self.navigator.navigate_to("/my-appointments");
                Some(Msg::NotificationActivity(NotificationActivityMsg::Success(
                    "Appointment booked successfully!".to_string(),
                )))
            }
            BookingActivityMsg::SubmissionFailed(message) => {
                self.workflow.submission_failed(&message);
                Some(Msg::NotificationActivity(NotificationActivityMsg::Error(
                    message,
                )))
            }
        }
    }

    /// Performs the side effect a workflow transition asked for.
    fn run_booking_effect(&mut self, effect: BookingEffect) -> Option<Msg> {
        match effect {
            BookingEffect::FetchSlots {
                epoch,
                service_id,
                date,
            } => {
                self.fetch_slots(epoch, service_id, date);
                None
            }
            BookingEffect::RequestConfirmation { prompt } => {
                Some(Msg::PopupActivity(PopupActivityMsg::ShowConfirmation {
                    title: "Confirm Booking".to_string(),
                    message: prompt,
                    on_confirm: Box::new(Msg::BookingActivity(
                        BookingActivityMsg::ConfirmSubmission,
                    )),
                }))
            }
            BookingEffect::Submit { intent } => {
                self.submit_booking(intent);
                None
            }
        }
    }

    fn load_services(&self) {
        let api = self.api.clone();
        let guard = self.session_guard.clone();
        let tx = self.tx_to_main.clone();
        let reporter = self.error_reporter.clone();

        self.task_manager.execute("Loading services...", async move {
            match api.list_services().await {
                Ok(services) => {
                    TaskManager::send_message_or_report_error(
                        &tx,
                        Msg::BookingActivity(BookingActivityMsg::ServicesLoaded(services)),
                        "services loaded",
                        &reporter,
                    );
                    Ok(())
                }
                Err(e) => match guard.handle_failure(Endpoint::Services, &e) {
                    FailureKind::Recoverable(message) => Err(AppError::Api(message)),
                    FailureKind::SessionInvalid => Ok(()),
                },
            }
        });
    }

    fn fetch_slots(&self, epoch: u64, service_id: i64, date: NaiveDate) {
        let api = self.api.clone();
        let guard = self.session_guard.clone();
        let tx = self.tx_to_main.clone();
        let reporter = self.error_reporter.clone();

        self.task_manager
            .execute("Loading available times...", async move {
                match api.get_availability(service_id, date).await {
                    Ok(slots) => {
                        TaskManager::send_message_or_report_error(
                            &tx,
                            Msg::BookingActivity(BookingActivityMsg::SlotsLoaded { epoch, slots }),
                            "slots loaded",
                            &reporter,
                        );
                        Ok(())
                    }
                    Err(e) => match guard.handle_failure(Endpoint::Availability, &e) {
                        FailureKind::Recoverable(message) => {
                            TaskManager::send_message_or_report_error(
                                &tx,
                                Msg::BookingActivity(BookingActivityMsg::SlotsFetchFailed {
                                    epoch,
                                    message,
                                }),
                                "slots fetch failed",
                                &reporter,
                            );
                            Ok(())
                        }
                        // Availability is a user-action endpoint, so this
                        // arm only fires under a narrowed policy.
                        FailureKind::SessionInvalid => Ok(()),
                    },
                }
            });
    }

    fn submit_booking(&self, intent: BookingIntent) {
        let api = self.api.clone();
        let guard = self.session_guard.clone();
        let tx = self.tx_to_main.clone();
        let reporter = self.error_reporter.clone();

        self.task_manager
            .execute("Booking appointment...", async move {
                match api.create_appointment(&intent).await {
                    Ok(appointment) => {
                        TaskManager::send_message_or_report_error(
                            &tx,
                            Msg::BookingActivity(BookingActivityMsg::SubmissionSucceeded(
                                appointment,
                            )),
                            "submission succeeded",
                            &reporter,
                        );
                        Ok(())
                    }
                    Err(e) => match guard.handle_failure(Endpoint::Appointments, &e) {
                        FailureKind::Recoverable(message) => {
                            TaskManager::send_message_or_report_error(
                                &tx,
                                Msg::BookingActivity(BookingActivityMsg::SubmissionFailed(message)),
                                "submission failed",
                                &reporter,
                            );
                            Ok(())
                        }
                        FailureKind::SessionInvalid => Ok(()),
                    },
                }
            });
    }

    fn report_booking_warning(&self, error: BookingError, operation: &str) {
        self.error_reporter.report_warning(
            AppError::Validation(error.to_string()),
            "Booking",
            operation,
        );
    }
}
