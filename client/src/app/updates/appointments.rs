use crate::app::model::Model;
use crate::app::task_manager::TaskManager;
use crate::components::common::{
    AppointmentActivityMsg, Msg, NotificationActivityMsg, PopupActivityMsg,
};
use crate::services::session_guard::FailureKind;
use api::Endpoint;
use api::models::AppointmentPatch;
use chrono::{DateTime, Utc};

impl Model {
    pub fn update_appointments(&mut self, msg: AppointmentActivityMsg) -> Option<Msg> {
        match msg {
            AppointmentActivityMsg::Load(status) => {
                self.load_appointments(status);
                None
            }
            AppointmentActivityMsg::Loaded(appointments) => {
                self.appointments = appointments;
                None
            }
            AppointmentActivityMsg::LoadFailed(message) => Some(Msg::NotificationActivity(
                NotificationActivityMsg::Error(message),
            )),
            AppointmentActivityMsg::CancelRequested(id) => {
                Some(Msg::PopupActivity(PopupActivityMsg::ShowConfirmation {
                    title: "Cancel Appointment".to_string(),
                    message: "Are you sure you want to cancel this appointment?".to_string(),
                    on_confirm: Box::new(Msg::AppointmentActivity(
                        AppointmentActivityMsg::CancelConfirmed(id),
                    )),
                }))
            }
            AppointmentActivityMsg::CancelConfirmed(id) => {
                self.patch_appointment(id, None, "Cancelling appointment...");
                None
            }
            AppointmentActivityMsg::RescheduleRequested { id, start_time } => {
                Some(Msg::PopupActivity(PopupActivityMsg::ShowConfirmation {
                    title: "Reschedule Appointment".to_string(),
                    message: format!(
                        "Move this appointment to {}?",
                        start_time.format("%Y-%m-%d %H:%M")
                    ),
                    on_confirm: Box::new(Msg::AppointmentActivity(
                        AppointmentActivityMsg::RescheduleConfirmed { id, start_time },
                    )),
                }))
            }
            AppointmentActivityMsg::RescheduleConfirmed { id, start_time } => {
                self.patch_appointment(id, Some(start_time), "Rescheduling appointment...");
                None
            }
            AppointmentActivityMsg::Updated(appointment) => {
                match self.appointments.iter_mut().find(|a| a.id == appointment.id) {
                    Some(existing) => *existing = appointment,
                    None => self.appointments.push(appointment),
                }
                Some(Msg::NotificationActivity(NotificationActivityMsg::Success(
                    "Appointment updated".to_string(),
                )))
            }
            AppointmentActivityMsg::UpdateFailed(message) => Some(Msg::NotificationActivity(
                NotificationActivityMsg::Error(message),
            )),
        }
    }

    fn load_appointments(&self, status: Option<api::models::AppointmentStatus>) {
        let api = self.api.clone();
        let guard = self.session_guard.clone();
        let tx = self.tx_to_main.clone();
        let reporter = self.error_reporter.clone();

        self.task_manager
            .execute("Loading appointments...", async move {
                match api.list_appointments(status).await {
                    Ok(appointments) => {
                        TaskManager::send_message_or_report_error(
                            &tx,
                            Msg::AppointmentActivity(AppointmentActivityMsg::Loaded(appointments)),
                            "appointments loaded",
                            &reporter,
                        );
                        Ok(())
                    }
                    Err(e) => match guard.handle_failure(Endpoint::Appointments, &e) {
                        FailureKind::Recoverable(message) => {
                            TaskManager::send_message_or_report_error(
                                &tx,
                                Msg::AppointmentActivity(AppointmentActivityMsg::LoadFailed(
                                    message,
                                )),
                                "appointments load failed",
                                &reporter,
                            );
                            Ok(())
                        }
                        FailureKind::SessionInvalid => Ok(()),
                    },
                }
            });
    }

    /// Cancels (no new start time) or reschedules (new start time) one
    /// appointment.
    fn patch_appointment(
        &self,
        id: i64,
        new_start: Option<DateTime<Utc>>,
        loading_message: &'static str,
    ) {
        let api = self.api.clone();
        let guard = self.session_guard.clone();
        let tx = self.tx_to_main.clone();
        let reporter = self.error_reporter.clone();

        self.task_manager.execute(loading_message, async move {
            let result = match new_start {
                Some(start_time) => {
                    api.update_appointment(id, &AppointmentPatch::reschedule(start_time))
                        .await
                }
                None => api.cancel_appointment(id).await,
            };

            match result {
                Ok(appointment) => {
                    TaskManager::send_message_or_report_error(
                        &tx,
                        Msg::AppointmentActivity(AppointmentActivityMsg::Updated(appointment)),
                        "appointment updated",
                        &reporter,
                    );
                    Ok(())
                }
                Err(e) => match guard.handle_failure(Endpoint::Appointments, &e) {
                    FailureKind::Recoverable(message) => {
                        TaskManager::send_message_or_report_error(
                            &tx,
                            Msg::AppointmentActivity(AppointmentActivityMsg::UpdateFailed(message)),
                            "appointment update failed",
                            &reporter,
                        );
                        Ok(())
                    }
                    FailureKind::SessionInvalid => Ok(()),
                },
            }
        });
    }
}
