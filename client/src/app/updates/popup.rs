use crate::app::booking::BookingStage;
use crate::app::model::Model;
use crate::components::common::{Msg, PopupActivityMsg};

impl Model {
    pub fn update_popup(&mut self, msg: PopupActivityMsg) -> Option<Msg> {
        match msg {
            PopupActivityMsg::ShowConfirmation {
                title,
                message,
                on_confirm,
            } => {
                log::debug!("Confirmation requested: {title} - {message}");
                self.pending_confirmation_action = Some(on_confirm);
                None
            }
            PopupActivityMsg::ConfirmationResult(confirmed) => {
                if confirmed {
                    return match self.pending_confirmation_action.take() {
                        Some(action) => Some(*action),
                        None => {
                            log::warn!("Confirmation result without pending action");
                            None
                        }
                    };
                }

                // The gate cannot be dismissed while a submission is in
                // flight; keep the pending action so the dialog stays up.
                if self.workflow.stage() == BookingStage::Submitting {
                    log::debug!("Ignoring dismiss while submission is in flight");
                    return None;
                }

                self.pending_confirmation_action = None;
                self.workflow.dismiss_confirmation();
                None
            }
        }
    }
}
