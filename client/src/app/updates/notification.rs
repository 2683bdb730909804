use crate::app::model::{Model, NotificationKind};
use crate::components::common::{Msg, NotificationActivityMsg};

impl Model {
    pub fn update_notification(&mut self, msg: NotificationActivityMsg) -> Option<Msg> {
        let (kind, message) = match msg {
            NotificationActivityMsg::Success(message) => (NotificationKind::Success, message),
            NotificationActivityMsg::Error(message) => (NotificationKind::Error, message),
            NotificationActivityMsg::Info(message) => (NotificationKind::Info, message),
            NotificationActivityMsg::Warning(message) => (NotificationKind::Warning, message),
        };

        match kind {
            NotificationKind::Error => log::error!("{message}"),
            NotificationKind::Warning => log::warn!("{message}"),
            _ => log::info!("{message}"),
        }
        self.push_notification(kind, message);
        None
    }
}
