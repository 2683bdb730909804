pub mod booking;
pub mod model;
pub mod task_manager;
pub mod updates;

pub use booking::{BookingEffect, BookingStage, BookingWorkflow, SlotsState, SubmissionState};
pub use model::Model;
pub use task_manager::TaskManager;
