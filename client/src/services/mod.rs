pub mod session_guard;

pub use session_guard::{FailureKind, Navigator, SessionGuard, SessionPolicy};
