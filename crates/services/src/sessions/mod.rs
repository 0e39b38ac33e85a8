mod plan;
mod progress;
mod state;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{EXTRA_SESSION_SIZE, SessionKind, SessionPlan, SessionPool, compose_session};
pub use progress::SessionProgress;
pub use state::{DrillStyle, SessionState, SessionStatus};
