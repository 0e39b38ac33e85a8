#![forbid(unsafe_code)]

pub mod error;
pub mod review_service;
pub mod selection;
pub mod sessions;
pub mod study_service;

pub use kana_core::Clock;
pub use sessions as session;

pub use error::{SessionError, StudyError};
pub use review_service::{CommitSummary, ReviewService, dedup_outcomes};
pub use selection::{DueAndNew, StudyOverview};
pub use sessions::{
    DrillStyle, SessionKind, SessionPlan, SessionProgress, SessionState, SessionStatus,
};
pub use study_service::StudyService;
