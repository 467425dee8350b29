//! The attendance-marking protocol: session lifecycle, roster loading
//! and reconciliation, manual batch submission, and the conflict guard.

mod batch;
mod guard;
mod notify;
mod reconciler;
mod roster;
mod session;
mod view_model;

pub use crate::api::AttendanceState;
pub use batch::{submit_batch, BatchStatusMap, SubmitOutcome};
pub use guard::{LessonSelector, ReassignmentGuard, ReassignmentState, SelectionState};
pub use notify::{Notice, NoticeLevel, Notices};
pub use reconciler::{PollOutcome, Reconciler, DEFAULT_POLL_INTERVAL};
pub use roster::{MarkSource, Roster, RosterEntry, RosterFetcher};
pub use session::{
    MarkingMode, SessionController, SessionPhase, MARK_ATTENDANCE_LABEL, STOP_REGISTERING_LABEL,
};
pub use view_model::MarkingViewModel;
