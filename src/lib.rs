//! Client core for marking attendance against a school-management REST
//! backend.
//!
//! The crate drives the stateful part of a mark-attendance screen without
//! owning any view code: selecting a class and resolving its current
//! lesson, loading the student roster, collecting manual marks into a
//! batch, and running the face-recognition session lifecycle
//! (start → poll → reconcile → stop). All HTTP access goes through
//! [`ApiClient`]; everything user-visible is reported through
//! [`marking::Notices`] rather than propagated as errors.

pub mod api;
pub mod config;
pub mod context;
pub mod marking;

pub use api::{ApiClient, ApiError};
pub use context::SessionContext;
pub use marking::{
    AttendanceState, BatchStatusMap, MarkingMode, MarkingViewModel, Notice, NoticeLevel, Notices,
    Roster, SessionPhase,
};
