use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fixed set of recordable attendance states.
///
/// Anything else coming off the wire (null, empty, garbage) is treated as
/// "unmarked" and modeled as `Option::None` by the roster layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttendanceState {
    Present,
    Late,
    Absent,
}

impl AttendanceState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Late => "Late",
            Self::Absent => "Absent",
        }
    }

    /// Parses a wire state string. Blank and unknown values both map to
    /// `None`; callers that care about the difference check emptiness
    /// before parsing.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Present" => Some(Self::Present),
            "Late" => Some(Self::Late),
            "Absent" => Some(Self::Absent),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttendanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student row from the roster search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterStudent {
    pub id: i64,
    pub fname: String,
    #[serde(default)]
    pub mname: Option<String>,
    pub sname: String,
    pub regno: String,
    #[serde(default)]
    pub passport: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl RosterStudent {
    pub fn full_name(&self) -> String {
        match self.mname.as_deref() {
            Some(mname) if !mname.trim().is_empty() => {
                format!("{} {} {}", self.fname, mname, self.sname)
            }
            _ => format!("{} {}", self.fname, self.sname),
        }
    }
}

/// Whether a lesson is currently scheduled for a class, and which one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonCheckResponse {
    pub has_lesson: bool,
    #[serde(default)]
    pub lesson_id: Option<i64>,
    #[serde(default)]
    pub starts_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub ends_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of a recognition-session start/stop command.
///
/// The backend reports three independent lists; any of them may be
/// missing or empty, and none suppresses the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionCommandResponse {
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub info: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// One status poll for a recognition session.
///
/// `marked` carries the incremental per-student results recorded since
/// the session started, keyed by registration number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub active: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub marked: BTreeMap<String, String>,
}

/// Manual marking batch: the full student→state map in one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    pub attendance: BTreeMap<String, AttendanceState>,
    pub mode_id: i32,
    pub lesson_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkAttendanceResponse {
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Scheduling-clash answer for a lecturer/workload reassignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConflictResponse {
    pub conflict: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.error
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "VALIDATION_ERROR".to_string(),
            details: None,
        }
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "UNKNOWN".to_string(),
            details: None,
        }
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "REQUEST_FAILED".to_string(),
            details: None,
        }
    }
}
