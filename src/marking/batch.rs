use std::collections::BTreeMap;

use crate::api::{ApiClient, AttendanceState, MarkAttendanceRequest};
use crate::marking::notify::Notices;
use crate::marking::session::MarkingMode;

/// Student→state assignments accumulated during manual marking.
///
/// Keys are registration numbers; recording the same student twice
/// overwrites the earlier choice. Order never matters, the whole map is
/// submitted atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStatusMap {
    entries: BTreeMap<String, AttendanceState>,
}

impl BatchStatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, regno: impl Into<String>, state: AttendanceState) {
        self.entries.insert(regno.into(), state);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &BTreeMap<String, AttendanceState> {
        &self.entries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Precondition failed; no request was made.
    Skipped,
    Submitted,
}

/// Submits the accumulated batch for a lesson in one request.
///
/// An empty batch is a precondition failure: no network call happens and
/// the operator gets an informational notice. A server-side partial
/// failure surfaces both the success and the error message; the accepted
/// portion is not rolled back.
pub async fn submit_batch(
    api: &ApiClient,
    lesson_id: i64,
    mode: MarkingMode,
    batch: &BatchStatusMap,
    notices: &Notices,
) -> SubmitOutcome {
    if batch.is_empty() {
        notices.info("Select at least one record to mark.");
        return SubmitOutcome::Skipped;
    }

    let request = MarkAttendanceRequest {
        attendance: batch.entries().clone(),
        mode_id: mode.mode_id(),
        lesson_id,
    };
    log::debug!(
        "submitting manual batch of {} records for lesson {}",
        batch.len(),
        lesson_id
    );
    match api.mark_attendance(&request).await {
        Ok(response) => {
            if let Some(message) = response.success {
                notices.success(message);
            }
            if let Some(message) = response.error {
                notices.error(message);
            }
        }
        Err(err) => notices.error(err.error),
    }
    SubmitOutcome::Submitted
}
