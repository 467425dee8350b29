use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiClient, ApiError, AttendanceState, RosterStudent};
use crate::marking::notify::Notices;

/// Who last wrote a roster entry's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkSource {
    Operator,
    Server,
}

#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub student: RosterStudent,
    pub state: Option<AttendanceState>,
    pub source: Option<MarkSource>,
}

/// The students of the selected class with their attendance states.
///
/// Unique per (lesson, student): entries are keyed by registration
/// number, and a state is either one of the fixed values or unmarked.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Builds a roster from raw search rows, normalizing blank or
    /// unrecognized state strings to unmarked.
    pub fn from_students(students: Vec<RosterStudent>) -> Self {
        let entries = students
            .into_iter()
            .map(|student| {
                let state = student.state.as_deref().and_then(|raw| {
                    let parsed = AttendanceState::parse(raw);
                    if parsed.is_none() && !raw.trim().is_empty() {
                        log::warn!(
                            "ignoring unrecognized attendance state '{}' for {}",
                            raw,
                            student.regno
                        );
                    }
                    parsed
                });
                RosterEntry {
                    source: state.map(|_| MarkSource::Server),
                    state,
                    student,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn state_of(&self, regno: &str) -> Option<AttendanceState> {
        self.entries
            .iter()
            .find(|entry| entry.student.regno == regno)
            .and_then(|entry| entry.state)
    }

    /// States already recorded server-side, for pre-filling the marking
    /// grid.
    pub fn prefill(&self) -> BTreeMap<String, AttendanceState> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .state
                    .map(|state| (entry.student.regno.clone(), state))
            })
            .collect()
    }

    /// Records an operator edit. Returns false for a registration number
    /// not on this roster.
    pub fn set_operator_state(&mut self, regno: &str, state: AttendanceState) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.student.regno == regno)
        {
            Some(entry) => {
                entry.state = Some(state);
                entry.source = Some(MarkSource::Operator);
                true
            }
            None => false,
        }
    }

    /// Merges server-reported recognition results. The server is the
    /// source of truth: a student present in the payload is overwritten
    /// (the payload value is newer than any local edit); students absent
    /// from the payload keep whatever the operator set.
    pub fn apply_server_states(&mut self, marked: &BTreeMap<String, String>) {
        for (regno, raw) in marked {
            let Some(state) = AttendanceState::parse(raw) else {
                log::warn!("status poll carried unrecognized state '{}' for {}", raw, regno);
                continue;
            };
            match self
                .entries
                .iter_mut()
                .find(|entry| entry.student.regno == *regno)
            {
                Some(entry) => {
                    entry.state = Some(state);
                    entry.source = Some(MarkSource::Server);
                }
                None => log::warn!("status poll named {} who is not on the roster", regno),
            }
        }
    }
}

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounced roster loader with a latest-request-wins guard.
///
/// The class selector can fire several times in quick succession. Each
/// call takes a fresh token from a shared counter and re-checks it after
/// every suspension point, so only the most recently requested class ever
/// produces a roster. A slow early response can no longer overwrite a
/// fast later one.
#[derive(Clone)]
pub struct RosterFetcher {
    seq: Arc<AtomicU64>,
    debounce: Duration,
}

impl Default for RosterFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterFetcher {
    pub fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            seq: Arc::new(AtomicU64::new(0)),
            debounce,
        }
    }

    /// Loads the roster for `class_id`. Returns `Ok(None)` when a newer
    /// refresh superseded this one, either during the debounce window or
    /// while the request was in flight; the caller must discard the
    /// result in that case.
    pub async fn refresh(
        &self,
        api: &ApiClient,
        class_id: i64,
        notices: &Notices,
    ) -> Result<Option<Roster>, ApiError> {
        let token = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
            if self.seq.load(Ordering::SeqCst) != token {
                log::debug!("roster refresh for class {} superseded during debounce", class_id);
                return Ok(None);
            }
        }

        let students = api.search_attendance(class_id).await?;
        if self.seq.load(Ordering::SeqCst) != token {
            log::debug!("roster refresh for class {} superseded in flight", class_id);
            return Ok(None);
        }

        let roster = Roster::from_students(students);
        if roster.is_empty() {
            notices.info("No student found for the selected class.");
        }
        Ok(Some(roster))
    }
}
