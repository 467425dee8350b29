use crate::api::ApiClient;
use crate::marking::notify::Notices;

/// Lesson-selection state. A rejected check always lands back on
/// `Unselected`; there is no dangling invalid selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Unselected,
    Checking,
    Selected {
        class_id: i64,
        lesson_id: i64,
    },
}

/// Validates class selections against the backend before anything else
/// may act on them.
#[derive(Debug, Default)]
pub struct LessonSelector {
    state: SelectionState,
}

impl LessonSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn lesson_id(&self) -> Option<i64> {
        match self.state {
            SelectionState::Selected { lesson_id, .. } => Some(lesson_id),
            _ => None,
        }
    }

    pub fn class_id(&self) -> Option<i64> {
        match self.state {
            SelectionState::Selected { class_id, .. } => Some(class_id),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = SelectionState::Unselected;
    }

    /// Resolves the current lesson for `class_id`. A class without a
    /// lesson right now is a non-fatal refusal: the selector resets and
    /// the server's reason (or a fallback) is surfaced as an info notice.
    pub async fn select(
        &mut self,
        api: &ApiClient,
        class_id: i64,
        notices: &Notices,
    ) -> Option<i64> {
        self.state = SelectionState::Checking;
        match api.check_lesson(class_id).await {
            Ok(check) => match (check.has_lesson, check.lesson_id) {
                (true, Some(lesson_id)) => {
                    self.state = SelectionState::Selected {
                        class_id,
                        lesson_id,
                    };
                    Some(lesson_id)
                }
                _ => {
                    notices.info(check.error.unwrap_or_else(|| {
                        "No lesson is currently scheduled for this class.".to_string()
                    }));
                    self.state = SelectionState::Unselected;
                    None
                }
            },
            Err(err) => {
                notices.error(err.error);
                self.state = SelectionState::Unselected;
                None
            }
        }
    }
}

/// Selection state for moving a workload to another lecturer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReassignmentState {
    #[default]
    Unselected,
    Checking,
    Selected {
        lecturer_id: i64,
        load_id: i64,
    },
}

/// Validates a lecturer/workload reassignment against the backend.
///
/// Same shape as [`LessonSelector`]: a clash or a failed check lands the
/// state back on `Unselected`, so a conflicting choice can never linger.
#[derive(Debug, Default)]
pub struct ReassignmentGuard {
    state: ReassignmentState,
}

impl ReassignmentGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReassignmentState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = ReassignmentState::Unselected;
    }

    /// Asks the backend whether assigning `load_id` to `lecturer_id`
    /// clashes with their timetable. Returns true when the reassignment
    /// may proceed; on a clash the server's reason is surfaced as an
    /// info notice.
    pub async fn select(
        &mut self,
        api: &ApiClient,
        lecturer_id: i64,
        load_id: i64,
        notices: &Notices,
    ) -> bool {
        self.state = ReassignmentState::Checking;
        match api.check_new_lecturer_workload(lecturer_id, load_id).await {
            Ok(check) if check.conflict => {
                notices.info(check.message.unwrap_or_else(|| {
                    "The lecturer is already assigned elsewhere in this time slot.".to_string()
                }));
                self.state = ReassignmentState::Unselected;
                false
            }
            Ok(_) => {
                self.state = ReassignmentState::Selected {
                    lecturer_id,
                    load_id,
                };
                true
            }
            Err(err) => {
                notices.error(err.error);
                self.state = ReassignmentState::Unselected;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SessionContext;
    use crate::marking::notify::NoticeLevel;
    use httpmock::prelude::*;
    use serde_json::json;

    fn api(server: &MockServer) -> ApiClient {
        ApiClient::new_with_base_url(server.url("/api"), SessionContext::new())
    }

    #[tokio::test]
    async fn select_moves_to_selected_when_lesson_exists() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/check-lesson/");
                then.status(200)
                    .json_body(json!({ "has_lesson": true, "lesson_id": 9 }));
            })
            .await;

        let mut selector = LessonSelector::new();
        let notices = Notices::new();
        let lesson = selector.select(&api(&server), 1, &notices).await;
        assert_eq!(lesson, Some(9));
        assert_eq!(
            selector.state(),
            SelectionState::Selected {
                class_id: 1,
                lesson_id: 9
            }
        );
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn rejection_resets_selector_and_surfaces_reason() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/check-lesson/");
                then.status(200)
                    .json_body(json!({ "has_lesson": false, "error": "No Lesson" }));
            })
            .await;

        let mut selector = LessonSelector::new();
        let notices = Notices::new();
        assert_eq!(selector.select(&api(&server), 7, &notices).await, None);
        assert_eq!(selector.state(), SelectionState::Unselected);

        let drained = notices.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].level, NoticeLevel::Info);
        assert_eq!(drained[0].message, "No Lesson");
    }

    #[tokio::test]
    async fn transport_error_resets_selector_with_error_notice() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/check-lesson/");
                then.status(500)
                    .json_body(json!({ "error": "boom", "code": "INTERNAL_SERVER_ERROR" }));
            })
            .await;

        let mut selector = LessonSelector::new();
        let notices = Notices::new();
        assert_eq!(selector.select(&api(&server), 7, &notices).await, None);
        assert_eq!(selector.state(), SelectionState::Unselected);
        assert_eq!(notices.drain()[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn conflict_blocks_reassignment_and_resets_the_guard() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/check-new-lecturer-workload/");
                then.status(200).json_body(json!({
                    "conflict": true,
                    "message": "Already teaching MATH200 at 10:00"
                }));
            })
            .await;

        let mut guard = ReassignmentGuard::new();
        let notices = Notices::new();
        assert!(!guard.select(&api(&server), 11, 4, &notices).await);
        assert_eq!(guard.state(), ReassignmentState::Unselected);
        let drained = notices.drain();
        assert_eq!(drained[0].message, "Already teaching MATH200 at 10:00");
    }

    #[tokio::test]
    async fn no_conflict_selects_the_reassignment_without_notices() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/check-new-lecturer-workload/");
                then.status(200).json_body(json!({ "conflict": false }));
            })
            .await;

        let mut guard = ReassignmentGuard::new();
        let notices = Notices::new();
        assert!(guard.select(&api(&server), 11, 4, &notices).await);
        assert_eq!(
            guard.state(),
            ReassignmentState::Selected {
                lecturer_id: 11,
                load_id: 4
            }
        );
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn failed_conflict_check_resets_the_guard_with_error_notice() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/check-new-lecturer-workload/");
                then.status(500)
                    .json_body(json!({ "error": "boom", "code": "INTERNAL_SERVER_ERROR" }));
            })
            .await;

        let mut guard = ReassignmentGuard::new();
        let notices = Notices::new();
        assert!(!guard.select(&api(&server), 11, 4, &notices).await);
        assert_eq!(guard.state(), ReassignmentState::Unselected);
        assert_eq!(notices.drain()[0].level, NoticeLevel::Error);
    }
}
