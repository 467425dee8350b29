use crate::api::ApiClient;
use crate::marking::notify::Notices;

/// How the operator records attendance for the selected lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkingMode {
    Manual,
    FaceRecognition,
}

impl MarkingMode {
    /// Wire identifier sent with manual batches.
    pub fn mode_id(self) -> i32 {
        match self {
            Self::Manual => 1,
            Self::FaceRecognition => 2,
        }
    }
}

/// Lifecycle of the face-recognition session bound to the current lesson.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    Starting,
    Active,
    Stopping,
}

pub const MARK_ATTENDANCE_LABEL: &str = "Mark Attendance";
pub const STOP_REGISTERING_LABEL: &str = "Stop Registering";

/// Drives the start/stop lifecycle of a recognition session.
///
/// The toggle semantics guarantee at most one session per lesson from
/// this client: while the phase is `Active` a toggle is always a stop,
/// and while a command is in flight further toggles are ignored.
#[derive(Debug, Default)]
pub struct SessionController {
    phase: SessionPhase,
    lesson_id: Option<i64>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn lesson_id(&self) -> Option<i64> {
        self.lesson_id
    }

    pub fn is_active(&self) -> bool {
        self.phase() == SessionPhase::Active
    }

    /// Binds a freshly validated lesson, discarding any prior session
    /// state. A session can never survive a lesson change.
    pub fn bind_lesson(&mut self, lesson_id: i64) {
        self.lesson_id = Some(lesson_id);
        self.phase = SessionPhase::Idle;
    }

    pub fn clear_lesson(&mut self) {
        self.lesson_id = None;
        self.phase = SessionPhase::Idle;
    }

    pub fn action_label(&self) -> &'static str {
        match self.phase() {
            SessionPhase::Idle | SessionPhase::Starting => MARK_ATTENDANCE_LABEL,
            SessionPhase::Active | SessionPhase::Stopping => STOP_REGISTERING_LABEL,
        }
    }

    /// Called by the reconciler when the server reports the session over.
    pub fn finish(&mut self) {
        self.phase = SessionPhase::Idle;
    }

    /// Starts the session if idle, stops it if active. All backend
    /// outcomes are converted to notices; the returned phase is the state
    /// after the command resolved.
    pub async fn toggle(&mut self, api: &ApiClient, notices: &Notices) -> SessionPhase {
        let Some(lesson_id) = self.lesson_id else {
            notices.info("Select a class with an active lesson first.");
            return self.phase();
        };
        match self.phase() {
            SessionPhase::Idle => self.start(api, lesson_id, notices).await,
            SessionPhase::Active => self.stop(api, lesson_id, notices).await,
            // A command is already in flight; ignore the extra click.
            phase @ (SessionPhase::Starting | SessionPhase::Stopping) => phase,
        }
    }

    async fn start(&mut self, api: &ApiClient, lesson_id: i64, notices: &Notices) -> SessionPhase {
        self.phase = SessionPhase::Starting;

        // The server, not client memory, decides whether a session is
        // already running: after a reload the local flag starts out idle
        // even if recognition is still underway.
        match api.face_attendance_status(lesson_id).await {
            Ok(status) if status.active => {
                notices.info(status.message.unwrap_or_else(|| {
                    "A recognition session is already running for this lesson.".to_string()
                }));
                log::info!("adopted running recognition session for lesson {}", lesson_id);
                self.phase = SessionPhase::Active;
                return self.phase();
            }
            Ok(_) => {}
            Err(err) => {
                notices.error(err.error);
                self.phase = SessionPhase::Idle;
                return self.phase();
            }
        }

        match api.start_face_attendance(lesson_id).await {
            Ok(response) => {
                let started = !response.success.is_empty();
                notices.extend_from_command(&response);
                if started {
                    log::info!("recognition session started for lesson {}", lesson_id);
                    self.phase = SessionPhase::Active;
                } else {
                    // Business-rule refusal, not a failure.
                    self.phase = SessionPhase::Idle;
                }
            }
            Err(err) => {
                notices.error(err.error);
                self.phase = SessionPhase::Idle;
            }
        }
        self.phase()
    }

    async fn stop(&mut self, api: &ApiClient, lesson_id: i64, notices: &Notices) -> SessionPhase {
        self.phase = SessionPhase::Stopping;
        match api.stop_face_attendance(lesson_id).await {
            Ok(response) => notices.extend_from_command(&response),
            Err(err) => notices.error(err.error),
        }
        // Whatever the backend said, the local session is over.
        log::info!("recognition session stopped for lesson {}", lesson_id);
        self.phase = SessionPhase::Idle;
        self.phase()
    }
}
