use tokio::sync::watch;

use crate::api::{ApiClient, AttendanceState};
use crate::marking::batch::{self, BatchStatusMap, SubmitOutcome};
use crate::marking::guard::{LessonSelector, ReassignmentGuard, ReassignmentState, SelectionState};
use crate::marking::notify::Notices;
use crate::marking::reconciler::Reconciler;
use crate::marking::roster::{Roster, RosterFetcher};
use crate::marking::session::{MarkingMode, SessionController, SessionPhase};

/// Everything the mark-attendance screen needs, wired together.
///
/// Owns the selected lesson, the roster, the manual batch, and the
/// recognition-session controller, and keeps them consistent: a class
/// change revalidates the lesson, clears the batch, and reloads the
/// roster; a rejected selection leaves no roster and no lesson behind.
/// All outcomes land in the shared [`Notices`] queue.
pub struct MarkingViewModel {
    api: ApiClient,
    notices: Notices,
    selector: LessonSelector,
    reassignment: ReassignmentGuard,
    fetcher: RosterFetcher,
    controller: SessionController,
    reconciler: Reconciler,
    roster: Roster,
    batch: BatchStatusMap,
    mode: Option<MarkingMode>,
}

impl MarkingViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            notices: Notices::new(),
            selector: LessonSelector::new(),
            reassignment: ReassignmentGuard::new(),
            fetcher: RosterFetcher::new(),
            controller: SessionController::new(),
            reconciler: Reconciler::new(),
            roster: Roster::default(),
            batch: BatchStatusMap::new(),
            mode: None,
        }
    }

    /// Replaces the default fetcher/reconciler timings; used by embedders
    /// that need snappier (or slower) network cadence.
    pub fn with_timings(mut self, fetcher: RosterFetcher, reconciler: Reconciler) -> Self {
        self.fetcher = fetcher;
        self.reconciler = reconciler;
        self
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn batch(&self) -> &BatchStatusMap {
        &self.batch
    }

    pub fn mode(&self) -> Option<MarkingMode> {
        self.mode
    }

    pub fn selection(&self) -> SelectionState {
        self.selector.state()
    }

    pub fn lesson_id(&self) -> Option<i64> {
        self.selector.lesson_id()
    }

    pub fn phase(&self) -> SessionPhase {
        self.controller.phase()
    }

    pub fn action_label(&self) -> &'static str {
        self.controller.action_label()
    }

    pub fn set_mode(&mut self, mode: MarkingMode) {
        self.mode = Some(mode);
    }

    /// Validates the class via the conflict guard and, when a lesson
    /// exists, loads its roster. On rejection the selector resets, no
    /// roster fetch is triggered, and any previous lesson binding is
    /// dropped.
    pub async fn select_class(&mut self, class_id: i64) -> Option<i64> {
        match self.selector.select(&self.api, class_id, &self.notices).await {
            Some(lesson_id) => {
                self.controller.bind_lesson(lesson_id);
                self.batch.clear();
                match self
                    .fetcher
                    .refresh(&self.api, class_id, &self.notices)
                    .await
                {
                    Ok(Some(roster)) => self.roster = roster,
                    // Superseded by a newer selection; that one will
                    // install its own roster.
                    Ok(None) => {}
                    Err(err) => self.notices.error(err.error),
                }
                Some(lesson_id)
            }
            None => {
                self.controller.clear_lesson();
                self.roster = Roster::default();
                self.batch.clear();
                None
            }
        }
    }

    /// Operator edit in manual mode: updates the grid and the pending
    /// batch in one step.
    pub fn record_status(&mut self, regno: &str, state: AttendanceState) {
        if !self.roster.set_operator_state(regno, state) {
            log::warn!("operator marked {} who is not on the roster", regno);
        }
        self.batch.record(regno, state);
    }

    pub async fn submit_batch(&mut self) -> SubmitOutcome {
        if self.mode != Some(MarkingMode::Manual) {
            self.notices.info("Choose the manual marking mode first.");
            return SubmitOutcome::Skipped;
        }
        let Some(lesson_id) = self.selector.lesson_id() else {
            self.notices.info("Select a class with an active lesson first.");
            return SubmitOutcome::Skipped;
        };
        batch::submit_batch(
            &self.api,
            lesson_id,
            MarkingMode::Manual,
            &self.batch,
            &self.notices,
        )
        .await
    }

    pub async fn toggle_session(&mut self) -> SessionPhase {
        if self.mode != Some(MarkingMode::FaceRecognition) {
            self.notices.info("Choose the face recognition mode first.");
            return self.controller.phase();
        }
        self.controller.toggle(&self.api, &self.notices).await
    }

    /// Runs the status reconciler for the active session until it ends,
    /// a poll fails, or `shutdown` fires. No-op unless a session is
    /// active.
    pub async fn run_reconciler(&mut self, shutdown: &mut watch::Receiver<bool>) {
        self.reconciler
            .run(
                &self.api,
                &mut self.controller,
                &mut self.roster,
                &self.notices,
                shutdown,
            )
            .await;
    }

    pub fn reassignment(&self) -> ReassignmentState {
        self.reassignment.state()
    }

    /// Conflict-guard check for moving a workload to another lecturer.
    /// A clash resets the reassignment selection.
    pub async fn check_reassignment(&mut self, lecturer_id: i64, load_id: i64) -> bool {
        self.reassignment
            .select(&self.api, lecturer_id, load_id, &self.notices)
            .await
    }
}
