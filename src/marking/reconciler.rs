use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::api::{ApiClient, ApiError};
use crate::marking::notify::Notices;
use crate::marking::roster::Roster;
use crate::marking::session::SessionController;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Result of one status poll.
#[derive(Debug)]
pub enum PollOutcome {
    /// Session still running; per-student results were merged.
    Pending,
    /// Server reported the session over, with its completion message.
    Finished(Option<String>),
    Failed(ApiError),
}

/// Polls a running recognition session and merges results into the
/// roster until the server reports completion, a poll fails, or the
/// caller signals shutdown (lesson change, screen teardown).
pub struct Reconciler {
    interval: Duration,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }

    /// One status request for `lesson_id`, merging any reported
    /// per-student states.
    pub async fn poll_once(
        api: &ApiClient,
        lesson_id: i64,
        roster: &mut Roster,
    ) -> PollOutcome {
        match api.face_attendance_status(lesson_id).await {
            Ok(status) => {
                roster.apply_server_states(&status.marked);
                if status.active {
                    PollOutcome::Pending
                } else {
                    PollOutcome::Finished(status.message)
                }
            }
            Err(err) => PollOutcome::Failed(err),
        }
    }

    /// Runs the polling loop. Returns once the session has left the
    /// active phase; the controller is back at idle on every exit path,
    /// and no further requests are issued afterwards.
    ///
    /// A transport failure ends the loop instead of retrying forever, so
    /// an unreachable server cannot leave an orphaned poller behind.
    pub async fn run(
        &self,
        api: &ApiClient,
        controller: &mut SessionController,
        roster: &mut Roster,
        notices: &Notices,
        shutdown: &mut watch::Receiver<bool>,
    ) {
        let Some(lesson_id) = controller.lesson_id() else {
            return;
        };
        if !controller.is_active() {
            return;
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match Self::poll_once(api, lesson_id, roster).await {
                        PollOutcome::Pending => {}
                        PollOutcome::Finished(message) => {
                            log::info!("recognition session for lesson {} ended", lesson_id);
                            controller.finish();
                            notices.info(
                                message.unwrap_or_else(|| "Recognition session ended.".to_string()),
                            );
                            return;
                        }
                        PollOutcome::Failed(err) => {
                            log::warn!(
                                "status poll for lesson {} failed, stopping: {}",
                                lesson_id,
                                err
                            );
                            controller.finish();
                            notices.error(err.error);
                            return;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    // A dropped sender means the embedder is gone; treat
                    // it the same as an explicit shutdown.
                    match changed {
                        Ok(()) => log::debug!("status polling for lesson {} shut down", lesson_id),
                        Err(_) => log::debug!(
                            "shutdown handle for lesson {} dropped, stopping polls",
                            lesson_id
                        ),
                    }
                    return;
                }
            }
        }
    }
}
