use std::sync::{Arc, Mutex};

use crate::api::SessionCommandResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// One user-visible, non-blocking message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Queue of pending notices, shared between the protocol pieces and
/// whatever surface renders them.
///
/// Errors in this crate never escape as failures; they end up here. The
/// embedding UI drains the queue after each operation and shows each
/// notice independently, so a partial failure never hides a success.
#[derive(Clone, Default)]
pub struct Notices {
    inner: Arc<Mutex<Vec<Notice>>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    /// Surfaces every non-empty list of a start/stop command response.
    pub fn extend_from_command(&self, response: &SessionCommandResponse) {
        for message in &response.success {
            self.success(message.clone());
        }
        for message in &response.info {
            self.info(message.clone());
        }
        for message in &response.errors {
            self.error(message.clone());
        }
    }

    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn push(&self, level: NoticeLevel, message: String) {
        self.lock().push(Notice { level, message });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
