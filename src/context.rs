//! Identity handed to the API client instead of ad-hoc storage reads.
//!
//! Whatever surface embeds this crate (a WASM shell, a desktop app, a
//! test) builds one `SessionContext` from wherever it keeps credentials
//! and injects it once. Components never reach into storage themselves.

/// Caller identity for authenticated requests.
///
/// `staff_regno` is set when the operator is a lecturer; the lesson check
/// then uses the lecturer-scoped variant so only their own lessons match.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    access_token: Option<String>,
    staff_regno: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_staff_regno(mut self, regno: impl Into<String>) -> Self {
        self.staff_regno = Some(regno.into());
        self
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn staff_regno(&self) -> Option<&str> {
        self.staff_regno.as_deref()
    }
}
