use std::sync::OnceLock;

/// Environment variable consulted when no base URL was set explicitly.
pub const ENV_API_BASE_URL: &str = "ROLLCALL_API_BASE_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

static API_BASE_URL: OnceLock<String> = OnceLock::new();

/// Resolves the API base URL once and caches it for the process lifetime.
///
/// Precedence: environment (`ROLLCALL_API_BASE_URL`) over the built-in
/// default. Callers that need a per-instance override should construct the
/// client with [`crate::ApiClient::new_with_base_url`] instead.
pub fn api_base_url() -> String {
    API_BASE_URL
        .get_or_init(|| resolve(std::env::var(ENV_API_BASE_URL).ok()))
        .clone()
}

fn resolve(env_value: Option<String>) -> String {
    env_value
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}
