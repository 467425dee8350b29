use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::api::types::ApiError;
use crate::{config, context::SessionContext};

/// Thin typed client over the school-MIS REST backend.
///
/// Endpoint methods live in [`super::marking`]; this type owns connection
/// plumbing: base URL resolution, the bearer header from the injected
/// [`SessionContext`], and response decoding.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
    context: SessionContext,
}

impl ApiClient {
    pub fn new(context: SessionContext) -> Self {
        Self {
            client: Client::new(),
            base_url: None,
            context,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>, context: SessionContext) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
            context,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(base) => base.clone(),
            None => config::api_base_url(),
        }
    }

    pub(crate) fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.context.access_token() {
            let value = format!("Bearer {}", token)
                .parse()
                .map_err(|_| ApiError::unknown("Invalid token format"))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Decodes a success body as `T`, or the backend's error envelope.
    /// Non-JSON error bodies degrade to a generic message carrying the
    /// HTTP status.
    pub(crate) async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::unknown(format!("Failed to parse response: {}", e)))
        } else {
            match response.json::<ApiError>().await {
                Ok(error) => Err(error),
                Err(_) => Err(ApiError::request_failed(format!(
                    "Request failed with status {}",
                    status
                ))),
            }
        }
    }
}
