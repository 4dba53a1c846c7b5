//! HTTP client for the generation backend.
//!
//! Every call is a single POST with no retry. The request timeout comes from
//! [`crate::config::get_timeout`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::GenerationError;

use super::endpoint::{EndpointKind, Payload};

/// Anything that can turn a payload into generated text.
///
/// This abstraction allows mocking the backend in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        endpoint: EndpointKind,
        payload: Payload,
    ) -> Result<String, GenerationError>;
}

/// [`Generator`] talking JSON over HTTP to the backend deployment.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpGenerator {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    fn endpoint_url(&self, endpoint: EndpointKind) -> Result<Url, GenerationError> {
        self.base_url
            .join(endpoint.path())
            .map_err(|e| GenerationError::InvalidUrl {
                endpoint,
                detail: e.to_string(),
            })
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(
        &self,
        endpoint: EndpointKind,
        payload: Payload,
    ) -> Result<String, GenerationError> {
        let url = self.endpoint_url(endpoint)?;
        debug!("POST {} ({} payload bytes)", url, payload.byte_len());

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                endpoint,
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let text = extract_field(endpoint, &body)?;
        debug!("{} generated ({} chars)", endpoint, text.len());
        Ok(text)
    }
}

impl HttpGenerator {
    fn transport_error(&self, endpoint: EndpointKind, error: reqwest::Error) -> GenerationError {
        if error.is_timeout() {
            GenerationError::Timeout {
                endpoint,
                secs: self.timeout.as_secs(),
            }
        } else if error.is_decode() {
            GenerationError::InvalidResponse {
                endpoint,
                detail: error.to_string(),
            }
        } else {
            GenerationError::Request {
                endpoint,
                source: error,
            }
        }
    }
}

/// Pull the endpoint's output field out of a response body.
pub fn extract_field(endpoint: EndpointKind, body: &Value) -> Result<String, GenerationError> {
    let field = endpoint.response_field();
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(GenerationError::MissingField { endpoint, field })
}
