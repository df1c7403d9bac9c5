/// HTTP client for the inference service.
///
/// Synchronous `ureq` client bound to the configured base URL (default
/// `http://localhost:8000`). One request per call, no retries; timeouts
/// surface as [`ServiceError::Transport`] so they feed the same fallback path
/// as any other network failure.
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::catalog::DomainCatalog;
use crate::config::schema::ServiceConfig;
use crate::form::FormSelection;
use crate::model::ModelInfo;
use crate::prediction::PredictionResult;

use super::wire::{self, OptionsResponse, PredictRequest, PredictResponse};
use super::{HealthReport, InferenceService, RemoteOutcome, ServiceError};

/// Blocking client for the inference service's JSON API.
#[derive(Debug)]
pub struct HttpInferenceClient {
    base_url: String,
    request_base: String,
    timeout: Duration,
    health_timeout: Duration,
    agent: ureq::Agent,
}

impl HttpInferenceClient {
    /// Build a client from the resolved `[service]` config.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            &config.base_url,
            config.timeout(),
            config.health_timeout(),
        )
    }

    pub fn new(base_url: &str, timeout: Duration, health_timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            request_base: pin_ipv4_loopback(base_url),
            timeout,
            health_timeout,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Base URL without trailing slash, for display.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.request_base)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, timeout: Duration) -> Result<T, ServiceError> {
        let result = self.agent.get(&self.url(path)).timeout(timeout).call();
        read_json(result)
    }
}

impl InferenceService for HttpInferenceClient {
    fn health(&self) -> Result<HealthReport, ServiceError> {
        let body: Value = self.get_json("/health", self.health_timeout)?;
        Ok(wire::health_report_from_value(&body))
    }

    fn options(&self) -> Result<DomainCatalog, ServiceError> {
        let resp: OptionsResponse = self.get_json("/get_options", self.timeout)?;
        Ok(resp.into())
    }

    fn predict(&self, form: &FormSelection) -> RemoteOutcome {
        let result = self
            .agent
            .post(&self.url("/predict"))
            .timeout(self.timeout)
            .send_json(PredictRequest::from(form));

        read_json::<PredictResponse>(result)
            .and_then(PredictionResult::try_from)
            .into()
    }

    fn model_info(&self) -> Result<ModelInfo, ServiceError> {
        self.get_json("/model_info", self.timeout)
    }
}

/// Rewrite a `localhost` host to `127.0.0.1`, dropping any trailing slash.
///
/// "localhost" may resolve to ::1 first and stall when the service only binds
/// IPv4. Unparseable URLs are kept as given; requests against them fail as
/// transport errors.
fn pin_ipv4_loopback(base_url: &str) -> String {
    let Ok(mut url) = url::Url::parse(base_url.trim()) else {
        return base_url.trim().trim_end_matches('/').to_string();
    };
    if url.host_str() == Some("localhost") && url.set_host(Some("127.0.0.1")).is_err() {
        return base_url.trim().trim_end_matches('/').to_string();
    }
    url.as_str().trim_end_matches('/').to_string()
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// Classify a `ureq` result and parse a successful body.
fn read_json<T: DeserializeOwned>(
    result: Result<ureq::Response, ureq::Error>,
) -> Result<T, ServiceError> {
    let resp = match result {
        Ok(resp) => resp,
        Err(ureq::Error::Status(code, resp)) => {
            let status_text = resp.status_text().to_string();
            let body = resp.into_string().unwrap_or_default();
            return Err(ServiceError::Status {
                code,
                message: wire::status_message(code, &status_text, &body),
            });
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(ServiceError::Transport(transport.to_string()));
        }
    };

    let body = resp
        .into_string()
        .map_err(|e| ServiceError::Transport(format!("failed to read response body: {e}")))?;

    serde_json::from_str(&body).map_err(|e| ServiceError::Malformed(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
