/// Boundary to the remote inference service.
///
/// The prediction workflow only talks to the service through the
/// [`InferenceService`] trait. [`client::HttpInferenceClient`] is the real
/// implementation; tests substitute in-process fakes.
///
/// Every failure is classified into one of three [`ServiceError`] variants.
/// None of them is fatal to the workflow: callers map each one onto their
/// documented fallback (disconnected health, default catalog, simulated
/// prediction, built-in model info).
use std::sync::Arc;

use crate::catalog::DomainCatalog;
use crate::form::FormSelection;
use crate::model::ModelInfo;
use crate::prediction::PredictionResult;

pub mod client;
pub mod wire;

// ---------------------------------------------------------------------------
// Errors and outcomes
// ---------------------------------------------------------------------------

/// Why a call to the inference service did not produce a usable response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// Network unreachable, refused connection, timeout, truncated body.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Non-success HTTP status. `message` is the body's `message` field when
    /// present, otherwise `Error <code>: <status text>`.
    #[error("{message}")]
    Status { code: u16, message: String },
    /// Body could not be parsed into the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// Short tag for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// Result of one remote prediction attempt.
///
/// Kept as its own two-branch type so the controller's fallback branch is an
/// explicit match arm.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    Success(PredictionResult),
    Failure(ServiceError),
}

impl From<Result<PredictionResult, ServiceError>> for RemoteOutcome {
    fn from(result: Result<PredictionResult, ServiceError>) -> Self {
        match result {
            Ok(prediction) => Self::Success(prediction),
            Err(error) => Self::Failure(error),
        }
    }
}

/// Parsed body of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct HealthReport {
    /// Truthiness of the service's `model_loaded` field.
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_loaded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_records: Option<u64>,
}

// ---------------------------------------------------------------------------
// Service trait
// ---------------------------------------------------------------------------

/// Operations the dashboard needs from the inference service.
///
/// Each method performs exactly one request and never retries.
pub trait InferenceService: Send + Sync {
    /// `GET /health`.
    fn health(&self) -> Result<HealthReport, ServiceError>;

    /// `GET /get_options`.
    fn options(&self) -> Result<DomainCatalog, ServiceError>;

    /// `POST /predict` with the full selection as payload.
    fn predict(&self, form: &FormSelection) -> RemoteOutcome;

    /// `GET /model_info`.
    fn model_info(&self) -> Result<ModelInfo, ServiceError>;
}

impl<T: InferenceService + ?Sized> InferenceService for Arc<T> {
    fn health(&self) -> Result<HealthReport, ServiceError> {
        (**self).health()
    }

    fn options(&self) -> Result<DomainCatalog, ServiceError> {
        (**self).options()
    }

    fn predict(&self, form: &FormSelection) -> RemoteOutcome {
        (**self).predict(form)
    }

    fn model_info(&self) -> Result<ModelInfo, ServiceError> {
        (**self).model_info()
    }
}
