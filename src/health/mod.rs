//! Reachability/readiness of the inference service.
//!
//! One best-effort probe of `GET /health` per session. The resulting
//! [`ServiceHealth`] is for display only; predict calls never consult it.
use std::fmt;

use serde::Serialize;

use crate::analytics::logger::{DiagnosticsLog, EventKind};
use crate::service::{HealthReport, InferenceService, ServiceError};

/// Tri-state service indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceHealth {
    Connecting,
    Connected,
    Disconnected,
}

impl fmt::Display for ServiceHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Map a probe result onto the tri-state.
///
/// Connected only when the probe succeeded and reports a loaded model.
pub fn classify(probe: &Result<HealthReport, ServiceError>) -> ServiceHealth {
    match probe {
        Ok(report) if report.model_loaded => ServiceHealth::Connected,
        _ => ServiceHealth::Disconnected,
    }
}

/// Probe once and classify, recording the outcome.
pub fn check_health<S: InferenceService + ?Sized>(
    service: &S,
    log: &DiagnosticsLog,
) -> ServiceHealth {
    HealthMonitor::new().probe(service, log)
}

/// Holds the session's health state. Starts `Connecting` and settles exactly
/// once; later probes return the settled state without contacting the service.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    status: ServiceHealth,
    report: Option<HealthReport>,
    error: Option<String>,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self {
            status: ServiceHealth::Connecting,
            report: None,
            error: None,
        }
    }

    pub fn status(&self) -> ServiceHealth {
        self.status
    }

    /// Body of the successful probe, if any.
    pub fn report(&self) -> Option<&HealthReport> {
        self.report.as_ref()
    }

    /// Failure reason when the probe did not succeed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn probe<S: InferenceService + ?Sized>(
        &mut self,
        service: &S,
        log: &DiagnosticsLog,
    ) -> ServiceHealth {
        if self.status != ServiceHealth::Connecting {
            return self.status;
        }

        let probe = service.health();
        self.status = classify(&probe);

        match probe {
            Ok(report) => {
                let detail = (!report.model_loaded).then_some("model not loaded");
                log.record(EventKind::Health, &self.status.to_string(), detail);
                self.report = Some(report);
            }
            Err(error) => {
                let reason = error.to_string();
                log.record(EventKind::Health, &self.status.to_string(), Some(&reason));
                self.error = Some(reason);
            }
        }

        self.status
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
