/// Prediction request orchestration.
///
/// ```text
/// Idle ──predict(valid form)──▶ Requesting{token} ──▶ Settled{Remote}
///   ▲                                               └─▶ Settled{Simulated}
///   └── predict(invalid form): no-op, stays put
/// ```
///
/// Every valid predict issues one remote request. Any failure (transport,
/// non-success status, malformed body) is turned into a simulated result plus
/// a diagnostic, so a valid predict always settles.
///
/// The controller is `Sync` and may be called while a previous request is
/// still in flight. Each call takes a new token; only the settlement holding
/// the latest token updates the displayed result. Older settlements are
/// handed back to their caller as [`PredictOutcome::Superseded`].
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::analytics::logger::{DiagnosticsLog, EventKind};
use crate::form::FormSelection;
use crate::service::{InferenceService, RemoteOutcome};

use super::{PredictionResult, PredictionSource, simulator};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Where the controller is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum ControllerState {
    Idle,
    Requesting { token: u64 },
    Settled { token: u64, source: PredictionSource },
}

/// A settled predict invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    pub token: u64,
    pub source: PredictionSource,
    pub result: PredictionResult,
    /// Why the remote call failed, when the result is simulated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

/// What a single `predict` call did.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    /// The form was incomplete; nothing was sent and no state changed.
    Ignored,
    /// Settled and now the displayed result.
    Settled(Settlement),
    /// Settled, but a newer request was issued meanwhile; not displayed.
    Superseded(Settlement),
}

impl PredictOutcome {
    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            Self::Ignored => None,
            Self::Settled(s) | Self::Superseded(s) => Some(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct PredictionController<S> {
    service: S,
    log: DiagnosticsLog,
    inner: Mutex<Inner>,
}

struct Inner {
    latest_token: u64,
    state: ControllerState,
    displayed: Option<Settlement>,
}

impl<S: InferenceService> PredictionController<S> {
    pub fn new(service: S, log: DiagnosticsLog) -> Self {
        Self {
            service,
            log,
            inner: Mutex::new(Inner {
                latest_token: 0,
                state: ControllerState::Idle,
                displayed: None,
            }),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.lock().state
    }

    /// The currently displayed settlement, if any.
    pub fn current(&self) -> Option<Settlement> {
        self.lock().displayed.clone()
    }

    /// Run one predict cycle for `form`.
    pub fn predict(&self, form: &FormSelection) -> PredictOutcome {
        if !form.is_valid() {
            return PredictOutcome::Ignored;
        }

        let token = {
            let mut inner = self.lock();
            let token = inner.latest_token + 1;
            inner.latest_token = token;
            inner.state = ControllerState::Requesting { token };
            token
        };

        let settlement = match self.service.predict(form) {
            RemoteOutcome::Success(result) => {
                self.log.record(EventKind::Predict, "remote", None);
                Settlement {
                    token,
                    source: PredictionSource::Remote,
                    result,
                    diagnostic: None,
                }
            }
            RemoteOutcome::Failure(error) => {
                let reason = error.to_string();
                self.log.record(
                    EventKind::Predict,
                    "simulated",
                    Some(&format!("{}: {reason}", error.kind())),
                );
                Settlement {
                    token,
                    source: PredictionSource::Simulated,
                    result: simulator::simulate(),
                    diagnostic: Some(reason),
                }
            }
        };

        let mut inner = self.lock();
        if inner.latest_token != token {
            return PredictOutcome::Superseded(settlement);
        }
        inner.state = ControllerState::Settled {
            token,
            source: settlement.source,
        };
        inner.displayed = Some(settlement.clone());
        PredictOutcome::Settled(settlement)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
