/// Integration tests for the prediction workflow as a whole: session startup,
/// form gating, overlapping predicts and the diagnostics trail.
mod support;

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use fuelwatch::analytics::logger::{DiagnosticsLog, EventKind};
use fuelwatch::analytics::reporter;
use fuelwatch::catalog::DomainCatalog;
use fuelwatch::config::FuelwatchConfig;
use fuelwatch::form::{Field, FormSelection};
use fuelwatch::health::ServiceHealth;
use fuelwatch::model::ModelInfo;
use fuelwatch::prediction::controller::{ControllerState, PredictOutcome, PredictionController};
use fuelwatch::prediction::{Label, PredictionResult, PredictionSource};
use fuelwatch::service::{HealthReport, InferenceService, RemoteOutcome, ServiceError};
use fuelwatch::session::Session;

use support::{MockService, efficient_body, full_form, unreachable_url};

fn config_for(base_url: &str) -> FuelwatchConfig {
    let mut config = FuelwatchConfig::default();
    config.service.base_url = base_url.to_string();
    config.service.timeout_ms = 2_000;
    config.service.health_timeout_ms = 2_000;
    config
}

fn temp_log(name: &str) -> DiagnosticsLog {
    let path = std::env::temp_dir().join(format!(
        "fuelwatch-workflow-{name}-{}.jsonl",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    DiagnosticsLog::at(path)
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[test]
fn session_start_probes_health_and_loads_catalog() {
    let options = serde_json::json!({
        "drivers": ["Maria Ruiz"],
        "vehicles": ["VEH010"],
        "divisions": ["Este"],
        "billsOfLading": ["BL010"],
        "cargoTypes": ["Diesel"],
        "stations": ["EST010"]
    });
    let mock = MockService::routes(vec![
        ("/health", 200, r#"{"model_loaded": true}"#.into()),
        ("/get_options", 200, options.to_string()),
        ("/predict", 200, efficient_body()),
    ]);

    let mut session = Session::start_with_log(
        mock.client(),
        config_for(mock.base_url()),
        DiagnosticsLog::disabled(),
    );
    assert_eq!(session.health(), ServiceHealth::Connected);
    assert!(session.catalog().ok);
    assert_eq!(session.catalog().catalog.stations, vec!["EST010"]);

    session.set_field(Field::Driver, "Maria Ruiz");
    session.set_field(Field::Vehicle, "VEH010");
    session.set_field(Field::Division, "Este");
    session.set_field(Field::BillOfLading, "BL010");
    session.set_field(Field::CargoType, "Diesel");
    session.set_field(Field::Station, "EST010");
    assert!(session.off_catalog_fields().is_empty());

    let outcome = session.predict();
    assert_eq!(outcome.settlement().unwrap().source, PredictionSource::Remote);
    session.end();

    assert_eq!(mock.requests_to("/health").len(), 1);
    assert_eq!(mock.requests_to("/get_options").len(), 1);
}

#[test]
fn session_against_unreachable_service_still_works() {
    let url = unreachable_url();
    let mut session = Session::start_with_log(
        support_client(&url),
        config_for(&url),
        DiagnosticsLog::disabled(),
    );
    assert_eq!(session.health(), ServiceHealth::Disconnected);
    assert_eq!(session.catalog().catalog, DomainCatalog::default_catalog());

    session.replace_form(full_form());
    let settlement = session.predict().settlement().cloned().unwrap();
    assert_eq!(settlement.source, PredictionSource::Simulated);
    assert_eq!(session.current_prediction(), Some(settlement));
}

fn support_client(url: &str) -> fuelwatch::service::client::HttpInferenceClient {
    fuelwatch::service::client::HttpInferenceClient::new(
        url,
        Duration::from_secs(1),
        Duration::from_secs(1),
    )
}

// ---------------------------------------------------------------------------
// Form gating
// ---------------------------------------------------------------------------

#[test]
fn incomplete_forms_never_reach_the_service() {
    let mock = MockService::routes(vec![("/predict", 200, efficient_body())]);
    let controller = PredictionController::new(mock.client(), DiagnosticsLog::disabled());

    let mut form = FormSelection::new();
    assert_eq!(controller.predict(&form), PredictOutcome::Ignored);

    for field in Field::ALL.into_iter().take(5) {
        form.set_field(field, "x");
        assert_eq!(controller.predict(&form), PredictOutcome::Ignored);
    }

    assert!(mock.requests_to("/predict").is_empty());
    assert_eq!(controller.state(), ControllerState::Idle);
    assert!(controller.current().is_none());

    form.set_field(Field::Station, "x");
    assert!(matches!(controller.predict(&form), PredictOutcome::Settled(_)));
    assert_eq!(mock.requests_to("/predict").len(), 1);
}

// ---------------------------------------------------------------------------
// Overlapping predicts
// ---------------------------------------------------------------------------

/// Holds back the request for driver "slow" until released; every other
/// request answers immediately.
struct GatedService {
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl InferenceService for GatedService {
    fn health(&self) -> Result<HealthReport, ServiceError> {
        Ok(HealthReport::default())
    }

    fn options(&self) -> Result<DomainCatalog, ServiceError> {
        Ok(DomainCatalog::default_catalog())
    }

    fn predict(&self, form: &FormSelection) -> RemoteOutcome {
        let label = if form.driver == "slow" {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            Label::Inefficient
        } else {
            Label::Efficient
        };
        RemoteOutcome::Success(PredictionResult {
            label,
            probability: Some(0.5),
            probability_percentage: None,
            confidence: Some(0.9),
            feature_importance: Default::default(),
            scores: None,
            result_text: None,
            result_description: None,
        })
    }

    fn model_info(&self) -> Result<ModelInfo, ServiceError> {
        Ok(ModelInfo::builtin())
    }
}

#[test]
fn late_settlement_of_older_request_is_not_displayed() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let controller = PredictionController::new(
        GatedService {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        },
        DiagnosticsLog::disabled(),
    );

    let mut slow = full_form();
    slow.set_field(Field::Driver, "slow");
    let fast = full_form();

    thread::scope(|scope| {
        let first = scope.spawn(|| controller.predict(&slow));

        entered_rx.recv().unwrap();
        assert_eq!(controller.state(), ControllerState::Requesting { token: 1 });

        let second = controller.predict(&fast);
        let PredictOutcome::Settled(displayed) = second else {
            panic!("newest request should settle and display");
        };
        assert_eq!(displayed.token, 2);
        assert_eq!(displayed.result.label, Label::Efficient);

        release_tx.send(()).unwrap();
        let PredictOutcome::Superseded(stale) = first.join().unwrap() else {
            panic!("older request should be superseded");
        };
        assert_eq!(stale.token, 1);
        assert_eq!(stale.result.label, Label::Inefficient);
    });

    let current = controller.current().unwrap();
    assert_eq!(current.token, 2);
    assert_eq!(current.result.label, Label::Efficient);
    assert_eq!(
        controller.state(),
        ControllerState::Settled {
            token: 2,
            source: PredictionSource::Remote
        }
    );
}

// ---------------------------------------------------------------------------
// Diagnostics trail
// ---------------------------------------------------------------------------

#[test]
fn diagnostics_record_paths_but_not_results() {
    let mock = MockService::routes(vec![
        ("/health", 200, r#"{"model_loaded": true}"#.into()),
        ("/predict", 500, r#"{"message": "db down"}"#.into()),
    ]);
    let log = temp_log("trail");

    let mut session = Session::start_with_log(mock.client(), config_for(mock.base_url()), log.clone());
    session.replace_form(full_form());
    session.predict();
    session.end();

    let entries = log.read_all();
    let kinds: Vec<(EventKind, &str)> = entries
        .iter()
        .map(|e| (e.kind, e.outcome.as_str()))
        .collect();
    assert!(kinds.contains(&(EventKind::Session, "start")));
    assert!(kinds.contains(&(EventKind::Health, "connected")));
    assert!(kinds.contains(&(EventKind::Catalog, "default")));
    assert!(kinds.contains(&(EventKind::Predict, "simulated")));
    assert_eq!(kinds.last(), Some(&(EventKind::Session, "end")));

    let predict = entries
        .iter()
        .find(|e| e.kind == EventKind::Predict)
        .unwrap();
    assert!(predict.detail.as_deref().unwrap().contains("db down"));

    let raw = std::fs::read_to_string(log.path().unwrap()).unwrap();
    assert!(!raw.contains("feature_importance"));
    assert!(!raw.contains("probability"));

    let summary = reporter::summarize(&entries, 5);
    assert_eq!(summary.predictions, 1);
    assert_eq!(summary.simulated_pct(), 100.0);

    let _ = std::fs::remove_file(log.path().unwrap());
}
