/// Integration tests for the HTTP inference client and the fallback paths
/// built on it, run against an in-process `tiny_http` service.
mod support;

use std::time::Duration;

use fuelwatch::analytics::logger::DiagnosticsLog;
use fuelwatch::catalog::{self, DomainCatalog};
use fuelwatch::health::{self, ServiceHealth};
use fuelwatch::model;
use fuelwatch::prediction::controller::{PredictOutcome, PredictionController};
use fuelwatch::prediction::simulator::{FEATURE_WEIGHT_CEILINGS, INEFFICIENCY_THRESHOLD};
use fuelwatch::prediction::{Label, PredictionSource};
use fuelwatch::service::client::HttpInferenceClient;
use fuelwatch::service::{InferenceService, RemoteOutcome, ServiceError};

use support::{MockService, efficient_body, full_form, unreachable_url};

fn offline_client() -> HttpInferenceClient {
    HttpInferenceClient::new(
        &unreachable_url(),
        Duration::from_secs(1),
        Duration::from_secs(1),
    )
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[test]
fn health_connected_when_model_loaded() {
    let mock = MockService::routes(vec![(
        "/health",
        200,
        r#"{"status": "healthy", "model_loaded": true, "data_loaded": true, "data_records": 1200}"#
            .into(),
    )]);

    let status = health::check_health(&mock.client(), &DiagnosticsLog::disabled());
    assert_eq!(status, ServiceHealth::Connected);

    let report = mock.client().health().unwrap();
    assert_eq!(report.data_records, Some(1200));
}

#[test]
fn health_disconnected_when_model_not_loaded() {
    let mock = MockService::routes(vec![(
        "/health",
        200,
        r#"{"status": "healthy", "model_loaded": false}"#.into(),
    )]);
    let status = health::check_health(&mock.client(), &DiagnosticsLog::disabled());
    assert_eq!(status, ServiceHealth::Disconnected);
}

#[test]
fn health_disconnected_on_error_status() {
    let mock = MockService::routes(vec![("/health", 500, r#"{"message": "boom"}"#.into())]);
    let status = health::check_health(&mock.client(), &DiagnosticsLog::disabled());
    assert_eq!(status, ServiceHealth::Disconnected);
}

#[test]
fn health_disconnected_when_unreachable() {
    let status = health::check_health(&offline_client(), &DiagnosticsLog::disabled());
    assert_eq!(status, ServiceHealth::Disconnected);
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[test]
fn options_replace_catalog_on_success() {
    let body = serde_json::json!({
        "drivers": ["Maria Ruiz"],
        "vehicles": ["VEH010"],
        "divisions": ["Este"],
        "billsOfLading": ["BL010"],
        "cargoTypes": ["Diesel"],
        "stations": ["EST010"]
    });
    let mock = MockService::routes(vec![("/get_options", 200, body.to_string())]);

    let result = catalog::load_catalog(&mock.client(), &DiagnosticsLog::disabled());
    assert!(result.ok);
    assert_eq!(result.catalog.drivers, vec!["Maria Ruiz"]);
    assert_eq!(result.catalog.cargo_types, vec!["Diesel"]);
}

#[test]
fn options_error_status_falls_back_to_defaults() {
    let mock = MockService::routes(vec![("/get_options", 500, "{}".into())]);
    let result = catalog::load_catalog(&mock.client(), &DiagnosticsLog::disabled());
    assert!(!result.ok);
    assert!(result.error.is_some());
    assert_eq!(result.catalog, DomainCatalog::default_catalog());
}

#[test]
fn options_missing_list_falls_back_to_defaults() {
    let mock = MockService::routes(vec![(
        "/get_options",
        200,
        r#"{"drivers": ["Maria Ruiz"]}"#.into(),
    )]);
    let result = catalog::load_catalog(&mock.client(), &DiagnosticsLog::disabled());
    assert!(!result.ok);
    assert_eq!(result.catalog, DomainCatalog::default_catalog());
}

// ---------------------------------------------------------------------------
// Predict
// ---------------------------------------------------------------------------

#[test]
fn predict_sends_wire_names_and_keeps_result_verbatim() {
    let mock = MockService::routes(vec![("/predict", 200, efficient_body())]);
    let controller = PredictionController::new(mock.client(), DiagnosticsLog::disabled());

    let outcome = controller.predict(&full_form());
    let settlement = outcome.settlement().unwrap();
    assert_eq!(settlement.source, PredictionSource::Remote);
    assert!(settlement.diagnostic.is_none());

    let result = &settlement.result;
    assert_eq!(result.label, Label::Efficient);
    assert_eq!(result.probability, Some(0.18));
    assert_eq!(result.probability_display().as_deref(), Some("18.0%"));
    assert_eq!(result.confidence, Some(0.82));
    assert_eq!(result.feature_importance["Score del conductor"], 0.31);
    assert_eq!(result.scores.unwrap().driver_avg_efficiency, 3.4);

    let sent = mock.requests_to("/predict");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "POST");
    let body: serde_json::Value = serde_json::from_str(&sent[0].body).unwrap();
    assert_eq!(body["conductor"], "Juan Perez");
    assert_eq!(body["vehiculo"], "VEH001");
    assert_eq!(body["bl"], "BL001");
    assert_eq!(body["mercancia"], "Petroleo");
    assert_eq!(body["estacion"], "EST001");
}

#[test]
fn predict_error_message_becomes_diagnostic() {
    let mock = MockService::routes(vec![("/predict", 500, r#"{"message": "db down"}"#.into())]);
    let controller = PredictionController::new(mock.client(), DiagnosticsLog::disabled());

    let PredictOutcome::Settled(settlement) = controller.predict(&full_form()) else {
        panic!("expected a settled prediction");
    };
    assert_eq!(settlement.source, PredictionSource::Simulated);
    assert!(settlement.diagnostic.unwrap().contains("db down"));
}

#[test]
fn predict_status_without_message_uses_status_line() {
    let mock = MockService::routes(vec![("/predict", 503, "upstream offline".into())]);

    let RemoteOutcome::Failure(error) = mock.client().predict(&full_form()) else {
        panic!("expected a failure");
    };
    assert_eq!(
        error,
        ServiceError::Status {
            code: 503,
            message: "Error 503: Service Unavailable".into(),
        }
    );
}

#[test]
fn predict_malformed_body_falls_back() {
    let mock = MockService::routes(vec![("/predict", 200, r#"{"prediction": 7}"#.into())]);
    let controller = PredictionController::new(mock.client(), DiagnosticsLog::disabled());

    let settlement = controller.predict(&full_form()).settlement().cloned().unwrap();
    assert_eq!(settlement.source, PredictionSource::Simulated);
}

#[test]
fn unreachable_service_yields_well_formed_simulation() {
    let controller = PredictionController::new(offline_client(), DiagnosticsLog::disabled());

    let settlement = controller.predict(&full_form()).settlement().cloned().unwrap();
    assert_eq!(settlement.source, PredictionSource::Simulated);
    assert!(settlement.diagnostic.is_some());

    let result = settlement.result;
    let probability = result.probability.unwrap();
    assert!((0.0..=1.0).contains(&probability));
    let confidence = result.confidence.unwrap();
    assert!((0.85..=0.95).contains(&confidence));
    assert_eq!(result.feature_importance.len(), FEATURE_WEIGHT_CEILINGS.len());
    for (name, ceiling) in FEATURE_WEIGHT_CEILINGS {
        let weight = result.feature_importance[name];
        assert!((0.0..=ceiling).contains(&weight), "{name} = {weight}");
    }
    assert_eq!(
        result.label == Label::Inefficient,
        probability <= INEFFICIENCY_THRESHOLD
    );
}

#[test]
fn slow_service_times_out_into_simulation() {
    let mock = MockService::start(|_| {
        std::thread::sleep(Duration::from_millis(800));
        (200, efficient_body())
    });
    let client = HttpInferenceClient::new(
        mock.base_url(),
        Duration::from_millis(150),
        Duration::from_millis(150),
    );
    let controller = PredictionController::new(client, DiagnosticsLog::disabled());

    let settlement = controller.predict(&full_form()).settlement().cloned().unwrap();
    assert_eq!(settlement.source, PredictionSource::Simulated);
}

// ---------------------------------------------------------------------------
// Model info
// ---------------------------------------------------------------------------

#[test]
fn model_info_from_service() {
    let body = r#"{"algorithm": "Gradient Boosting", "precision": "91%", "features_count": 8}"#;
    let mock = MockService::routes(vec![("/model_info", 200, body.into())]);
    let result = model::load_model_info(&mock.client(), &DiagnosticsLog::disabled());
    assert!(result.ok);
    assert_eq!(result.info.algorithm, "Gradient Boosting");
}

#[test]
fn model_info_falls_back_to_builtin() {
    let result = model::load_model_info(&offline_client(), &DiagnosticsLog::disabled());
    assert!(!result.ok);
    assert_eq!(result.info, model::ModelInfo::builtin());
}
