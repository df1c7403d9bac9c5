//! JSON shapes exchanged with the inference service.
//!
//! The service speaks snake_case with Spanish field names (`conductor`,
//! `rend_cond_mean`, ...). Responses also accept camelCase/English aliases.
//! Everything here converts into the domain types at the module boundary.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::DomainCatalog;
use crate::form::FormSelection;
use crate::prediction::{Label, PredictionResult, Scores};

use super::{HealthReport, ServiceError};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body for `POST /predict`.
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub conductor: &'a str,
    pub vehiculo: &'a str,
    pub division: &'a str,
    pub bl: &'a str,
    pub mercancia: &'a str,
    pub estacion: &'a str,
}

impl<'a> From<&'a FormSelection> for PredictRequest<'a> {
    fn from(form: &'a FormSelection) -> Self {
        Self {
            conductor: &form.driver,
            vehiculo: &form.vehicle,
            division: &form.division,
            bl: &form.bill_of_lading,
            mercancia: &form.cargo_type,
            estacion: &form.station,
        }
    }
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Build a [`HealthReport`] from any JSON body.
///
/// A body that is not an object simply has no `model_loaded` field, which
/// reads as falsy.
pub fn health_report_from_value(body: &Value) -> HealthReport {
    let field = |snake: &str, camel: &str| body.get(snake).or_else(|| body.get(camel));

    HealthReport {
        model_loaded: field("model_loaded", "modelLoaded").is_some_and(is_truthy),
        status: body.get("status").and_then(Value::as_str).map(str::to_string),
        data_loaded: field("data_loaded", "dataLoaded").map(is_truthy),
        data_records: field("data_records", "dataRecords").and_then(Value::as_u64),
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ---------------------------------------------------------------------------
// GET /get_options
// ---------------------------------------------------------------------------

/// Body of `GET /get_options`. All six lists are required.
#[derive(Debug, Deserialize)]
pub struct OptionsResponse {
    #[serde(alias = "conductores")]
    pub drivers: Vec<String>,
    #[serde(alias = "vehiculos")]
    pub vehicles: Vec<String>,
    #[serde(alias = "divisiones")]
    pub divisions: Vec<String>,
    #[serde(rename = "billsOfLading", alias = "bills_of_lading", alias = "bls")]
    pub bills_of_lading: Vec<String>,
    #[serde(rename = "cargoTypes", alias = "cargo_types", alias = "mercancias")]
    pub cargo_types: Vec<String>,
    #[serde(alias = "estaciones")]
    pub stations: Vec<String>,
}

impl From<OptionsResponse> for DomainCatalog {
    fn from(resp: OptionsResponse) -> Self {
        Self {
            drivers: resp.drivers,
            vehicles: resp.vehicles,
            divisions: resp.divisions,
            bills_of_lading: resp.bills_of_lading,
            cargo_types: resp.cargo_types,
            stations: resp.stations,
        }
    }
}

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

/// Body of a successful `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    /// `1` = efficient, `0` = inefficient.
    pub prediction: i64,
    #[serde(default, alias = "resultText")]
    pub result_text: Option<String>,
    #[serde(default, alias = "resultDescription")]
    pub result_description: Option<String>,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default, alias = "probabilityPercentage")]
    pub probability_percentage: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default, alias = "featureImportance")]
    pub feature_importance: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub scores: Option<ScoresWire>,
}

/// Per-entity scores as the service names them.
#[derive(Debug, Deserialize)]
pub struct ScoresWire {
    #[serde(rename = "conductor_score", alias = "driverScore", alias = "driver_score")]
    pub driver_score: f64,
    #[serde(rename = "vehiculo_score", alias = "vehicleScore", alias = "vehicle_score")]
    pub vehicle_score: f64,
    #[serde(
        rename = "rend_cond_mean",
        alias = "driverAvgEfficiency",
        alias = "driver_avg_efficiency"
    )]
    pub driver_avg_efficiency: f64,
    #[serde(
        rename = "rend_veh_mean",
        alias = "vehicleAvgEfficiency",
        alias = "vehicle_avg_efficiency"
    )]
    pub vehicle_avg_efficiency: f64,
}

impl TryFrom<PredictResponse> for PredictionResult {
    type Error = ServiceError;

    /// Copies fields verbatim, rejecting values outside their documented domain.
    fn try_from(resp: PredictResponse) -> Result<Self, Self::Error> {
        let label = Label::from_code(resp.prediction).ok_or_else(|| {
            ServiceError::Malformed(format!("unexpected prediction value {}", resp.prediction))
        })?;

        check_unit_interval("probability", resp.probability)?;
        check_unit_interval("confidence", resp.confidence)?;

        let feature_importance = resp.feature_importance.unwrap_or_default();
        if let Some((name, weight)) = feature_importance
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ServiceError::Malformed(format!(
                "feature importance for {name} is {weight}"
            )));
        }

        Ok(PredictionResult {
            label,
            probability: resp.probability,
            probability_percentage: resp.probability_percentage,
            confidence: resp.confidence,
            feature_importance,
            scores: resp.scores.map(|s| Scores {
                driver_score: s.driver_score,
                vehicle_score: s.vehicle_score,
                driver_avg_efficiency: s.driver_avg_efficiency,
                vehicle_avg_efficiency: s.vehicle_avg_efficiency,
            }),
            result_text: resp.result_text,
            result_description: resp.result_description,
        })
    }
}

fn check_unit_interval(name: &str, value: Option<f64>) -> Result<(), ServiceError> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(ServiceError::Malformed(format!(
            "{name} {v} is outside [0, 1]"
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Error bodies
// ---------------------------------------------------------------------------

/// Diagnostic text for a non-success status.
///
/// Uses the body's `message` field when it is a non-empty string, otherwise
/// falls back to `Error <code>: <status text>`.
pub fn status_message(code: u16, status_text: &str, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Error {code}: {status_text}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
