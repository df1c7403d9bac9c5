//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns an [`ApiReply`]
//! (status code plus JSON body) that the router turns into a response.

use std::path::Path;

use serde::Serialize;
use serde_json::{Value, json};

use crate::form::{Field, FormSelection};
use crate::i18n::Language;
use crate::prediction::controller::{PredictOutcome, Settlement};
use crate::prediction::{Label, PredictionResult, PredictionSource};
use crate::service::InferenceService;
use crate::session::Session;

/// Status code and JSON body for one API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

impl ApiReply {
    fn ok<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(500, &format!("failed to serialize JSON response: {e}")),
        }
    }

    pub(crate) fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse<'a> {
    status: String,
    status_text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a crate::service::HealthReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct Recommendation {
    title: &'static str,
    text: &'static str,
}

/// A settled prediction with the localized copy the page displays.
#[derive(Serialize)]
struct PredictResponse<'a> {
    token: u64,
    /// False when a newer request settled first.
    displayed: bool,
    source: PredictionSource,
    result: &'a PredictionResult,
    title: &'static str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    advisory: Option<String>,
    recommendations: Vec<Recommendation>,
}

impl<'a> PredictResponse<'a> {
    fn new(settlement: &'a Settlement, displayed: bool, language: Language) -> Self {
        let result = &settlement.result;
        let advisory = match settlement.source {
            PredictionSource::Simulated => Some(
                language.fallback_advisory(settlement.diagnostic.as_deref().unwrap_or("unknown")),
            ),
            PredictionSource::Remote => None,
        };
        let recommendations = if result.label == Label::Inefficient {
            language
                .recommendations()
                .into_iter()
                .map(|(title, text)| Recommendation { title, text })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            token: settlement.token,
            displayed,
            source: settlement.source,
            result,
            title: language.result_title(result.label),
            description: result
                .result_description
                .as_deref()
                .unwrap_or_else(|| language.result_description(result.label)),
            advisory,
            recommendations,
        }
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/health`: the session's probe result.
pub fn get_health<S: InferenceService>(session: &Session<S>) -> ApiReply {
    let monitor = session.health_monitor();
    let language = session.config().general.language;
    ApiReply::ok(&HealthResponse {
        status: monitor.status().to_string(),
        status_text: language.health_status(monitor.status()),
        report: monitor.report(),
        error: monitor.error(),
    })
}

/// `GET /api/options`: the catalog (remote or default), field labels, the
/// page copy for the configured language and whether `/map` has a document.
pub fn get_options<S: InferenceService>(session: &Session<S>) -> ApiReply {
    let language = session.config().general.language;
    let map_path = &session.config().dashboard.map_path;
    let has_map = !map_path.is_empty() && Path::new(map_path).is_file();
    let catalog = session.catalog();
    let fields: Vec<Value> = Field::ALL
        .iter()
        .map(|&field| {
            json!({
                "name": field.name(),
                "label": language.field_label(field),
                "values": catalog.catalog.values(field),
            })
        })
        .collect();

    ApiReply::ok(&json!({
        "ok": catalog.ok,
        "error": catalog.error,
        "catalog": catalog.catalog,
        "fields": fields,
        "copy": language.page_copy(),
        "map": has_map,
    }))
}

/// `POST /api/predict`: body is a form selection. Incomplete forms are
/// rejected with 422 and the list of missing fields; nothing is sent.
pub fn post_predict<S: InferenceService>(session: &mut Session<S>, body: &str) -> ApiReply {
    let form = match parse_form(body) {
        Ok(form) => form,
        Err(reply) => return reply,
    };
    session.replace_form(form);

    let language = session.config().general.language;
    match session.predict() {
        PredictOutcome::Ignored => {
            let missing: Vec<&str> = session
                .form()
                .missing_fields()
                .into_iter()
                .map(Field::name)
                .collect();
            ApiReply {
                status: 422,
                body: json!({ "error": "incomplete form", "missing": missing }),
            }
        }
        PredictOutcome::Settled(settlement) => {
            ApiReply::ok(&PredictResponse::new(&settlement, true, language))
        }
        PredictOutcome::Superseded(settlement) => {
            ApiReply::ok(&PredictResponse::new(&settlement, false, language))
        }
    }
}

/// `GET /api/model-info`: remote model description or the built-in one.
pub fn get_model_info<S: InferenceService>(session: &Session<S>) -> ApiReply {
    ApiReply::ok(&session.model_info())
}

/// `POST /api/view-url`: external visualization URL for a selection.
pub fn post_view_url<S: InferenceService>(session: &mut Session<S>, body: &str) -> ApiReply {
    let form = match parse_form(body) {
        Ok(form) => form,
        Err(reply) => return reply,
    };
    session.replace_form(form);

    match session.external_view_url() {
        Ok(url) => ApiReply::ok(&json!({ "url": url.as_str() })),
        Err(e) => ApiReply::error(500, &format!("{e:#}")),
    }
}

fn parse_form(body: &str) -> Result<FormSelection, ApiReply> {
    serde_json::from_str(body)
        .map_err(|e| ApiReply::error(400, &format!("invalid JSON in form body: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
