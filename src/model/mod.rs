//! Descriptive information about the remote model.
//!
//! Fetched from `GET /model_info`; the built-in description is shown when the
//! service cannot provide one.
use serde::{Deserialize, Serialize};

use crate::analytics::logger::{DiagnosticsLog, EventKind};
use crate::service::InferenceService;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub algorithm: String,
    /// Reported accuracy, pre-formatted (e.g. `"89%"`).
    pub precision: String,
    pub features_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(default)]
    pub variables_used: Vec<String>,
    #[serde(default)]
    pub has_feature_importance: bool,
    #[serde(default)]
    pub has_probability: bool,
}

impl ModelInfo {
    /// Description of the published model, used when the service is down.
    pub fn builtin() -> Self {
        Self {
            algorithm: "Random Forest + TDA".to_string(),
            precision: "89%".to_string(),
            features_count: 8,
            model_type: None,
            variables_used: [
                "Driver score",
                "Vehicle score",
                "Driver average efficiency",
                "Vehicle average efficiency",
                "Division",
                "BL",
                "Cargo",
                "Station",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            has_feature_importance: true,
            has_probability: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfoResult {
    pub ok: bool,
    pub info: ModelInfo,
}

/// Fetch model info, substituting [`ModelInfo::builtin`] on failure.
pub fn load_model_info<S: InferenceService + ?Sized>(
    service: &S,
    log: &DiagnosticsLog,
) -> ModelInfoResult {
    match service.model_info() {
        Ok(info) => {
            log.record(EventKind::ModelInfo, "remote", None);
            ModelInfoResult { ok: true, info }
        }
        Err(error) => {
            log.record(EventKind::ModelInfo, "builtin", Some(&error.to_string()));
            ModelInfoResult {
                ok: false,
                info: ModelInfo::builtin(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lists_every_variable() {
        let info = ModelInfo::builtin();
        assert_eq!(info.variables_used.len(), info.features_count as usize);
    }

    #[test]
    fn deserializes_service_payload() {
        let body = r#"{
            "algorithm": "Random Forest + TDA",
            "precision": "89%",
            "features_count": 8,
            "model_type": "Pipeline",
            "variables_used": ["Score del conductor"],
            "has_probability": true
        }"#;
        let info: ModelInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.model_type.as_deref(), Some("Pipeline"));
        assert!(info.has_probability);
        assert!(!info.has_feature_importance);
    }
}
