//! Prediction results and the workflow that produces them.
//!
//! A [`PredictionResult`] comes either verbatim from the remote service or
//! from the [`simulator`] when the service fails. [`PredictionSource`] travels
//! alongside every result so the two are never confused.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod controller;
pub mod simulator;

/// Binary efficiency classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Efficient,
    Inefficient,
}

impl Label {
    /// Map the service's class code: `1` = efficient, `0` = inefficient.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Efficient),
            0 => Some(Self::Inefficient),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Efficient => write!(f, "efficient"),
            Self::Inefficient => write!(f, "inefficient"),
        }
    }
}

/// Per-entity scores reported by the remote model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub driver_score: f64,
    pub vehicle_score: f64,
    /// Driver's historical average efficiency (km/L).
    pub driver_avg_efficiency: f64,
    /// Vehicle's historical average efficiency (km/L).
    pub vehicle_avg_efficiency: f64,
}

/// Outcome of one predict invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: Label,
    /// Probability of the inefficient class, in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    /// Pre-formatted probability from the service (e.g. `"18.0%"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_percentage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Non-negative weights; not required to sum to 1.
    #[serde(default)]
    pub feature_importance: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Scores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_description: Option<String>,
}

impl PredictionResult {
    /// Probability formatted for display, preferring the service's own string.
    pub fn probability_display(&self) -> Option<String> {
        self.probability_percentage
            .clone()
            .or_else(|| self.probability.map(|p| format!("{:.1}%", p * 100.0)))
    }
}

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    Remote,
    Simulated,
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Simulated => write!(f, "simulated"),
        }
    }
}
