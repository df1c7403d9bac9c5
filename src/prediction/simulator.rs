/// Local stand-in for the remote model.
///
/// Only used when the remote prediction fails. The output has the same shape
/// as a remote result but is not a calibrated model: the drawn score is both
/// the reported inefficiency probability and the input to the label
/// threshold.
///
/// | Output                          | Distribution            |
/// |---------------------------------|-------------------------|
/// | `probability` (score)           | uniform [0, 1)          |
/// | `label`                         | inefficient iff ≤ 0.6   |
/// | `confidence`                    | uniform [0.85, 0.95]    |
/// | `feature_importance[name]`      | uniform [0, ceiling)    |
use std::collections::BTreeMap;

use rand::Rng;

use super::{Label, PredictionResult};

/// Scores at or below this value are labelled inefficient.
pub const INEFFICIENCY_THRESHOLD: f64 = 0.6;

const CONFIDENCE_MIN: f64 = 0.85;
const CONFIDENCE_MAX: f64 = 0.95;

/// Feature names and the upper bound of their simulated weight.
pub const FEATURE_WEIGHT_CEILINGS: [(&str, f64); 5] = [
    ("driverScore", 0.3),
    ("vehicleScore", 0.25),
    ("divisionPerformance", 0.2),
    ("cargoType", 0.15),
    ("stationEfficiency", 0.1),
];

/// Label for a drawn efficiency score.
pub fn label_for_score(score: f64) -> Label {
    if score <= INEFFICIENCY_THRESHOLD {
        Label::Inefficient
    } else {
        Label::Efficient
    }
}

/// Simulate a prediction using the thread-local RNG.
pub fn simulate() -> PredictionResult {
    simulate_with(&mut rand::rng())
}

/// Simulate a prediction from the given RNG.
pub fn simulate_with<R: Rng>(rng: &mut R) -> PredictionResult {
    let score: f64 = rng.random();
    let confidence = rng.random_range(CONFIDENCE_MIN..=CONFIDENCE_MAX);

    let feature_importance: BTreeMap<String, f64> = FEATURE_WEIGHT_CEILINGS
        .iter()
        .map(|&(name, ceiling)| (name.to_string(), rng.random::<f64>() * ceiling))
        .collect();

    PredictionResult {
        label: label_for_score(score),
        probability: Some(score),
        probability_percentage: None,
        confidence: Some(confidence),
        feature_importance,
        scores: None,
        result_text: None,
        result_description: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
