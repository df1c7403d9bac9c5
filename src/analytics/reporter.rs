//! Aggregation over the diagnostics log for `fuelwatch diagnostics`.
//!
//! Reports how often each workflow step fell back to its degraded path and
//! the most recent failure reasons.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analytics::logger::{DiagnosticEntry, EventKind};

/// Outcomes that mean a step did not use the remote service.
const DEGRADED_OUTCOMES: [&str; 4] = ["simulated", "default", "disconnected", "builtin"];

/// Summary for `fuelwatch diagnostics`.
#[derive(Debug, Default, Serialize)]
pub struct DiagnosticsSummary {
    pub total_events: usize,
    /// Per step, per outcome counts.
    pub by_kind: BTreeMap<EventKind, BTreeMap<String, usize>>,
    pub predictions: usize,
    pub simulated_predictions: usize,
    /// Latest entries that carry a failure reason, newest first.
    pub recent_failures: Vec<DiagnosticEntry>,
}

impl DiagnosticsSummary {
    /// Share of predictions served by the simulator, 0.0 when there were none.
    pub fn simulated_pct(&self) -> f64 {
        if self.predictions == 0 {
            0.0
        } else {
            (self.simulated_predictions as f64 / self.predictions as f64) * 100.0
        }
    }
}

/// Aggregate entries, keeping at most `max_failures` recent failures.
pub fn summarize(entries: &[DiagnosticEntry], max_failures: usize) -> DiagnosticsSummary {
    let mut summary = DiagnosticsSummary {
        total_events: entries.len(),
        ..Default::default()
    };

    for entry in entries {
        *summary
            .by_kind
            .entry(entry.kind)
            .or_default()
            .entry(entry.outcome.clone())
            .or_insert(0) += 1;

        if entry.kind == EventKind::Predict {
            summary.predictions += 1;
            if entry.outcome == "simulated" {
                summary.simulated_predictions += 1;
            }
        }
    }

    summary.recent_failures = entries
        .iter()
        .rev()
        .filter(|e| is_degraded(e) && e.detail.is_some())
        .take(max_failures)
        .cloned()
        .collect();

    summary
}

fn is_degraded(entry: &DiagnosticEntry) -> bool {
    DEGRADED_OUTCOMES.contains(&entry.outcome.as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: EventKind, outcome: &str, detail: Option<&str>) -> DiagnosticEntry {
        DiagnosticEntry {
            timestamp: "2026-10-01T12:00:00+00:00".to_string(),
            kind,
            outcome: outcome.to_string(),
            detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn empty_log_summarizes_to_zero() {
        let summary = summarize(&[], 5);
        assert_eq!(summary.total_events, 0);
        assert_eq!(summary.simulated_pct(), 0.0);
        assert!(summary.recent_failures.is_empty());
    }

    #[test]
    fn counts_predict_fallbacks() {
        let entries = vec![
            entry(EventKind::Predict, "remote", None),
            entry(EventKind::Predict, "simulated", Some("status: db down")),
            entry(EventKind::Predict, "simulated", Some("transport failure: refused")),
            entry(EventKind::Predict, "remote", None),
            entry(EventKind::Health, "connected", None),
        ];
        let summary = summarize(&entries, 5);
        assert_eq!(summary.predictions, 4);
        assert_eq!(summary.simulated_predictions, 2);
        assert!((summary.simulated_pct() - 50.0).abs() < f64::EPSILON);
        assert_eq!(summary.by_kind[&EventKind::Predict]["remote"], 2);
        assert_eq!(summary.by_kind[&EventKind::Health]["connected"], 1);
    }

    #[test]
    fn recent_failures_are_newest_first_and_capped() {
        let entries = vec![
            entry(EventKind::Catalog, "default", Some("first")),
            entry(EventKind::Predict, "simulated", Some("second")),
            entry(EventKind::Predict, "remote", None),
            entry(EventKind::Health, "disconnected", Some("third")),
        ];
        let summary = summarize(&entries, 2);
        let details: Vec<_> = summary
            .recent_failures
            .iter()
            .map(|e| e.detail.as_deref().unwrap())
            .collect();
        assert_eq!(details, vec!["third", "second"]);
    }
}
