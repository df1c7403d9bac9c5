use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Diagnostic entry (JSONL)
// ---------------------------------------------------------------------------

/// Workflow step a diagnostic entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Session,
    Health,
    Catalog,
    Predict,
    ModelInfo,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Session => write!(f, "session"),
            Self::Health => write!(f, "health"),
            Self::Catalog => write!(f, "catalog"),
            Self::Predict => write!(f, "predict"),
            Self::ModelInfo => write!(f, "model_info"),
        }
    }
}

/// A single line in the diagnostics log (`~/.fuelwatch/diagnostics.jsonl`).
///
/// Records which path a workflow step took and why, never the prediction
/// result itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub timestamp: String,
    pub kind: EventKind,
    /// Path taken: `"remote"`, `"simulated"`, `"default"`, `"connected"`, ...
    pub outcome: String,
    /// Failure reason or other context.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

// ---------------------------------------------------------------------------
// Log handle
// ---------------------------------------------------------------------------

/// Handle to the diagnostics log. A handle without a path records nothing.
///
/// All writes are best-effort: I/O failures are swallowed so logging can
/// never break the workflow.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsLog {
    path: Option<PathBuf>,
}

impl DiagnosticsLog {
    /// Resolve the log location from `[logging]`.
    pub fn from_config(config: &LoggingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let path = if config.path.trim().is_empty() {
            default_log_path()
        } else {
            expand_home(config.path.trim())
        };
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one entry stamped with the current time.
    pub fn record(&self, kind: EventKind, outcome: &str, detail: Option<&str>) {
        let entry = DiagnosticEntry {
            timestamp: Utc::now().to_rfc3339(),
            kind,
            outcome: outcome.to_string(),
            detail: detail.map(str::to_string),
        };
        let _ = self.append(&entry);
    }

    /// Read every entry, skipping malformed lines.
    pub fn read_all(&self) -> Vec<DiagnosticEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<DiagnosticEntry>(&line).ok())
            .collect()
    }

    /// Entries from the last `days` days, or all entries when `None`.
    pub fn read_since_days(&self, days: Option<u32>) -> Vec<DiagnosticEntry> {
        let entries = self.read_all();

        let Some(days) = days else {
            return entries;
        };

        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339();
        entries
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect()
    }

    fn append(&self, entry: &DiagnosticEntry) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Default log location: `~/.fuelwatch/diagnostics.jsonl`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fuelwatch").join("diagnostics.jsonl"))
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
