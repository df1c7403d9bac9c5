/// Configuration schema and defaults for fuelwatch.
///
/// Sections: `[general]`, `[service]`, `[external_view]`, `[dashboard]` and
/// `[logging]`. Every field has a built-in default; config files only need
/// the values they change.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::i18n::Language;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Maps to `~/.fuelwatch/config.toml` and `.fuelwatch.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelwatchConfig {
    pub general: GeneralConfig,
    pub service: ServiceConfig,
    pub external_view: ExternalViewConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [general]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Language for workflow copy: `es` or `en`.
    pub language: Language,
}

// ---------------------------------------------------------------------------
// [service]
// ---------------------------------------------------------------------------

/// Where the inference service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Timeout for options, predict and model info requests (milliseconds).
    pub timeout_ms: u64,
    /// Timeout for the health probe (milliseconds).
    pub health_timeout_ms: u64,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 10_000,
            health_timeout_ms: 5_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [external_view]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalViewConfig {
    /// Base URL of the external visualization app.
    pub url: String,
    /// Open the URL in the system browser (otherwise only print it).
    pub open_browser: bool,
}

impl Default for ExternalViewConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8501".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Listen address for `fuelwatch serve`.
    pub addr: String,
    /// HTML file with the topological map served at `/map`. Empty disables it.
    pub map_path: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            map_path: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether diagnostics are appended to the JSONL log.
    pub enabled: bool,
    /// Log file path. `~` is expanded; empty means
    /// `~/.fuelwatch/diagnostics.jsonl`.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl FuelwatchConfig {
    /// Annotated default config written by `fuelwatch config init`.
    pub fn default_toml() -> String {
        r#"# fuelwatch configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (FUELWATCH_*)
#   2. Project config (.fuelwatch.toml in current directory)
#   3. User global config (~/.fuelwatch/config.toml)
#   4. Built-in defaults

[general]
language = "es"                       # es | en

[service]
base_url = "http://localhost:8000"
timeout_ms = 10000
health_timeout_ms = 5000

[external_view]
url = "http://localhost:8501"
open_browser = true

[dashboard]
addr = "127.0.0.1:9747"
map_path = ""                         # empty = no topological map

[logging]
enabled = true
path = ""                             # empty = ~/.fuelwatch/diagnostics.jsonl
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
