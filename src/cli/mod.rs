//! CLI command implementations for fuelwatch.
//!
//! Provides subcommand handlers for:
//! - `fuelwatch health`: probe the inference service
//! - `fuelwatch options`: list the selectable values per field
//! - `fuelwatch predict ...`: run one prediction for a full selection
//! - `fuelwatch view ...`: open the external visualization for a selection
//! - `fuelwatch model-info`: describe the remote model
//! - `fuelwatch diagnostics`: summarize the diagnostics log
//! - `fuelwatch config show|init|set|reset`: configuration management

use anyhow::Result;
use colored::Colorize;

use crate::analytics::logger::DiagnosticsLog;
use crate::analytics::reporter::{self, DiagnosticsSummary};
use crate::catalog::{self, CatalogResult};
use crate::config::{self, FuelwatchConfig};
use crate::form::{Field, FormSelection};
use crate::health::{HealthMonitor, ServiceHealth};
use crate::i18n::Language;
use crate::model::{self, ModelInfoResult};
use crate::prediction::controller::{PredictOutcome, Settlement};
use crate::prediction::{Label, PredictionSource};
use crate::service::client::HttpInferenceClient;
use crate::session::Session;

/// Output format for reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// fuelwatch health
// ---------------------------------------------------------------------------

/// Probe the inference service once and show the configuration in use.
pub fn run_health(cfg: &FuelwatchConfig) -> Result<()> {
    let language = cfg.general.language;
    let client = HttpInferenceClient::from_config(&cfg.service);
    let log = DiagnosticsLog::from_config(&cfg.logging);

    println!("{}", "fuelwatch Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let mut monitor = HealthMonitor::new();
    let status = monitor.probe(&client, &log);
    let detail = match (monitor.report(), monitor.error()) {
        (Some(report), _) => {
            let mut detail = format!("{} at {}", language.health_status(status), client.base_url());
            if let Some(records) = report.data_records {
                detail.push_str(&format!(", {records} records"));
            }
            if !report.model_loaded {
                detail.push_str(", model not loaded");
            }
            detail
        }
        (None, Some(error)) => format!("{}: {error}", language.health_status(status)),
        (None, None) => language.health_status(status).to_string(),
    };
    print_health_item("Inference service", status == ServiceHealth::Connected, &detail);

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.fuelwatch/config.toml found"
        } else {
            "not found (run `fuelwatch config init` to create)"
        },
    );
    print_health_item("External view", true, &cfg.external_view.url);

    match log.path() {
        Some(path) => {
            let entries = log.read_all().len();
            print_health_item(
                "Diagnostics log",
                true,
                &format!("{} ({entries} entries)", path.display()),
            );
        }
        None => print_health_item("Diagnostics log", false, "disabled"),
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// fuelwatch options
// ---------------------------------------------------------------------------

/// List the selectable values for each field.
pub fn run_options(cfg: &FuelwatchConfig, format: OutputFormat) -> Result<()> {
    let client = HttpInferenceClient::from_config(&cfg.service);
    let log = DiagnosticsLog::from_config(&cfg.logging);
    let result = catalog::load_catalog(&client, &log);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => print_options_table(&result, cfg.general.language),
    }

    Ok(())
}

fn print_options_table(result: &CatalogResult, language: Language) {
    println!("{}", "Selectable Values".bold().cyan());
    println!("{}", "=".repeat(50));
    if let Some(ref error) = result.error {
        warn(&format!("using default options: {error}"));
    }

    for field in Field::ALL {
        println!(
            "  {:<12} {}",
            language.field_label(field).bold(),
            result.catalog.values(field).join(", ")
        );
    }
}

// ---------------------------------------------------------------------------
// fuelwatch predict
// ---------------------------------------------------------------------------

/// Run one prediction for `form`. Incomplete forms are reported and nothing
/// is sent.
pub fn run_predict(cfg: &FuelwatchConfig, form: &FormSelection, format: OutputFormat) -> Result<()> {
    let language = cfg.general.language;
    let client = HttpInferenceClient::from_config(&cfg.service);
    let mut session = Session::start(client, cfg.clone());
    session.replace_form(form.clone());

    for field in session.off_catalog_fields() {
        warn(&format!(
            "{} '{}' is not among the known options",
            field,
            session.form().get(field)
        ));
    }

    match session.predict() {
        PredictOutcome::Ignored => {
            let missing: Vec<String> = session
                .form()
                .missing_fields()
                .into_iter()
                .map(|field| format!("--{}", cli_flag(field)))
                .collect();
            println!(
                "{}",
                format!("Incomplete selection, missing: {}", missing.join(" ")).yellow()
            );
        }
        PredictOutcome::Settled(settlement) | PredictOutcome::Superseded(settlement) => {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settlement)?),
                OutputFormat::Table => print_prediction(&settlement, language),
            }
        }
    }

    session.end();
    Ok(())
}

/// The `predict`/`view` flag naming a field.
fn cli_flag(field: Field) -> &'static str {
    match field {
        Field::Driver => "driver",
        Field::Vehicle => "vehicle",
        Field::Division => "division",
        Field::BillOfLading => "bl",
        Field::CargoType => "cargo",
        Field::Station => "station",
    }
}

fn print_prediction(settlement: &Settlement, language: Language) {
    let result = &settlement.result;

    if settlement.source == PredictionSource::Simulated {
        let reason = settlement.diagnostic.as_deref().unwrap_or("unknown");
        println!("{}", language.fallback_advisory(reason).yellow());
        println!();
    }

    let title = language.result_title(result.label);
    let title = match result.label {
        Label::Efficient => title.green().bold(),
        Label::Inefficient => title.red().bold(),
    };
    println!("{} {}", title, format!("({})", settlement.source).dimmed());
    println!(
        "  {}",
        result
            .result_description
            .as_deref()
            .unwrap_or_else(|| language.result_description(result.label))
    );
    println!();

    if let Some(probability) = result.probability_display() {
        println!("  {:<30} {}", language.probability_label().bold(), probability);
    }
    if let Some(confidence) = result.confidence {
        println!(
            "  {:<30} {:.1}%",
            language.confidence_label().bold(),
            confidence * 100.0
        );
    }
    let copy = language.page_copy();
    if let Some(scores) = result.scores {
        println!("  {:<30} {:.2}", copy.driver_score.bold(), scores.driver_score);
        println!("  {:<30} {:.2}", copy.vehicle_score.bold(), scores.vehicle_score);
        println!(
            "  {:<30} {:.2} km/L",
            copy.driver_avg_efficiency.bold(),
            scores.driver_avg_efficiency
        );
        println!(
            "  {:<30} {:.2} km/L",
            copy.vehicle_avg_efficiency.bold(),
            scores.vehicle_avg_efficiency
        );
    }

    if !result.feature_importance.is_empty() {
        println!();
        println!("{}", copy.importance.bold().cyan());
        let mut features: Vec<(&String, &f64)> = result.feature_importance.iter().collect();
        features.sort_by(|a, b| b.1.total_cmp(a.1));
        let max = features.first().map(|(_, v)| **v).unwrap_or(0.0);
        for (name, weight) in features {
            println!(
                "  {:<24} {:>6.3} {}",
                truncate(name, 24),
                weight,
                bar(*weight, max, 20)
            );
        }
    }

    if result.label == Label::Inefficient {
        println!();
        println!("{}", copy.recommendations.bold().cyan());
        for (title, text) in language.recommendations() {
            println!("  {} {}", format!("{title}:").bold(), text);
        }
    }
}

// ---------------------------------------------------------------------------
// fuelwatch view
// ---------------------------------------------------------------------------

/// Print, and unless `no_open` open, the external view URL for `form`.
pub fn run_view(cfg: &FuelwatchConfig, form: &FormSelection, no_open: bool) -> Result<()> {
    let mut cfg = cfg.clone();
    if no_open {
        cfg.external_view.open_browser = false;
    }

    let url = crate::view::external_view_url(&cfg.external_view.url, form)?;
    println!("{url}");
    if cfg.external_view.open_browser
        && let Err(e) = crate::view::open_in_browser(url.as_str())
    {
        warn(&e.to_string());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// fuelwatch model-info
// ---------------------------------------------------------------------------

pub fn run_model_info(cfg: &FuelwatchConfig, format: OutputFormat) -> Result<()> {
    let client = HttpInferenceClient::from_config(&cfg.service);
    let log = DiagnosticsLog::from_config(&cfg.logging);
    let result = model::load_model_info(&client, &log);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => print_model_info(&result),
    }
    Ok(())
}

fn print_model_info(result: &ModelInfoResult) {
    let info = &result.info;
    println!("{}", "Model Information".bold().cyan());
    println!("{}", "=".repeat(40));
    if !result.ok {
        warn("service unavailable, showing built-in description");
    }
    println!("  {} {}", "Algorithm:".bold(), info.algorithm);
    println!("  {} {}", "Precision:".bold(), info.precision);
    println!("  {} {}", "Features: ".bold(), info.features_count);
    if let Some(ref model_type) = info.model_type {
        println!("  {} {}", "Type:     ".bold(), model_type);
    }
    for variable in &info.variables_used {
        println!("    {} {}", "·".dimmed(), variable);
    }
}

// ---------------------------------------------------------------------------
// fuelwatch diagnostics
// ---------------------------------------------------------------------------

/// Summarize the diagnostics log.
pub fn run_diagnostics(cfg: &FuelwatchConfig, days: Option<u32>, format: OutputFormat) -> Result<()> {
    let log = DiagnosticsLog::from_config(&cfg.logging);
    let entries = log.read_since_days(days);

    if entries.is_empty() {
        println!(
            "{}",
            "No diagnostics yet. Run some predictions to collect data.".yellow()
        );
        return Ok(());
    }

    let summary = reporter::summarize(&entries, 10);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => print_diagnostics_table(&summary),
    }
    Ok(())
}

fn print_diagnostics_table(summary: &DiagnosticsSummary) {
    println!("{}", "fuelwatch Diagnostics".bold().cyan());
    println!("{}", "=".repeat(50));
    println!("  {} {}", "Events:     ".bold(), summary.total_events);
    println!(
        "  {} {} ({:.1}% simulated)",
        "Predictions:".bold(),
        summary.predictions,
        summary.simulated_pct()
    );
    println!();

    println!("  {:<12} {:<14} {:>6}", "Step", "Outcome", "Count");
    println!("  {}", "-".repeat(34));
    for (kind, outcomes) in &summary.by_kind {
        for (outcome, count) in outcomes {
            println!("  {:<12} {:<14} {:>6}", kind.to_string(), outcome, count);
        }
    }

    if !summary.recent_failures.is_empty() {
        println!();
        println!("{}", "Recent Failures".bold().cyan());
        for entry in &summary.recent_failures {
            println!(
                "  {} {:<10} {}",
                entry.timestamp.dimmed(),
                entry.kind.to_string(),
                entry.detail.as_deref().unwrap_or("").yellow()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// fuelwatch config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective fuelwatch Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.fuelwatch/config.toml", global_exists);
    print_source(".fuelwatch.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "FUELWATCH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.fuelwatch/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Interactive warning on stderr.
fn warn(message: &str) {
    eprintln!("{} {}", "[fuelwatch]".yellow(), message);
}

/// Horizontal bar of up to `width` cells proportional to `value / max`.
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let cells = ((value / max) * width as f64).round().clamp(0.0, width as f64) as usize;
    "█".repeat(cells)
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
