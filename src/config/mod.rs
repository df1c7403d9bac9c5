/// Configuration system for fuelwatch.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** from [`schema::FuelwatchConfig::default()`]
/// 2. **User global config** at `~/.fuelwatch/config.toml`
/// 3. **Project local config** at `.fuelwatch.toml` in the current directory
/// 4. **Environment variables**: `FUELWATCH_*` overrides (highest precedence)
///
/// Layers are merged key by key: a file that only sets `service.base_url`
/// leaves every other value from the layer below untouched.
///
/// # Usage
///
/// ```rust,ignore
/// use fuelwatch::config;
///
/// let cfg = config::load();
/// let client = HttpInferenceClient::from_config(&cfg.service);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::i18n::Language;

pub use schema::FuelwatchConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges defaults → global TOML → project TOML → env vars. Unreadable or
/// malformed files are skipped with a warning on stderr.
pub fn load() -> FuelwatchConfig {
    let mut config = load_files(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files over the defaults, in order.
fn load_files(paths: &[Option<PathBuf>]) -> FuelwatchConfig {
    let Ok(mut merged) = toml::Value::try_from(FuelwatchConfig::default()) else {
        return FuelwatchConfig::default();
    };

    for path in paths.iter().flatten() {
        if let Some(layer) = load_toml_file(path) {
            merge_values(&mut merged, layer);
        }
    }

    match merged.try_into() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[fuelwatch] ignoring config files: {e}");
            FuelwatchConfig::default()
        }
    }
}

/// Read a TOML file as a raw value tree. Missing files are silent; malformed
/// ones are reported and skipped.
fn load_toml_file(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            eprintln!("[fuelwatch] skipping malformed {}: {e}", path.display());
            None
        }
    }
}

/// Overlay `layer` onto `base`. Tables merge recursively; anything else in
/// the layer replaces the base value.
fn merge_values(base: &mut toml::Value, layer: toml::Value) {
    match (base, layer) {
        (toml::Value::Table(base), toml::Value::Table(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.fuelwatch/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fuelwatch").join("config.toml"))
}

/// `.fuelwatch.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".fuelwatch.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `FUELWATCH_LANG`: `es` or `en`
/// - `FUELWATCH_SERVICE_URL`: inference service base URL
/// - `FUELWATCH_TIMEOUT_MS`: request timeout for options/predict/model info
/// - `FUELWATCH_VIEW_URL`: external visualization URL
/// - `FUELWATCH_ADDR`: dashboard listen address
/// - `FUELWATCH_LOGGING`: diagnostics log on/off (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut FuelwatchConfig) {
    if let Ok(val) = std::env::var("FUELWATCH_LANG")
        && let Some(language) = Language::parse(&val)
    {
        config.general.language = language;
    }
    if let Ok(val) = std::env::var("FUELWATCH_SERVICE_URL")
        && !val.is_empty()
    {
        config.service.base_url = val;
    }
    if let Ok(val) = std::env::var("FUELWATCH_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.service.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("FUELWATCH_VIEW_URL")
        && !val.is_empty()
    {
        config.external_view.url = val;
    }
    if let Ok(val) = std::env::var("FUELWATCH_ADDR")
        && !val.is_empty()
    {
        config.dashboard.addr = val;
    }
    if let Ok(val) = std::env::var("FUELWATCH_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.fuelwatch/config.toml`.
///
/// Fails if the file already exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, FuelwatchConfig::default_toml()).context("failed to write config file")
}

/// Set a single dotted key (e.g. `service.base_url`) in the global config
/// file, creating it from defaults if needed.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_value_in_file(&path, key, value)
}

fn set_value_in_file(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(FuelwatchConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    // Reject values the schema cannot hold before touching the file.
    let _: FuelwatchConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value takes the type of the value it replaces; unknown sections
/// are rejected.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        anyhow::bail!("invalid config key: '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
