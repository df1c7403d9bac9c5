/// Integration tests for the environment variable layer of the config.
///
/// # Safety
///
/// `std::env::set_var` / `remove_var` are `unsafe` in Rust 2024 edition. All
/// env mutations live in a single `#[test]` so nothing else in this binary
/// reads the variables concurrently.
use fuelwatch::config;
use fuelwatch::i18n::Language;

/// Helper: set an env var (wraps the `unsafe` call).
///
/// # Safety
/// Must only be called from single-threaded test contexts.
unsafe fn set_env(key: &str, val: &str) {
    unsafe { std::env::set_var(key, val) }
}

/// Helper: remove an env var (wraps the `unsafe` call).
///
/// # Safety
/// Must only be called from single-threaded test contexts.
unsafe fn remove_env(key: &str) {
    unsafe { std::env::remove_var(key) }
}

const VARS: [&str; 6] = [
    "FUELWATCH_LANG",
    "FUELWATCH_SERVICE_URL",
    "FUELWATCH_TIMEOUT_MS",
    "FUELWATCH_VIEW_URL",
    "FUELWATCH_ADDR",
    "FUELWATCH_LOGGING",
];

#[test]
fn env_vars_override_every_file_layer() {
    unsafe {
        set_env("FUELWATCH_LANG", "EN");
        set_env("FUELWATCH_SERVICE_URL", "http://models.internal:8000");
        set_env("FUELWATCH_TIMEOUT_MS", "2500");
        set_env("FUELWATCH_VIEW_URL", "http://viz.internal:8501");
        set_env("FUELWATCH_ADDR", "0.0.0.0:9000");
        set_env("FUELWATCH_LOGGING", "off");
    }

    let cfg = config::load();
    assert_eq!(cfg.general.language, Language::En);
    assert_eq!(cfg.service.base_url, "http://models.internal:8000");
    assert_eq!(cfg.service.timeout_ms, 2500);
    assert_eq!(cfg.external_view.url, "http://viz.internal:8501");
    assert_eq!(cfg.dashboard.addr, "0.0.0.0:9000");
    assert!(!cfg.logging.enabled);

    // --- unparseable values leave the file/default layer in place ---
    let baseline = {
        for var in VARS {
            unsafe { remove_env(var) };
        }
        config::load()
    };
    unsafe {
        set_env("FUELWATCH_LANG", "klingon");
        set_env("FUELWATCH_TIMEOUT_MS", "soon");
        set_env("FUELWATCH_SERVICE_URL", "");
    }
    let cfg = config::load();
    assert_eq!(cfg.general.language, baseline.general.language);
    assert_eq!(cfg.service.timeout_ms, baseline.service.timeout_ms);
    assert_eq!(cfg.service.base_url, baseline.service.base_url);

    // --- truthy spellings enable logging ---
    for val in ["1", "true", "YES", "on"] {
        unsafe { set_env("FUELWATCH_LOGGING", val) };
        assert!(config::load().logging.enabled, "FUELWATCH_LOGGING={val}");
    }

    for var in VARS {
        unsafe { remove_env(var) };
    }
}
