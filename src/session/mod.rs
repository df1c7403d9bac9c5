//! Workflow session: the context object owning everything one dashboard
//! instance needs.
//!
//! [`Session::start`] probes service health and loads the domain catalog
//! concurrently; each task writes only its own state. After that the session
//! owns the form, and predictions go through its [`PredictionController`].
//! [`Session::end`] tears it down.
use std::sync::Arc;
use std::thread;

use url::Url;

use crate::analytics::logger::{DiagnosticsLog, EventKind};
use crate::catalog::{self, CatalogResult};
use crate::config::FuelwatchConfig;
use crate::form::{Field, FormSelection, UnknownField};
use crate::health::{HealthMonitor, ServiceHealth};
use crate::model::{self, ModelInfoResult};
use crate::prediction::controller::{PredictOutcome, PredictionController, Settlement};
use crate::service::InferenceService;
use crate::view;

pub struct Session<S: InferenceService> {
    config: FuelwatchConfig,
    service: Arc<S>,
    log: DiagnosticsLog,
    health: HealthMonitor,
    catalog: CatalogResult,
    form: FormSelection,
    controller: PredictionController<Arc<S>>,
}

impl<S: InferenceService> Session<S> {
    /// Start a session logging to the location in `[logging]`.
    pub fn start(service: S, config: FuelwatchConfig) -> Self {
        let log = DiagnosticsLog::from_config(&config.logging);
        Self::start_with_log(service, config, log)
    }

    /// Start a session with an explicit diagnostics log.
    pub fn start_with_log(service: S, config: FuelwatchConfig, log: DiagnosticsLog) -> Self {
        let service = Arc::new(service);
        log.record(EventKind::Session, "start", Some(&config.service.base_url));

        let mut health = HealthMonitor::new();
        let catalog = thread::scope(|scope| {
            let loader = scope.spawn(|| catalog::load_catalog(service.as_ref(), &log));
            health.probe(service.as_ref(), &log);
            loader
                .join()
                .unwrap_or_else(|_| CatalogResult::fallback("catalog loader panicked"))
        });

        let controller = PredictionController::new(Arc::clone(&service), log.clone());

        Self {
            config,
            service,
            log,
            health,
            catalog,
            form: FormSelection::new(),
            controller,
        }
    }

    pub fn config(&self) -> &FuelwatchConfig {
        &self.config
    }

    pub fn health(&self) -> ServiceHealth {
        self.health.status()
    }

    pub fn health_monitor(&self) -> &HealthMonitor {
        &self.health
    }

    pub fn catalog(&self) -> &CatalogResult {
        &self.catalog
    }

    pub fn form(&self) -> &FormSelection {
        &self.form
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set_field(field, value);
    }

    pub fn set_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Field, UnknownField> {
        self.form.set_field_by_name(name, value)
    }

    /// Replace the whole selection at once.
    pub fn replace_form(&mut self, form: FormSelection) {
        self.form = form;
    }

    /// Fields whose value is set but not offered by the catalog.
    pub fn off_catalog_fields(&self) -> Vec<Field> {
        self.form
            .iter()
            .filter(|(field, value)| {
                !value.is_empty() && !self.catalog.catalog.contains(*field, value)
            })
            .map(|(field, _)| field)
            .collect()
    }

    /// Predict for the current form.
    pub fn predict(&self) -> PredictOutcome {
        self.controller.predict(&self.form)
    }

    /// The displayed prediction, if any.
    pub fn current_prediction(&self) -> Option<Settlement> {
        self.controller.current()
    }

    pub fn model_info(&self) -> ModelInfoResult {
        model::load_model_info(self.service.as_ref(), &self.log)
    }

    /// URL of the external visualization for the current form.
    pub fn external_view_url(&self) -> anyhow::Result<Url> {
        view::external_view_url(&self.config.external_view.url, &self.form)
    }

    /// Open the external visualization. Browser failures are reported on
    /// stderr and otherwise ignored.
    pub fn open_external_view(&self) -> anyhow::Result<Url> {
        let url = self.external_view_url()?;
        if self.config.external_view.open_browser
            && let Err(e) = view::open_in_browser(url.as_str())
        {
            eprintln!("[fuelwatch] {e}");
        }
        Ok(url)
    }

    /// End the session. All state is dropped.
    pub fn end(self) {
        self.log.record(EventKind::Session, "end", None);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
