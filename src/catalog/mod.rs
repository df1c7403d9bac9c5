//! Selectable values for the prediction form.
//!
//! The catalog is fetched once per session from `GET /get_options`. When the
//! service cannot provide it, the built-in default catalog is used instead so
//! the form stays usable.
use serde::{Deserialize, Serialize};

use crate::analytics::logger::{DiagnosticsLog, EventKind};
use crate::form::Field;
use crate::service::InferenceService;

/// Six ordered option lists, one per form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCatalog {
    pub drivers: Vec<String>,
    pub vehicles: Vec<String>,
    pub divisions: Vec<String>,
    pub bills_of_lading: Vec<String>,
    pub cargo_types: Vec<String>,
    pub stations: Vec<String>,
}

impl DomainCatalog {
    /// The fixed catalog used whenever the remote options are unavailable.
    pub fn default_catalog() -> Self {
        fn list(items: [&str; 3]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            drivers: list(["Juan Perez", "Ana Garcia", "Carlos Lopez"]),
            vehicles: list(["VEH001", "VEH002", "VEH003"]),
            divisions: list(["Norte", "Sur", "Centro"]),
            bills_of_lading: list(["BL001", "BL002", "BL003"]),
            cargo_types: list(["Petroleo", "Gas", "Quimicos"]),
            stations: list(["EST001", "EST002", "EST003"]),
        }
    }

    /// Options for one field.
    pub fn values(&self, field: Field) -> &[String] {
        match field {
            Field::Driver => &self.drivers,
            Field::Vehicle => &self.vehicles,
            Field::Division => &self.divisions,
            Field::BillOfLading => &self.bills_of_lading,
            Field::CargoType => &self.cargo_types,
            Field::Station => &self.stations,
        }
    }

    pub fn contains(&self, field: Field, value: &str) -> bool {
        self.values(field).iter().any(|v| v == value)
    }
}

impl Default for DomainCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}

/// Outcome of loading the catalog.
///
/// `ok == false` means `catalog` is the built-in default and `error` carries
/// the reason the remote fetch failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogResult {
    pub ok: bool,
    pub catalog: DomainCatalog,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CatalogResult {
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            catalog: DomainCatalog::default_catalog(),
            error: Some(reason.into()),
        }
    }
}

/// Fetch the catalog once, substituting the default on any failure.
pub fn load_catalog<S: InferenceService + ?Sized>(
    service: &S,
    log: &DiagnosticsLog,
) -> CatalogResult {
    match service.options() {
        Ok(catalog) => {
            log.record(EventKind::Catalog, "remote", None);
            CatalogResult {
                ok: true,
                catalog,
                error: None,
            }
        }
        Err(error) => {
            let reason = error.to_string();
            log.record(EventKind::Catalog, "default", Some(&reason));
            CatalogResult::fallback(reason)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
