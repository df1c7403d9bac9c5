//! Prediction form state.
//!
//! A [`FormSelection`] is the closed six-field record the user fills in before
//! asking for a prediction. Fields are plain strings; an empty string means
//! "not selected yet". Membership in the [`DomainCatalog`] is expected but not
//! enforced here.
//!
//! [`DomainCatalog`]: crate::catalog::DomainCatalog
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// One of the six required form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Driver,
    Vehicle,
    Division,
    BillOfLading,
    CargoType,
    Station,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 6] = [
        Field::Driver,
        Field::Vehicle,
        Field::Division,
        Field::BillOfLading,
        Field::CargoType,
        Field::Station,
    ];

    /// English snake_case name, used by the CLI and the dashboard API.
    pub fn name(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Vehicle => "vehicle",
            Self::Division => "division",
            Self::BillOfLading => "bill_of_lading",
            Self::CargoType => "cargo_type",
            Self::Station => "station",
        }
    }

    /// Name the inference service and the external view expect on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Driver => "conductor",
            Self::Vehicle => "vehiculo",
            Self::Division => "division",
            Self::BillOfLading => "bl",
            Self::CargoType => "mercancia",
            Self::Station => "estacion",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a field name matches none of the six form fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts the snake_case name, the camelCase name and the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "driver" | "conductor" => Ok(Self::Driver),
            "vehicle" | "vehiculo" => Ok(Self::Vehicle),
            "division" => Ok(Self::Division),
            "bill_of_lading" | "billOfLading" | "bl" => Ok(Self::BillOfLading),
            "cargo_type" | "cargoType" | "cargo" | "mercancia" => Ok(Self::CargoType),
            "station" | "estacion" => Ok(Self::Station),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection record
// ---------------------------------------------------------------------------

/// The user's current selection for each required field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSelection {
    #[serde(alias = "conductor")]
    pub driver: String,
    #[serde(alias = "vehiculo")]
    pub vehicle: String,
    pub division: String,
    #[serde(alias = "billOfLading", alias = "bl")]
    pub bill_of_lading: String,
    #[serde(alias = "cargoType", alias = "mercancia")]
    pub cargo_type: String,
    #[serde(alias = "estacion")]
    pub station: String,
}

impl FormSelection {
    /// An empty selection, as at the start of a session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a field (empty when unset).
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Driver => &self.driver,
            Field::Vehicle => &self.vehicle,
            Field::Division => &self.division,
            Field::BillOfLading => &self.bill_of_lading,
            Field::CargoType => &self.cargo_type,
            Field::Station => &self.station,
        }
    }

    /// Overwrite a field unconditionally.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Driver => &mut self.driver,
            Field::Vehicle => &mut self.vehicle,
            Field::Division => &mut self.division,
            Field::BillOfLading => &mut self.bill_of_lading,
            Field::CargoType => &mut self.cargo_type,
            Field::Station => &mut self.station,
        };
        *slot = value.into();
    }

    /// Overwrite a field addressed by any of its accepted names.
    pub fn set_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Field, UnknownField> {
        let field: Field = name.parse()?;
        self.set_field(field, value);
        Ok(field)
    }

    /// True iff every field is non-empty. Catalog membership is not checked.
    pub fn is_valid(&self) -> bool {
        Field::ALL.iter().all(|&field| !self.get(field).is_empty())
    }

    /// Fields still unset, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&field| self.get(field).is_empty())
            .collect()
    }

    /// `(field, value)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    /// `(wire name, value)` pairs, the shape the service and external view use.
    pub fn wire_pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.iter().map(|(field, value)| (field.wire_name(), value))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
