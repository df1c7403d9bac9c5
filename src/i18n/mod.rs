//! Spanish/English copy for the prediction workflow.
//!
//! Only the strings the workflow itself surfaces live here: result titles,
//! connection states, the fallback advisory, field labels and the
//! recommendations shown for inefficient results.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::form::Field;
use crate::health::ServiceHealth;
use crate::prediction::Label;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "es" | "spanish" | "espanol" => Some(Self::Es),
            "en" | "english" => Some(Self::En),
            _ => None,
        }
    }

    pub fn result_title(self, label: Label) -> &'static str {
        match (self, label) {
            (Self::Es, Label::Efficient) => "EFICIENTE",
            (Self::Es, Label::Inefficient) => "INEFICIENTE",
            (Self::En, Label::Efficient) => "EFFICIENT",
            (Self::En, Label::Inefficient) => "INEFFICIENT",
        }
    }

    pub fn result_description(self, label: Label) -> &'static str {
        match (self, label) {
            (Self::Es, Label::Efficient) => "El sistema predice un buen rendimiento de combustible.",
            (Self::Es, Label::Inefficient) => {
                "El sistema detecta posibles problemas de eficiencia."
            }
            (Self::En, Label::Efficient) => "The system predicts good fuel efficiency.",
            (Self::En, Label::Inefficient) => "The system detects possible efficiency issues.",
        }
    }

    pub fn health_status(self, health: ServiceHealth) -> &'static str {
        match (self, health) {
            (Self::Es, ServiceHealth::Connecting) => "Conectando...",
            (Self::Es, ServiceHealth::Connected) => "Conectado",
            (Self::Es, ServiceHealth::Disconnected) => "Desconectado",
            (Self::En, ServiceHealth::Connecting) => "Connecting...",
            (Self::En, ServiceHealth::Connected) => "Connected",
            (Self::En, ServiceHealth::Disconnected) => "Disconnected",
        }
    }

    /// Advisory shown when a result comes from the simulator.
    pub fn fallback_advisory(self, reason: &str) -> String {
        match self {
            Self::Es => format!("Error de conexion: {reason}. Usando simulacion temporal..."),
            Self::En => format!("Connection error: {reason}. Using temporary simulation..."),
        }
    }

    pub fn field_label(self, field: Field) -> &'static str {
        match (self, field) {
            (Self::Es, Field::Driver) => "Conductor",
            (Self::Es, Field::Vehicle) => "Vehiculo",
            (Self::Es, Field::Division) => "Division",
            (Self::Es, Field::BillOfLading) => "BL",
            (Self::Es, Field::CargoType) => "Mercancia",
            (Self::Es, Field::Station) => "Estacion",
            (Self::En, Field::Driver) => "Driver",
            (Self::En, Field::Vehicle) => "Vehicle",
            (Self::En, Field::Division) => "Division",
            (Self::En, Field::BillOfLading) => "BL",
            (Self::En, Field::CargoType) => "Cargo",
            (Self::En, Field::Station) => "Station",
        }
    }

    pub fn probability_label(self) -> &'static str {
        match self {
            Self::Es => "Probabilidad de Ineficiencia",
            Self::En => "Inefficiency Probability",
        }
    }

    pub fn confidence_label(self) -> &'static str {
        match self {
            Self::Es => "Confianza del Modelo",
            Self::En => "Model Confidence",
        }
    }

    /// Fixed labels of the dashboard page and the CLI result view.
    pub fn page_copy(self) -> PageCopy {
        match self {
            Self::Es => PageCopy {
                lang: "es",
                connecting: self.health_status(ServiceHealth::Connecting),
                predict: "Predecir",
                external_view: "Vista externa",
                placeholder: "Complete los seis campos para obtener una prediccion.",
                catalog_fallback: "Usando opciones predeterminadas",
                probability: self.probability_label(),
                confidence: self.confidence_label(),
                driver_score: "Score del conductor",
                vehicle_score: "Score del vehiculo",
                driver_avg_efficiency: "Eficiencia promedio del conductor",
                vehicle_avg_efficiency: "Eficiencia promedio del vehiculo",
                importance: "Importancia de variables",
                recommendations: "Recomendaciones",
                map: "Mapa topologico",
            },
            Self::En => PageCopy {
                lang: "en",
                connecting: self.health_status(ServiceHealth::Connecting),
                predict: "Predict",
                external_view: "External view",
                placeholder: "Fill in all six fields to get a prediction.",
                catalog_fallback: "Using default options",
                probability: self.probability_label(),
                confidence: self.confidence_label(),
                driver_score: "Driver score",
                vehicle_score: "Vehicle score",
                driver_avg_efficiency: "Driver average efficiency",
                vehicle_avg_efficiency: "Vehicle average efficiency",
                importance: "Feature importance",
                recommendations: "Recommendations",
                map: "Topological map",
            },
        }
    }

    /// `(title, text)` pairs shown after an inefficient result.
    pub fn recommendations(self) -> [(&'static str, &'static str); 3] {
        match self {
            Self::Es => [
                ("Revision del Vehiculo", "Verificar mantenimiento y estado tecnico."),
                ("Capacitacion", "Entrenamiento en conduccion eficiente."),
                ("Optimizacion de Rutas", "Revisar patrones de consumo por ruta."),
            ],
            Self::En => [
                ("Vehicle Review", "Check maintenance and technical status."),
                ("Training", "Provide efficient driving training."),
                ("Route Optimization", "Review consumption patterns by route."),
            ],
        }
    }
}

/// Labels the dashboard page renders around the data it fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCopy {
    /// Value for the page's `lang` attribute.
    pub lang: &'static str,
    pub connecting: &'static str,
    pub predict: &'static str,
    pub external_view: &'static str,
    pub placeholder: &'static str,
    pub catalog_fallback: &'static str,
    pub probability: &'static str,
    pub confidence: &'static str,
    pub driver_score: &'static str,
    pub vehicle_score: &'static str,
    pub driver_avg_efficiency: &'static str,
    pub vehicle_avg_efficiency: &'static str,
    pub importance: &'static str,
    pub recommendations: &'static str,
    pub map: &'static str,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Es => write!(f, "es"),
            Self::En => write!(f, "en"),
        }
    }
}
