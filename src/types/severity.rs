//! Definitions for the [`Severity`] and [`ReportType`] enums.

use serde::{Deserialize, Serialize};

/// How serious a reported incident is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    /// Colour of the map marker drawn for a report of this severity.
    pub fn marker_color(&self) -> &'static str {
        match self {
            Severity::High => "red",
            Severity::Medium => "orange",
            Severity::Low => "blue",
        }
    }

    /// Severity of a hazard category assigned by the report classifier.
    ///
    /// Matching is a case-insensitive substring search: microbiological
    /// and allergen hazards are high, chemical hazards medium, anything
    /// else low.
    pub fn from_hazard_label(label: &str) -> Severity {
        let label = label.to_lowercase();
        if label.contains("microbiological") || label.contains("allergen") {
            Severity::High
        } else if label.contains("chemical") {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// The kind of incident a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Illness,
    Contamination,
    Hygiene,
    Raid,
    #[serde(other)]
    Other,
}
