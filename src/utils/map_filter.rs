//! Filters applied to the report map: incident type, severity and a
//! radius around the viewer.

use serde::{Deserialize, Serialize};

use crate::algorithms::proximity::filter_within_radius;
use crate::config::{self, ProximityConfig};
use crate::types::{
    coordinate::Coordinate,
    record::Report,
    severity::{ReportType, Severity},
};

/// The map's filter panel. [`None`] means "all".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    #[serde(default, rename = "type")]
    pub kind: Option<ReportType>,
    #[serde(default)]
    pub severity: Option<Severity>,
    pub radius_km: f64,
}

impl Default for ReportFilter {
    fn default() -> Self {
        ReportFilter {
            kind: None,
            severity: None,
            radius_km: config::config().default_radius_km,
        }
    }
}

impl ReportFilter {
    /// Sets the radius, clamped to the slider range of `config`.
    pub fn with_radius(self, radius_km: f64, config: &ProximityConfig) -> Self {
        ReportFilter {
            radius_km: config.clamp_radius(radius_km),
            ..self
        }
    }

    pub fn with_kind(self, kind: ReportType) -> Self {
        ReportFilter {
            kind: Some(kind),
            ..self
        }
    }

    pub fn with_severity(self, severity: Severity) -> Self {
        ReportFilter {
            severity: Some(severity),
            ..self
        }
    }

    /// Whether the report passes the type and severity selection.
    pub fn matches(&self, report: &Report) -> bool {
        self.kind.map_or(true, |kind| report.kind == kind)
            && self.severity.map_or(true, |severity| report.severity == severity)
    }

    /// Reports to draw around `origin`, in input order.
    pub fn apply<'a>(&self, origin: &Coordinate, reports: &'a [Report]) -> Vec<&'a Report> {
        debug!("applying map filter {:?} at {}", self, origin);
        filter_within_radius(origin, reports, self.radius_km)
            .into_iter()
            .filter(|report| self.matches(report))
            .collect()
    }
}
