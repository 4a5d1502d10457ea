//! Struct definitions and implementations for located records.
//!
//! The most generic form of a record is anything implementing
//! [`Locate`]. In practice a record is a [`Report`] submitted by a user
//! and shown on the map, an [`Alert`] returned by the reporting backend,
//! or a [`Subscription`] of someone who wants to be warned about
//! incidents near them.
//!
//! The proximity functions take `impl Locate` so they stay agnostic of
//! which record they are filtering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coordinate::{self, Coordinate};
use super::error::ProximityError;
use super::severity::{ReportType, Severity};

/// Gives access to the position of a "located" object.
pub trait Locate {
    /// Returns the position of the record, or [`None`] when the record
    /// cannot be placed on a map.
    fn coordinate(&self) -> Option<Coordinate>;
}

/// Gives access to the time a record was created.
pub trait Timestamped {
    fn timestamp(&self) -> Option<DateTime<Utc>>;
}

impl Locate for Coordinate {
    fn coordinate(&self) -> Option<Coordinate> {
        Some(*self)
    }
}

impl Locate for Option<Coordinate> {
    fn coordinate(&self) -> Option<Coordinate> {
        *self
    }
}

impl<T: Locate + ?Sized> Locate for &T {
    fn coordinate(&self) -> Option<Coordinate> {
        (**self).coordinate()
    }
}

//------------------------------------------------------------------
// Structs and Implementations
//------------------------------------------------------------------

/// An incident report as stored in the document store and drawn on the
/// map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Assigned by the upstream store.
    #[serde(default)]
    pub id: String,

    /// Name of the vendor or business the report is about.
    #[serde(default)]
    pub vendor: Option<String>,

    /// Free text written by the reporter.
    #[serde(default)]
    pub text: String,

    #[serde(rename = "type")]
    pub kind: ReportType,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    /// See [`coordinate::deserialize_optional`] for accepted shapes.
    #[serde(default, deserialize_with = "coordinate::deserialize_optional")]
    pub location: Option<Coordinate>,
}

impl Locate for Report {
    fn coordinate(&self) -> Option<Coordinate> {
        self.location
    }
}

impl Timestamped for Report {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

/// A named symptom or tag attached to an [`Alert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

/// A nearby alert as returned by the reporting backend. The position is
/// carried as two flat fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub business_name: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    #[serde(default)]
    pub symptoms: Vec<Label>,

    #[serde(default)]
    pub tags: Vec<Label>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Locate for Alert {
    fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude?, self.longitude?))
    }
}

impl Timestamped for Alert {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Text used when a report has to be announced to someone.
pub trait Headline {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
}

impl Headline for Alert {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl Headline for Report {
    fn title(&self) -> &str {
        self.vendor.as_deref().unwrap_or("Vendor")
    }

    fn description(&self) -> &str {
        &self.text
    }
}

/// Someone who wants to be alerted about incidents near a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub username: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    pub latitude: f64,
    pub longitude: f64,
}

impl Subscription {
    /// Checks that the subscription names someone and can be reached.
    ///
    /// Blank strings count as absent.
    pub fn validate(&self) -> Result<(), ProximityError> {
        if self.username.trim().is_empty() {
            return Err(ProximityError::InvalidSubscription(
                "username is required".to_string(),
            ));
        }
        if self.email_address().is_none() && self.phone_number().is_none() {
            return Err(ProximityError::InvalidSubscription(format!(
                "{} needs an email address or a phone number",
                self.username
            )));
        }
        Ok(())
    }

    /// The email address, if one is set and not blank.
    pub fn email_address(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// The phone number, if one is set and not blank.
    pub fn phone_number(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }
}

impl Locate for Subscription {
    fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude, self.longitude))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

//------------------------------------------------------------------
// Unit Tests
//------------------------------------------------------------------
