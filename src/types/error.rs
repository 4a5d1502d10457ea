//! Definition of the [`ProximityError`] type.
//!
//! Distance computations and radius filtering never fail: a record
//! without a usable coordinate is simply not in range. Errors only come
//! from parsing text into coordinates, from configuration and from
//! validating subscriptions.

use thiserror::Error;

/// Errors produced by parsing, configuration and validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProximityError {
    /// The location text is not of the `"lat,lon"` form.
    #[error("malformed location: {0:?}")]
    MalformedLocation(String),

    /// Latitude must be within [-90, 90], longitude within [-180, 180].
    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },

    /// A radius that is negative or not a number.
    #[error("invalid radius: {0} km")]
    InvalidRadius(f64),

    /// A configuration value could not be used.
    #[error("invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// The process-wide configuration was set twice.
    #[error("configuration already initialized")]
    ConfigAlreadyInitialized,

    /// A subscription cannot receive alerts.
    #[error("invalid subscription: {0}")]
    InvalidSubscription(String),
}
