//! Tunables for proximity filtering and alerting.
//!
//! The active configuration lives in a process-wide cell. Call
//! [`init_config`] once at start-up; until then [`config`] hands out the
//! defaults.

use std::{env, fmt::Display, str::FromStr};

use chrono::Duration;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::types::{
    coordinate::{Coordinate, KATHMANDU},
    error::ProximityError,
};

/// Radius used when the user has not picked one.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;
/// Smallest radius the map slider offers.
pub const MIN_RADIUS_KM: f64 = 1.0;
/// Largest radius the map slider offers.
pub const MAX_RADIUS_KM: f64 = 20.0;
/// How far back a report still counts as recent.
pub const RECENT_WINDOW_HOURS: i64 = 24;
/// Longest accepted recent window, one century.
pub const MAX_RECENT_WINDOW_HOURS: i64 = 24 * 365 * 100;

static CONFIG: OnceCell<ProximityConfig> = OnceCell::new();
static DEFAULT_CONFIG: ProximityConfig = ProximityConfig {
    default_radius_km: DEFAULT_RADIUS_KM,
    min_radius_km: MIN_RADIUS_KM,
    max_radius_km: MAX_RADIUS_KM,
    recent_window_hours: RECENT_WINDOW_HOURS,
    fallback_origin: KATHMANDU,
};

/// Settings shared by the map filter and the alert matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Radius for alerts and the initial map view, in kilometres.
    pub default_radius_km: f64,
    pub min_radius_km: f64,
    pub max_radius_km: f64,
    pub recent_window_hours: i64,
    /// Origin used when the user's position is unavailable.
    pub fallback_origin: Coordinate,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl ProximityConfig {
    /// Reads the configuration from `BHOJAN_*` environment variables.
    ///
    /// Unset variables keep their default. A set but unparsable value is
    /// an error.
    pub fn from_env() -> Result<Self, ProximityError> {
        let defaults = ProximityConfig::default();
        let config = ProximityConfig {
            default_radius_km: try_load("BHOJAN_DEFAULT_RADIUS_KM", defaults.default_radius_km)?,
            min_radius_km: try_load("BHOJAN_MIN_RADIUS_KM", defaults.min_radius_km)?,
            max_radius_km: try_load("BHOJAN_MAX_RADIUS_KM", defaults.max_radius_km)?,
            recent_window_hours: try_load(
                "BHOJAN_RECENT_WINDOW_HOURS",
                defaults.recent_window_hours,
            )?,
            fallback_origin: try_load("BHOJAN_FALLBACK_ORIGIN", defaults.fallback_origin)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Requires `0 <= min <= default <= max` and a window between one
    /// hour and [`MAX_RECENT_WINDOW_HOURS`].
    pub fn validate(&self) -> Result<(), ProximityError> {
        let radii = [self.min_radius_km, self.default_radius_km, self.max_radius_km];
        if radii.iter().any(|r| r.is_nan() || *r < 0.0) {
            return Err(invalid("radius", "radii must be non-negative numbers"));
        }
        if !(self.min_radius_km <= self.default_radius_km
            && self.default_radius_km <= self.max_radius_km)
        {
            return Err(invalid(
                "radius",
                format!(
                    "expected min {} <= default {} <= max {}",
                    self.min_radius_km, self.default_radius_km, self.max_radius_km
                ),
            ));
        }
        if self.recent_window_hours <= 0 {
            return Err(invalid(
                "recent_window_hours",
                format!("{} is not a positive number of hours", self.recent_window_hours),
            ));
        }
        if self.recent_window_hours > MAX_RECENT_WINDOW_HOURS {
            return Err(invalid(
                "recent_window_hours",
                format!(
                    "{} exceeds the maximum of {} hours",
                    self.recent_window_hours, MAX_RECENT_WINDOW_HOURS
                ),
            ));
        }
        Ok(())
    }

    /// The recent window as a duration, or [`None`] if it does not fit
    /// in one.
    pub fn recent_window(&self) -> Option<Duration> {
        Duration::try_hours(self.recent_window_hours)
    }

    /// Clamps a user-picked radius into the slider range. NaN falls back
    /// to the default radius.
    pub fn clamp_radius(&self, radius_km: f64) -> f64 {
        if radius_km.is_nan() {
            return self.default_radius_km;
        }
        radius_km.max(self.min_radius_km).min(self.max_radius_km)
    }
}

/// Installs the process-wide configuration after validating it.
pub fn init_config(config: ProximityConfig) -> Result<(), ProximityError> {
    config.validate()?;
    info!("Initializing proximity config: {:?}", config);
    CONFIG
        .set(config)
        .map_err(|_| ProximityError::ConfigAlreadyInitialized)
}

/// The active configuration, or the defaults if none was installed.
pub fn config() -> &'static ProximityConfig {
    CONFIG.get().unwrap_or(&DEFAULT_CONFIG)
}

fn invalid(key: &str, reason: impl Into<String>) -> ProximityError {
    ProximityError::InvalidConfig {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn try_load<T>(key: &str, default: T) -> Result<T, ProximityError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value {value:?}: {e}");
            invalid(key, e.to_string())
        }),
        Err(_) => {
            debug!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

//------------------------------------------------------------------
// Unit Tests
//------------------------------------------------------------------
