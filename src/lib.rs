//! Food-safety incident proximity library.
//! Finds the reports near a user, the map markers to draw and the
//! subscribers to alert, using great-circle distance.
//!
//! Records only need to implement [`Locate`] to be filtered. Records that
//! cannot be located are never in range, and no filtering function
//! returns an error.

#[macro_use]
extern crate log;

pub mod config;

pub mod types {
    pub mod coordinate;
    pub mod error;
    pub mod record;
    pub mod severity;
}

pub mod utils {
    pub mod generator;
    pub mod haversine;
    pub mod map_filter;
}

pub mod algorithms {
    pub mod alerts;
    pub mod proximity;
}

pub use algorithms::alerts::{match_subscriptions, nearby_recent, pending_alerts, AlertMatch, Channel};
pub use algorithms::proximity::{
    filter_within_radius, filter_within_radius_sorted, is_within_radius, nearest,
};
pub use config::{config, init_config, ProximityConfig};
pub use types::coordinate::{Coordinate, KATHMANDU};
pub use types::error::ProximityError;
pub use types::record::{Alert, Locate, Report, Subscription, Timestamped};
pub use types::severity::{ReportType, Severity};
pub use utils::haversine::{distance as distance_km, distance_between, MAX_DISTANCE_KM};
pub use utils::map_filter::ReportFilter;
