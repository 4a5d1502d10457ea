//! Decides which reports are worth an alert and who should receive it.
//!
//! Delivery itself (mail, SMS) happens elsewhere. This module only
//! selects recent nearby reports and matches reports to subscriptions.

use chrono::{DateTime, Utc};

use super::proximity::{distance_to, filter_within_radius};
use crate::config::ProximityConfig;
use crate::types::{
    coordinate::Coordinate,
    record::{Headline, Locate, Subscription, Timestamped},
};

/// How a subscriber can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Email,
    Sms,
}

/// A subscription that should hear about a record.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMatch<'a, R> {
    pub record: &'a R,
    pub subscription: &'a Subscription,
    pub distance_km: f64,
    /// Never empty.
    pub channels: Vec<Channel>,
}

impl<R: Headline> AlertMatch<'_, R> {
    /// Body of the notification sent to the subscriber.
    pub fn message(&self) -> String {
        format!(
            "New food safety alert near your location: {}\n{}",
            self.record.title(),
            self.record.description()
        )
    }
}

/// Whether `record` was created within the recent window ending at `now`.
///
/// Records without a timestamp are never recent. Timestamps after `now`
/// count as recent. A window reaching past the earliest representable
/// date makes every timestamped record recent.
pub fn is_recent<R: Timestamped + ?Sized>(
    record: &R,
    now: DateTime<Utc>,
    config: &ProximityConfig,
) -> bool {
    let cutoff = config
        .recent_window()
        .and_then(|window| now.checked_sub_signed(window));
    record
        .timestamp()
        .map_or(false, |timestamp| cutoff.map_or(true, |cutoff| timestamp >= cutoff))
}

/// Returns the recent records within the configured default radius of
/// `origin`, in input order.
pub fn nearby_recent<'a, R: Locate + Timestamped>(
    origin: &Coordinate,
    records: &'a [R],
    now: DateTime<Utc>,
    config: &ProximityConfig,
) -> Vec<&'a R> {
    filter_within_radius(origin, records, config.default_radius_km)
        .into_iter()
        .filter(|record| is_recent(*record, now, config))
        .collect()
}

/// Finds every subscription within `radius_km` of `record`.
///
/// Subscriptions that have neither an email address nor a phone number
/// are skipped. A record without a coordinate matches nobody.
pub fn match_subscriptions<'a, R: Locate>(
    record: &'a R,
    subscriptions: &'a [Subscription],
    radius_km: f64,
) -> Vec<AlertMatch<'a, R>> {
    let Some(location) = record.coordinate() else {
        debug!("record has no location, no subscription matched");
        return Vec::new();
    };

    subscriptions
        .iter()
        .filter_map(|subscription| {
            let distance_km = distance_to(&location, subscription)?;
            if !(distance_km <= radius_km) {
                return None;
            }
            let channels = channels_of(subscription);
            if channels.is_empty() {
                debug!("{} has no way to be reached", subscription.username);
                return None;
            }
            Some(AlertMatch {
                record,
                subscription,
                distance_km,
                channels,
            })
        })
        .collect()
}

/// Matches every recent record against every subscription, using the
/// configured default radius.
pub fn pending_alerts<'a, R: Locate + Timestamped>(
    records: &'a [R],
    subscriptions: &'a [Subscription],
    now: DateTime<Utc>,
    config: &ProximityConfig,
) -> Vec<AlertMatch<'a, R>> {
    let recent: Vec<&R> = records
        .iter()
        .filter(|record| is_recent(*record, now, config))
        .collect();
    let alerts: Vec<AlertMatch<R>> = recent
        .iter()
        .flat_map(|record| match_subscriptions(*record, subscriptions, config.default_radius_km))
        .collect();
    info!(
        "{} alerts pending for {} recent records ({} total)",
        alerts.len(),
        recent.len(),
        records.len()
    );
    alerts
}

fn channels_of(subscription: &Subscription) -> Vec<Channel> {
    let mut channels = Vec::new();
    if subscription.email_address().is_some() {
        channels.push(Channel::Email);
    }
    if subscription.phone_number().is_some() {
        channels.push(Channel::Sms);
    }
    channels
}

//------------------------------------------------------------------
// Unit Tests
//------------------------------------------------------------------

#[cfg(test)]
mod alert_tests {
    use super::*;
    use crate::types::coordinate::KATHMANDU;
    use crate::types::record::Alert;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()
    }

    fn alert(title: &str, latitude: f64, longitude: f64, hours_ago: i64) -> Alert {
        Alert {
            title: title.to_string(),
            description: format!("{title} description"),
            business_name: None,
            latitude: Some(latitude),
            longitude: Some(longitude),
            symptoms: vec![],
            tags: vec![],
            created_at: Some(now() - Duration::hours(hours_ago)),
        }
    }

    fn subscription(
        username: &str,
        at: Coordinate,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Subscription {
        Subscription {
            username: username.to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            latitude: at.latitude,
            longitude: at.longitude,
        }
    }

    #[test]
    fn test_nearby_recent() {
        let config = ProximityConfig::default();
        let mut undated = alert("undated", 27.7153, 85.3123, 0);
        undated.created_at = None;
        let records = vec![
            alert("thamel", 27.7153, 85.3123, 2),
            alert("old", 27.7153, 85.3123, 30),
            alert("bhaktapur", 27.6710, 85.4298, 1),
            undated,
            alert("patan", 27.6844, 85.3180, 24),
        ];
        let selected = nearby_recent(&KATHMANDU, &records, now(), &config);
        let titles: Vec<&str> = selected.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["thamel", "patan"]);
    }

    #[test]
    fn test_future_timestamps_are_recent() {
        let config = ProximityConfig::default();
        let record = alert("tomorrow", 27.7, 85.3, -24);
        assert!(is_recent(&record, now(), &config));
    }

    #[test]
    fn test_window_beyond_calendar_does_not_panic() {
        let config = ProximityConfig {
            recent_window_hours: 10_000_000_000,
            ..ProximityConfig::default()
        };
        let record = alert("ancient", 27.7, 85.3, 24 * 365 * 50);
        assert!(is_recent(&record, Utc::now(), &config));

        let mut undated = record.clone();
        undated.created_at = None;
        assert!(!is_recent(&undated, Utc::now(), &config));

        let config = ProximityConfig {
            recent_window_hours: i64::MAX,
            ..ProximityConfig::default()
        };
        assert!(is_recent(&record, now(), &config));
        let records = vec![record];
        assert_eq!(nearby_recent(&Coordinate::new(27.7, 85.3), &records, now(), &config).len(), 1);
    }

    #[test]
    fn test_match_subscriptions() {
        let record = alert("Bad momo", 27.7153, 85.3123, 1);
        let subscriptions = vec![
            subscription("near", KATHMANDU, Some("near@example.com"), Some("+977980000")),
            subscription("far", Coordinate::new(28.2096, 83.9856), Some("far@example.com"), None),
            subscription("silent", KATHMANDU, None, Some("")),
            subscription("phone", Coordinate::new(27.6844, 85.3180), None, Some("+977981111")),
        ];

        let matches = match_subscriptions(&record, &subscriptions, 5.0);
        let users: Vec<&str> = matches.iter().map(|m| m.subscription.username.as_str()).collect();
        assert_eq!(users, vec!["near", "phone"]);
        assert_eq!(matches[0].channels, vec![Channel::Email, Channel::Sms]);
        assert_eq!(matches[1].channels, vec![Channel::Sms]);
        assert!(matches.iter().all(|m| m.distance_km <= 5.0));
        assert_eq!(
            matches[0].message(),
            "New food safety alert near your location: Bad momo\nBad momo description"
        );
    }

    #[test]
    fn test_unlocated_record_matches_nobody() {
        let mut record = alert("nowhere", 0.0, 0.0, 1);
        record.latitude = None;
        let subscriptions = vec![subscription("near", KATHMANDU, Some("a@b.c"), None)];
        assert!(match_subscriptions(&record, &subscriptions, 20000.0).is_empty());
    }

    #[test]
    fn test_pending_alerts_skip_old_records() {
        let config = ProximityConfig::default();
        let records = vec![
            alert("fresh", 27.7153, 85.3123, 3),
            alert("stale", 27.7153, 85.3123, 48),
        ];
        let subscriptions = vec![subscription("near", KATHMANDU, Some("a@b.c"), None)];
        let alerts = pending_alerts(&records, &subscriptions, now(), &config);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].record.title, "fresh");
    }
}
