// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Event Models
//!
//! The event produced by every collection cycle. One [`AthleteStats`] event is
//! created per scheduled run and handed to the publisher immediately; nothing
//! is persisted by this crate.
//!
//! ## Core Models
//!
//! - [`AthleteStats`]: the published event
//! - [`ActivityStats`]: aggregated totals per bucket
//! - [`ActivityTotal`]: count, distance and moving time of one bucket
//! - [`Activity`]: a single recent activity
//! - [`Timestamp`]: seconds/nanos representation of a point in time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event published once per collection cycle
///
/// # Examples
///
/// ```rust
/// use hdb_datasource_strava::models::{ActivityStats, AthleteStats, Timestamp};
/// use chrono::Utc;
///
/// let event = AthleteStats {
///     activity_stats: ActivityStats::default(),
///     activities: vec![],
///     timestamp: Timestamp::from(Utc::now()),
/// };
/// assert!(event.activities.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteStats {
    /// Totals across the recent, year-to-date and all-time buckets
    pub activity_stats: ActivityStats,
    /// Recent activities in the order returned by Strava
    pub activities: Vec<Activity>,
    /// When this event was generated
    pub timestamp: Timestamp,
}

/// Aggregated activity totals of an athlete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    /// Longest distance ridden in meters
    pub biggest_ride_distance: f64,
    /// Rides of the last four weeks
    pub recent_ride_totals: ActivityTotal,
    /// Runs of the last four weeks
    pub recent_run_totals: ActivityTotal,
    pub year_to_date_ride_totals: ActivityTotal,
    pub year_to_date_run_totals: ActivityTotal,
    pub all_ride_totals: ActivityTotal,
    pub all_run_totals: ActivityTotal,
}

/// Totals of one bucket of activities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTotal {
    /// Number of activities
    pub count: i64,
    /// Total distance in meters
    pub distance: f64,
    /// Total moving time in seconds
    pub moving_time: i64,
}

/// A single completed activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: i64,
    /// Strava sport type, e.g. `Ride`, `Run`, `TrailRun`
    pub sport_type: String,
    /// Local start time of the activity
    pub timestamp: Timestamp,
}

/// Point in time as seconds and nanoseconds since the Unix epoch
///
/// Mirrors the well-known protobuf timestamp so consumers of the queue can
/// decode events without a date parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Self {
            seconds: time.timestamp(),
            nanos: time.timestamp_subsec_nanos() as i32,
        }
    }
}

impl Timestamp {
    /// Convert back into a `DateTime`, `None` if out of range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos as u32)
    }
}
