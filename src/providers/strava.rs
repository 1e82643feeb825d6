// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::{body_snippet, DatasourceError, Result};
use crate::models::{Activity, ActivityStats, ActivityTotal, Timestamp};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Immutable per-call context: which athlete, which API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiContext {
    pub athlete_id: i64,
    pub base_url: String,
}

impl ApiContext {
    pub fn new(athlete_id: i64, base_url: &str) -> Self {
        Self {
            athlete_id,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

/// Restricts listed activities to a start time window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeFilter {
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

impl TimeFilter {
    pub fn after(after: DateTime<Utc>) -> Self {
        Self {
            after: Some(after),
            before: None,
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![];
        if let Some(after) = self.after {
            query.push(("after", after.timestamp().to_string()));
        }
        if let Some(before) = self.before {
            query.push(("before", before.timestamp().to_string()));
        }
        query
    }
}

/// Read-only client for the Strava REST API
#[derive(Clone, Default)]
pub struct StravaApiClient {
    client: Client,
}

impl StravaApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// `GET /athletes/{id}/stats`
    pub async fn athlete_stats(
        &self,
        ctx: &ApiContext,
        access_token: &str,
    ) -> Result<StravaActivityStats> {
        let url = format!("{}/athletes/{}/stats", ctx.base_url, ctx.athlete_id);
        self.get_json(&url, access_token, &[]).await
    }

    /// `GET /athlete/activities`, filtered and paginated
    pub async fn athlete_activities(
        &self,
        ctx: &ApiContext,
        access_token: &str,
        filter: &TimeFilter,
        pagination: &Pagination,
    ) -> Result<Vec<SummaryActivity>> {
        let url = format!("{}/athlete/activities", ctx.base_url);

        let mut query = vec![
            ("page", pagination.page.to_string()),
            ("per_page", pagination.per_page.to_string()),
        ];
        query.extend(filter.query_pairs());

        self.get_json(&url, access_token, &query).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(url = %url, "Strava API request");

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| DatasourceError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DatasourceError::Upstream(format!(
                "HTTP {}: {}",
                status,
                body_snippet(&body)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DatasourceError::Upstream(format!("JSON parse error: {}", e)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StravaActivityStats {
    pub biggest_ride_distance: f64,
    pub biggest_climb_elevation_gain: f64,
    pub recent_ride_totals: StravaActivityTotal,
    pub recent_run_totals: StravaActivityTotal,
    pub recent_swim_totals: StravaActivityTotal,
    pub ytd_ride_totals: StravaActivityTotal,
    pub ytd_run_totals: StravaActivityTotal,
    pub ytd_swim_totals: StravaActivityTotal,
    pub all_ride_totals: StravaActivityTotal,
    pub all_run_totals: StravaActivityTotal,
    pub all_swim_totals: StravaActivityTotal,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StravaActivityTotal {
    pub count: i64,
    pub distance: f64,
    pub moving_time: i64,
    pub elapsed_time: i64,
    pub elevation_gain: f64,
    pub achievement_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryActivity {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub moving_time: i64,
    #[serde(default)]
    pub elapsed_time: i64,
    #[serde(default)]
    pub total_elevation_gain: f64,
    #[serde(default)]
    pub sport_type: String,
    pub start_date: DateTime<Utc>,
    /// Local wall-clock start, reported by Strava with a `Z` suffix
    pub start_date_local: DateTime<Utc>,
    pub timezone: Option<String>,
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
}

impl From<&StravaActivityTotal> for ActivityTotal {
    fn from(total: &StravaActivityTotal) -> Self {
        ActivityTotal {
            count: total.count,
            distance: total.distance,
            moving_time: total.moving_time,
        }
    }
}

impl From<&StravaActivityStats> for ActivityStats {
    fn from(stats: &StravaActivityStats) -> Self {
        ActivityStats {
            biggest_ride_distance: stats.biggest_ride_distance,
            recent_ride_totals: (&stats.recent_ride_totals).into(),
            recent_run_totals: (&stats.recent_run_totals).into(),
            year_to_date_ride_totals: (&stats.ytd_ride_totals).into(),
            year_to_date_run_totals: (&stats.ytd_run_totals).into(),
            all_ride_totals: (&stats.all_ride_totals).into(),
            all_run_totals: (&stats.all_run_totals).into(),
        }
    }
}

impl From<&SummaryActivity> for Activity {
    fn from(activity: &SummaryActivity) -> Self {
        Activity {
            name: activity.name.clone(),
            distance: activity.distance,
            moving_time: activity.moving_time,
            sport_type: activity.sport_type.clone(),
            timestamp: Timestamp::from(activity.start_date_local),
        }
    }
}
