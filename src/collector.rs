// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Strava datasource: collects stats and recent activities of one athlete.
//!
//! Required config:
//! - `strava.tokenurl`: OAuth2 token endpoint
//! - `strava.athleteid`: athlete to collect for, falls back to `STRAVA_ATHLETE_ID`
//!
//! Optional config:
//! - `strava.activitycount`: number of activities per event, default 5
//! - `strava.activitydays`: only activities started within this many days, default 30
//! - `strava.apiurl`: Strava API base URL

use crate::auth::{create_token_provider, TokenSource};
use crate::config::Config;
use crate::constants::{config_keys, defaults, endpoints, env_vars};
use crate::error::{DatasourceError, Result};
use crate::logging::AppLogger;
use crate::models::{Activity, AthleteStats, Timestamp};
use crate::providers::strava::{
    ApiContext, Pagination, StravaActivityStats, StravaApiClient, SummaryActivity, TimeFilter,
};
use crate::providers::DataSource;
use crate::secrets::SecretsManager;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::time::Instant;
use tracing::info;

/// How many activities to collect and from how far back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub activity_count: u32,
    pub activity_window_days: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            activity_count: defaults::ACTIVITY_COUNT as u32,
            activity_window_days: defaults::ACTIVITY_DAYS as u32,
        }
    }
}

impl FetchSettings {
    /// Read settings from config, applying defaults for absent keys.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = Self {
            activity_count: positive(
                config_keys::STRAVA_ACTIVITY_COUNT,
                config.get_as_int(config_keys::STRAVA_ACTIVITY_COUNT, defaults::ACTIVITY_COUNT)?,
            )?,
            activity_window_days: positive(
                config_keys::STRAVA_ACTIVITY_DAYS,
                config.get_as_int(config_keys::STRAVA_ACTIVITY_DAYS, defaults::ACTIVITY_DAYS)?,
            )?,
        };

        // reject windows reaching past the earliest representable date
        settings.window_start(Utc::now())?;
        Ok(settings)
    }

    /// Only activities started after this instant are collected.
    pub fn window_start(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        now.checked_sub_signed(Duration::days(i64::from(self.activity_window_days)))
            .ok_or_else(|| {
                DatasourceError::Configuration(format!(
                    "{} is too large: {} days",
                    config_keys::STRAVA_ACTIVITY_DAYS,
                    self.activity_window_days
                ))
            })
    }
}

fn positive(key: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            DatasourceError::Configuration(format!(
                "{} must be a positive integer (zero is not allowed), got {}",
                key, value
            ))
        })
}

/// Resolve the athlete id from config, falling back to the environment.
pub fn resolve_athlete_id(config: &Config, env_fallback: Option<String>) -> Result<i64> {
    let raw = config
        .get(config_keys::STRAVA_ATHLETE_ID)
        .or(env_fallback)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            DatasourceError::Configuration("No athlete Id found in config".to_string())
        })?;

    raw.trim().parse().map_err(|_| {
        DatasourceError::Configuration(format!("Invalid athlete Id: {}", raw))
    })
}

/// Collects stats and recent activities of one athlete
pub struct StravaCollector {
    api: StravaApiClient,
    tokens: Box<dyn TokenSource>,
    context: ApiContext,
    settings: FetchSettings,
}

impl std::fmt::Debug for StravaCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StravaCollector")
            .field("context", &self.context)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl StravaCollector {
    /// Build a collector from configuration and secrets.
    pub fn new(config: &Config, secrets: &dyn SecretsManager) -> Result<Self> {
        let athlete_id =
            resolve_athlete_id(config, std::env::var(env_vars::STRAVA_ATHLETE_ID).ok())?;
        let tokens = create_token_provider(config, secrets)?;
        let settings = FetchSettings::from_config(config)?;
        let base_url = config.get_or(config_keys::STRAVA_API_URL, endpoints::STRAVA_API_BASE);

        info!(
            athlete_id,
            activity_count = settings.activity_count,
            activity_days = settings.activity_window_days,
            "Strava collector created"
        );

        Ok(Self::with_parts(
            Box::new(tokens),
            ApiContext::new(athlete_id, &base_url),
            settings,
        ))
    }

    /// Assemble a collector from already resolved parts.
    pub fn with_parts(
        tokens: Box<dyn TokenSource>,
        context: ApiContext,
        settings: FetchSettings,
    ) -> Self {
        Self {
            api: StravaApiClient::new(),
            tokens,
            context,
            settings,
        }
    }

    /// Replace the token source, e.g. with a pre-issued token.
    pub fn with_token_source(mut self, tokens: Box<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn context(&self) -> &ApiContext {
        &self.context
    }

    pub fn settings(&self) -> FetchSettings {
        self.settings
    }

    /// Call the stats and activities endpoints and build one event.
    ///
    /// Any failure discards the whole cycle; no partial event is returned.
    pub async fn fetch(&self) -> Result<AthleteStats> {
        let started = Instant::now();
        let access_token = self.tokens.access_token().await?;

        let stats = self.api.athlete_stats(&self.context, &access_token).await?;

        let filter = TimeFilter::after(self.settings.window_start(Utc::now())?);
        let pagination = Pagination::new(1, self.settings.activity_count);
        let activities = self
            .api
            .athlete_activities(&self.context, &access_token, &filter, &pagination)
            .await?;

        AppLogger::log_fetch_event(
            self.context.athlete_id,
            activities.len(),
            started.elapsed().as_millis() as u64,
        );
        Ok(as_event(&stats, &activities, Utc::now()))
    }
}

#[async_trait]
impl DataSource for StravaCollector {
    async fn fetch(&self) -> Result<AthleteStats> {
        StravaCollector::fetch(self).await
    }

    fn source_name(&self) -> &'static str {
        "strava"
    }
}

/// Map API results into an event. Activities keep the upstream order.
pub fn as_event(
    stats: &StravaActivityStats,
    activities: &[SummaryActivity],
    generated_at: DateTime<Utc>,
) -> AthleteStats {
    AthleteStats {
        activity_stats: stats.into(),
        activities: activities.iter().map(Activity::from).collect(),
        timestamp: Timestamp::from(generated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::strava::StravaActivityTotal;
    use chrono::TimeZone;

    fn summary(name: &str, distance: f64, minutes: i64, sport: &str, day: u32) -> SummaryActivity {
        let start = Utc.with_ymd_and_hms(2024, 3, day, 7, 30, 15).unwrap();
        SummaryActivity {
            id: i64::from(day),
            name: name.to_string(),
            distance,
            moving_time: minutes * 60,
            elapsed_time: minutes * 60 + 120,
            total_elevation_gain: 0.0,
            sport_type: sport.to_string(),
            start_date: start,
            start_date_local: start,
            timezone: None,
            average_speed: None,
            max_speed: None,
        }
    }

    #[test]
    fn test_fetch_settings_defaults() {
        let settings = FetchSettings::from_config(&Config::default()).unwrap();
        assert_eq!(settings.activity_count, 5);
        assert_eq!(settings.activity_window_days, 30);
        assert_eq!(settings, FetchSettings::default());
    }

    #[test]
    fn test_fetch_settings_overrides() {
        let config = Config::from_pairs([
            ("strava.activitycount", "12"),
            ("strava.activitydays", "7"),
        ]);
        let settings = FetchSettings::from_config(&config).unwrap();
        assert_eq!(settings.activity_count, 12);
        assert_eq!(settings.activity_window_days, 7);
    }

    #[test]
    fn test_fetch_settings_rejects_non_positive() {
        let config = Config::from_pairs([("strava.activitycount", "0")]);
        assert!(FetchSettings::from_config(&config)
            .unwrap_err()
            .is_configuration_error());

        let config = Config::from_pairs([("strava.activitydays", "-3")]);
        assert!(FetchSettings::from_config(&config).is_err());
    }

    #[test]
    fn test_fetch_settings_zero_message() {
        let config = Config::from_pairs([("strava.activitydays", "0")]);
        let err = FetchSettings::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("zero is not allowed"));
        assert!(err.to_string().contains("strava.activitydays"));
    }

    #[test]
    fn test_fetch_settings_rejects_unrepresentable_window() {
        let config = Config::from_pairs([("strava.activitydays", "100000000")]);
        let err = FetchSettings::from_config(&config).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("too large"));

        let settings = FetchSettings {
            activity_count: 5,
            activity_window_days: u32::MAX,
        };
        assert!(settings
            .window_start(Utc::now())
            .unwrap_err()
            .is_configuration_error());
    }

    #[test]
    fn test_window_start() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let settings = FetchSettings::default();
        assert_eq!(
            settings.window_start(now).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_resolve_athlete_id() {
        let config = Config::from_pairs([("strava.athleteid", "123")]);
        assert_eq!(resolve_athlete_id(&config, Some("456".into())).unwrap(), 123);
        assert_eq!(
            resolve_athlete_id(&Config::default(), Some("456".into())).unwrap(),
            456
        );
    }

    #[test]
    fn test_resolve_athlete_id_errors() {
        let err = resolve_athlete_id(&Config::default(), None).unwrap_err();
        assert!(err.is_configuration_error());

        let config = Config::from_pairs([("strava.athleteid", "athlete-one")]);
        assert!(resolve_athlete_id(&config, None)
            .unwrap_err()
            .is_configuration_error());
    }

    #[test]
    fn test_as_event_is_lossless_and_ordered() {
        let activities = vec![
            summary("Morning Ride", 42195.5, 95, "Ride", 20),
            summary("Lunch Run", 10012.3, 48, "Run", 18),
            summary("Gravel Loop", 61000.0, 150, "GravelRide", 2),
        ];
        let stats = StravaActivityStats {
            recent_ride_totals: StravaActivityTotal {
                count: 2,
                distance: 103195.5,
                moving_time: 14700,
                ..Default::default()
            },
            ..Default::default()
        };
        let generated_at = Utc.with_ymd_and_hms(2024, 3, 21, 6, 0, 0).unwrap();

        let event = as_event(&stats, &activities, generated_at);

        assert_eq!(event.activities.len(), activities.len());
        for (mapped, source) in event.activities.iter().zip(&activities) {
            assert_eq!(mapped.name, source.name);
            assert_eq!(mapped.distance, source.distance);
            assert_eq!(mapped.moving_time, source.moving_time);
            assert_eq!(mapped.sport_type, source.sport_type);
            assert_eq!(mapped.timestamp.seconds, source.start_date_local.timestamp());
        }
        assert_eq!(event.activity_stats.recent_ride_totals.distance, 103195.5);
        assert_eq!(event.timestamp, Timestamp::from(generated_at));
    }

    #[test]
    fn test_as_event_without_activities() {
        let event = as_event(&StravaActivityStats::default(), &[], Utc::now());
        assert!(event.activities.is_empty());
    }
}
