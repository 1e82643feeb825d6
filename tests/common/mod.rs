// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{Duration, Utc};
use hdb_datasource_strava::config::Config;
use hdb_datasource_strava::secrets::StaticSecretsManager;
use serde_json::json;

pub const ATHLETE_ID: i64 = 123;
pub const ACCESS_TOKEN: &str = "<ACCESS_TOKEN>";

/// Config pointing the token endpoint and the API at a mock server
pub fn config_for_server(server_url: &str) -> Config {
    Config::from_pairs([
        ("strava.tokenurl", format!("{}/oauth/token", server_url)),
        ("strava.apiurl", server_url.to_string()),
        ("strava.athleteid", ATHLETE_ID.to_string()),
    ])
}

pub fn client_secrets() -> StaticSecretsManager {
    StaticSecretsManager::default()
        .with_secret("STRAVA_CLIENT_ID", "123456789")
        .with_secret("STRAVA_CLIENT_SECRET", "987654321")
}

pub fn secrets_with_refresh_token() -> StaticSecretsManager {
    client_secrets().with_secret("STRAVA_REFRESH_TOKEN", "xxx")
}

/// Strava token endpoint response
pub fn token_response(access_token: &str) -> serde_json::Value {
    json!({
        "token_type": "Bearer",
        "access_token": access_token,
        "refresh_token": "<REFRESH_TOKEN>",
        "expires_at": (Utc::now() + Duration::hours(6)).timestamp(),
        "expires_in": 21600
    })
}

pub fn athlete_stats_response() -> serde_json::Value {
    json!({
        "biggest_ride_distance": 175454.0,
        "biggest_climb_elevation_gain": 1882.6999999999998,
        "recent_ride_totals": {
            "count": 3,
            "distance": 152436.5,
            "moving_time": 21780,
            "elapsed_time": 23640,
            "elevation_gain": 1411.0,
            "achievement_count": 2
        },
        "recent_run_totals": {
            "count": 4,
            "distance": 41250.0,
            "moving_time": 14020,
            "elapsed_time": 14800,
            "elevation_gain": 388.0,
            "achievement_count": 0
        },
        "recent_swim_totals": {
            "count": 0, "distance": 0, "moving_time": 0,
            "elapsed_time": 0, "elevation_gain": 0, "achievement_count": 0
        },
        "ytd_ride_totals": {
            "count": 41, "distance": 2150331, "moving_time": 301233,
            "elapsed_time": 340012, "elevation_gain": 21322
        },
        "ytd_run_totals": {
            "count": 52, "distance": 488120, "moving_time": 166540,
            "elapsed_time": 170321, "elevation_gain": 4310
        },
        "ytd_swim_totals": {
            "count": 0, "distance": 0, "moving_time": 0,
            "elapsed_time": 0, "elevation_gain": 0
        },
        "all_ride_totals": {
            "count": 412, "distance": 19021443, "moving_time": 2700112,
            "elapsed_time": 3010448, "elevation_gain": 190231
        },
        "all_run_totals": {
            "count": 655, "distance": 6010442, "moving_time": 2103377,
            "elapsed_time": 2204112, "elevation_gain": 51230
        },
        "all_swim_totals": {
            "count": 2, "distance": 3000, "moving_time": 3900,
            "elapsed_time": 4100, "elevation_gain": 0
        }
    })
}

pub fn athlete_activities_response() -> serde_json::Value {
    json!([
        {
            "resource_state": 2,
            "id": 154504250376_i64,
            "name": "Evening Ride",
            "distance": 24931.4,
            "moving_time": 4500,
            "elapsed_time": 4500,
            "total_elevation_gain": 0,
            "type": "Ride",
            "sport_type": "MountainBikeRide",
            "start_date": "2024-03-14T17:15:09Z",
            "start_date_local": "2024-03-14T18:15:09Z",
            "timezone": "(GMT+01:00) Europe/Berlin",
            "average_speed": 5.54,
            "max_speed": 11.0
        },
        {
            "resource_state": 2,
            "id": 154504250377_i64,
            "name": "Morning Run",
            "distance": 10012.0,
            "moving_time": 2890,
            "elapsed_time": 3010,
            "total_elevation_gain": 48.2,
            "type": "Run",
            "sport_type": "Run",
            "start_date": "2024-03-12T05:45:00Z",
            "start_date_local": "2024-03-12T06:45:00Z",
            "timezone": "(GMT+01:00) Europe/Berlin",
            "average_speed": 3.46,
            "max_speed": 4.9
        }
    ])
}

pub fn fault_response() -> serde_json::Value {
    json!({
        "message": "Internal Server Error",
        "errors": [{ "resource": "Athlete", "field": "", "code": "server error" }]
    })
}
