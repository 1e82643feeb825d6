// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Configuration keys, secret names, endpoints and default values used by the
//! Strava datasource.

/// Keys recognized in the configuration source
pub mod config_keys {
    /// OAuth2 token endpoint (required)
    pub const STRAVA_TOKEN_URL: &str = "strava.tokenurl";
    /// OAuth2 browser authorization endpoint
    pub const STRAVA_AUTH_URL: &str = "strava.authurl";
    /// Redirect target registered for the Strava application
    pub const STRAVA_REDIRECT_URL: &str = "strava.redirecturl";
    /// Base URL of the Strava REST API
    pub const STRAVA_API_URL: &str = "strava.apiurl";
    /// Athlete whose stats and activities are collected (required)
    pub const STRAVA_ATHLETE_ID: &str = "strava.athleteid";
    pub const STRAVA_ACTIVITY_COUNT: &str = "strava.activitycount";
    pub const STRAVA_ACTIVITY_DAYS: &str = "strava.activitydays";
    /// Queue the produced events are published to
    pub const HDB_QUEUE: &str = "hdb.queue";
    pub const LOG_LEVEL: &str = "log.level";
    pub const LOG_FORMAT: &str = "log.format";

    /// Every key that can be overridden from the environment
    pub const ALL: &[&str] = &[
        STRAVA_TOKEN_URL,
        STRAVA_AUTH_URL,
        STRAVA_REDIRECT_URL,
        STRAVA_API_URL,
        STRAVA_ATHLETE_ID,
        STRAVA_ACTIVITY_COUNT,
        STRAVA_ACTIVITY_DAYS,
        HDB_QUEUE,
        LOG_LEVEL,
        LOG_FORMAT,
    ];
}

/// Secret names looked up in the secret store
pub mod secret_keys {
    pub const STRAVA_CLIENT_ID: &str = "STRAVA_CLIENT_ID";
    pub const STRAVA_CLIENT_SECRET: &str = "STRAVA_CLIENT_SECRET";
    /// Long-lived refresh token, preferred over an authorization code
    pub const STRAVA_REFRESH_TOKEN: &str = "STRAVA_REFRESH_TOKEN";
    /// One-time authorization code, only needed without a refresh token
    pub const STRAVA_AUTH_CODE: &str = "STRAVA_AUTH_CODE";
}

/// Environment variables read during bootstrap
pub mod env_vars {
    /// Fallback for `strava.athleteid`
    pub const STRAVA_ATHLETE_ID: &str = "STRAVA_ATHLETE_ID";
    /// Path of the TOML configuration file
    pub const CONFIG_FILE: &str = "HDB_CONFIG_FILE";
}

/// External API endpoints
pub mod endpoints {
    pub const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";
    pub const STRAVA_AUTH_URL: &str = "https://www.strava.com/oauth/authorize";
    pub const STRAVA_REDIRECT_URL: &str = "http://localhost:8080/callback";
}

/// OAuth2 settings
pub mod oauth {
    /// Scopes requested for every token exchange
    pub const STRAVA_SCOPES: &[&str] = &["read", "activity:read"];

    /// Tokens expiring within this window are exchanged again before use
    pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;
}

/// Default values applied when a key is absent from configuration
pub mod defaults {
    pub const ACTIVITY_COUNT: i64 = 5;
    pub const ACTIVITY_DAYS: i64 = 30;
    pub const HDB_QUEUE: &str = "de.tsl.hdb.strava";
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_FORMAT: &str = "json";
    pub const SERVICE_NAME: &str = "hdb-datasource-strava";
    pub const CONFIG_DIR: &str = "hdb-datasource-strava";
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}
