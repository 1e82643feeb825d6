// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Structured logging for the collector
//!
//! JSON output is the default since function runtimes ship stdout/stderr to
//! their log aggregation. Events go to stderr so stdout stays reserved for
//! published messages.

use crate::config::Config;
use crate::constants::{config_keys, defaults};
use anyhow::Result;
use std::env;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Service name for structured logging
    pub service_name: String,
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: LogFormat::Json,
            include_location: false,
            service_name: defaults::SERVICE_NAME.to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "production".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Build logging settings from the loaded config.
    ///
    /// `RUST_LOG`, `LOG_FORMAT` and `ENVIRONMENT` take precedence over config
    /// values.
    pub fn from_config(config: &Config) -> Self {
        Self::from_sources(config, |key| env::var(key).ok())
    }

    fn from_sources<F>(config: &Config, get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = get_env("RUST_LOG")
            .unwrap_or_else(|| config.get_or(config_keys::LOG_LEVEL, defaults::LOG_LEVEL));
        let format = LogFormat::parse(
            &get_env("LOG_FORMAT")
                .unwrap_or_else(|| config.get_or(config_keys::LOG_FORMAT, defaults::LOG_FORMAT)),
        );
        let environment = get_env("ENVIRONMENT").unwrap_or_else(|| "production".to_string());

        Self {
            level,
            format,
            include_location: environment != "production"
                || get_env("LOG_INCLUDE_LOCATION").is_some(),
            environment,
            ..Self::default()
        }
    }

    /// Initialize the global tracing subscriber
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(env_filter);

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .json()
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stderr);

                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stderr);

                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stderr);

                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Strava datasource starting up"
        );
    }
}

/// Application-specific logging utilities
pub struct AppLogger;

impl AppLogger {
    /// Log a token exchange with the OAuth2 endpoint
    pub fn log_oauth_event(grant: &str, success: bool) {
        if success {
            info!(oauth.grant = %grant, oauth.success = true, "OAuth token exchange");
        } else {
            warn!(oauth.grant = %grant, oauth.success = false, "OAuth token exchange");
        }
    }

    /// Log a completed fetch of stats and activities
    pub fn log_fetch_event(athlete_id: i64, activity_count: usize, duration_ms: u64) {
        info!(
            athlete.id = athlete_id,
            fetch.activities = activity_count,
            fetch.duration_ms = duration_ms,
            "Fetched athlete stats and activities"
        );
    }

    /// Log the handoff of an event to the queue
    pub fn log_publish_event(queue: &str, activity_count: usize, success: bool) {
        if success {
            info!(
                publish.queue = %queue,
                publish.activities = activity_count,
                publish.success = true,
                "Event published"
            );
        } else {
            warn!(
                publish.queue = %queue,
                publish.activities = activity_count,
                publish.success = false,
                "Event publishing failed"
            );
        }
    }
}
