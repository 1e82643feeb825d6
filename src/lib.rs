// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # HDB Datasource Strava
//!
//! A scheduled datasource collecting an athlete's summary statistics and
//! recent activities from Strava. Every invocation produces a single event
//! which is handed to the message queue configured by `hdb.queue`.
//!
//! ## Architecture
//!
//! - **Auth**: picks the OAuth2 grant (refresh token or authorization code)
//!   and produces a token provider
//! - **Providers**: read-only Strava API client
//! - **Collector**: fetches stats and activities and maps them into an event
//! - **Publisher**: hands the event to the queue
//! - **Config / Secrets**: key/value configuration and secret lookup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use hdb_datasource_strava::collector::StravaCollector;
//! use hdb_datasource_strava::config::Config;
//! use hdb_datasource_strava::publisher::StdoutPublisher;
//! use hdb_datasource_strava::scheduled::ScheduledCollector;
//! use hdb_datasource_strava::secrets::EnvironmentSecretsManager;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let secrets = EnvironmentSecretsManager::new();
//!
//!     let datasource = StravaCollector::new(&config, &secrets)?;
//!     let collector = ScheduledCollector::new(
//!         config.get_or("hdb.queue", "de.tsl.hdb.strava"),
//!         Box::new(datasource),
//!         Box::new(StdoutPublisher),
//!     );
//!
//!     collector.run().await?;
//!     Ok(())
//! }
//! ```

/// OAuth2 grant selection and token provider
pub mod auth;

/// Fetching and mapping of athlete data into events
pub mod collector;

/// Configuration management
pub mod config;

/// Configuration keys, secret names and defaults
pub mod constants;

/// Error types
pub mod error;

/// Structured logging
pub mod logging;

/// Event models
pub mod models;

/// OAuth2 token endpoint client
pub mod oauth2_client;

/// Fitness API clients
pub mod providers;

/// Event handoff to the message queue
pub mod publisher;

/// Scheduled entry point
pub mod scheduled;

/// Secret store abstraction
pub mod secrets;

pub use error::{DatasourceError, Result};
