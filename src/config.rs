// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the Strava datasource
//!
//! Configuration is a flat key/value store with lowercase dotted keys such as
//! `strava.tokenurl`. It is loaded once at process start from a TOML file,
//! with environment variables overriding file values.

pub mod environment;

use crate::error::{DatasourceError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use toml::Value;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Config {
    values: HashMap<String, Value>,
}

impl Config {
    /// Load configuration from a TOML file and apply environment overrides.
    ///
    /// A missing file is not an error: the returned config then only holds
    /// values supplied through the environment.
    pub fn load(path: Option<String>) -> Result<Self> {
        dotenv::dotenv().ok();

        let config_path = environment::resolve_config_path(path);
        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| {
                DatasourceError::Configuration(format!(
                    "Failed to read config file {}: {}",
                    config_path, e
                ))
            })?;
            Self::from_toml_str(&content)?
        } else {
            debug!(path = %config_path, "No config file found, using environment only");
            Self::default()
        };

        environment::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML document, flattening nested tables into dotted keys.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let root: toml::Table = toml::from_str(content).map_err(|e| {
            DatasourceError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        let mut values = HashMap::new();
        flatten_into(&mut values, "", root);
        Ok(Self { values })
    }

    /// Build a config from literal string pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_lowercase(), Value::String(v.into())))
            .collect();
        Self { values }
    }

    /// Set a single value, replacing any existing one.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .insert(key.to_lowercase(), Value::String(value.into()));
    }

    /// Get a value as string. Non-string scalars are rendered as text.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.values.get(&key.to_lowercase())? {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Datetime(d) => Some(d.to_string()),
            Value::Array(_) | Value::Table(_) => None,
        }
    }

    /// Get a value as string, falling back to `default` when absent.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Get an integer value, falling back to `default` when absent.
    ///
    /// Integer values and numeric strings are accepted; anything else is a
    /// configuration error.
    pub fn get_as_int(&self, key: &str, default: i64) -> Result<i64> {
        match self.values.get(&key.to_lowercase()) {
            None => Ok(default),
            Some(Value::Integer(i)) => Ok(*i),
            Some(Value::String(s)) => s.trim().parse().map_err(|_| {
                DatasourceError::Configuration(format!(
                    "Invalid integer value for {}: {}",
                    key, s
                ))
            }),
            Some(other) => Err(DatasourceError::Configuration(format!(
                "Invalid integer value for {}: {}",
                key, other
            ))),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_lowercase())
    }
}

fn flatten_into(values: &mut HashMap<String, Value>, prefix: &str, table: toml::Table) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.to_lowercase()
        } else {
            format!("{}.{}", prefix, key.to_lowercase())
        };
        match value {
            Value::Table(nested) => flatten_into(values, &full_key, nested),
            scalar => {
                values.insert(full_key, scalar);
            }
        }
    }
}
