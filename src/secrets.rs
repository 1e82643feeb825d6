// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Secret store abstraction
//!
//! Secrets are looked up by name once during startup. Secret values are never
//! logged; only their names appear in error messages.

use crate::error::{DatasourceError, Result};
use std::collections::HashMap;

/// Lookup of secrets by name
pub trait SecretsManager: Send + Sync {
    /// Obtain a secret. A missing or empty secret is a [`DatasourceError::Credential`].
    fn obtain(&self, name: &str) -> Result<String>;
}

fn not_found(name: &str) -> DatasourceError {
    DatasourceError::Credential(format!("secret not found: {}", name))
}

/// Reads secrets from the process environment.
///
/// Serverless runtimes inject secret bindings as environment variables, so
/// this is the production secret store.
#[derive(Debug, Default, Clone)]
pub struct EnvironmentSecretsManager;

impl EnvironmentSecretsManager {
    pub fn new() -> Self {
        dotenv::dotenv().ok();
        Self
    }
}

impl SecretsManager for EnvironmentSecretsManager {
    fn obtain(&self, name: &str) -> Result<String> {
        std::env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| not_found(name))
    }
}

/// Secret store backed by a fixed map
#[derive(Debug, Default, Clone)]
pub struct StaticSecretsManager {
    secrets: HashMap<String, String>,
}

impl StaticSecretsManager {
    pub fn with_secret(mut self, name: &str, value: &str) -> Self {
        self.secrets.insert(name.to_string(), value.to_string());
        self
    }
}

impl SecretsManager for StaticSecretsManager {
    fn obtain(&self, name: &str) -> Result<String> {
        self.secrets
            .get(name)
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_secrets_lookup() {
        let secrets = StaticSecretsManager::default()
            .with_secret("STRAVA_CLIENT_ID", "123456789")
            .with_secret("STRAVA_AUTH_CODE", "");

        assert_eq!(secrets.obtain("STRAVA_CLIENT_ID").unwrap(), "123456789");

        let err = secrets.obtain("STRAVA_CLIENT_SECRET").unwrap_err();
        assert!(err.is_credential_error());
        assert!(err.to_string().contains("STRAVA_CLIENT_SECRET"));

        // empty values count as missing
        assert!(secrets.obtain("STRAVA_AUTH_CODE").is_err());
    }

    #[test]
    fn test_environment_secrets_missing() {
        let secrets = EnvironmentSecretsManager;
        let err = secrets
            .obtain("HDB_TEST_SECRET_THAT_IS_NEVER_SET_4711")
            .unwrap_err();
        assert!(err.is_credential_error());
    }
}
