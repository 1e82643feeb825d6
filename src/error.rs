// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types shared by the authenticator, the collector and the publisher.
//!
//! Every error is terminal for the current invocation. The scheduler that
//! triggers the collector owns any retry-on-schedule behavior.

/// Errors raised while collecting and publishing athlete data
#[derive(Debug, thiserror::Error)]
pub enum DatasourceError {
    /// A required configuration key is missing or has an invalid value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required secret is missing or the secret store is unreachable
    #[error("Credential error: {0}")]
    Credential(String),

    /// The OAuth2 token exchange failed
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A call to the fitness API failed, including non-2xx responses
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The event could not be handed to the publishing collaborator
    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DatasourceError {
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::Credential(_))
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    pub fn is_upstream_error(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, DatasourceError>;

/// Maximum number of response body characters carried in an error message
pub(crate) const ERROR_BODY_SNIPPET_LEN: usize = 256;

/// Truncate a response body so error messages stay readable in logs.
pub(crate) fn body_snippet(body: &str) -> String {
    body.chars().take(ERROR_BODY_SNIPPET_LEN).collect()
}
