// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Authentication
//!
//! Builds the token provider used for every Strava API call.
//!
//! `STRAVA_CLIENT_ID` and `STRAVA_CLIENT_SECRET` are mandatory. When
//! `STRAVA_REFRESH_TOKEN` is available it is exchanged for access tokens
//! directly; otherwise a one-time `STRAVA_AUTH_CODE` is exchanged for the
//! initial access/refresh token pair.

use crate::config::Config;
use crate::constants::{config_keys, defaults, endpoints, oauth, secret_keys};
use crate::error::{DatasourceError, Result};
use crate::logging::AppLogger;
use crate::oauth2_client::{OAuth2Client, OAuth2Config, OAuth2Token};
use crate::secrets::SecretsManager;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Anything that can produce a valid bearer token on demand
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Client credentials read from the secret store
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Initial grant used to obtain the first access token
#[derive(Clone, PartialEq, Eq)]
pub enum GrantStrategy {
    RefreshFlow(String),
    AuthCodeFlow(String),
}

impl GrantStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RefreshFlow(_) => "refresh_token",
            Self::AuthCodeFlow(_) => "authorization_code",
        }
    }
}

impl std::fmt::Debug for GrantStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple(match self {
            Self::RefreshFlow(_) => "RefreshFlow",
            Self::AuthCodeFlow(_) => "AuthCodeFlow",
        })
        .field(&"<redacted>")
        .finish()
    }
}

enum TokenState {
    Pending(GrantStrategy),
    Active(OAuth2Token),
}

/// Token provider that performs the initial grant on first use and
/// re-exchanges the refresh token whenever the access token is about to expire.
pub struct TokenProvider {
    client: OAuth2Client,
    state: Mutex<TokenState>,
}

impl TokenProvider {
    pub fn new(config: OAuth2Config, strategy: GrantStrategy) -> Self {
        Self {
            client: OAuth2Client::new(config),
            state: Mutex::new(TokenState::Pending(strategy)),
        }
    }

    /// The grant the provider starts from, or `None` once a token was issued.
    pub async fn pending_strategy(&self) -> Option<GrantStrategy> {
        match &*self.state.lock().await {
            TokenState::Pending(strategy) => Some(strategy.clone()),
            TokenState::Active(_) => None,
        }
    }

    async fn exchange(&self, strategy: &GrantStrategy) -> Result<OAuth2Token> {
        let result = match strategy {
            GrantStrategy::RefreshFlow(refresh_token) => {
                self.client.refresh_token(refresh_token).await
            }
            GrantStrategy::AuthCodeFlow(code) => self.client.exchange_code(code).await,
        };
        AppLogger::log_oauth_event(strategy.name(), result.is_ok());
        result
    }
}

#[async_trait]
impl TokenSource for TokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        let strategy = match &*state {
            TokenState::Active(token) if !token.will_expire_soon() => {
                return Ok(token.access_token.clone());
            }
            TokenState::Active(token) => {
                let refresh_token = token.refresh_token.clone().ok_or_else(|| {
                    DatasourceError::Auth(
                        "Access token expired and no refresh token is available".to_string(),
                    )
                })?;
                debug!("Access token expiring, refreshing");
                GrantStrategy::RefreshFlow(refresh_token)
            }
            TokenState::Pending(strategy) => strategy.clone(),
        };

        let mut token = self.exchange(&strategy).await?;
        // keep the previous refresh token if the endpoint did not rotate it
        if token.refresh_token.is_none() {
            if let GrantStrategy::RefreshFlow(previous) = strategy {
                token.refresh_token = Some(previous);
            }
        }

        let access_token = token.access_token.clone();
        *state = TokenState::Active(token);
        Ok(access_token)
    }
}

/// Token source yielding a fixed, pre-issued bearer token
#[derive(Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Read the token URL from config and the client credentials from the secret store.
pub fn load_credentials(config: &Config, secrets: &dyn SecretsManager) -> Result<Credentials> {
    let token_url = config.get(config_keys::STRAVA_TOKEN_URL).ok_or_else(|| {
        DatasourceError::Configuration("No token url found in config".to_string())
    })?;

    let client_id = secrets.obtain(secret_keys::STRAVA_CLIENT_ID)?;
    let client_secret = secrets.obtain(secret_keys::STRAVA_CLIENT_SECRET)?;

    Ok(Credentials {
        client_id,
        client_secret,
        token_url,
    })
}

/// Pick the initial grant: a refresh token when available, else an authorization code.
pub fn select_grant_strategy(secrets: &dyn SecretsManager) -> Result<GrantStrategy> {
    if let Ok(refresh_token) = secrets.obtain(secret_keys::STRAVA_REFRESH_TOKEN) {
        return Ok(GrantStrategy::RefreshFlow(refresh_token));
    }

    let code = secrets.obtain(secret_keys::STRAVA_AUTH_CODE).map_err(|_| {
        DatasourceError::Credential(format!(
            "Neither {} nor {} is available",
            secret_keys::STRAVA_REFRESH_TOKEN,
            secret_keys::STRAVA_AUTH_CODE
        ))
    })?;
    Ok(GrantStrategy::AuthCodeFlow(code))
}

/// OAuth2 client settings for the given credentials.
pub fn oauth2_config(config: &Config, credentials: Credentials) -> OAuth2Config {
    OAuth2Config {
        client_id: credentials.client_id,
        client_secret: credentials.client_secret,
        auth_url: config.get_or(config_keys::STRAVA_AUTH_URL, endpoints::STRAVA_AUTH_URL),
        token_url: credentials.token_url,
        redirect_uri: config.get_or(
            config_keys::STRAVA_REDIRECT_URL,
            endpoints::STRAVA_REDIRECT_URL,
        ),
        scopes: oauth::STRAVA_SCOPES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Build the token provider for this invocation.
///
/// Fails with a configuration error when the token URL is missing (before any
/// secret is read) and with a credential error when client credentials or
/// both initial grants are missing.
pub fn create_token_provider(
    config: &Config,
    secrets: &dyn SecretsManager,
) -> Result<TokenProvider> {
    let credentials = load_credentials(config, secrets)?;
    let strategy = select_grant_strategy(secrets)?;

    info!(
        grant = strategy.name(),
        service = defaults::SERVICE_NAME,
        "Token provider created"
    );
    Ok(TokenProvider::new(
        oauth2_config(config, credentials),
        strategy,
    ))
}
