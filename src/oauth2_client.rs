// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::constants::oauth::TOKEN_REFRESH_MARGIN_SECS;
use crate::error::{body_snippet, DatasourceError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone)]
pub struct OAuth2Config {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OAuth2Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

impl OAuth2Token {
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            expires_at <= Utc::now()
        } else {
            false
        }
    }

    pub fn will_expire_soon(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            expires_at <= Utc::now() + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)
        } else {
            false
        }
    }
}

/// Token endpoint client using in-body client authentication
pub struct OAuth2Client {
    config: OAuth2Config,
    client: reqwest::Client,
}

impl OAuth2Client {
    pub fn new(config: OAuth2Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// URL the athlete opens in a browser to grant access and receive a
    /// one-time authorization code.
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let mut url = Url::parse(&self.config.auth_url).map_err(|e| {
            DatasourceError::Configuration(format!("Invalid auth URL: {}", e))
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("approval_prompt", "auto")
            .append_pair("scope", &self.config.scopes.join(","))
            .append_pair("state", state);

        Ok(url.to_string())
    }

    /// Exchange a one-time authorization code for an access/refresh token pair.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuth2Token> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.request_token(&params).await
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<OAuth2Token> {
        let scope = self.config.scopes.join(",");
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
            ("scope", scope.as_str()),
        ];
        self.request_token(&params).await
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<OAuth2Token> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| DatasourceError::Auth(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DatasourceError::Auth(format!(
                "Token exchange failed with status {}: {}",
                status,
                body_snippet(&body)
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            DatasourceError::Auth(format!("Failed to parse token response: {}", e))
        })?;

        Ok(token_from_response(token, Utc::now()))
    }
}

/// Token endpoint response. Strava reports an absolute `expires_at`,
/// standard OAuth2 servers a relative `expires_in`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    refresh_token: Option<String>,
    scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn token_from_response(response: TokenResponse, now: DateTime<Utc>) -> OAuth2Token {
    let expires_at = response
        .expires_at
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .or_else(|| response.expires_in.map(|secs| now + Duration::seconds(secs)));

    OAuth2Token {
        access_token: response.access_token,
        token_type: response.token_type,
        expires_at,
        refresh_token: response.refresh_token,
        scope: response.scope,
    }
}
