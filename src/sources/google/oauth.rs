//! OAuth2 authorization-code flow against Google
//!
//! Client credentials come from the `credentials.json` downloaded from the
//! Google Cloud console; per-identity tokens live in the item store.

use std::path::Path;

use chrono::Utc;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GoogleError;
use crate::config::GoogleConfig;

/// Read-only access to calendar and mail
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar.readonly",
    "https://www.googleapis.com/auth/gmail.readonly",
];

/// Tokens this close to expiry are refreshed first
const EXPIRY_BUFFER_SECS: i64 = 60;

/// OAuth client id and secret
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: Secret<String>,
}

/// `credentials.json` holds the client under `installed` or `web`
#[derive(Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub async fn load(path: &Path) -> Result<Self, GoogleError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GoogleError::MissingCredentials(path.display().to_string()));
            }
            Err(e) => return Err(GoogleError::Storage(e.to_string())),
        };

        let file: CredentialsFile = serde_json::from_slice(&bytes)
            .map_err(|e| GoogleError::InvalidResponse(format!("credentials file: {}", e)))?;

        file.installed.or(file.web).ok_or_else(|| {
            GoogleError::InvalidResponse(
                "credentials file has neither an 'installed' nor a 'web' client".to_string(),
            )
        })
    }
}

/// Stored per-identity OAuth tokens
#[derive(Debug, Clone, Deserialize)]
pub struct StoredToken {
    pub access_token: Secret<String>,
    #[serde(default)]
    pub refresh_token: Option<Secret<String>>,
    /// Unix timestamp
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// On-disk shape; secrets are only exposed at write time
#[derive(Serialize)]
struct StoredTokenRecord<'a> {
    access_token: &'a str,
    refresh_token: Option<&'a str>,
    expires_at: Option<i64>,
    scope: Option<&'a str>,
    token_type: &'a str,
}

impl Serialize for StoredToken {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredTokenRecord {
            access_token: self.access_token.expose_secret(),
            refresh_token: self.refresh_token.as_ref().map(|t| t.expose_secret().as_str()),
            expires_at: self.expires_at,
            scope: self.scope.as_deref(),
            token_type: &self.token_type,
        }
        .serialize(serializer)
    }
}

impl StoredToken {
    /// Expired, or within the refresh buffer; tokens without an expiry never expire
    pub fn is_expired(&self, now_ts: i64) -> bool {
        match self.expires_at {
            Some(exp) => now_ts > exp - EXPIRY_BUFFER_SECS,
            None => false,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
    token_type: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<Secret<String>>) -> Result<StoredToken, GoogleError> {
        if let Some(error) = self.error {
            let detail = self.error_description.unwrap_or_default();
            return Err(GoogleError::OAuth(format!("{} {}", error, detail).trim().to_string()));
        }

        let access_token = self
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GoogleError::OAuth("token response has no access_token".to_string()))?;

        Ok(StoredToken {
            access_token: Secret::new(access_token),
            refresh_token: self.refresh_token.map(Secret::new).or(previous_refresh),
            expires_at: self.expires_in.map(|secs| Utc::now().timestamp() + secs),
            scope: self.scope,
            token_type: self.token_type.unwrap_or_else(default_token_type),
        })
    }
}

/// Consent URL for an identity; `state` carries the identity back to the callback
pub fn authorization_url(
    config: &GoogleConfig,
    secrets: &ClientSecrets,
    identity: &str,
) -> Result<String, GoogleError> {
    let scopes = SCOPES.join(" ");
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scopes.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", identity),
        ],
    )
    .map_err(|e| GoogleError::OAuth(format!("invalid auth_url: {}", e)))?;

    Ok(url.to_string())
}

async fn post_token_form(
    http: &Client,
    config: &GoogleConfig,
    params: &[(&str, &str)],
) -> Result<TokenResponse, GoogleError> {
    let response = http
        .post(&config.token_url)
        .form(params)
        .send()
        .await
        .map_err(GoogleError::from_request)?;

    // error bodies carry `error`, so parse regardless of status
    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| GoogleError::InvalidResponse(format!("token endpoint: {}", e)))
}

/// Exchange an authorization code for tokens
pub async fn exchange_code(
    http: &Client,
    config: &GoogleConfig,
    secrets: &ClientSecrets,
    code: &str,
) -> Result<StoredToken, GoogleError> {
    debug!("Exchanging authorization code");
    let params = [
        ("client_id", secrets.client_id.as_str()),
        ("client_secret", secrets.client_secret.expose_secret().as_str()),
        ("code", code),
        ("grant_type", "authorization_code"),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    post_token_form(http, config, &params).await?.into_token(None)
}

/// Refresh an access token; the old refresh token is kept when Google omits a new one
pub async fn refresh_token(
    http: &Client,
    config: &GoogleConfig,
    secrets: &ClientSecrets,
    token: &StoredToken,
) -> Result<StoredToken, GoogleError> {
    let refresh = token
        .refresh_token
        .as_ref()
        .ok_or_else(|| GoogleError::OAuth("no refresh token available".to_string()))?;

    debug!("Refreshing expired access token");
    let params = [
        ("client_id", secrets.client_id.as_str()),
        ("client_secret", secrets.client_secret.expose_secret().as_str()),
        ("refresh_token", refresh.expose_secret().as_str()),
        ("grant_type", "refresh_token"),
    ];

    post_token_form(http, config, &params)
        .await?
        .into_token(token.refresh_token.clone())
}
