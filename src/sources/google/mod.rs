//! Google Calendar / Gmail collaborator
//!
//! Connects an identity through OAuth, pulls recent calendar events and mail
//! metadata, and writes them into the per-identity item store. A sync always
//! advances the fixture rotation, connected or not.

pub mod client;
pub mod oauth;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::GoogleConfig;
use crate::error::DashboardError;
use crate::items::Item;
use crate::metrics::METRICS;
use crate::sources::rotation::RotationStore;
use crate::sources::store::{Document, FileItemStore};

pub use client::GoogleApiClient;
pub use oauth::{ClientSecrets, StoredToken};

/// Google collaborator errors
#[derive(Debug, thiserror::Error)]
pub enum GoogleError {
    #[error("credentials file not found at {0}")]
    MissingCredentials(String),

    #[error("Google account not connected")]
    NotConnected,

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Google API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl GoogleError {
    pub(crate) fn from_request(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}

impl From<GoogleError> for DashboardError {
    fn from(e: GoogleError) -> Self {
        match e {
            GoogleError::MissingCredentials(path) => DashboardError::MissingCredentials(format!(
                "{}. Download an OAuth client from the Google Cloud Console and save it there.",
                path
            )),
            GoogleError::NotConnected => DashboardError::NotConnected,
            other => DashboardError::Upstream(other.to_string()),
        }
    }
}

/// `GET /api/google/auth` outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthResponse {
    Connected,
    AuthorizationRequired { auth_url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Partial,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncCounts {
    pub calendar: usize,
    pub emails: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub status: SyncStatus,
    pub synced: SyncCounts,
    pub timestamp: DateTime<Utc>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub connected: bool,
    pub last_sync: Option<DateTime<Utc>>,
    pub has_calendar_data: bool,
    pub has_email_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisconnectReport {
    pub status: String,
    pub message: String,
    pub token_deleted: bool,
    pub data_cleared: bool,
}

/// Orchestrates OAuth, fetching and persistence for one process
pub struct GoogleSync {
    config: GoogleConfig,
    http: Client,
    api: GoogleApiClient,
    store: Arc<FileItemStore>,
    rotation: Arc<dyn RotationStore>,
}

impl GoogleSync {
    pub fn new(
        config: GoogleConfig,
        store: Arc<FileItemStore>,
        rotation: Arc<dyn RotationStore>,
    ) -> Result<Self, GoogleError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;
        let api = GoogleApiClient::new(http.clone(), config.clone());

        Ok(Self {
            config,
            http,
            api,
            store,
            rotation,
        })
    }

    async fn client_secrets(&self) -> Result<ClientSecrets, GoogleError> {
        ClientSecrets::load(&self.config.credentials_path).await
    }

    /// Connected status, or a consent URL to start the OAuth flow
    pub async fn auth(&self, identity: &str) -> Result<AuthResponse, DashboardError> {
        let secrets = self.client_secrets().await?;

        if self.store.exists(identity, Document::Token).await? {
            return Ok(AuthResponse::Connected);
        }

        let auth_url = oauth::authorization_url(&self.config, &secrets, identity)?;
        Ok(AuthResponse::AuthorizationRequired { auth_url })
    }

    /// Finish the OAuth flow; `state` is the identity the consent URL was built for
    pub async fn callback(&self, code: &str, state: &str) -> Result<AuthResponse, DashboardError> {
        crate::sources::validate_identity(state)?;
        let secrets = self.client_secrets().await?;

        let token = oauth::exchange_code(&self.http, &self.config, &secrets, code).await?;
        self.store.save_token(state, &token).await?;

        info!("Google account connected for {}...", short(state));
        Ok(AuthResponse::Connected)
    }

    /// Stored token, refreshed first when expired
    async fn usable_token(&self, identity: &str, now: DateTime<Utc>) -> Result<StoredToken, GoogleError> {
        let token: StoredToken = self
            .store
            .load_token(identity)
            .await
            .map_err(|e| GoogleError::Storage(e.to_string()))?
            .ok_or(GoogleError::NotConnected)?;

        if !token.is_expired(now.timestamp()) {
            return Ok(token);
        }

        let secrets = self.client_secrets().await?;
        let refreshed = oauth::refresh_token(&self.http, &self.config, &secrets, &token).await?;
        self.store
            .save_token(identity, &refreshed)
            .await
            .map_err(|e| GoogleError::Storage(e.to_string()))?;
        Ok(refreshed)
    }

    async fn store_items(
        &self,
        identity: &str,
        document: Document,
        fetched: Result<Vec<Item>, GoogleError>,
        label: &str,
        errors: &mut Vec<String>,
    ) -> usize {
        let items = match fetched {
            Ok(items) => items,
            Err(e) => {
                warn!("{} sync failed: {}", label, e);
                errors.push(format!("{} sync failed: {}", label, e));
                return 0;
            }
        };

        match self.store.save(identity, document, &items).await {
            Ok(()) => items.len(),
            Err(e) => {
                error!("Failed to store {} data: {}", label, e);
                errors.push(format!("{} sync failed: {}", label, e));
                0
            }
        }
    }

    /// Advance the fixture rotation, then pull and store fresh data when connected.
    ///
    /// Individual fetch failures are reported in `errors`, never raised.
    pub async fn sync(&self, identity: &str, now: DateTime<Utc>) -> Result<SyncReport, DashboardError> {
        crate::sources::validate_identity(identity)?;

        let dataset = self.rotation.toggle(identity) + 1;
        info!("Toggled fixture dataset for {}... to {}", short(identity), dataset);

        let mut errors = Vec::new();
        let mut synced = SyncCounts::default();

        match self.usable_token(identity, now).await {
            Ok(token) => {
                let (calendar, emails) = futures::join!(
                    self.api.fetch_calendar(&token.access_token, now),
                    self.api.fetch_gmail(&token.access_token, now),
                );
                synced.calendar = self
                    .store_items(identity, Document::Calendar, calendar, "Calendar", &mut errors)
                    .await;
                synced.emails = self
                    .store_items(identity, Document::Emails, emails, "Email", &mut errors)
                    .await;
            }
            Err(GoogleError::NotConnected) => {
                info!("No Google token for {}..., skipping fetch", short(identity));
            }
            Err(e) => {
                warn!("Cannot authorise Google sync: {}", e);
                errors.push(format!("Authorization failed: {}", e));
            }
        }

        let status = if errors.is_empty() {
            SyncStatus::Success
        } else {
            SyncStatus::Partial
        };
        METRICS.record_google_sync(status.as_str());

        Ok(SyncReport {
            status,
            synced,
            timestamp: now,
            errors,
        })
    }

    pub async fn status(&self, identity: &str) -> Result<StatusReport, DashboardError> {
        Ok(StatusReport {
            connected: self.store.exists(identity, Document::Token).await?,
            last_sync: self.store.last_sync(identity).await?,
            has_calendar_data: self.store.exists(identity, Document::Calendar).await?,
            has_email_data: self.store.exists(identity, Document::Emails).await?,
        })
    }

    /// Forget the token and clear both synced documents
    pub async fn disconnect(&self, identity: &str) -> Result<DisconnectReport, DashboardError> {
        let token_deleted = self.store.remove(identity, Document::Token).await?;

        let mut cleared = true;
        for document in [Document::Calendar, Document::Emails] {
            match self.store.remove(identity, document).await {
                Ok(removed) => cleared &= removed,
                Err(e) => {
                    warn!("Failed to delete {}: {}", document.file_name(), e);
                    cleared = false;
                }
            }
        }

        info!("Google account disconnected for {}...", short(identity));
        Ok(DisconnectReport {
            status: "success".to_string(),
            message: "Google account disconnected successfully".to_string(),
            token_deleted,
            data_cleared: cleared,
        })
    }
}

/// Identity prefix for log lines
fn short(identity: &str) -> String {
    identity.chars().take(8).collect()
}
