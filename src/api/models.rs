//! Request and response bodies for the HTTP API

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::aggregation::{CognitiveLoad, Context, Insight, Recommendation, Task};
use crate::error::DashboardError;

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub detail: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }
}

pub mod error_codes {
    pub const MISSING_IDENTITY: &str = "MISSING_IDENTITY";
    pub const INVALID_IDENTITY: &str = "INVALID_IDENTITY";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const CREDENTIALS_MISSING: &str = "CREDENTIALS_MISSING";
    pub const NOT_CONNECTED: &str = "NOT_CONNECTED";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Map a crate error onto a status code and error body
pub fn error_response(e: DashboardError) -> (StatusCode, Json<ApiError>) {
    let (status, code) = match &e {
        DashboardError::MissingIdentity(_) => (StatusCode::BAD_REQUEST, error_codes::MISSING_IDENTITY),
        DashboardError::InvalidIdentity(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_IDENTITY),
        DashboardError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_REQUEST),
        DashboardError::MissingCredentials(_) => (StatusCode::NOT_FOUND, error_codes::CREDENTIALS_MISSING),
        DashboardError::NotConnected => (StatusCode::BAD_REQUEST, error_codes::NOT_CONNECTED),
        DashboardError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, error_codes::UPSTREAM_ERROR),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR),
    };

    if status.is_server_error() {
        error!("Request failed: {}", e);
    }

    (status, Json(ApiError::new(code, e.to_string())))
}

/// `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct Banner {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelHealth {
    pub reachable: bool,
    pub base_url: String,
    pub model: String,
}

/// `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: ModelHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContextsResponse {
    pub contexts: Vec<Context>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CognitiveLoadResponse {
    pub cognitive_load: CognitiveLoad,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

/// `POST /assistant` body
#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantQuery {
    pub query: String,
}

/// Summary of what the assistant was shown
#[derive(Debug, Serialize, Deserialize)]
pub struct ContextUsed {
    pub contexts: usize,
    pub tasks: usize,
    pub load_score: u8,
    pub emails: usize,
    pub calendar_events: usize,
    /// Fixture dataset number, null when synced data was used
    pub dataset: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub response: String,
    pub context_used: ContextUsed,
}

/// `GET /api/google/callback` query
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let cases = [
            (DashboardError::MissingIdentity("x".into()), StatusCode::BAD_REQUEST, "MISSING_IDENTITY"),
            (DashboardError::InvalidIdentity("x".into()), StatusCode::BAD_REQUEST, "INVALID_IDENTITY"),
            (DashboardError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            (DashboardError::Upstream("down".into()), StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR"),
            (DashboardError::MissingCredentials("x".into()), StatusCode::NOT_FOUND, "CREDENTIALS_MISSING"),
            (DashboardError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ];

        for (err, status, code) in cases {
            let (got_status, Json(body)) = error_response(err);
            assert_eq!(got_status, status);
            assert_eq!(body.code, code);
        }
    }

    #[test]
    fn test_upstream_detail_is_descriptive() {
        let (_, Json(body)) = error_response(DashboardError::Upstream("connection refused".into()));
        assert!(body.detail.contains("connection refused"));
    }
}
