//! HTTP handlers for the dashboard, assistant and Google endpoints

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::aggregation::{aggregate, inject_synthetic, DashboardSnapshot};
use crate::api::models::{
    error_response, ApiError, AssistantQuery, AssistantResponse, Banner, CallbackParams,
    CognitiveLoadResponse, ContextUsed, ContextsResponse, HealthResponse, InsightsResponse,
    ModelHealth, RecommendationsResponse, TasksResponse,
};
use crate::assistant::{build_system_prompt, ChatGateway};
use crate::error::{DashboardError, Result};
use crate::metrics::METRICS;
use crate::sources::google::{AuthResponse, DisconnectReport, GoogleSync, StatusReport, SyncReport};
use crate::sources::{validate_identity, FallbackResolver, ResolvedItems};

/// Header carrying the caller's identity key
pub const IDENTITY_HEADER: &str = "x-user-id";

type ApiResult<T> = std::result::Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub resolver: FallbackResolver,
    pub gateway: Arc<dyn ChatGateway>,
    pub google: Arc<GoogleSync>,
    pub inject_synthetic: bool,
}

impl AppState {
    /// Resolve effective items once and aggregate them
    async fn snapshot(&self, identity: &str) -> Result<(ResolvedItems, DashboardSnapshot)> {
        let resolved = self.resolver.resolve(identity).await?;
        let mut snapshot = aggregate(&resolved, Utc::now());

        if self.inject_synthetic {
            inject_synthetic(&mut snapshot, &resolved.bundle);
            debug!(tasks = snapshot.tasks.len(), "Injected synthetic data");
        }

        Ok((resolved, snapshot))
    }
}

/// Read and validate the identity header
pub fn identity_from_headers(headers: &HeaderMap) -> Result<String> {
    let value = headers
        .get(IDENTITY_HEADER)
        .ok_or_else(|| DashboardError::MissingIdentity("X-User-Id header is required".to_string()))?;

    let identity = value
        .to_str()
        .map_err(|_| DashboardError::InvalidIdentity("X-User-Id must be visible ASCII".to_string()))?;

    validate_identity(identity)?;
    Ok(identity.to_string())
}

/// Record the request outcome and convert errors into API responses
fn finish<T>(endpoint: &str, start: Instant, result: Result<T>) -> ApiResult<T> {
    METRICS.record_request(endpoint, result.is_ok(), start.elapsed().as_secs_f64());
    result.map(Json).map_err(error_response)
}

async fn with_snapshot<T>(
    state: &AppState,
    headers: &HeaderMap,
    endpoint: &str,
    select: impl FnOnce(DashboardSnapshot) -> T,
) -> ApiResult<T> {
    let start = Instant::now();
    let result = async {
        let identity = identity_from_headers(headers)?;
        info!("{} request", endpoint);
        let (_, snapshot) = state.snapshot(&identity).await?;
        Ok::<_, DashboardError>(select(snapshot))
    }
    .await;

    finish(endpoint, start, result)
}

/// GET /
pub async fn root() -> Json<Banner> {
    Json(Banner {
        message: "Productivity Dashboard API".to_string(),
        status: "running".to_string(),
    })
}

/// GET /health
///
/// An unreachable model is reported but never makes the service unhealthy.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let reachable = state.gateway.probe().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        model: ModelHealth {
            reachable,
            base_url: state.gateway.base_url().to_string(),
            model: state.gateway.model().to_string(),
        },
    })
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<DashboardSnapshot> {
    with_snapshot(&state, &headers, "dashboard", |snapshot| snapshot).await
}

/// GET /api/contexts
pub async fn get_contexts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<ContextsResponse> {
    with_snapshot(&state, &headers, "contexts", |s| ContextsResponse {
        contexts: s.contexts,
    })
    .await
}

/// GET /api/tasks
pub async fn get_tasks(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<TasksResponse> {
    with_snapshot(&state, &headers, "tasks", |s| TasksResponse { tasks: s.tasks }).await
}

/// GET /api/cognitive-load
pub async fn get_cognitive_load(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<CognitiveLoadResponse> {
    with_snapshot(&state, &headers, "cognitive_load", |s| CognitiveLoadResponse {
        cognitive_load: s.cognitive_load,
    })
    .await
}

/// GET /api/insights
pub async fn get_insights(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<InsightsResponse> {
    with_snapshot(&state, &headers, "insights", |s| InsightsResponse {
        insights: s.insights,
    })
    .await
}

/// GET /api/recommendations
pub async fn get_recommendations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<RecommendationsResponse> {
    with_snapshot(&state, &headers, "recommendations", |s| RecommendationsResponse {
        recommendations: s.recommendations,
    })
    .await
}

/// POST /assistant
pub async fn ask_assistant(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<AssistantQuery>, JsonRejection>,
) -> ApiResult<AssistantResponse> {
    let start = Instant::now();

    let result = async {
        let identity = identity_from_headers(&headers)?;
        let Json(request) = body.map_err(|e| DashboardError::InvalidRequest(e.body_text()))?;
        info!("Assistant request: query_chars={}", request.query.chars().count());

        let (resolved, snapshot) = state.snapshot(&identity).await?;
        let system_prompt = build_system_prompt(&snapshot, &resolved.items);
        let response = state.gateway.complete(&system_prompt, &request.query).await?;

        Ok::<_, DashboardError>(AssistantResponse {
            response,
            context_used: ContextUsed {
                contexts: snapshot.contexts.len(),
                tasks: snapshot.tasks.len(),
                load_score: snapshot.cognitive_load.score,
                emails: resolved.items.iter().filter(|i| i.is_email()).count(),
                calendar_events: resolved.items.iter().filter(|i| i.is_calendar()).count(),
                dataset: resolved.origin.dataset(),
            },
        })
    }
    .await;

    finish("assistant", start, result)
}

/// GET /api/google/auth
pub async fn google_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<AuthResponse> {
    let start = Instant::now();
    let result = async {
        let identity = identity_from_headers(&headers)?;
        state.google.auth(&identity).await
    }
    .await;

    finish("google_auth", start, result)
}

/// GET /api/google/callback
///
/// The identity travels in the OAuth `state` parameter.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<AuthResponse> {
    let start = Instant::now();
    let result = async {
        validate_identity(&params.state)?;
        state.google.callback(&params.code, &params.state).await
    }
    .await;

    finish("google_callback", start, result)
}

/// POST /api/google/sync
pub async fn google_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<SyncReport> {
    let start = Instant::now();
    let result = async {
        let identity = identity_from_headers(&headers)?;
        info!("Google sync requested");
        state.google.sync(&identity, Utc::now()).await
    }
    .await;

    finish("google_sync", start, result)
}

/// GET /api/google/status
pub async fn google_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<StatusReport> {
    let start = Instant::now();
    let result = async {
        let identity = identity_from_headers(&headers)?;
        state.google.status(&identity).await
    }
    .await;

    finish("google_status", start, result)
}

/// POST /api/google/disconnect
pub async fn google_disconnect(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<DisconnectReport> {
    let start = Instant::now();
    let result = async {
        let identity = identity_from_headers(&headers)?;
        state.google.disconnect(&identity).await
    }
    .await;

    finish("google_disconnect", start, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_header_missing() {
        let err = identity_from_headers(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingIdentity(_)));
    }

    #[test]
    fn test_identity_header_path_unsafe() {
        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("../etc"));
        let err = identity_from_headers(&headers).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidIdentity(_)));
    }

    #[test]
    fn test_identity_header_ok() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("alice@example.com"));
        assert_eq!(identity_from_headers(&headers).unwrap(), "alice@example.com");
    }
}
