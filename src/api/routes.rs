//! Router assembly

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::api::handlers::{self, AppState};
use crate::config::ServerConfig;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Build the full API router
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/contexts", get(handlers::get_contexts))
        .route("/api/tasks", get(handlers::get_tasks))
        .route("/api/cognitive-load", get(handlers::get_cognitive_load))
        .route("/api/insights", get(handlers::get_insights))
        .route("/api/recommendations", get(handlers::get_recommendations))
        .route("/assistant", post(handlers::ask_assistant))
        .route("/api/google/auth", get(handlers::google_auth))
        .route("/api/google/callback", get(handlers::google_callback))
        .route("/api/google/sync", post(handlers::google_sync))
        .route("/api/google/status", get(handlers::google_status))
        .route("/api/google/disconnect", post(handlers::google_disconnect))
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&server.cors_origins)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_skips_invalid_origins() {
        // Must not panic on a malformed origin
        let _layer = cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()]);
    }
}
