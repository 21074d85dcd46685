//! Wiring of the stores, collaborators and router from configuration

use axum::Router;
use std::sync::Arc;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes::build_router;
use crate::assistant::{ChatGateway, LocalModelClient};
use crate::config::Config;
use crate::error::Result;
use crate::sources::google::GoogleSync;
use crate::sources::{FallbackResolver, FileItemStore, InMemoryRotationStore, RotationStore};

/// Build handler state with the default collaborators
pub fn init_state(config: &Config) -> Result<AppState> {
    let gateway: Arc<dyn ChatGateway> = Arc::new(LocalModelClient::new(config.assistant.clone())?);
    init_state_with_gateway(config, gateway)
}

/// Build handler state around a caller-supplied completion gateway
pub fn init_state_with_gateway(config: &Config, gateway: Arc<dyn ChatGateway>) -> Result<AppState> {
    let store = Arc::new(FileItemStore::new(config.data.data_dir.clone()));
    let rotation: Arc<dyn RotationStore> = Arc::new(InMemoryRotationStore::new());

    let resolver = FallbackResolver::new(store.clone(), rotation.clone());
    let google = Arc::new(GoogleSync::new(config.google.clone(), store, rotation)?);

    info!(
        data_dir = %config.data.data_dir.display(),
        model = %config.assistant.model,
        inject_synthetic = config.data.inject_synthetic,
        "Initialized dashboard state"
    );

    Ok(AppState {
        resolver,
        gateway,
        google,
        inject_synthetic: config.data.inject_synthetic,
    })
}

/// Build the complete application router from configuration
pub fn build_app(config: &Config) -> Result<Router> {
    let state = init_state(config)?;
    Ok(build_router(state, &config.server))
}
