//! HTTP API: handlers, request/response models and router wiring

pub mod handlers;
pub mod integration;
pub mod models;
pub mod routes;

pub use handlers::{identity_from_headers, AppState, IDENTITY_HEADER};
pub use integration::{build_app, init_state, init_state_with_gateway};
pub use models::{error_codes, error_response, ApiError};
pub use routes::build_router;
