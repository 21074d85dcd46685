//! Work-context dashboard backend
//!
//! Aggregates calendar events and emails into work contexts, prioritised
//! tasks and a cognitive-load estimate, and answers questions about them
//! through a locally hosted language model.

pub mod aggregation;
pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod items;
pub mod metrics;
pub mod observability;
pub mod sources;

pub use config::Config;
pub use error::{DashboardError, Result};
