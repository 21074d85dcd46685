//! Work assistant: prompt assembly plus the completion-service gateway

pub mod client;
pub mod prompt;

pub use client::{ChatGateway, GatewayError, LocalModelClient};
pub use prompt::{build_system_prompt, MAX_PROMPT_ITEMS};
