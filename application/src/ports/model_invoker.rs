//! Model invoker port
//!
//! Defines the interface for sending a rendered prompt to a configured model.

use async_trait::async_trait;
use roundtable_domain::ModelId;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while invoking a model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// Gateway to the configured models
///
/// This port defines how the application layer reaches model providers.
/// Implementations (adapters) live in the infrastructure layer. `timeout` is
/// passed through so adapters can bound their own transport; callers still
/// enforce it on their side.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Send `prompt` to `model` and return the response text
    async fn invoke(
        &self,
        model: &ModelId,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, InvokeError>;
}
