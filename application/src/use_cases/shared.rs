//! Shared utilities for use cases.
//!
//! Contains cancellation checking and the timeout-bounded model call used by
//! both the round executor and single-model chat.

use crate::ports::model_invoker::{InvokeError, ModelInvoker};
use crate::use_cases::run_discussion::RunDiscussionError;
use roundtable_domain::{FailureKind, InvocationResult, ModelId};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(RunDiscussionError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(
    token: &Option<CancellationToken>,
    completed_rounds: usize,
) -> Result<(), RunDiscussionError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunDiscussionError::Cancelled { completed_rounds });
    }
    Ok(())
}

/// Invoke a model, bounded by `timeout`, and classify the outcome.
///
/// Never fails: timeouts and invoker errors become failure results, blank
/// text becomes an `EmptyResponse` failure. No retries.
pub(crate) async fn invoke_bounded(
    invoker: &dyn ModelInvoker,
    model: &ModelId,
    prompt: &str,
    timeout: Duration,
) -> InvocationResult {
    match tokio::time::timeout(timeout, invoker.invoke(model, prompt, timeout)).await {
        Ok(Ok(text)) => InvocationResult::from_response(text),
        Ok(Err(InvokeError::Timeout)) | Err(_) => InvocationResult::failure(
            FailureKind::Timeout,
            format!("no response within {}s", timeout.as_secs_f64()),
        ),
        Ok(Err(e)) => InvocationResult::failure(FailureKind::Transport, e.to_string()),
    }
}
