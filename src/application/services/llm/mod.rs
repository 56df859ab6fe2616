//! Prompt construction and bounded calls to the narrative generation service

pub mod prompt_builder;

use std::time::Duration;

use crate::application::ports::outbound::{LlmError, LlmPort, LlmRequest};

/// Run one completion under `timeout`; expiry is reported as `LlmError::Timeout`
pub async fn complete_with_timeout(
    llm: &dyn LlmPort,
    request: LlmRequest,
    timeout: Duration,
) -> Result<String, LlmError> {
    match tokio::time::timeout(timeout, llm.generate(request)).await {
        Ok(result) => result.map(|response| response.content),
        Err(_) => Err(LlmError::Timeout(timeout.as_secs())),
    }
}
