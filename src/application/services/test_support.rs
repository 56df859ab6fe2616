//! Scripted narrative backend shared by the service tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::application::ports::outbound::{LlmError, LlmPort, LlmRequest, LlmResponse};

enum Behaviour {
    Reply(String),
    Fail,
    Hang,
}

/// Fake LLM that records every request and answers from a script
pub(crate) struct ScriptedLlm {
    behaviour: Behaviour,
    requests: Mutex<Vec<LlmRequest>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedLlm {
    pub fn replying(text: &str) -> Self {
        Self::with(Behaviour::Reply(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::with(Behaviour::Fail)
    }

    pub fn hanging() -> Self {
        Self::with(Behaviour::Hang)
    }

    /// Reply only once `release` is notified; `entered` fires when a call arrives
    pub fn gated(text: &str, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        let mut llm = Self::replying(text);
        llm.gate = Some((entered, release));
        llm
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> LlmRequest {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request);

        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }

        match &self.behaviour {
            Behaviour::Reply(text) => Ok(LlmResponse {
                content: text.clone(),
                model: "scripted".to_string(),
                tokens_used: 0,
            }),
            Behaviour::Fail => Err(LlmError::RequestFailed("quota exceeded".to_string())),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::Timeout(3600))
            }
        }
    }
}
