//! Scripted `Completion` for tests: replies come from a closure, requests are recorded.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{Completion, CompletionRequest, LlmError};

type Responder = dyn Fn(&CompletionRequest) -> Result<String, LlmError> + Send + Sync;

pub struct ScriptedCompletion {
    responder: Box<Responder>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same text.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Always fails as if the API were down.
    pub fn failing() -> Self {
        Self::new(|_| {
            Err(LlmError::Api {
                status: 529,
                message: "overloaded".to_string(),
            })
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let reply = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        reply
    }
}
