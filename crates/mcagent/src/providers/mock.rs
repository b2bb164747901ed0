use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

use crate::errors::AgentResult;
use crate::models::message::Message;
use crate::models::response::{Response, StopReason};
use crate::models::tool::Tool;
use crate::providers::base::Provider;

/// A mock provider that returns pre-configured responses for testing
pub struct MockProvider {
    responses: Arc<Mutex<Vec<AgentResult<Response>>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<AgentResult<Response>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A handle on the message histories the provider was called with
    pub fn requests(&self) -> Arc<Mutex<Vec<Vec<Message>>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        _system: &str,
        messages: &[Message],
        _tools: &[Tool],
    ) -> AgentResult<Response> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return empty response if no more pre-configured responses
            Ok(Response::new("msg_empty", vec![], StopReason::EndTurn))
        } else {
            responses.remove(0)
        }
    }
}
