use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::message::Message;
use crate::models::response::Response;
use crate::models::tool::Tool;

/// The transport to a hosted model: one request, one parsed response.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send the whole conversation and return the model's next response.
    ///
    /// Failures to reach the API or to understand its answer are errors; nothing
    /// about the conversation is changed here.
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
    ) -> AgentResult<Response>;
}
