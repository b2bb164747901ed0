use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::base::Provider;
use super::configs::{AnthropicProviderConfig, ANTHROPIC_API_VERSION};
use crate::errors::{AgentError, AgentResult, TransportErrorKind};
use crate::models::message::Message;
use crate::models::response::Response;
use crate::models::tool::Tool;

pub struct AnthropicProvider {
    client: Client,
    config: AnthropicProviderConfig,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicProviderConfig) -> AgentResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn create_request(&self, system: &str, messages: &[Message], tools: &[Tool]) -> Value {
        json!({
            "model": self.config.model.as_ref(),
            "max_tokens": self.config.max_tokens,
            "messages": messages,
            "tools": tools,
            "system": system,
        })
    }

    async fn post(&self, payload: Value) -> AgentResult<Value> {
        let url = format!("{}/v1/messages", self.config.host.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| {
                AgentError::transport(TransportErrorKind::Decode, format!("invalid JSON body: {}", e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(AgentError::transport(
            TransportErrorKind::Status(status.as_u16()),
            format!("Request failed: {} - {}", status, error_message(&body)),
        ))
    }
}

/// Pull the human-readable message out of an API error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
    ) -> AgentResult<Response> {
        let payload = self.create_request(system, messages, tools);
        debug!(
            model = %self.config.model,
            messages = messages.len(),
            tools = tools.len(),
            "sending request"
        );

        let body = self.post(payload).await?;
        let response = Response::from_json(&body)?;

        info!(
            id = %response.id,
            stop_reason = %response.stop_reason,
            blocks = response.content.len(),
            input_tokens = ?response.usage.input_tokens,
            output_tokens = ?response.usage.output_tokens,
            "received response"
        );
        Ok(response)
    }
}
