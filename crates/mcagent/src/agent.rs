use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::errors::{AgentError, AgentResult, ParseError};
use crate::models::content::{ContentBlock, ToolInvocation, ToolResult};
use crate::models::conversation::Conversation;
use crate::models::message::Message;
use crate::models::response::{Response, StopReason};
use crate::models::tool::Tool;
use crate::prompt_template::load_bundled_prompt;
use crate::providers::base::Provider;
use crate::registry::ToolRegistry;

#[derive(Serialize)]
struct SystemPromptContext {
    tools: Vec<Tool>,
    cwd: String,
}

/// Everything that happened between handing the engine a conversation and getting control back
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Why the final response of the turn ended
    pub stop_reason: StopReason,
    /// The messages appended to the conversation during the turn, in order
    pub messages: Vec<Message>,
    /// Number of requests sent to the provider
    pub model_calls: usize,
}

impl Turn {
    /// All assistant text produced during the turn, in order
    pub fn text(&self) -> Vec<&str> {
        self.messages
            .iter()
            .flat_map(Message::content_blocks)
            .filter_map(ContentBlock::as_text)
            .collect()
    }

    /// Whether the model finished on its own rather than hitting a limit or refusing
    pub fn is_complete(&self) -> bool {
        self.stop_reason == StopReason::EndTurn
    }
}

enum TurnState {
    AwaitingModel,
    ModelResponded(Response),
    ExecutingTools(Vec<ToolInvocation>),
    TurnComplete(StopReason),
}

/// Agent integrates a foundational LLM with the local tools it is allowed to run
pub struct Agent {
    provider: Box<dyn Provider>,
    registry: Arc<ToolRegistry>,
    system_prompt: String,
}

impl Agent {
    /// Create a new Agent, rendering the bundled system prompt for the registered tools
    pub fn new(provider: Box<dyn Provider>, registry: Arc<ToolRegistry>) -> AgentResult<Self> {
        let cwd = std::env::current_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|_| ".".to_string());
        let context = SystemPromptContext {
            tools: registry.describe_all(),
            cwd,
        };
        let system_prompt = load_bundled_prompt("system.md", &context)
            .map_err(|e| AgentError::Template(e.to_string()))?;

        Ok(Self::with_system_prompt(provider, registry, system_prompt))
    }

    pub fn with_system_prompt<S: Into<String>>(
        provider: Box<dyn Provider>,
        registry: Arc<ToolRegistry>,
        system_prompt: S,
    ) -> Self {
        Self {
            provider,
            registry,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.registry.describe_all()
    }

    /// Run the model until it hands control back to the user.
    ///
    /// Each response is appended one message per content block. When the model asks for
    /// tools they run in the order requested and their results go back as one user
    /// message before the next call. A failed request leaves the conversation exactly as
    /// it was before that request.
    pub async fn reply(&self, conversation: &mut Conversation) -> AgentResult<Turn> {
        let tools = self.registry.describe_all();
        let start = conversation.len();
        let mut model_calls = 0;
        let mut state = TurnState::AwaitingModel;

        loop {
            state = match state {
                TurnState::AwaitingModel => {
                    model_calls += 1;
                    let response = self
                        .provider
                        .complete(&self.system_prompt, conversation.messages(), &tools)
                        .await?;
                    TurnState::ModelResponded(response)
                }
                TurnState::ModelResponded(response) => {
                    let stop_reason = response.stop_reason;
                    let invocations: Vec<ToolInvocation> =
                        response.tool_invocations().cloned().collect();
                    if stop_reason == StopReason::ToolUse && invocations.is_empty() {
                        return Err(ParseError::Malformed(format!(
                            "response {} stopped for tool_use without requesting a tool",
                            response.id
                        ))
                        .into());
                    }

                    conversation.extend(response.content.into_iter().map(Message::assistant));

                    if stop_reason.is_terminal() {
                        TurnState::TurnComplete(stop_reason)
                    } else {
                        TurnState::ExecutingTools(invocations)
                    }
                }
                TurnState::ExecutingTools(invocations) => {
                    // Nothing runs unless every requested tool exists
                    if let Some(unknown) = invocations
                        .iter()
                        .find(|invocation| !self.registry.contains(&invocation.name))
                    {
                        return Err(AgentError::UnknownTool(unknown.name.clone()));
                    }

                    let results = invocations
                        .iter()
                        .map(|invocation| self.dispatch_tool_call(invocation))
                        .collect::<AgentResult<Vec<_>>>()?;
                    conversation.push(Message::tool_results(results));
                    TurnState::AwaitingModel
                }
                TurnState::TurnComplete(stop_reason) => {
                    if stop_reason != StopReason::EndTurn {
                        warn!(%stop_reason, "turn ended before the model finished");
                    }
                    debug!(%stop_reason, model_calls, "turn complete");
                    return Ok(Turn {
                        stop_reason,
                        messages: conversation.messages()[start..].to_vec(),
                        model_calls,
                    });
                }
            };
        }
    }

    /// Run a single tool call, keeping the link back to the invocation it answers
    fn dispatch_tool_call(&self, invocation: &ToolInvocation) -> AgentResult<ToolResult> {
        info!(tool = %invocation.name, id = %invocation.id, "invoking tool");
        let arguments = Value::Object(invocation.arguments.clone());
        let output = self.registry.invoke(&invocation.name, &arguments)?;
        Ok(ToolResult::new(&invocation.id, output.content).with_error(output.is_error))
    }
}
