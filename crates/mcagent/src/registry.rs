use std::collections::HashMap;
use std::fmt::Debug;

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{AgentError, AgentResult, ToolError};
use crate::models::tool::Tool;

pub type ToolHandler = Box<dyn Fn(&Value) -> Result<String, ToolError> + Send + Sync>;

/// A tool the agent can run locally: its advertised shape plus the function behind it.
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    handler: ToolHandler,
}

impl ToolSpec {
    pub fn new<N, D>(
        name: N,
        description: D,
        input_schema: Value,
        handler: impl Fn(&Value) -> Result<String, ToolError> + Send + Sync + 'static,
    ) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ToolSpec {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler: Box::new(handler),
        }
    }

    pub fn tool(&self) -> Tool {
        Tool::new(&self.name, &self.description, self.input_schema.clone())
    }

    pub fn call(&self, arguments: &Value) -> Result<String, ToolError> {
        (self.handler)(arguments)
    }
}

impl Debug for ToolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .field("handler", &"<function>")
            .finish()
    }
}

/// What a tool produced, ready to become a tool result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

/// Tools keyed by name, kept in registration order.
///
/// Built once at startup and then only read; share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: ToolSpec) -> AgentResult<()> {
        if self.index.contains_key(&spec.name) {
            return Err(AgentError::DuplicateTool(spec.name));
        }
        debug!(tool = %spec.name, "registered tool");
        self.index.insert(spec.name.clone(), self.tools.len());
        self.tools.push(spec);
        Ok(())
    }

    /// The schema-only view sent to the model, in registration order
    pub fn describe_all(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolSpec::tool).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run a tool. An unknown name is an error; a failing handler is not, its failure
    /// becomes the output so the model can read it and react.
    pub fn invoke(&self, name: &str, arguments: &Value) -> AgentResult<ToolOutput> {
        let spec = self
            .get(name)
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))?;

        match spec.call(arguments) {
            Ok(content) => Ok(ToolOutput {
                content,
                is_error: false,
            }),
            Err(e) => {
                warn!(tool = %name, error = %e, "tool call failed");
                Ok(ToolOutput {
                    content: format!("The tool call returned the following error:\n{}", e),
                    is_error: true,
                })
            }
        }
    }
}
