use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ParseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

/// Private model deliberation.
///
/// The API verifies the signature when a reasoning block is replayed on a later call, so
/// both fields must go back exactly as they came in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningContent {
    #[serde(rename = "thinking")]
    pub text: String,
    pub signature: String,
}

/// A request from the model to run a named tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    #[serde(rename = "input")]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
/// One unit of structured model output
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text(TextContent),
    #[serde(rename = "thinking")]
    Reasoning(ReasoningContent),
    #[serde(rename = "tool_use")]
    ToolInvocation(ToolInvocation),
}

impl ContentBlock {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentBlock::Text(TextContent { text: text.into() })
    }

    pub fn reasoning<S: Into<String>, T: Into<String>>(text: S, signature: T) -> Self {
        ContentBlock::Reasoning(ReasoningContent {
            text: text.into(),
            signature: signature.into(),
        })
    }

    pub fn tool_invocation<S: Into<String>, N: Into<String>>(
        id: S,
        name: N,
        arguments: Map<String, Value>,
    ) -> Self {
        ContentBlock::ToolInvocation(ToolInvocation {
            id: id.into(),
            name: name.into(),
            arguments,
        })
    }

    /// Parse a wire block. The discriminant is checked before any field is decoded so an
    /// unfamiliar block is reported by its `type`, never skipped.
    pub fn from_json(value: &Value) -> Result<Self, ParseError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ParseError::Malformed("content block has no string `type` field".to_string())
            })?;

        match kind {
            "text" | "thinking" | "tool_use" => serde_json::from_value(value.clone())
                .map_err(|e| ParseError::Malformed(format!("invalid `{}` block: {}", kind, e))),
            other => Err(ParseError::UnknownBlockType(other.to_string())),
        }
    }

    /// The wire discriminant for this block
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Text(_) => "text",
            ContentBlock::Reasoning(_) => "thinking",
            ContentBlock::ToolInvocation(_) => "tool_use",
        }
    }

    /// Get the text content if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(text) => Some(&text.text),
            _ => None,
        }
    }

    pub fn as_tool_invocation(&self) -> Option<&ToolInvocation> {
        if let ContentBlock::ToolInvocation(ref invocation) = self {
            Some(invocation)
        } else {
            None
        }
    }
}

/// The answer to one [`ToolInvocation`], sent back on a user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "tool_result")]
pub struct ToolResult {
    pub tool_use_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn new<S: Into<String>, C: Into<String>>(tool_use_id: S, content: C) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn with_error(mut self, is_error: bool) -> Self {
        self.is_error = is_error;
        self
    }
}
