use serde::{Deserialize, Serialize};

use super::content::{ContentBlock, ToolResult};
use super::role::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// An entry in a block-sequence message: model content or the result of a tool
pub enum MessageBlock {
    Content(ContentBlock),
    ToolResult(ToolResult),
}

impl MessageBlock {
    pub fn as_content(&self) -> Option<&ContentBlock> {
        match self {
            MessageBlock::Content(block) => Some(block),
            MessageBlock::ToolResult(_) => None,
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        match self {
            MessageBlock::ToolResult(result) => Some(result),
            MessageBlock::Content(_) => None,
        }
    }
}

impl From<ContentBlock> for MessageBlock {
    fn from(block: ContentBlock) -> Self {
        MessageBlock::Content(block)
    }
}

impl From<ToolResult> for MessageBlock {
    fn from(result: ToolResult) -> Self {
        MessageBlock::ToolResult(result)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<MessageBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A message to or from an LLM
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// Direct human input
    pub fn user<S: Into<String>>(text: S) -> Self {
        Message {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A single block of model output
    pub fn assistant(block: ContentBlock) -> Self {
        Message {
            role: Role::Assistant,
            content: MessageContent::Blocks(vec![block.into()]),
        }
    }

    /// The batch of results answering every tool invocation of one response
    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        Message {
            role: Role::User,
            content: MessageContent::Blocks(results.into_iter().map(MessageBlock::from).collect()),
        }
    }

    pub fn blocks(&self) -> &[MessageBlock] {
        match &self.content {
            MessageContent::Text(_) => &[],
            MessageContent::Blocks(blocks) => blocks,
        }
    }

    pub fn content_blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.blocks().iter().filter_map(MessageBlock::as_content)
    }

    pub fn results(&self) -> impl Iterator<Item = &ToolResult> {
        self.blocks().iter().filter_map(MessageBlock::as_tool_result)
    }

    /// Text the model produced in this message, if any
    pub fn assistant_text(&self) -> Option<String> {
        if self.role != Role::Assistant {
            return None;
        }
        let texts: Vec<&str> = self.content_blocks().filter_map(ContentBlock::as_text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }
}
