use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString};

use super::content::{ContentBlock, ToolInvocation};
use crate::errors::ParseError;

/// Why the model stopped generating. A closed set: a reason the API adds later fails to
/// parse instead of being silently treated as one of these.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
    PauseTurn,
    Refusal,
}

impl StopReason {
    /// Whether the turn hands control back to the caller after this response
    pub fn is_terminal(self) -> bool {
        match self {
            StopReason::ToolUse => false,
            StopReason::EndTurn
            | StopReason::MaxTokens
            | StopReason::StopSequence
            | StopReason::PauseTurn
            | StopReason::Refusal => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
}

/// One parsed reply from the Messages API
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

impl Response {
    pub fn new<S: Into<String>>(id: S, content: Vec<ContentBlock>, stop_reason: StopReason) -> Self {
        Self {
            id: id.into(),
            content,
            stop_reason,
            usage: Usage::default(),
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, ParseError> {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::Malformed("response has no `id`".to_string()))?;

        let content = value
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| ParseError::Malformed("response has no `content` array".to_string()))?
            .iter()
            .map(ContentBlock::from_json)
            .collect::<Result<Vec<_>, _>>()?;

        let stop_reason = match value.get("stop_reason") {
            Some(Value::String(reason)) => reason
                .parse::<StopReason>()
                .map_err(|_| ParseError::UnknownStopReason(reason.clone()))?,
            _ => {
                return Err(ParseError::Malformed(
                    "response has no `stop_reason`".to_string(),
                ))
            }
        };

        let usage = match value.get("usage") {
            Some(usage) => serde_json::from_value(usage.clone())
                .map_err(|e| ParseError::Malformed(format!("invalid `usage`: {}", e)))?,
            None => Usage::default(),
        };

        Ok(Self {
            id: id.to_string(),
            content,
            stop_reason,
            usage,
        })
    }

    pub fn tool_invocations(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.content.iter().filter_map(ContentBlock::as_tool_invocation)
    }

    pub fn text(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(ContentBlock::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn test_only_tool_use_continues_the_turn() {
        let continuing: Vec<StopReason> = StopReason::iter().filter(|r| !r.is_terminal()).collect();
        assert_eq!(continuing, vec![StopReason::ToolUse]);
    }

    #[test]
    fn test_stop_reason_wire_names() {
        for reason in StopReason::iter() {
            let wire = serde_json::to_value(reason).unwrap();
            assert_eq!(wire, json!(reason.to_string()));
        }
        assert_eq!("pause_turn".parse::<StopReason>().unwrap(), StopReason::PauseTurn);
    }

    #[test]
    fn test_parse_tool_use_response() {
        let response = Response::from_json(&json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-haiku-4-5",
            "content": [
                {"type": "text", "text": "Let me look."},
                {"type": "tool_use", "id": "toolu_01", "name": "ls", "input": {"path": "/tmp"}}
            ],
            "stop_reason": "tool_use",
            "stop_sequence": null,
            "usage": {"input_tokens": 310, "output_tokens": 52, "cache_read_input_tokens": 0}
        }))
        .unwrap();

        assert_eq!(response.id, "msg_01");
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.text().collect::<Vec<_>>(), vec!["Let me look."]);
        assert_eq!(response.tool_invocations().count(), 1);
        assert_eq!(response.usage.input_tokens, Some(310));
        assert_eq!(response.usage.output_tokens, Some(52));
    }

    #[test]
    fn test_unknown_stop_reason() {
        let err = Response::from_json(&json!({
            "id": "msg_01",
            "content": [],
            "stop_reason": "compaction"
        }))
        .unwrap_err();
        assert_eq!(err, ParseError::UnknownStopReason("compaction".into()));
    }

    #[test]
    fn test_unknown_block_fails_the_whole_response() {
        let err = Response::from_json(&json!({
            "id": "msg_01",
            "content": [
                {"type": "text", "text": "fine"},
                {"type": "server_tool_use", "id": "srvtoolu_1", "name": "web_search", "input": {}}
            ],
            "stop_reason": "end_turn"
        }))
        .unwrap_err();
        assert_eq!(err, ParseError::UnknownBlockType("server_tool_use".into()));
    }

    #[test]
    fn test_missing_stop_reason() {
        let err = Response::from_json(&json!({"id": "msg_01", "content": [], "stop_reason": null}))
            .unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }
}
