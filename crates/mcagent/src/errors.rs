use std::fmt;

use thiserror::Error;

/// Failure to understand a response from the model API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Unknown stop reason: {0}")]
    UnknownStopReason(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, reset mid-request
    Network,
    /// Connect or request timeout on the HTTP client
    Timeout,
    /// The API answered with a non-success status
    Status(u16),
    /// The response body was not valid JSON
    Decode,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Network => write!(f, "network"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Status(code) => write!(f, "status {}", code),
            TransportErrorKind::Decode => write!(f, "decode"),
        }
    }
}

#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error ({kind}): {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Tool not found: {0}")]
    UnknownTool(String),

    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    #[error("Template error: {0}")]
    Template(String),
}

impl AgentError {
    pub fn transport<S: Into<String>>(kind: TransportErrorKind, message: S) -> Self {
        AgentError::Transport {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_decode() {
            TransportErrorKind::Decode
        } else if let Some(status) = err.status() {
            TransportErrorKind::Status(status.as_u16())
        } else {
            TransportErrorKind::Network
        };
        AgentError::transport(kind, err.to_string())
    }
}

pub type AgentResult<T> = Result<T, AgentError>;

/// Failure inside a tool handler. These never leave the tool registry: they are
/// turned into tool result text for the model to read.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),
}

impl ToolError {
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        ToolError::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_the_discriminant() {
        let err = AgentError::from(ParseError::UnknownBlockType("server_tool_use".into()));
        assert_eq!(
            err.to_string(),
            "Parse error: Unknown block type: server_tool_use"
        );
    }

    #[test]
    fn test_transport_error_display() {
        let err = AgentError::transport(TransportErrorKind::Status(529), "overloaded");
        assert_eq!(err.to_string(), "Transport error (status 529): overloaded");
    }
}
