//! The built-in developer tools: `ls` and `read`.
//!
//! Trust boundary: both tools act on the local filesystem with the permissions of the
//! process. Paths are not confined to the working directory or anywhere else; the only
//! restrictions are the ones the operating system enforces. Anyone who can talk to the
//! model can read whatever this process can read.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{AgentResult, ToolError};
use crate::registry::{ToolRegistry, ToolSpec};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LsParams {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReadParams {
    path: String,
}

fn parse_params<T: DeserializeOwned>(arguments: &Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments.clone()).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

pub fn ls_tool() -> ToolSpec {
    ToolSpec::new(
        "ls",
        "List the contents of the given path",
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to list, e.g. /home/jsmith/code/project. Defaults to the current working directory."
                }
            },
            "required": [],
            "additionalProperties": false
        }),
        ls,
    )
}

pub fn read_tool() -> ToolSpec {
    ToolSpec::new(
        "read",
        "Read the contents of a file",
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to the file to read, e.g. /home/jsmith/stuff.txt"
                }
            },
            "required": ["path"],
            "additionalProperties": false
        }),
        read,
    )
}

pub fn register_developer_tools(registry: &mut ToolRegistry) -> AgentResult<()> {
    registry.register(ls_tool())?;
    registry.register(read_tool())?;
    Ok(())
}

// Mirrors plain `ls`: sorted names, dot entries hidden, one per line.
fn ls(arguments: &Value) -> Result<String, ToolError> {
    let params: LsParams = parse_params(arguments)?;
    let path = params
        .path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let metadata = fs::metadata(&path)
        .map_err(|e| ToolError::io(format!("cannot access '{}'", path.display()), e))?;
    if !metadata.is_dir() {
        return Ok(format!("{}\n", path.display()));
    }

    let mut names = list_dir(&path)?;
    names.retain(|name| !name.starts_with('.'));
    names.sort();

    Ok(names.into_iter().map(|name| name + "\n").collect())
}

fn list_dir(path: &Path) -> Result<Vec<String>, ToolError> {
    let context = || format!("cannot open directory '{}'", path.display());
    fs::read_dir(path)
        .map_err(|e| ToolError::io(context(), e))?
        .map(|entry| {
            entry
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .map_err(|e| ToolError::io(context(), e))
        })
        .collect()
}

fn read(arguments: &Value) -> Result<String, ToolError> {
    let params: ReadParams = parse_params(arguments)?;
    let bytes = fs::read(&params.path)
        .map_err(|e| ToolError::io(format!("cannot read '{}'", params.path), e))?;
    String::from_utf8(bytes).map_err(|_| {
        ToolError::ExecutionError(format!("'{}' is not valid UTF-8 text", params.path))
    })
}
