use std::env;
use std::fs;
use std::sync::Arc;

use mcagent::agent::Agent;
use mcagent::developer::register_developer_tools;
use mcagent::providers::anthropic::AnthropicProvider;
use mcagent::providers::configs::{AnthropicProviderConfig, Model};
use mcagent::registry::ToolRegistry;

fn agent() -> mcagent::errors::AgentResult<Agent> {
    let provider = AnthropicProvider::new(AnthropicProviderConfig::new("k", Model::default(), 1024))?;
    let mut registry = ToolRegistry::new();
    register_developer_tools(&mut registry)?;
    Agent::new(Box::new(provider), Arc::new(registry))
}

// Changes the working directory, so it is the only test in this binary.
#[test]
fn test_system_md_in_working_directory_is_ignored() {
    let original = env::current_dir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    env::set_current_dir(dir.path()).unwrap();

    fs::write("system.md", "# Project notes\nunrelated README text\n").unwrap();
    let plain = agent();

    fs::write("system.md", "Use {{ handlebars }} syntax here").unwrap();
    let templated = agent();

    env::set_current_dir(original).unwrap();

    for agent in [plain.unwrap(), templated.unwrap()] {
        let prompt = agent.system_prompt();
        assert!(prompt.contains("You are mcagent"));
        assert!(prompt.contains("- ls: "));
        assert!(prompt.contains("- read: "));
        assert!(!prompt.contains("unrelated README text"));
    }
}
