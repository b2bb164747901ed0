use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use mcagent::agent::Agent;
use mcagent::developer::register_developer_tools;
use mcagent::providers::anthropic::AnthropicProvider;
use mcagent::providers::configs::{AnthropicProviderConfig, Model, DEFAULT_MAX_TOKENS};
use mcagent::registry::ToolRegistry;

mod prompt;
mod session;

use crate::prompt::rustyline::RustylinePrompt;
use crate::session::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Send this message, print the reply and exit instead of starting an interactive session
    content: Option<String>,

    /// Model to use
    #[arg(short, long, value_enum, default_value_t = CliModel::ClaudeHaiku45)]
    model: CliModel,

    /// Upper bound on the tokens generated per model response
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CliModel {
    #[value(name = "claude-opus-4-6")]
    ClaudeOpus46,
    #[value(name = "claude-haiku-4-5")]
    ClaudeHaiku45,
    #[value(name = "claude-sonnet-4-5")]
    ClaudeSonnet45,
}

impl From<CliModel> for Model {
    fn from(model: CliModel) -> Self {
        match model {
            CliModel::ClaudeOpus46 => Model::ClaudeOpus46,
            CliModel::ClaudeHaiku45 => Model::ClaudeHaiku45,
            CliModel::ClaudeSonnet45 => Model::ClaudeSonnet45,
        }
    }
}

fn init_tracing() {
    // stdout belongs to the conversation
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let config = AnthropicProviderConfig::from_env(cli.model.into(), cli.max_tokens)?;
    let provider = AnthropicProvider::new(config)?;

    let mut registry = ToolRegistry::new();
    register_developer_tools(&mut registry)?;
    let agent = Agent::new(Box::new(provider), Arc::new(registry))?;

    let prompt = RustylinePrompt::new()?;
    let mut session = Session::new(agent, Box::new(prompt));
    let result = match cli.content {
        Some(content) => session.headless_start(content).await,
        None => session.start().await,
    };
    if let Err(e) = &result {
        error!(error = %e, messages = session.conversation().len(), "session aborted");
    }
    result
}
