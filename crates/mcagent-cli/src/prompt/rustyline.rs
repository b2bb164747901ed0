use std::io::{self, Write};

use anyhow::Result;
use bat::WrappingMode;
use cliclack::spinner;
use console::style;
use mcagent::models::content::{ContentBlock, ToolInvocation, ToolResult};
use mcagent::models::message::{Message, MessageBlock, MessageContent};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;

use super::{thinking::get_random_thinking_message, Input, Prompt, Theme};

const PROMPT: &str = "\x1b[1m\x1b[38;5;30m( O)> \x1b[0m";
const MAX_STRING_LENGTH: usize = 40;
const MAX_RESULT_LINES: usize = 12;
const INDENT: &str = "    ";

/// What a line of user input asks for
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Exit,
    Help,
    ToggleTheme,
    Blank,
    Message(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        Command::Blank
    } else if line.eq_ignore_ascii_case("/exit") || line.eq_ignore_ascii_case("/quit") {
        Command::Exit
    } else if line.eq_ignore_ascii_case("/t") {
        Command::ToggleTheme
    } else if line.eq_ignore_ascii_case("/?") || line.eq_ignore_ascii_case("/help") {
        Command::Help
    } else {
        Command::Message(line.to_string())
    }
}

pub struct RustylinePrompt {
    editor: DefaultEditor,
    spinner: cliclack::ProgressBar,
    theme: Theme,
}

impl RustylinePrompt {
    pub fn new() -> Result<Self> {
        Ok(RustylinePrompt {
            editor: DefaultEditor::new()?,
            spinner: spinner(),
            theme: Theme::Dark,
        })
    }

    fn render_block(&self, block: &MessageBlock) {
        let theme = self.theme.bat_theme();
        match block {
            MessageBlock::Content(ContentBlock::Text(text)) => print_markdown(&text.text, theme),
            MessageBlock::Content(ContentBlock::Reasoning(reasoning)) => {
                println!("{}", style(&reasoning.text).dim().italic());
            }
            MessageBlock::Content(ContentBlock::ToolInvocation(invocation)) => {
                print_request(invocation)
            }
            MessageBlock::ToolResult(result) => print_result(result),
        }
    }
}

fn print_request(invocation: &ToolInvocation) {
    let tool_header = format!(
        "─── {} | {} ──────────────────────────",
        style(&invocation.name),
        style(&invocation.id).magenta().dim(),
    );
    print_newline();
    println!("{}", tool_header);
    print_params(&Value::Object(invocation.arguments.clone()), 0);
    print_newline();
}

fn print_result(result: &ToolResult) {
    let lines: Vec<&str> = result.content.lines().collect();
    for line in lines.iter().take(MAX_RESULT_LINES) {
        if result.is_error {
            println!("{}{}", INDENT, style(line).red());
        } else {
            println!("{}{}", INDENT, style(line).dim());
        }
    }
    if lines.len() > MAX_RESULT_LINES {
        println!(
            "{}{}",
            INDENT,
            style(format!("... {} more lines", lines.len() - MAX_RESULT_LINES)).dim()
        );
    }
}

fn print_markdown(content: &str, theme: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(theme)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();
    if printed.is_err() {
        println!("{}", content);
    }
}

/// Format and print parameters recursively with proper indentation and colors
fn print_params(value: &Value, depth: usize) {
    let indent = INDENT.repeat(depth);

    match value {
        Value::Object(map) => {
            for (key, val) in map {
                match val {
                    Value::Object(_) => {
                        println!("{}{}:", indent, style(key).dim());
                        print_params(val, depth + 1);
                    }
                    Value::Array(arr) => {
                        println!("{}{}:", indent, style(key).dim());
                        for item in arr.iter() {
                            println!("{}{}- ", indent, INDENT);
                            print_params(item, depth + 2);
                        }
                    }
                    Value::String(s) => {
                        if s.len() > MAX_STRING_LENGTH {
                            println!("{}{}: {}", indent, style(key).dim(), style("...").dim());
                        } else {
                            println!("{}{}: {}", indent, style(key).dim(), style(s).green());
                        }
                    }
                    Value::Number(n) => {
                        println!("{}{}: {}", indent, style(key).dim(), style(n).blue());
                    }
                    Value::Bool(b) => {
                        println!("{}{}: {}", indent, style(key).dim(), style(b).blue());
                    }
                    Value::Null => {
                        println!("{}{}: {}", indent, style(key).dim(), style("null").dim());
                    }
                }
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                println!("{}{}.", indent, i + 1);
                print_params(item, depth + 1);
            }
        }
        Value::String(s) => println!("{}{}", indent, style(s).green()),
        Value::Number(n) => println!("{}{}", indent, style(n).yellow()),
        Value::Bool(b) => println!("{}{}", indent, style(b).yellow()),
        Value::Null => println!("{}{}", indent, style("null").dim()),
    }
}

fn print_newline() {
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("/exit | /quit - Exit the session");
    println!("/t - Toggle Light/Dark theme");
    println!("/? | /help - Display this help message");
    println!("Ctrl+D | Ctrl+C - Exit the session");
}

impl Prompt for RustylinePrompt {
    fn render(&mut self, message: &Message) {
        match &message.content {
            MessageContent::Text(text) => print_markdown(text, self.theme.bat_theme()),
            MessageContent::Blocks(blocks) => {
                for block in blocks {
                    self.render_block(block);
                }
            }
        }
        let _ = io::stdout().flush();
    }

    fn notice(&mut self, text: &str) {
        println!("{}", style(text).yellow());
    }

    fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner
            .start(format!("{}...", get_random_thinking_message()));
    }

    fn hide_busy(&self) {
        self.spinner.stop("");
    }

    fn get_input(&mut self) -> Result<Input> {
        let line = match self.editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(Input::exit()),
            Err(e) => return Err(e.into()),
        };

        match parse_command(&line) {
            Command::Blank => Ok(Input::ask_again()),
            Command::Exit => Ok(Input::exit()),
            Command::ToggleTheme => {
                self.theme = self.theme.toggle();
                println!("Switching to {:?} theme", self.theme);
                Ok(Input::ask_again())
            }
            Command::Help => {
                print_help();
                Ok(Input::ask_again())
            }
            Command::Message(text) => {
                let _ = self.editor.add_history_entry(text.as_str());
                Ok(Input::message(text))
            }
        }
    }

    fn close(&self) {
        // No cleanup required
    }
}
