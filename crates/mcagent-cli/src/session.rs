use anyhow::Result;

use crate::prompt::{InputType, Prompt};

use mcagent::agent::Agent;
use mcagent::models::conversation::Conversation;
use mcagent::models::message::Message;

pub struct Session<'a> {
    agent: Agent,
    prompt: Box<dyn Prompt + 'a>,
    conversation: Conversation,
}

impl<'a> Session<'a> {
    pub fn new(agent: Agent, prompt: Box<dyn Prompt + 'a>) -> Self {
        Session {
            agent,
            prompt,
            conversation: Conversation::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Read utterances until the user leaves, keeping one conversation across them
    pub async fn start(&mut self) -> Result<()> {
        self.prompt.ready();

        loop {
            let input = self.prompt.get_input()?;
            match input.input_type {
                InputType::Message => {
                    if let Some(content) = input.content {
                        self.conversation.push(Message::user(content));
                    }
                }
                InputType::Exit => break,
                InputType::AskAgain => continue,
            }

            self.process_turn(false).await?;
        }

        self.prompt.close();
        Ok(())
    }

    /// Answer a single utterance and return
    pub async fn headless_start(&mut self, initial_message: String) -> Result<()> {
        self.conversation.push(Message::user(initial_message));
        self.process_turn(true).await?;
        self.prompt.close();
        Ok(())
    }

    async fn process_turn(&mut self, text_only: bool) -> Result<()> {
        self.prompt.show_busy();
        let result = self.agent.reply(&mut self.conversation).await;
        self.prompt.hide_busy();
        let turn = result?;

        for message in &turn.messages {
            if text_only && message.assistant_text().is_none() {
                continue;
            }
            self.prompt.render(message);
        }

        if !turn.is_complete() {
            self.prompt.notice(&format!(
                "The model stopped before finishing its reply ({}).",
                turn.stop_reason
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Input;
    use async_trait::async_trait;
    use mcagent::errors::{AgentError, AgentResult, TransportErrorKind};
    use mcagent::models::content::ContentBlock;
    use mcagent::models::response::{Response, StopReason};
    use mcagent::models::tool::Tool;
    use mcagent::providers::base::Provider;
    use mcagent::registry::{ToolRegistry, ToolSpec};
    use serde_json::{json, Map, Value};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    struct ScriptedProvider {
        responses: Mutex<VecDeque<AgentResult<Response>>>,
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn complete(
            &self,
            _system: &str,
            _messages: &[Message],
            _tools: &[Tool],
        ) -> AgentResult<Response> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Response::new("msg_done", vec![], StopReason::EndTurn)))
        }
    }

    #[derive(Default)]
    struct Recorded {
        rendered: Vec<Message>,
        notices: Vec<String>,
        busy: usize,
        closed: bool,
    }

    struct MockPrompt {
        inputs: VecDeque<Input>,
        recorded: Arc<Mutex<Recorded>>,
    }

    impl Prompt for MockPrompt {
        fn render(&mut self, message: &Message) {
            self.recorded.lock().unwrap().rendered.push(message.clone());
        }

        fn notice(&mut self, text: &str) {
            self.recorded.lock().unwrap().notices.push(text.to_string());
        }

        fn get_input(&mut self) -> Result<Input> {
            Ok(self.inputs.pop_front().unwrap_or_else(Input::exit))
        }

        fn show_busy(&mut self) {
            self.recorded.lock().unwrap().busy += 1;
        }

        fn hide_busy(&self) {}

        fn close(&self) {
            self.recorded.lock().unwrap().closed = true;
        }

        fn ready(&self) {}
    }

    fn session(
        responses: Vec<AgentResult<Response>>,
        inputs: Vec<Input>,
    ) -> (Session<'static>, Arc<Mutex<Recorded>>) {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolSpec::new(
                "ls",
                "List the contents of the given path",
                json!({"type": "object"}),
                |_| Ok("Cargo.toml\nsrc\n".to_string()),
            ))
            .unwrap();
        let provider = ScriptedProvider {
            responses: Mutex::new(responses.into()),
        };
        let agent = Agent::with_system_prompt(Box::new(provider), Arc::new(registry), "test");

        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let prompt = MockPrompt {
            inputs: inputs.into(),
            recorded: recorded.clone(),
        };
        (Session::new(agent, Box::new(prompt)), recorded)
    }

    fn no_args() -> Map<String, Value> {
        Map::new()
    }

    #[tokio::test]
    async fn test_interactive_keeps_one_conversation() {
        let (mut session, recorded) = session(
            vec![
                Ok(Response::new("msg_1", vec![ContentBlock::text("Hallo!")], StopReason::EndTurn)),
                Ok(Response::new("msg_2", vec![ContentBlock::text("Tschüss!")], StopReason::EndTurn)),
            ],
            vec![
                Input::message("hi"),
                Input::ask_again(),
                Input::message("bye"),
                Input::exit(),
            ],
        );

        session.start().await.unwrap();

        assert_eq!(session.conversation().len(), 4);
        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.busy, 2);
        assert!(recorded.closed);
        let texts: Vec<String> = recorded
            .rendered
            .iter()
            .filter_map(Message::assistant_text)
            .collect();
        assert_eq!(texts, vec!["Hallo!", "Tschüss!"]);
    }

    #[tokio::test]
    async fn test_headless_renders_only_text() {
        let (mut session, recorded) = session(
            vec![
                Ok(Response::new(
                    "msg_1",
                    vec![
                        ContentBlock::reasoning("look first", "sig"),
                        ContentBlock::tool_invocation("toolu_1", "ls", no_args()),
                    ],
                    StopReason::ToolUse,
                )),
                Ok(Response::new(
                    "msg_2",
                    vec![ContentBlock::text("Here they are, ja!")],
                    StopReason::EndTurn,
                )),
            ],
            vec![],
        );

        session
            .headless_start("list files".to_string())
            .await
            .unwrap();

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.rendered.len(), 1);
        assert_eq!(
            recorded.rendered[0].assistant_text().as_deref(),
            Some("Here they are, ja!")
        );
        assert!(recorded.notices.is_empty());
        // user, thinking, tool_use, results, text
        assert_eq!(session.conversation().len(), 5);
    }

    #[tokio::test]
    async fn test_early_stop_is_reported() {
        let (mut session, recorded) = session(
            vec![Ok(Response::new(
                "msg_1",
                vec![ContentBlock::text("The answer is")],
                StopReason::MaxTokens,
            ))],
            vec![],
        );

        session.headless_start("question".to_string()).await.unwrap();

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.notices.len(), 1);
        assert!(recorded.notices[0].contains("max_tokens"));
    }

    #[tokio::test]
    async fn test_turn_error_ends_the_session() {
        let (mut session, recorded) = session(
            vec![Err(AgentError::transport(
                TransportErrorKind::Status(500),
                "Internal server error",
            ))],
            vec![Input::message("hi"), Input::message("never read")],
        );

        let err = session.start().await.unwrap_err();
        assert!(err.to_string().contains("Internal server error"));
        assert_eq!(session.conversation().len(), 1);
        assert!(recorded.lock().unwrap().rendered.is_empty());
    }
}
