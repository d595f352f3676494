//! Completion agent - hands the input straight to the completion service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::agents::{Agent, AgentError};
use crate::llm::{ChatMessage, ChatOptions, LlmClient};
use crate::types::{Input, Output, Payload, TokenUsage};

/// Sends the input text as a single user message and returns the reply text.
///
/// Structured payloads are sent as their JSON rendering.
pub struct CompletionAgent {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl CompletionAgent {
    pub fn new(llm: Arc<dyn LlmClient>, model: String) -> Self {
        Self { llm, model }
    }

    fn prompt_text(payload: &Payload) -> String {
        match payload {
            Payload::Text(text) => text.clone(),
            Payload::Structured(_) => serde_json::to_string(payload).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Agent for CompletionAgent {
    fn name(&self) -> &str {
        "CompletionAgent"
    }

    fn description(&self) -> &str {
        "Completion agent: returns the model's reply to the input text"
    }

    async fn process_input(&self, input: &Input) -> Result<Output, AgentError> {
        let messages = [ChatMessage::user(Self::prompt_text(&input.payload))];
        let response = self
            .llm
            .chat_completion(&self.model, &messages, ChatOptions::default())
            .await?;

        let reply = response.content.ok_or_else(|| {
            AgentError::MalformedResponse("completion reply had no content".to_string())
        })?;
        let usage: TokenUsage = response.usage.unwrap_or_default().into();
        Ok(Output::new(input.session_id.clone(), reply).with_token_usage(usage))
    }
}
