//! Summary agent - LLM-backed summarizer.
//!
//! # Execution Flow
//! 1. Resolve options (request meta > environment defaults > built-in defaults)
//! 2. Build the instruction prompt around the source text
//! 3. Call the completion service once (no retry)
//! 4. Parse the reply, falling back to heuristics when it is unstructured

mod options;
mod parse;
mod prompt;

pub use options::{
    resolve, Language, SummaryDefaults, SummaryFormat, SummaryMeta, SummaryOptions, SummaryStyle,
    DEFAULT_MAX_LENGTH,
};
pub use parse::{compression_ratio, parse_summary_response, SummaryResult};
pub use prompt::{
    build_prompt, token_budget, MAX_COMPLETION_TOKENS, SUMMARY_TEMPERATURE, SYSTEM_PROMPT,
};

use std::sync::Arc;

use async_trait::async_trait;

use crate::agents::{Agent, AgentError};
use crate::llm::{ChatMessage, ChatOptions, LlmClient};
use crate::types::{Input, Output, Payload, TokenUsage};

/// Summarizes a text payload into `{summary, keyPoints, ...}`.
pub struct SummaryAgent {
    llm: Arc<dyn LlmClient>,
    model: String,
    defaults: SummaryDefaults,
}

impl SummaryAgent {
    /// Create a summary agent.
    ///
    /// `defaults` are the process-wide option defaults; requests override them
    /// one field at a time through their metadata.
    pub fn new(llm: Arc<dyn LlmClient>, model: String, defaults: SummaryDefaults) -> Self {
        Self {
            llm,
            model,
            defaults,
        }
    }

    /// Options in effect for one input.
    pub fn resolve_options(&self, input: &Input) -> Result<SummaryOptions, AgentError> {
        let overrides = SummaryMeta::from_meta(input.meta.as_ref())?;
        Ok(SummaryOptions::resolve(&overrides, &self.defaults))
    }
}

#[async_trait]
impl Agent for SummaryAgent {
    fn name(&self) -> &str {
        "SummaryAgent"
    }

    fn description(&self) -> &str {
        "Summary agent: summarizes text and extracts key points"
    }

    async fn process_input(&self, input: &Input) -> Result<Output, AgentError> {
        let text = input.payload.as_text().ok_or_else(|| {
            AgentError::InvalidInput("SummaryAgent expects a text input".to_string())
        })?;
        let options = self.resolve_options(input)?;

        tracing::debug!(
            "SummaryAgent summarizing {} chars (max_length={}, language={:?}, format={:?})",
            text.chars().count(),
            options.max_length,
            options.language,
            options.format
        );

        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(text, &options)),
        ];
        let chat_options = ChatOptions {
            temperature: Some(SUMMARY_TEMPERATURE),
            max_tokens: Some(token_budget(options.max_length)),
        };

        let response = self
            .llm
            .chat_completion(&self.model, &messages, chat_options)
            .await?;

        let reply = response.content.ok_or_else(|| {
            AgentError::MalformedResponse("completion reply had no content".to_string())
        })?;
        let result = parse_summary_response(&reply, text);
        let payload = Payload::from_serializable(&result).ok_or_else(|| {
            AgentError::Internal("summary result did not serialize to an object".to_string())
        })?;
        let usage: TokenUsage = response.usage.unwrap_or_default().into();

        Ok(Output::new(input.session_id.clone(), payload).with_token_usage(usage))
    }
}
