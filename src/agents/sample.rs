//! Sample agent - passthrough stub used as the default wiring.
//!
//! Stands in for real work with a short sleep and reports placeholder token
//! usage, so the whole request path can be exercised without an LLM.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::agents::{Agent, AgentError};
use crate::types::{Input, Output, Payload, TokenUsage};

/// Simulated processing time.
const SIMULATED_WORK: Duration = Duration::from_millis(100);

/// Placeholder usage reported on every call.
pub const SAMPLE_TOKEN_USAGE: TokenUsage = TokenUsage {
    prompt_tokens: 100,
    completion_tokens: 50,
    total_tokens: 150,
};

/// Passthrough agent: suffixes text, flags mappings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleAgent;

impl SampleAgent {
    pub fn new() -> Self {
        Self
    }

    fn transform(payload: &Payload) -> Payload {
        match payload {
            Payload::Text(text) => Payload::Text(format!("{}_processed", text)),
            Payload::Structured(map) => {
                let mut map = map.clone();
                map.insert("processed".to_string(), Value::Bool(true));
                Payload::Structured(map)
            }
        }
    }
}

#[async_trait]
impl Agent for SampleAgent {
    fn name(&self) -> &str {
        "SampleAgent"
    }

    fn description(&self) -> &str {
        "Sample agent: echoes the input with a processed marker"
    }

    async fn process_input(&self, input: &Input) -> Result<Output, AgentError> {
        tokio::time::sleep(SIMULATED_WORK).await;

        Ok(Output::new(input.session_id.clone(), Self::transform(&input.payload))
            .with_token_usage(SAMPLE_TOKEN_USAGE))
    }
}
