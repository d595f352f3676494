//! Agents module - pluggable request processors.
//!
//! # Agent Types
//! - **SampleAgent**: passthrough stub, the default wiring and the starting
//!   point for generated agents
//! - **SummaryAgent**: LLM-backed summarizer with a best-effort reply parser
//! - **CompletionAgent**: forwards the input text to the completion service
//!
//! # Design
//! - Agents implement [`Agent::process_input`] and nothing else
//! - Timing, lifecycle logging and output stamping live in [`Envelope`]
//! - [`AgentRegistry`] wraps each agent once at start-up and is shared by all requests

mod completion;
mod envelope;
mod registry;
mod sample;
pub mod summary;
mod types;

pub use completion::CompletionAgent;
pub use envelope::Envelope;
pub use registry::AgentRegistry;
pub use sample::SampleAgent;
pub use summary::SummaryAgent;
pub use types::AgentError;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::llm::{LlmClient, OpenAiClient};
use crate::logging::SinkRef;
use crate::types::{Input, Output};

/// Base trait for all agents.
///
/// # Invariants
/// - `name()` is fixed for the lifetime of the agent
/// - `process_input()` never panics; all errors are returned as `Err`
/// - agents hold no per-call state, so one instance serves concurrent calls
#[async_trait]
pub trait Agent: Send + Sync {
    /// Name identifying this agent in outputs, logs and routes.
    fn name(&self) -> &str;

    /// Get a human-readable description of this agent.
    fn description(&self) -> &str {
        "Generic agent"
    }

    /// Transform one input into an output.
    ///
    /// `session_id`, `latency_ms` and `agent_name` of the returned output are
    /// ignored; the envelope sets them.
    async fn process_input(&self, input: &Input) -> Result<Output, AgentError>;
}

/// Shared handle to an agent.
pub type AgentRef = Arc<dyn Agent>;

/// Build the registry served by the HTTP API.
///
/// `SampleAgent` is always registered first and serves `POST /process`;
/// the LLM-backed agents are added when a completion service is configured.
pub fn build_registry(config: &Config, sink: SinkRef) -> AgentRegistry {
    let mut registry = AgentRegistry::new(sink);
    registry.register(Arc::new(SampleAgent::new()));

    match &config.llm {
        Some(llm) => {
            let client: Arc<dyn LlmClient> = Arc::new(OpenAiClient::with_base_url(
                llm.api_key.clone(),
                llm.base_url.clone(),
            ));
            registry.register(Arc::new(SummaryAgent::new(
                Arc::clone(&client),
                llm.model.clone(),
                config.summary.clone(),
            )));
            registry.register(Arc::new(CompletionAgent::new(client, llm.model.clone())));
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set; LLM-backed agents are disabled");
        }
    }

    registry
}
