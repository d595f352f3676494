//! Execution envelope applied around every agent call.
//!
//! # Contract
//! - exactly one `received` entry is recorded before the agent runs
//! - exactly one terminal entry (`processed` or `error`) is recorded after it returns
//! - on success, `session_id`, `latency_ms` and `agent_name` of the returned
//!   [`Output`] are overwritten with the envelope's own values; whatever the
//!   agent set there is discarded
//! - on failure, the agent's [`AgentError`] is returned as-is (never wrapped,
//!   never retried)

use std::time::Instant;

use crate::agents::{AgentError, AgentRef};
use crate::logging::SinkRef;
use crate::types::{Input, LogEntry, Output};

/// Wraps one agent with timing and lifecycle logging.
pub struct Envelope {
    agent: AgentRef,
    agent_name: String,
    sink: SinkRef,
}

impl Envelope {
    /// Wrap an agent. The agent's name is captured once here.
    pub fn new(agent: AgentRef, sink: SinkRef) -> Self {
        let agent_name = agent.name().to_string();
        Self {
            agent,
            agent_name,
            sink,
        }
    }

    /// Name stamped on every output and log entry.
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn description(&self) -> &str {
        self.agent.description()
    }

    /// Run the wrapped agent on `input`.
    pub async fn execute(&self, input: &Input) -> Result<Output, AgentError> {
        let start = Instant::now();
        let input_length = input.payload.serialized_len();

        self.sink.record(&LogEntry::received(
            &input.session_id,
            &self.agent_name,
            input_length,
        ));

        let result = self.agent.process_input(input).await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(output) => {
                let output = Output {
                    session_id: input.session_id.clone(),
                    latency_ms,
                    agent_name: self.agent_name.clone(),
                    ..output
                };

                self.sink.record(&LogEntry::processed(
                    &input.session_id,
                    &self.agent_name,
                    input_length,
                    output.payload.serialized_len(),
                    latency_ms,
                    output.token_usage,
                ));

                Ok(output)
            }
            Err(error) => {
                self.sink.record(&LogEntry::failed(
                    &input.session_id,
                    &self.agent_name,
                    input_length,
                    latency_ms,
                    error.to_string(),
                ));

                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("agent_name", &self.agent_name)
            .finish_non_exhaustive()
    }
}
