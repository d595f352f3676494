//! Core types for the agent system.

use crate::llm::LlmError;

/// Errors that can occur while an agent processes an input.
///
/// The execution envelope passes these through untouched, so the variant an
/// agent returns is exactly the variant the transport sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LlmError> for AgentError {
    fn from(e: LlmError) -> Self {
        Self::LlmError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_errors_keep_their_message() {
        let err: AgentError = LlmError::from_status(401, "bad key".to_string()).into();
        assert_eq!(
            err,
            AgentError::LlmError("Client error (HTTP 401): bad key".to_string())
        );
        assert_eq!(
            err.to_string(),
            "LLM error: Client error (HTTP 401): bad key"
        );
    }
}
