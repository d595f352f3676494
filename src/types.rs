//! Envelope types shared by every agent and the transport layer.
//!
//! Wire names follow the JSON contract clients already speak
//! (`input`/`output`/`agent`), while the Rust field names describe what the
//! value is.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata attached to a request (`userId`, `sourceFile`, agent options...).
pub type Meta = Map<String, Value>;

/// Text or structured payload carried by both request and response envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// Raw text
    Text(String),
    /// String-keyed mapping of arbitrary JSON values
    Structured(Map<String, Value>),
}

impl Payload {
    /// Create a text payload.
    pub fn text(text: impl Into<String>) -> Self {
        Payload::Text(text.into())
    }

    /// Serialize any value that renders as a JSON object into a structured payload.
    ///
    /// Returns `None` if the value does not serialize to an object.
    pub fn from_serializable<T: Serialize>(value: &T) -> Option<Self> {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Some(Payload::Structured(map)),
            _ => None,
        }
    }

    /// Get the text, if this is a text payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Structured(_) => None,
        }
    }

    /// Character length of the JSON rendering of this payload.
    ///
    /// Text payloads are measured with their surrounding quotes, the same
    /// way a JSON client would see them.
    pub fn serialized_len(&self) -> usize {
        serde_json::to_string(self)
            .map(|s| s.chars().count())
            .unwrap_or(0)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Payload::Structured(map)
    }
}

/// Token accounting reported by a completion service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Create a usage object with `total_tokens` as the sum of the other two.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Opaque correlation identifier (non-empty)
    pub session_id: String,

    #[serde(rename = "input")]
    pub payload: Payload,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Input {
    pub fn new(session_id: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            session_id: session_id.into(),
            payload: payload.into(),
            meta: None,
        }
    }

    /// Attach request metadata.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Look up a metadata value by key.
    pub fn meta_value(&self, key: &str) -> Option<&Value> {
        self.meta.as_ref().and_then(|m| m.get(key))
    }
}

/// Response envelope.
///
/// `session_id`, `latency_ms` and `agent_name` belong to the execution
/// envelope: whatever an agent puts there is replaced before the output
/// leaves `Envelope::execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub session_id: String,

    #[serde(rename = "output")]
    pub payload: Payload,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,

    pub latency_ms: u64,

    #[serde(rename = "agent")]
    pub agent_name: String,
}

impl Output {
    /// Create an output for the given session. Latency and agent name are
    /// left for the envelope to fill in.
    pub fn new(session_id: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            session_id: session_id.into(),
            payload: payload.into(),
            token_usage: None,
            latency_ms: 0,
            agent_name: String::new(),
        }
    }

    pub fn with_token_usage(mut self, usage: TokenUsage) -> Self {
        self.token_usage = Some(usage);
        self
    }
}

/// Lifecycle point a log entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStage {
    Received,
    Processed,
    Error,
}

impl LogStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStage::Received => "received",
            LogStage::Processed => "processed",
            LogStage::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, LogStage::Received)
    }
}

impl std::fmt::Display for LogStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured request lifecycle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// RFC 3339 timestamp (UTC, milliseconds)
    pub timestamp: String,

    pub session_id: String,

    #[serde(rename = "agent")]
    pub agent_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,

    /// Failure message (always `null` on non-error stages)
    pub error: Option<String>,

    #[serde(rename = "logStage")]
    pub stage: LogStage,
}

impl LogEntry {
    fn base(session_id: &str, agent_name: &str, stage: LogStage) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            session_id: session_id.to_string(),
            agent_name: agent_name.to_string(),
            input_length: None,
            output_length: None,
            latency_ms: None,
            token_usage: None,
            error: None,
            stage,
        }
    }

    /// Entry emitted before an agent is invoked.
    pub fn received(session_id: &str, agent_name: &str, input_length: usize) -> Self {
        Self {
            input_length: Some(input_length),
            ..Self::base(session_id, agent_name, LogStage::Received)
        }
    }

    /// Entry emitted after an agent returned successfully.
    pub fn processed(
        session_id: &str,
        agent_name: &str,
        input_length: usize,
        output_length: usize,
        latency_ms: u64,
        token_usage: Option<TokenUsage>,
    ) -> Self {
        Self {
            input_length: Some(input_length),
            output_length: Some(output_length),
            latency_ms: Some(latency_ms),
            token_usage,
            ..Self::base(session_id, agent_name, LogStage::Processed)
        }
    }

    /// Entry emitted after an agent failed.
    pub fn failed(
        session_id: &str,
        agent_name: &str,
        input_length: usize,
        latency_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            input_length: Some(input_length),
            latency_ms: Some(latency_ms),
            error: Some(error.into()),
            ..Self::base(session_id, agent_name, LogStage::Error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn input_uses_wire_names() {
        let input: Input = serde_json::from_value(json!({
            "sessionId": "s-1",
            "input": { "data": "test" },
            "meta": { "userId": "user123" }
        }))
        .unwrap();

        assert_eq!(input.session_id, "s-1");
        assert!(matches!(input.payload, Payload::Structured(_)));
        assert_eq!(input.meta_value("userId"), Some(&json!("user123")));
    }

    #[test]
    fn payload_rejects_non_text_non_object() {
        let result = serde_json::from_value::<Payload>(json!(123));
        assert!(result.is_err());
        let result = serde_json::from_value::<Payload>(json!(["a"]));
        assert!(result.is_err());
    }

    #[test]
    fn output_serializes_agent_and_omits_missing_usage() {
        let mut output = Output::new("s-1", "done");
        output.agent_name = "SampleAgent".to_string();
        output.latency_ms = 12;

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value,
            json!({
                "sessionId": "s-1",
                "output": "done",
                "latencyMs": 12,
                "agent": "SampleAgent"
            })
        );
    }

    #[test]
    fn serialized_len_counts_json_characters() {
        assert_eq!(Payload::text("hello").serialized_len(), 7);
        assert_eq!(Payload::text("要約").serialized_len(), 4);

        let mut map = Map::new();
        map.insert("a".to_string(), json!(1));
        assert_eq!(Payload::Structured(map).serialized_len(), r#"{"a":1}"#.len());
    }

    #[test]
    fn received_entry_has_no_latency() {
        let entry = LogEntry::received("s-1", "SampleAgent", 7);
        assert_eq!(entry.stage, LogStage::Received);
        assert_eq!(entry.input_length, Some(7));
        assert!(entry.latency_ms.is_none());
        assert!(entry.error.is_none());

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["logStage"], "received");
        assert_eq!(value["error"], Value::Null);
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn token_usage_total_is_sum() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
    }
}
