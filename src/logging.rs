//! Request lifecycle logging.
//!
//! Agents never log their own lifecycle; the execution envelope hands a
//! [`LogEntry`] to whichever [`LogSink`] it was built with. Production uses
//! [`TracingSink`], tests capture entries with [`MemorySink`].

use std::sync::{Arc, Mutex};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::types::{LogEntry, LogStage};

/// Tracing target used for request lifecycle records.
pub const REQUEST_LOG_TARGET: &str = "mcp_agent::requests";

/// Destination for request lifecycle entries.
///
/// Recording is infallible from the caller's point of view: a sink must
/// never turn its own trouble into a failed request.
pub trait LogSink: Send + Sync {
    fn record(&self, entry: &LogEntry);
}

/// Shared handle to a log sink.
pub type SinkRef = Arc<dyn LogSink>;

/// Sink that forwards entries to `tracing` (`info` for received/processed,
/// `error` for failures).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn record(&self, entry: &LogEntry) {
        let json = serde_json::to_string(entry).unwrap_or_default();
        match entry.stage {
            LogStage::Error => tracing::error!(
                target: REQUEST_LOG_TARGET,
                session_id = %entry.session_id,
                agent = %entry.agent_name,
                stage = %entry.stage,
                input_length = ?entry.input_length,
                latency_ms = ?entry.latency_ms,
                error = entry.error.as_deref().unwrap_or(""),
                entry = %json,
                "request failed"
            ),
            LogStage::Received | LogStage::Processed => tracing::info!(
                target: REQUEST_LOG_TARGET,
                session_id = %entry.session_id,
                agent = %entry.agent_name,
                stage = %entry.stage,
                input_length = ?entry.input_length,
                output_length = ?entry.output_length,
                latency_ms = ?entry.latency_ms,
                total_tokens = ?entry.token_usage.map(|u| u.total_tokens),
                entry = %json,
                "request {}",
                entry.stage
            ),
        }
    }
}

/// Sink that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Entries recorded for one session.
    pub fn entries_for(&self, session_id: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.session_id == session_id)
            .collect()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl LogSink for MemorySink {
    fn record(&self, entry: &LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry.clone());
    }
}

/// Output format for the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" | "" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{}'", other)),
        }
    }
}

/// Default filter directive for a log level.
pub fn default_directive(level: &str) -> String {
    format!("mcp_agent={level},tower_http={level}")
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}
