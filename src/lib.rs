//! # MCP Agent
//!
//! HTTP service template for building pluggable AI agents.
//!
//! This library provides:
//! - An [`agents::Agent`] contract plus the [`agents::Envelope`] that times,
//!   logs and stamps every call
//! - A stub agent, an LLM-backed summarizer and a plain completion agent
//! - An axum API with API-key authentication and request validation
//! - A project generator (`create-agent`) that clones the template and wires
//!   in a new agent
//!
//! ## Architecture
//!
//! ```text
//!   POST /process ──► auth ──► validation ──► Envelope::execute
//!                                                  │
//!                       LogSink ◄── received ──────┤
//!                                                  ▼
//!                                     Agent::process_input ──► LlmClient
//!                                                  │
//!                       LogSink ◄── processed/error┘
//! ```
//!
//! ## Modules
//! - `agents`: agent trait, envelope, registry and the built-in agents
//! - `api`: HTTP routes, auth and validation
//! - `llm`: OpenAI-compatible completion client
//! - `scaffold`: template-based project generator

pub mod agents;
pub mod api;
pub mod config;
pub mod llm;
pub mod logging;
pub mod scaffold;
pub mod types;
pub mod util;
pub mod version;

pub use config::Config;
pub use types::{Input, LogEntry, LogStage, Output, Payload, TokenUsage};
pub use version::{version_info, VersionInfo};
