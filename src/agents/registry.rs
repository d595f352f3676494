//! Named collection of enveloped agents served by the transport.

use std::collections::HashMap;
use std::sync::Arc;

use crate::agents::{AgentRef, Envelope};
use crate::logging::SinkRef;

/// Agents keyed by lower-cased name, each already wrapped in an [`Envelope`].
///
/// The first registered agent is the default one (`POST /process`).
pub struct AgentRegistry {
    sink: SinkRef,
    default_key: Option<String>,
    envelopes: HashMap<String, Arc<Envelope>>,
}

impl AgentRegistry {
    /// Create an empty registry; every agent registered later logs to `sink`.
    pub fn new(sink: SinkRef) -> Self {
        Self {
            sink,
            default_key: None,
            envelopes: HashMap::new(),
        }
    }

    /// Route key for an agent name.
    pub fn key_for(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Wrap and register an agent, replacing any agent with the same name.
    pub fn register(&mut self, agent: AgentRef) -> Arc<Envelope> {
        let envelope = Arc::new(Envelope::new(agent, Arc::clone(&self.sink)));
        let key = Self::key_for(envelope.agent_name());

        if self.envelopes.contains_key(&key) {
            tracing::warn!("Replacing registered agent '{}'", envelope.agent_name());
        }
        tracing::info!(
            "Registered agent '{}' ({})",
            envelope.agent_name(),
            envelope.description()
        );

        if self.default_key.is_none() {
            self.default_key = Some(key.clone());
        }
        self.envelopes.insert(key, Arc::clone(&envelope));
        envelope
    }

    /// Look up an agent by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<Arc<Envelope>> {
        self.envelopes.get(&Self::key_for(name)).cloned()
    }

    /// The agent served on the default route.
    pub fn default_envelope(&self) -> Option<Arc<Envelope>> {
        self.default_key
            .as_ref()
            .and_then(|key| self.envelopes.get(key).cloned())
    }

    /// Registered agent names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .envelopes
            .values()
            .map(|e| e.agent_name().to_string())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::SampleAgent;
    use crate::logging::MemorySink;

    #[test]
    fn first_registration_becomes_default() {
        let mut registry = AgentRegistry::new(Arc::new(MemorySink::new()));
        assert!(registry.default_envelope().is_none());

        registry.register(Arc::new(SampleAgent::new()));
        let default = registry.default_envelope().unwrap();
        assert_eq!(default.agent_name(), "SampleAgent");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry = AgentRegistry::new(Arc::new(MemorySink::new()));
        registry.register(Arc::new(SampleAgent::new()));

        assert!(registry.get("sampleagent").is_some());
        assert!(registry.get("SAMPLEAGENT").is_some());
        assert!(registry.get("summaryagent").is_none());
        assert_eq!(registry.names(), vec!["SampleAgent".to_string()]);
    }

    #[test]
    fn registering_same_name_replaces() {
        let mut registry = AgentRegistry::new(Arc::new(MemorySink::new()));
        registry.register(Arc::new(SampleAgent::new()));
        registry.register(Arc::new(SampleAgent::new()));
        assert_eq!(registry.len(), 1);
    }
}
