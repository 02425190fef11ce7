//! Capability contracts plugins implement, plus the host-side registry
//! interface the manager registers agents with.
//!
//! Plugin-authored code reports failures as plain strings; the runtime
//! wraps them into the error taxonomy at the boundary.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

/// Contract for agent implementations supplied by plugins.
#[async_trait]
pub trait Agent: Send + Sync + std::fmt::Debug {
    /// Unique agent name used for host registration.
    fn name(&self) -> &str;

    /// Executes a task and returns its result.
    async fn execute(&self, task: Value) -> Result<Value, String>;

    /// Analyzes an input without side effects.
    async fn analyze(&self, input: Value) -> Result<Value, String>;

    /// Reports the agent's current status.
    async fn report(&self) -> Result<Value, String>;
}

/// Contract for periodic monitor implementations supplied by plugins.
#[async_trait]
pub trait Monitor: Send + Sync + std::fmt::Debug {
    /// Monitor name.
    fn name(&self) -> &str;

    /// Runs one check cycle.
    async fn check(&self) -> Result<Value, String>;
}

/// Contract for callable tools supplied by plugins.
///
/// Tools carry no behavioral contract beyond being constructible and
/// named; the host decides how to invoke them.
pub trait Tool: Send + Sync + std::fmt::Debug {
    /// Tool name.
    fn name(&self) -> &str;
}

/// The host's master capability registry.
///
/// External collaborator: the manager registers enabled agents (and their
/// routing keywords) here and unregisters them on disable or rollback.
#[async_trait]
pub trait MasterRegistry: Send + Sync + std::fmt::Debug {
    /// Registers an agent instance with the host.
    async fn register_agent(&self, agent: Arc<dyn Agent>) -> Result<(), String>;

    /// Unregisters an agent by name.
    async fn unregister_agent(&self, name: &str) -> Result<(), String>;

    /// Associates routing keywords with a registered agent.
    async fn register_agent_keywords(&self, name: &str, keywords: &[String])
    -> Result<(), String>;
}

/// In-memory [`MasterRegistry`] implementation.
///
/// Used by the server binary when no richer host registry is wired in,
/// and by tests.
#[derive(Debug, Default)]
pub struct InMemoryMasterRegistry {
    agents: RwLock<HashMap<String, Arc<dyn Agent>>>,
    keywords: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryMasterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the names of all registered agents, sorted.
    pub async fn agent_names(&self) -> Vec<String> {
        let agents = self.agents.read().await;
        let mut names: Vec<String> = agents.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered agents.
    pub async fn agent_count(&self) -> usize {
        let agents = self.agents.read().await;
        agents.len()
    }

    /// Returns the routing keywords registered for an agent.
    pub async fn keywords_for(&self, name: &str) -> Vec<String> {
        let keywords = self.keywords.read().await;
        keywords.get(name).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl MasterRegistry for InMemoryMasterRegistry {
    async fn register_agent(&self, agent: Arc<dyn Agent>) -> Result<(), String> {
        let mut agents = self.agents.write().await;
        let name = agent.name().to_string();
        if agents.contains_key(&name) {
            return Err(format!("agent '{name}' is already registered"));
        }
        agents.insert(name, agent);
        Ok(())
    }

    async fn unregister_agent(&self, name: &str) -> Result<(), String> {
        let mut agents = self.agents.write().await;
        agents
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| format!("agent '{name}' is not registered"))?;
        self.keywords.write().await.remove(name);
        Ok(())
    }

    async fn register_agent_keywords(
        &self,
        name: &str,
        keywords: &[String],
    ) -> Result<(), String> {
        let agents = self.agents.read().await;
        if !agents.contains_key(name) {
            return Err(format!("agent '{name}' is not registered"));
        }
        self.keywords
            .write()
            .await
            .insert(name.to_string(), keywords.to_vec());
        Ok(())
    }
}
