//! Hook bus storage — plugins register handlers per event with priority
//! ordering.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::definitions::{HookEvent, HookPayload};

/// Trait for hook handler implementations.
#[async_trait]
pub trait EventHandler: Send + Sync + std::fmt::Debug {
    /// Handles one event emission. An `Err` is caught by the dispatcher
    /// and reported as a per-plugin failure; it never aborts the chain.
    async fn handle(&self, payload: &HookPayload) -> Result<(), String>;
}

/// A closure-based handler for quick handler creation.
pub struct FnHandler {
    name: String,
    handler: Arc<
        dyn Fn(
                &HookPayload,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = Result<(), String>> + Send + '_>,
            > + Send
            + Sync,
    >,
}

impl std::fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler")
            .field("name", &self.name)
            .field("handler", &"<closure>")
            .finish()
    }
}

impl FnHandler {
    /// Creates a new closure-based handler.
    pub fn new<F, Fut>(name: &str, handler: F) -> Self
    where
        F: Fn(HookPayload) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send + 'static,
    {
        Self {
            name: name.to_string(),
            handler: Arc::new(move |payload| {
                let fut = handler(payload.clone());
                Box::pin(fut)
            }),
        }
    }
}

#[async_trait]
impl EventHandler for FnHandler {
    async fn handle(&self, payload: &HookPayload) -> Result<(), String> {
        (self.handler)(payload).await
    }
}

/// One registration: priority, owning plugin, handler.
#[derive(Debug, Clone)]
pub(crate) struct HookEntry {
    /// Priority (lower = earlier execution).
    pub priority: i32,
    /// Plugin that registered this handler.
    pub plugin: String,
    /// The handler.
    pub handler: Arc<dyn EventHandler>,
}

/// Registry of hook handlers organized by event.
#[derive(Debug, Default)]
pub struct HookBus {
    /// Event → handler list, kept sorted by ascending priority.
    handlers: RwLock<HashMap<HookEvent, Vec<HookEntry>>>,
}

impl HookBus {
    /// Creates a new empty hook bus.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a handler for an event.
    ///
    /// The event's handler list is re-sorted by ascending priority after
    /// insertion; entries with equal priority keep insertion order (the
    /// sort is stable).
    pub async fn register(
        &self,
        event: HookEvent,
        plugin: &str,
        handler: Arc<dyn EventHandler>,
        priority: i32,
    ) {
        let mut handlers = self.handlers.write().await;
        let entries = handlers.entry(event).or_default();
        entries.push(HookEntry {
            priority,
            plugin: plugin.to_string(),
            handler,
        });
        entries.sort_by_key(|e| e.priority);

        debug!(
            event = %event,
            plugin = %plugin,
            priority = priority,
            "Hook handler registered"
        );
    }

    /// Removes every registration owned by a plugin, across all events.
    ///
    /// Events left with zero handlers are pruned. Returns the number of
    /// registrations removed.
    pub async fn unregister_plugin(&self, plugin: &str) -> usize {
        let mut handlers = self.handlers.write().await;
        let mut removed = 0;

        for entries in handlers.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.plugin != plugin);
            removed += before - entries.len();
        }
        handlers.retain(|_, entries| !entries.is_empty());

        if removed > 0 {
            info!(plugin = %plugin, removed = removed, "Hooks unregistered for plugin");
        }
        removed
    }

    /// Returns all registrations for an event in priority order, as
    /// (plugin, handler) pairs.
    pub async fn get_handlers(&self, event: &HookEvent) -> Vec<(String, Arc<dyn EventHandler>)> {
        let handlers = self.handlers.read().await;
        handlers
            .get(event)
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| (e.plugin.clone(), e.handler.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the number of handlers registered for an event.
    pub async fn handler_count(&self, event: &HookEvent) -> usize {
        let handlers = self.handlers.read().await;
        handlers.get(event).map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns, per event, how many handlers a plugin has registered.
    pub async fn plugin_hooks(&self, plugin: &str) -> HashMap<HookEvent, usize> {
        let handlers = self.handlers.read().await;
        let mut counts = HashMap::new();
        for (event, entries) in handlers.iter() {
            let n = entries.iter().filter(|e| e.plugin == plugin).count();
            if n > 0 {
                counts.insert(*event, n);
            }
        }
        counts
    }

    /// Returns the total number of registrations across all events.
    pub async fn total_handlers(&self) -> usize {
        let handlers = self.handlers.read().await;
        handlers.values().map(|entries| entries.len()).sum()
    }

    /// Removes every registration.
    pub async fn clear(&self) {
        let mut handlers = self.handlers.write().await;
        handlers.clear();
    }
}
