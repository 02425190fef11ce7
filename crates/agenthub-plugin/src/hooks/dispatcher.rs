//! Hook dispatcher — emits events to registered handlers sequentially.
//!
//! Ordering guarantee: handlers run in strictly ascending priority order,
//! each fully awaited (including its own nested suspensions) before the
//! next begins. Each invocation is independently fault-isolated: a failing
//! handler is logged and reported in the returned list, and dispatch
//! continues with the next handler.
//!
//! There is deliberately no timeout or cancellation: a handler that never
//! completes stalls the entire emission and whatever lifecycle operation
//! triggered it.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::definitions::{HookEvent, HookPayload};
use super::registry::HookBus;

/// Dispatches events to all registered handlers.
#[derive(Debug)]
pub struct HookDispatcher {
    /// Hook bus storage.
    bus: Arc<HookBus>,
}

impl HookDispatcher {
    /// Creates a new dispatcher over a hook bus.
    pub fn new(bus: Arc<HookBus>) -> Self {
        Self { bus }
    }

    /// Emits an event with a data map.
    ///
    /// Returns the names of plugins whose handlers failed. An event with
    /// no handlers is not an error and yields an empty list.
    pub async fn emit(&self, event: HookEvent, data: HashMap<String, Value>) -> Vec<String> {
        self.emit_payload(&HookPayload::with_map(event, data)).await
    }

    /// Emits a pre-built payload. See [`emit`](Self::emit).
    pub async fn emit_payload(&self, payload: &HookPayload) -> Vec<String> {
        let handlers = self.bus.get_handlers(&payload.event).await;
        if handlers.is_empty() {
            return Vec::new();
        }

        debug!(
            event = %payload.event,
            handler_count = handlers.len(),
            "Emitting hook event"
        );

        let mut failed = Vec::new();
        for (plugin, handler) in &handlers {
            if let Err(e) = handler.handle(payload).await {
                warn!(
                    event = %payload.event,
                    plugin = %plugin,
                    error = %e,
                    "Hook handler failed"
                );
                failed.push(plugin.clone());
            }
        }
        failed
    }

    /// Returns a reference to the underlying hook bus.
    pub fn bus(&self) -> &Arc<HookBus> {
        &self.bus
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::super::registry::FnHandler;
    use super::*;

    fn recorder(log: Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Arc<FnHandler> {
        Arc::new(FnHandler::new(tag, move |_| {
            let log = log.clone();
            async move {
                log.lock().expect("lock").push(tag);
                Ok(())
            }
        }))
    }

    #[tokio::test]
    async fn test_emit_runs_in_priority_order() {
        let bus = Arc::new(HookBus::new());
        let dispatcher = HookDispatcher::new(bus.clone());
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.register(HookEvent::TaskStarted, "p50", recorder(log.clone(), "h50"), 50)
            .await;
        bus.register(HookEvent::TaskStarted, "p10", recorder(log.clone(), "h10"), 10)
            .await;
        bus.register(HookEvent::TaskStarted, "p30", recorder(log.clone(), "h30"), 30)
            .await;

        let failed = dispatcher.emit(HookEvent::TaskStarted, HashMap::new()).await;
        assert!(failed.is_empty());
        assert_eq!(*log.lock().expect("lock"), vec!["h10", "h30", "h50"]);
    }

    #[tokio::test]
    async fn test_failing_handler_is_isolated() {
        let bus = Arc::new(HookBus::new());
        let dispatcher = HookDispatcher::new(bus.clone());
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.register(HookEvent::TaskFailed, "early", recorder(log.clone(), "early"), 10)
            .await;
        bus.register(
            HookEvent::TaskFailed,
            "broken",
            Arc::new(FnHandler::new("broken", |_| async {
                Err("boom".to_string())
            })),
            20,
        )
        .await;
        bus.register(HookEvent::TaskFailed, "late", recorder(log.clone(), "late"), 30)
            .await;

        let failed = dispatcher.emit(HookEvent::TaskFailed, HashMap::new()).await;
        assert_eq!(failed, vec!["broken"]);
        assert_eq!(*log.lock().expect("lock"), vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_emit_without_handlers_is_empty() {
        let bus = Arc::new(HookBus::new());
        let dispatcher = HookDispatcher::new(bus);
        let failed = dispatcher
            .emit(
                HookEvent::PluginLoaded,
                HashMap::from([("plugin".to_string(), serde_json::json!("x"))]),
            )
            .await;
        assert!(failed.is_empty());
    }

    #[tokio::test]
    async fn test_handler_payload_data_visible() {
        let bus = Arc::new(HookBus::new());
        let dispatcher = HookDispatcher::new(bus.clone());
        let seen = Arc::new(Mutex::new(None));
        let seen_in = seen.clone();

        bus.register(
            HookEvent::TaskCompleted,
            "p",
            Arc::new(FnHandler::new("p", move |payload: HookPayload| {
                let seen = seen_in.clone();
                async move {
                    *seen.lock().expect("lock") =
                        payload.get_string("task_id").map(|s| s.to_string());
                    Ok(())
                }
            })),
            100,
        )
        .await;

        dispatcher
            .emit(
                HookEvent::TaskCompleted,
                HashMap::from([("task_id".to_string(), serde_json::json!("t-9"))]),
            )
            .await;
        assert_eq!(seen.lock().expect("lock").as_deref(), Some("t-9"));
    }
}
