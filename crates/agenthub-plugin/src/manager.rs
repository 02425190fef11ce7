//! Plugin manager — drives the full lifecycle state machine.
//!
//! States: discovered → loaded → enabled ⇄ disabled, with error reachable
//! from any transition's failure path. Reload is the composite
//! disable → unload → discovered → load → enable.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::error::PluginError;
use crate::hooks::definitions::HookEvent;
use crate::hooks::dispatcher::HookDispatcher;
use crate::hooks::registry::HookBus;
use crate::loader::{LoadedComponents, Loader, ModuleRegistry};
use crate::registry::{PluginInfo, PluginRegistry, PluginState};
use crate::traits::MasterRegistry;

/// Orchestrates discovery, loading, enabling, disabling, reloading, and
/// shutdown across the registry, loader, validator, and hook bus.
#[derive(Debug)]
pub struct PluginManager {
    /// Root directory scanned for plugin packages.
    plugin_root: PathBuf,
    /// Plugin metadata and state store.
    registry: Arc<PluginRegistry>,
    /// Module loader.
    loader: Arc<Loader>,
    /// Hook bus storage.
    hook_bus: Arc<HookBus>,
    /// Hook dispatcher.
    dispatcher: Arc<HookDispatcher>,
    /// The host's capability registry.
    master: Arc<dyn MasterRegistry>,
    /// Per-plugin component bundles, present while a plugin is loaded,
    /// enabled, or disabled.
    components: RwLock<HashMap<String, LoadedComponents>>,
}

impl PluginManager {
    /// Creates a new plugin manager.
    pub fn new(
        plugin_root: impl Into<PathBuf>,
        modules: Arc<ModuleRegistry>,
        master: Arc<dyn MasterRegistry>,
    ) -> Self {
        let hook_bus = Arc::new(HookBus::new());
        let dispatcher = Arc::new(HookDispatcher::new(hook_bus.clone()));

        Self {
            plugin_root: plugin_root.into(),
            registry: Arc::new(PluginRegistry::new()),
            loader: Arc::new(Loader::new(modules)),
            hook_bus,
            dispatcher,
            master,
            components: RwLock::new(HashMap::new()),
        }
    }

    /// Runs discovery and registers every found manifest as discovered.
    ///
    /// Duplicate names are logged and skipped, not fatal. Returns the
    /// number of plugins registered.
    pub async fn initialize(&self) -> usize {
        let found = self.loader.discover(&self.plugin_root);
        let mut registered = 0;

        for (dir, manifest) in found {
            let name = manifest.name.clone();
            match self.registry.register(PluginInfo::new(manifest, dir)).await {
                Ok(()) => registered += 1,
                Err(e) => warn!(plugin = %name, error = %e, "Skipping duplicate plugin"),
            }
        }

        info!(discovered = registered, root = %self.plugin_root.display(), "Plugin discovery complete");
        registered
    }

    /// Loads a plugin's modules and instantiates its components.
    ///
    /// On success the plugin transitions to loaded and a `plugin_loaded`
    /// event is emitted; on failure it transitions to error and the
    /// failure is surfaced to the caller.
    pub async fn load_plugin(&self, name: &str) -> Result<PluginInfo, PluginError> {
        let info = self.get_known(name).await?;

        match self.loader.load_plugin(&info.manifest).await {
            Ok(components) => {
                self.components
                    .write()
                    .await
                    .insert(name.to_string(), components);
                let info = self
                    .registry
                    .update_state(name, PluginState::Loaded, None)
                    .await
                    .ok_or_else(|| unknown(name))?;
                self.emit_lifecycle(HookEvent::PluginLoaded, name).await;
                info!(plugin = %name, "Plugin loaded");
                Ok(info)
            }
            Err(e) => {
                self.registry
                    .update_state(name, PluginState::Error, Some(e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    /// Registers a plugin's capabilities with the host and enables it.
    ///
    /// Valid only from the loaded or disabled state. All-or-nothing: if
    /// any registration fails, every registration already made in this
    /// call is rolled back before the plugin transitions to error and the
    /// failure is re-raised.
    pub async fn enable_plugin(&self, name: &str) -> Result<PluginInfo, PluginError> {
        let info = self.get_known(name).await?;
        if !matches!(info.state, PluginState::Loaded | PluginState::Disabled) {
            return Err(PluginError::InvalidTransition {
                name: name.to_string(),
                from: info.state,
                operation: "enable",
            });
        }

        let components = self
            .components
            .read()
            .await
            .get(name)
            .cloned()
            .unwrap_or_default();

        let mut registered_agents = Vec::new();
        match self
            .register_components(name, &components, &mut registered_agents)
            .await
        {
            Ok(()) => {
                let info = self
                    .registry
                    .update_state(name, PluginState::Enabled, None)
                    .await
                    .ok_or_else(|| unknown(name))?;
                self.emit_lifecycle(HookEvent::PluginEnabled, name).await;
                info!(
                    plugin = %name,
                    agents = components.agents.len(),
                    hooks = components.hooks.len(),
                    "Plugin enabled"
                );
                Ok(info)
            }
            Err(message) => {
                self.rollback_registrations(name, &registered_agents).await;
                self.registry
                    .update_state(name, PluginState::Error, Some(message.clone()))
                    .await;
                Err(PluginError::Registration {
                    plugin: name.to_string(),
                    message,
                })
            }
        }
    }

    /// Unregisters a plugin's capabilities and disables it.
    ///
    /// Idempotent: disabling an already-disabled (or never-enabled)
    /// plugin is a no-op ending in the disabled state.
    pub async fn disable_plugin(&self, name: &str) -> Result<PluginInfo, PluginError> {
        self.get_known(name).await?;

        let agent_names = self.agent_names_for(name).await;
        self.rollback_registrations(name, &agent_names).await;

        let info = self
            .registry
            .update_state(name, PluginState::Disabled, None)
            .await
            .ok_or_else(|| unknown(name))?;
        self.emit_lifecycle(HookEvent::PluginDisabled, name).await;
        info!(plugin = %name, "Plugin disabled");
        Ok(info)
    }

    /// Loads and enables every discovered plugin in dependency order.
    ///
    /// Cycles are not detected: a cyclic dependency degrades to
    /// first-visited-wins ordering rather than failing. One plugin's
    /// failure marks it as error and does not prevent the remaining
    /// plugins from loading. Returns the resulting record per plugin.
    pub async fn load_all(&self) -> HashMap<String, PluginInfo> {
        let discovered = self.registry.list_by_state(PluginState::Discovered).await;
        let order = dependency_order(&discovered);

        let mut results = HashMap::new();
        for name in order {
            match self.load_and_enable(&name).await {
                Ok(info) => {
                    results.insert(name, info);
                }
                Err(e) => {
                    error!(plugin = %name, error = %e, "Plugin failed to load");
                    if let Some(info) = self.registry.get(&name).await {
                        results.insert(name, info);
                    }
                }
            }
        }
        results
    }

    /// Fully reloads one plugin: disable if enabled, unload, reset to
    /// discovered, then load and enable again.
    pub async fn reload_plugin(&self, name: &str) -> Result<PluginInfo, PluginError> {
        let info = self.get_known(name).await?;
        if info.state == PluginState::Enabled {
            self.disable_plugin(name).await?;
        }

        self.loader.unload_plugin(name).await;
        self.components.write().await.remove(name);
        self.registry
            .update_state(name, PluginState::Discovered, None)
            .await;

        self.load_plugin(name).await?;
        self.enable_plugin(name).await
    }

    /// Disables every enabled plugin, unloads every loaded module, and
    /// clears the hook bus.
    ///
    /// Best-effort: a disable failure is logged and does not stop the
    /// remaining plugins.
    pub async fn shutdown(&self) {
        for info in self.registry.list_by_state(PluginState::Enabled).await {
            if let Err(e) = self.disable_plugin(info.name()).await {
                warn!(plugin = %info.name(), error = %e, "Error disabling plugin during shutdown");
            }
        }

        let mut components = self.components.write().await;
        for name in components.keys() {
            self.loader.unload_plugin(name).await;
        }
        components.clear();
        drop(components);

        self.hook_bus.clear().await;
        info!("Plugin manager shut down");
    }

    /// Gets a plugin's config value, falling back to `default`.
    pub async fn get_plugin_config(
        &self,
        name: &str,
        key: &str,
        default: serde_json::Value,
    ) -> serde_json::Value {
        self.registry.get_config(name, key, default).await
    }

    /// Lists all known plugins.
    pub async fn list_plugins(&self) -> Vec<PluginInfo> {
        self.registry.list().await
    }

    /// Returns the plugin registry.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Returns the hook dispatcher for emitting events.
    pub fn dispatcher(&self) -> &Arc<HookDispatcher> {
        &self.dispatcher
    }

    /// Returns the hook bus.
    pub fn hook_bus(&self) -> &Arc<HookBus> {
        &self.hook_bus
    }

    /// Returns the module loader.
    pub fn loader(&self) -> &Arc<Loader> {
        &self.loader
    }

    // ── internals ────────────────────────────────────────────────────

    async fn get_known(&self, name: &str) -> Result<PluginInfo, PluginError> {
        self.registry.get(name).await.ok_or_else(|| unknown(name))
    }

    async fn load_and_enable(&self, name: &str) -> Result<PluginInfo, PluginError> {
        self.load_plugin(name).await?;
        self.enable_plugin(name).await
    }

    /// Registers agents (and keywords) with the master registry, then
    /// hook bindings with the bus. Agents registered before a failure
    /// are reported back through `registered_agents` for rollback.
    async fn register_components(
        &self,
        name: &str,
        components: &LoadedComponents,
        registered_agents: &mut Vec<String>,
    ) -> Result<(), String> {
        for (agent, keywords) in &components.agents {
            let agent_name = agent.name().to_string();
            self.master.register_agent(agent.clone()).await?;
            registered_agents.push(agent_name.clone());
            if !keywords.is_empty() {
                self.master
                    .register_agent_keywords(&agent_name, keywords)
                    .await?;
            }
        }

        for (event, handler, priority) in &components.hooks {
            self.hook_bus
                .register(*event, name, handler.clone(), *priority)
                .await;
        }

        Ok(())
    }

    /// Reverses every registration a plugin holds: agents out of the
    /// master registry, hooks off the bus. Safe to call when nothing was
    /// registered.
    async fn rollback_registrations(&self, name: &str, agents: &[String]) {
        for agent in agents {
            if let Err(e) = self.master.unregister_agent(agent).await {
                warn!(plugin = %name, agent = %agent, error = %e, "Agent unregistration skipped");
            }
        }
        self.hook_bus.unregister_plugin(name).await;
    }

    async fn agent_names_for(&self, name: &str) -> Vec<String> {
        let components = self.components.read().await;
        components
            .get(name)
            .map(|c| {
                c.agents
                    .iter()
                    .map(|(agent, _)| agent.name().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn emit_lifecycle(&self, event: HookEvent, name: &str) {
        let data = HashMap::from([("plugin".to_string(), json!(name))]);
        let failed = self.dispatcher.emit(event, data).await;
        if !failed.is_empty() {
            warn!(event = %event, failed = ?failed, "Lifecycle hook handlers failed");
        }
    }
}

/// Depth-first topological sort over manifest dependency lists.
///
/// A plugin is visited after its dependencies; dependency names absent
/// from the batch are treated as already satisfied. Plugins are marked
/// visited on entry, so a cycle degrades to first-visited-wins ordering.
fn dependency_order(plugins: &[PluginInfo]) -> Vec<String> {
    fn visit(
        name: &str,
        by_name: &HashMap<&str, &PluginInfo>,
        visited: &mut HashSet<String>,
        order: &mut Vec<String>,
    ) {
        if !visited.insert(name.to_string()) {
            return;
        }
        if let Some(info) = by_name.get(name) {
            for dep in &info.manifest.dependencies {
                visit(dep, by_name, visited, order);
            }
            order.push(name.to_string());
        }
    }

    let by_name: HashMap<&str, &PluginInfo> = plugins.iter().map(|p| (p.name(), p)).collect();
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    for plugin in plugins {
        visit(plugin.name(), &by_name, &mut visited, &mut order);
    }
    order
}

fn unknown(name: &str) -> PluginError {
    PluginError::UnknownPlugin {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::hooks::registry::FnHandler;
    use crate::loader::ModuleExports;
    use crate::traits::{Agent, InMemoryMasterRegistry};

    #[derive(Debug)]
    struct TestAgent {
        agent_name: String,
    }

    #[async_trait]
    impl Agent for TestAgent {
        fn name(&self) -> &str {
            &self.agent_name
        }
        async fn execute(&self, task: Value) -> Result<Value, String> {
            Ok(task)
        }
        async fn analyze(&self, input: Value) -> Result<Value, String> {
            Ok(input)
        }
        async fn report(&self) -> Result<Value, String> {
            Ok(json!({"status": "idle"}))
        }
    }

    /// Master registry double that records call order and can be told to
    /// fail keyword registration.
    #[derive(Debug)]
    struct TestMaster {
        inner: InMemoryMasterRegistry,
        log: Mutex<Vec<String>>,
        fail_keywords: bool,
    }

    impl TestMaster {
        fn new(fail_keywords: bool) -> Self {
            Self {
                inner: InMemoryMasterRegistry::new(),
                log: Mutex::new(Vec::new()),
                fail_keywords,
            }
        }

        fn registration_log(&self) -> Vec<String> {
            self.log.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl MasterRegistry for TestMaster {
        async fn register_agent(&self, agent: Arc<dyn Agent>) -> Result<(), String> {
            self.log
                .lock()
                .expect("lock")
                .push(agent.name().to_string());
            self.inner.register_agent(agent).await
        }

        async fn unregister_agent(&self, name: &str) -> Result<(), String> {
            self.inner.unregister_agent(name).await
        }

        async fn register_agent_keywords(
            &self,
            name: &str,
            keywords: &[String],
        ) -> Result<(), String> {
            if self.fail_keywords {
                return Err("keyword registry rejected the request".to_string());
            }
            self.inner.register_agent_keywords(name, keywords).await
        }
    }

    struct Fixture {
        manager: PluginManager,
        master: Arc<TestMaster>,
        loads: Arc<std::sync::atomic::AtomicUsize>,
        _root: tempfile::TempDir,
    }

    /// Builds a plugin root with the given (name, manifest JSON) pairs
    /// and a module registry exporting one agent and one hook handler
    /// per plugin name used by the tests.
    async fn fixture(plugins: &[(&str, String)], fail_keywords: bool) -> Fixture {
        let root = tempfile::tempdir().expect("tempdir");
        for (name, body) in plugins {
            let dir = root.path().join(name);
            std::fs::create_dir(&dir).expect("mkdir");
            std::fs::write(dir.join("plugin.json"), body).expect("write");
        }

        let modules = Arc::new(ModuleRegistry::new());
        let loads = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        for name in ["p1", "p2", "p3"] {
            let loads_in = loads.clone();
            let agent_name = name.to_string();
            modules
                .register_fn(&format!("{name}.agents"), move || {
                    loads_in.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    let agent_name = agent_name.clone();
                    ModuleExports::new().with_agent("Worker", move || {
                        Arc::new(TestAgent {
                            agent_name: agent_name.clone(),
                        })
                    })
                })
                .await;
            modules
                .register_fn(&format!("{name}.hooks"), || {
                    ModuleExports::new().with_hook(
                        "on_task",
                        Arc::new(FnHandler::new("on_task", |_| async { Ok(()) })),
                    )
                })
                .await;
        }

        let master = Arc::new(TestMaster::new(fail_keywords));
        let manager = PluginManager::new(root.path(), modules, master.clone());
        Fixture {
            manager,
            master,
            loads,
            _root: root,
        }
    }

    fn basic_manifest(name: &str, deps: &[&str]) -> String {
        let deps = deps
            .iter()
            .map(|d| format!("\"{d}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"{{
                "name": "{name}", "version": "1.0.0",
                "dependencies": [{deps}],
                "provides": {{
                    "agents": [{{"module": "{name}.agents", "class_name": "Worker",
                                 "keywords": ["{name}"]}}],
                    "hooks": [{{"event": "task_completed",
                                "handler": "{name}.hooks.on_task", "priority": 50}}]
                }}
            }}"#
        )
    }

    #[tokio::test]
    async fn test_initialize_registers_discovered() {
        let fx = fixture(&[("p1", basic_manifest("p1", &[]))], false).await;
        assert_eq!(fx.manager.initialize().await, 1);
        let info = fx.manager.registry().get("p1").await.expect("known");
        assert_eq!(info.state, PluginState::Discovered);
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let fx = fixture(&[("p1", basic_manifest("p1", &[]))], false).await;
        fx.manager.initialize().await;

        let info = fx.manager.load_plugin("p1").await.expect("load");
        assert_eq!(info.state, PluginState::Loaded);
        assert!(info.loaded_at.is_some());

        let info = fx.manager.enable_plugin("p1").await.expect("enable");
        assert_eq!(info.state, PluginState::Enabled);
        assert_eq!(fx.master.inner.agent_names().await, vec!["p1"]);
        assert_eq!(
            fx.master.inner.keywords_for("p1").await,
            vec!["p1".to_string()]
        );
        assert_eq!(fx.manager.hook_bus().total_handlers().await, 1);

        let info = fx.manager.disable_plugin("p1").await.expect("disable");
        assert_eq!(info.state, PluginState::Disabled);
        assert_eq!(fx.master.inner.agent_count().await, 0);
        assert_eq!(fx.manager.hook_bus().total_handlers().await, 0);

        // Re-enable from disabled.
        let info = fx.manager.enable_plugin("p1").await.expect("re-enable");
        assert_eq!(info.state, PluginState::Enabled);
    }

    #[tokio::test]
    async fn test_enable_requires_loaded_or_disabled() {
        let fx = fixture(&[("p1", basic_manifest("p1", &[]))], false).await;
        fx.manager.initialize().await;

        let err = fx.manager.enable_plugin("p1").await.unwrap_err();
        assert!(matches!(err, PluginError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_unknown_plugin_errors() {
        let fx = fixture(&[], false).await;
        assert!(matches!(
            fx.manager.load_plugin("ghost").await.unwrap_err(),
            PluginError::UnknownPlugin { .. }
        ));
        assert!(matches!(
            fx.manager.disable_plugin("ghost").await.unwrap_err(),
            PluginError::UnknownPlugin { .. }
        ));
        assert!(matches!(
            fx.manager.reload_plugin("ghost").await.unwrap_err(),
            PluginError::UnknownPlugin { .. }
        ));
    }

    #[tokio::test]
    async fn test_enable_rollback_is_complete() {
        let fx = fixture(&[("p1", basic_manifest("p1", &[]))], true).await;
        fx.manager.initialize().await;
        fx.manager.load_plugin("p1").await.expect("load");

        let err = fx.manager.enable_plugin("p1").await.unwrap_err();
        assert!(matches!(err, PluginError::Registration { .. }));

        // No residual agent or hook registrations.
        assert_eq!(fx.master.inner.agent_count().await, 0);
        assert_eq!(fx.manager.hook_bus().total_handlers().await, 0);

        let info = fx.manager.registry().get("p1").await.expect("known");
        assert_eq!(info.state, PluginState::Error);
        assert!(info.error.is_some());
    }

    #[tokio::test]
    async fn test_disable_is_idempotent() {
        let fx = fixture(&[("p1", basic_manifest("p1", &[]))], false).await;
        fx.manager.initialize().await;
        fx.manager.load_plugin("p1").await.expect("load");
        fx.manager.enable_plugin("p1").await.expect("enable");

        let first = fx.manager.disable_plugin("p1").await.expect("disable");
        let second = fx.manager.disable_plugin("p1").await.expect("disable again");
        assert_eq!(first.state, PluginState::Disabled);
        assert_eq!(second.state, PluginState::Disabled);
    }

    #[tokio::test]
    async fn test_load_all_respects_dependency_order() {
        let fx = fixture(
            &[
                ("p1", basic_manifest("p1", &["p2"])),
                ("p2", basic_manifest("p2", &[])),
            ],
            false,
        )
        .await;
        fx.manager.initialize().await;

        let results = fx.manager.load_all().await;
        assert_eq!(results.len(), 2);
        assert!(results.values().all(|i| i.state == PluginState::Enabled));
        // p2 must have been registered before p1.
        assert_eq!(fx.master.registration_log(), vec!["p2", "p1"]);
    }

    #[tokio::test]
    async fn test_load_all_isolates_failures() {
        let broken = r#"{
            "name": "p3", "version": "1.0.0",
            "provides": {"agents": [{"module": "p3.agents", "class_name": "NoSuchClass"}]}
        }"#;
        let fx = fixture(
            &[
                ("p1", basic_manifest("p1", &[])),
                ("p3", broken.to_string()),
            ],
            false,
        )
        .await;
        fx.manager.initialize().await;

        let results = fx.manager.load_all().await;
        assert_eq!(results["p1"].state, PluginState::Enabled);
        assert_eq!(results["p3"].state, PluginState::Error);
        assert!(results["p3"].error.as_deref().expect("message").len() > 0);
    }

    #[tokio::test]
    async fn test_missing_dependency_is_skipped() {
        let fx = fixture(&[("p1", basic_manifest("p1", &["absent"]))], false).await;
        fx.manager.initialize().await;
        let results = fx.manager.load_all().await;
        assert_eq!(results["p1"].state, PluginState::Enabled);
    }

    #[tokio::test]
    async fn test_reload_reruns_module_sources() {
        let fx = fixture(&[("p1", basic_manifest("p1", &[]))], false).await;
        fx.manager.initialize().await;
        fx.manager.load_plugin("p1").await.expect("load");
        fx.manager.enable_plugin("p1").await.expect("enable");
        let loads_before = fx.loads.load(std::sync::atomic::Ordering::SeqCst);

        let info = fx.manager.reload_plugin("p1").await.expect("reload");
        assert_eq!(info.state, PluginState::Enabled);
        assert_eq!(
            fx.loads.load(std::sync::atomic::Ordering::SeqCst),
            loads_before + 1
        );
        // Registrations are live again after the round trip.
        assert_eq!(fx.master.inner.agent_names().await, vec!["p1"]);
        assert_eq!(fx.manager.hook_bus().total_handlers().await, 1);
    }

    #[tokio::test]
    async fn test_shutdown_clears_everything() {
        let fx = fixture(
            &[
                ("p1", basic_manifest("p1", &[])),
                ("p2", basic_manifest("p2", &[])),
            ],
            false,
        )
        .await;
        fx.manager.initialize().await;
        fx.manager.load_all().await;
        assert_eq!(fx.manager.registry().count_enabled().await, 2);

        fx.manager.shutdown().await;
        assert_eq!(fx.manager.registry().count_enabled().await, 0);
        assert_eq!(fx.manager.hook_bus().total_handlers().await, 0);
        assert_eq!(fx.manager.loader().cached_modules().await, 0);
        assert_eq!(fx.master.inner.agent_count().await, 0);
    }

    #[tokio::test]
    async fn test_plugin_config_proxy() {
        let manifest = r#"{
            "name": "p1", "version": "1.0.0",
            "config": {"threshold": {"type": "int", "default": 7}}
        }"#;
        let fx = fixture(&[("p1", manifest.to_string())], false).await;
        fx.manager.initialize().await;

        assert_eq!(
            fx.manager.get_plugin_config("p1", "threshold", json!(0)).await,
            json!(7)
        );
        assert_eq!(
            fx.manager.get_plugin_config("p1", "other", json!("x")).await,
            json!("x")
        );
    }

    #[test]
    fn test_dependency_order_cycle_degrades() {
        let a = PluginInfo::new(
            crate::manifest::Manifest::parse_str(
                r#"{"name": "a", "version": "1", "dependencies": ["b"]}"#,
            )
            .expect("parse"),
            PathBuf::from("/a"),
        );
        let b = PluginInfo::new(
            crate::manifest::Manifest::parse_str(
                r#"{"name": "b", "version": "1", "dependencies": ["a"]}"#,
            )
            .expect("parse"),
            PathBuf::from("/b"),
        );
        let order = dependency_order(&[a, b]);
        // First-visited wins: a is entered first, b resolves before it.
        assert_eq!(order, vec!["b".to_string(), "a".to_string()]);
    }
}
