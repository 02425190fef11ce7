//! Module loading with per-plugin namespace isolation.
//!
//! A plugin's manifest references code by module path and symbol name.
//! Module sources are registered with the host at build time (the
//! [`ModuleRegistry`]); loading a plugin materializes each referenced
//! module into the loader's cache under the composite key
//! `"<plugin>::<module>"`, so two plugins referencing identically-named
//! modules never collide. Unloading evicts the plugin's cache entries,
//! which makes a subsequent load re-run the module source from scratch —
//! the basis of hot reload.
//!
//! With the `dynamic` feature, module sources can additionally be opened
//! from shared libraries via `libloading`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::PluginError;
use crate::hooks::definitions::HookEvent;
use crate::hooks::registry::EventHandler;
use crate::manifest::{self, Manifest};
use crate::traits::{Agent, Monitor, Tool};
use crate::validator;

/// Constructor for agent instances.
pub type AgentFactory = Arc<dyn Fn() -> Arc<dyn Agent> + Send + Sync>;
/// Constructor for monitor instances.
pub type MonitorFactory = Arc<dyn Fn() -> Arc<dyn Monitor> + Send + Sync>;
/// Constructor for tool instances.
pub type ToolFactory = Arc<dyn Fn() -> Arc<dyn Tool> + Send + Sync>;

/// One symbol exported by a module, tagged by capability kind.
#[derive(Clone)]
pub enum Export {
    /// An agent constructor.
    Agent(AgentFactory),
    /// A monitor constructor.
    Monitor(MonitorFactory),
    /// A tool constructor.
    Tool(ToolFactory),
    /// An async hook handler function.
    Hook(Arc<dyn EventHandler>),
}

impl Export {
    /// Returns the capability kind name of this export.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Agent(_) => "agent",
            Self::Monitor(_) => "monitor",
            Self::Tool(_) => "tool",
            Self::Hook(_) => "hook",
        }
    }
}

impl std::fmt::Debug for Export {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Export::{}", self.kind())
    }
}

/// The symbol table produced by loading one module.
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    /// Symbol name → export.
    symbols: HashMap<String, Export>,
}

impl ModuleExports {
    /// Creates an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an agent constructor under a symbol name.
    pub fn with_agent<F>(mut self, symbol: &str, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Agent> + Send + Sync + 'static,
    {
        self.symbols
            .insert(symbol.to_string(), Export::Agent(Arc::new(factory)));
        self
    }

    /// Adds a monitor constructor under a symbol name.
    pub fn with_monitor<F>(mut self, symbol: &str, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Monitor> + Send + Sync + 'static,
    {
        self.symbols
            .insert(symbol.to_string(), Export::Monitor(Arc::new(factory)));
        self
    }

    /// Adds a tool constructor under a symbol name.
    pub fn with_tool<F>(mut self, symbol: &str, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Tool> + Send + Sync + 'static,
    {
        self.symbols
            .insert(symbol.to_string(), Export::Tool(Arc::new(factory)));
        self
    }

    /// Adds an async hook handler under a symbol name.
    pub fn with_hook(mut self, symbol: &str, handler: Arc<dyn EventHandler>) -> Self {
        self.symbols
            .insert(symbol.to_string(), Export::Hook(handler));
        self
    }

    /// Resolves a symbol.
    pub fn get(&self, symbol: &str) -> Option<&Export> {
        self.symbols.get(symbol)
    }

    /// Returns the number of exported symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true when nothing is exported.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A unit of loadable code.
///
/// `load` runs the module's top-level construction; it is invoked again
/// after an unload, so source-level side effects re-run on reload.
pub trait ModuleSource: Send + Sync {
    /// Builds the module's symbol table.
    fn load(&self) -> ModuleExports;
}

struct FnModuleSource<F>(F);

impl<F> ModuleSource for FnModuleSource<F>
where
    F: Fn() -> ModuleExports + Send + Sync,
{
    fn load(&self) -> ModuleExports {
        (self.0)()
    }
}

/// Build-time registry of module sources, keyed by module path.
#[derive(Default)]
pub struct ModuleRegistry {
    sources: RwLock<HashMap<String, Arc<dyn ModuleSource>>>,
}

impl ModuleRegistry {
    /// Creates a new empty module registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module source under a module path.
    pub async fn register(&self, module: &str, source: Arc<dyn ModuleSource>) {
        let mut sources = self.sources.write().await;
        sources.insert(module.to_string(), source);
        debug!(module = %module, "Module source registered");
    }

    /// Registers a closure as a module source.
    pub async fn register_fn<F>(&self, module: &str, source: F)
    where
        F: Fn() -> ModuleExports + Send + Sync + 'static,
    {
        self.register(module, Arc::new(FnModuleSource(source))).await;
    }

    /// Looks up a module source by path.
    pub async fn get(&self, module: &str) -> Option<Arc<dyn ModuleSource>> {
        let sources = self.sources.read().await;
        sources.get(module).cloned()
    }

    /// Returns the number of registered module sources.
    pub async fn count(&self) -> usize {
        let sources = self.sources.read().await;
        sources.len()
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry").finish_non_exhaustive()
    }
}

/// Everything instantiated by a successful plugin load.
///
/// Owned exclusively by the manager between load and unload; a bundle
/// exists only while its plugin is loaded, enabled, or disabled.
#[derive(Debug, Clone, Default)]
pub struct LoadedComponents {
    /// Agent instances with their routing keywords.
    pub agents: Vec<(Arc<dyn Agent>, Vec<String>)>,
    /// Monitor instances with their check intervals in seconds.
    pub monitors: Vec<(Arc<dyn Monitor>, u64)>,
    /// Tool instances.
    pub tools: Vec<Arc<dyn Tool>>,
    /// Hook bindings: event, handler, priority.
    pub hooks: Vec<(HookEvent, Arc<dyn EventHandler>, i32)>,
}

impl LoadedComponents {
    /// Returns the total number of instantiated components.
    pub fn total(&self) -> usize {
        self.agents.len() + self.monitors.len() + self.tools.len() + self.hooks.len()
    }
}

/// Loads plugin modules and instantiates their declared components.
#[derive(Debug)]
pub struct Loader {
    /// Registered module sources.
    modules: Arc<ModuleRegistry>,
    /// Loaded module cache, keyed by `"<plugin>::<module>"`.
    cache: RwLock<HashMap<String, Arc<ModuleExports>>>,
}

impl Loader {
    /// Creates a loader over a module registry.
    pub fn new(modules: Arc<ModuleRegistry>) -> Self {
        Self {
            modules,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Scans a plugin root directory for manifests.
    pub fn discover(&self, root: &Path) -> Vec<(PathBuf, Manifest)> {
        manifest::discover(root)
    }

    /// Loads every component a manifest declares.
    ///
    /// Provisions are processed in the fixed order agents → monitors →
    /// tools → hooks. Success is atomic: any failure aborts the whole
    /// load, evicts every cache entry this call created, and returns
    /// [`PluginError::Load`] wrapping the root cause. No partial bundle
    /// is ever returned.
    pub async fn load_plugin(&self, manifest: &Manifest) -> Result<LoadedComponents, PluginError> {
        let problems = validator::validate_manifest(manifest);
        if !problems.is_empty() {
            return Err(PluginError::Validation { problems });
        }

        let mut created = Vec::new();
        match self.load_components(manifest, &mut created).await {
            Ok(components) => {
                info!(
                    plugin = %manifest.name,
                    components = components.total(),
                    modules = created.len(),
                    "Plugin modules loaded"
                );
                Ok(components)
            }
            Err(message) => {
                let mut cache = self.cache.write().await;
                for key in &created {
                    cache.remove(key);
                }
                Err(PluginError::Load {
                    plugin: manifest.name.clone(),
                    message,
                })
            }
        }
    }

    async fn load_components(
        &self,
        manifest: &Manifest,
        created: &mut Vec<String>,
    ) -> Result<LoadedComponents, String> {
        let plugin = &manifest.name;
        let mut components = LoadedComponents::default();

        for p in &manifest.provides.agents {
            let exports = self.load_module(plugin, &p.module, created).await?;
            let export = resolve(&exports, &p.module, &p.class_name)?;
            check(validator::validate_agent_export(&p.class_name, export))?;
            if let Export::Agent(factory) = export {
                components.agents.push((factory(), p.keywords.clone()));
            }
        }

        for p in &manifest.provides.monitors {
            let exports = self.load_module(plugin, &p.module, created).await?;
            let export = resolve(&exports, &p.module, &p.class_name)?;
            check(validator::validate_monitor_export(&p.class_name, export))?;
            if let Export::Monitor(factory) = export {
                components.monitors.push((factory(), p.check_interval));
            }
        }

        for p in &manifest.provides.tools {
            let exports = self.load_module(plugin, &p.module, created).await?;
            let export = resolve(&exports, &p.module, &p.class_name)?;
            check(validator::validate_tool_export(&p.class_name, export))?;
            if let Export::Tool(factory) = export {
                components.tools.push(factory());
            }
        }

        for p in &manifest.provides.hooks {
            let (module, func) = p.handler.rsplit_once('.').ok_or_else(|| {
                format!("hook handler '{}' is not a dotted locator", p.handler)
            })?;
            let exports = self.load_module(plugin, module, created).await?;
            let export = resolve(&exports, module, func)?;
            check(validator::validate_hook_export(func, export))?;
            let event: HookEvent = p.event.parse()?;
            if let Export::Hook(handler) = export {
                components.hooks.push((event, handler.clone(), p.priority));
            }
        }

        Ok(components)
    }

    /// Loads a module into the plugin's namespace, reusing the cached
    /// entry when present.
    async fn load_module(
        &self,
        plugin: &str,
        module: &str,
        created: &mut Vec<String>,
    ) -> Result<Arc<ModuleExports>, String> {
        let key = module_key(plugin, module);

        if let Some(exports) = self.cache.read().await.get(&key) {
            return Ok(exports.clone());
        }

        let source = self
            .modules
            .get(module)
            .await
            .ok_or_else(|| format!("module '{module}' is not registered with the host"))?;
        let exports = Arc::new(source.load());
        debug!(
            plugin = %plugin,
            module = %module,
            symbols = exports.len(),
            "Module loaded into plugin namespace"
        );

        self.cache.write().await.insert(key.clone(), exports.clone());
        created.push(key);
        Ok(exports)
    }

    /// Evicts every cache entry belonging to a plugin.
    ///
    /// Returns the number of entries removed. A later load re-runs the
    /// module sources from scratch.
    pub async fn unload_plugin(&self, plugin: &str) -> usize {
        let prefix = format!("{plugin}::");
        let mut cache = self.cache.write().await;
        let before = cache.len();
        cache.retain(|key, _| !key.starts_with(&prefix));
        let evicted = before - cache.len();
        if evicted > 0 {
            debug!(plugin = %plugin, evicted = evicted, "Module cache entries evicted");
        }
        evicted
    }

    /// Returns the number of cached module entries across all plugins.
    pub async fn cached_modules(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }
}

fn module_key(plugin: &str, module: &str) -> String {
    format!("{plugin}::{module}")
}

fn resolve<'a>(
    exports: &'a ModuleExports,
    module: &str,
    symbol: &str,
) -> Result<&'a Export, String> {
    exports
        .get(symbol)
        .ok_or_else(|| format!("module '{module}' does not export '{symbol}'"))
}

fn check(problems: Vec<String>) -> Result<(), String> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("; "))
    }
}

/// Dynamic module sources backed by shared libraries.
#[cfg(feature = "dynamic")]
pub mod dynamic {
    use std::path::Path;

    use tracing::{error, info};

    use super::{ModuleExports, ModuleSource};
    use crate::error::PluginError;

    /// Constructor symbol a dynamic module library must export:
    /// `extern "C" fn agenthub_module_exports() -> *mut ModuleExports`.
    pub type ModuleExportsFn = unsafe extern "C" fn() -> *mut ModuleExports;

    const CONSTRUCTOR_SYMBOL: &[u8] = b"agenthub_module_exports";

    /// A module source that builds its symbol table from a shared
    /// library (.so / .dll / .dylib).
    pub struct LibraryModuleSource {
        library: libloading::Library,
    }

    impl LibraryModuleSource {
        /// Opens a shared library and verifies its constructor symbol.
        ///
        /// # Safety
        /// Loads arbitrary code from a shared library. Only open trusted
        /// module libraries.
        pub unsafe fn open(path: &Path) -> Result<Self, PluginError> {
            let library = unsafe { libloading::Library::new(path) }.map_err(|e| {
                PluginError::Load {
                    plugin: path.display().to_string(),
                    message: format!("cannot open module library: {e}"),
                }
            })?;

            unsafe { library.get::<ModuleExportsFn>(CONSTRUCTOR_SYMBOL) }.map_err(|e| {
                PluginError::Load {
                    plugin: path.display().to_string(),
                    message: format!("library is missing 'agenthub_module_exports': {e}"),
                }
            })?;

            info!(path = %path.display(), "Dynamic module library opened");
            Ok(Self { library })
        }
    }

    impl ModuleSource for LibraryModuleSource {
        fn load(&self) -> ModuleExports {
            // The symbol was verified at open time; a lookup failure here
            // leaves an empty module rather than unwinding into the loader.
            match unsafe { self.library.get::<ModuleExportsFn>(CONSTRUCTOR_SYMBOL) } {
                Ok(constructor) => {
                    let raw = unsafe { constructor() };
                    *unsafe { Box::from_raw(raw) }
                }
                Err(e) => {
                    error!(error = %e, "Dynamic module constructor lookup failed");
                    ModuleExports::new()
                }
            }
        }
    }

    impl std::fmt::Debug for LibraryModuleSource {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("LibraryModuleSource").finish_non_exhaustive()
        }
    }
}
