//! Macros for declaring a module's exported symbols.

/// Builds a [`ModuleExports`](crate::ModuleExports) table declaratively.
///
/// Each line pairs a capability kind (`agent`, `monitor`, `tool`, or
/// `hook`) and a symbol name with its constructor (or, for hooks, an
/// `Arc<dyn EventHandler>`).
///
/// # Example
/// ```rust,ignore
/// module_exports! {
///     agent "AuditAgent" => || Arc::new(AuditAgent::new()),
///     hook "on_task_completed" => on_task_completed_handler(),
/// }
/// ```
#[macro_export]
macro_rules! module_exports {
    ($($kind:ident $symbol:literal => $value:expr),* $(,)?) => {{
        let exports = $crate::ModuleExports::new();
        $(let exports = $crate::module_exports!(@add exports, $kind, $symbol, $value);)*
        exports
    }};
    (@add $exports:expr, agent, $symbol:expr, $factory:expr) => {
        $exports.with_agent($symbol, $factory)
    };
    (@add $exports:expr, monitor, $symbol:expr, $factory:expr) => {
        $exports.with_monitor($symbol, $factory)
    };
    (@add $exports:expr, tool, $symbol:expr, $factory:expr) => {
        $exports.with_tool($symbol, $factory)
    };
    (@add $exports:expr, hook, $symbol:expr, $handler:expr) => {
        $exports.with_hook($symbol, $handler)
    };
}
