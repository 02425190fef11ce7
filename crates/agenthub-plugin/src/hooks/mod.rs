//! Hook bus: event definitions, priority-ordered handler registry, and
//! the fault-isolating dispatcher.

pub mod definitions;
pub mod dispatcher;
pub mod registry;

pub use definitions::{HookEvent, HookPayload};
pub use dispatcher::HookDispatcher;
pub use registry::{EventHandler, FnHandler, HookBus};
