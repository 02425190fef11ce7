//! Convenience macros for working with hook payloads.

/// Macro for quickly building a [`HookPayload`](crate::HookPayload).
///
/// # Example
/// ```rust,ignore
/// let payload = hook_payload!(HookEvent::TaskCompleted, {
///     "task_id" => json!("t-42"),
///     "agent" => json!("triage"),
/// });
/// ```
#[macro_export]
macro_rules! hook_payload {
    ($event:expr) => {
        $crate::HookPayload::new($event)
    };
    ($event:expr, { $($key:expr => $value:expr),* $(,)? }) => {{
        let mut payload = $crate::HookPayload::new($event);
        $(
            payload.data.insert($key.to_string(), $value);
        )*
        payload
    }};
}
