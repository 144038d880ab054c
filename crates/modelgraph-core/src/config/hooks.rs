//! Lifecycle hooks.
//!
//! Hooks run per request and may suspend, so they return boxed futures.
//! Assembly only stores them.

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Data handed to a hook invocation.
#[derive(Debug, Clone)]
pub struct HookArgs {
    /// Model being operated on.
    pub model_key: String,
    /// Field, for field-level hooks.
    pub field_key: Option<String>,
    /// Operation name (`create`, `update`, `delete`).
    pub operation: String,
    /// Existing item, when there is one.
    pub item: Option<serde_json::Value>,
    /// Input data, when there is some.
    pub input: Option<serde_json::Value>,
}

/// A hook rejected the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("hook failed: {0}")]
pub struct HookError(pub String);

/// An asynchronous hook.
pub type HookFn = Arc<dyn Fn(HookArgs) -> BoxFuture<'static, Result<(), HookError>> + Send + Sync>;

/// Hook slots shared by models and fields.
#[derive(Clone, Default)]
pub struct Hooks {
    /// Transforms input before validation.
    pub resolve_input: Option<HookFn>,
    /// Validates input.
    pub validate_input: Option<HookFn>,
    /// Runs before the database operation.
    pub before_operation: Option<HookFn>,
    /// Runs after the database operation.
    pub after_operation: Option<HookFn>,
}

impl Hooks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `validate_input` hook.
    pub fn with_validate_input(mut self, hook: HookFn) -> Self {
        self.validate_input = Some(hook);
        self
    }

    /// Set the `before_operation` hook.
    pub fn with_before_operation(mut self, hook: HookFn) -> Self {
        self.before_operation = Some(hook);
        self
    }

    /// Set the `after_operation` hook.
    pub fn with_after_operation(mut self, hook: HookFn) -> Self {
        self.after_operation = Some(hook);
        self
    }

    /// Set the `resolve_input` hook.
    pub fn with_resolve_input(mut self, hook: HookFn) -> Self {
        self.resolve_input = Some(hook);
        self
    }

    /// Whether any hook is set.
    pub fn is_empty(&self) -> bool {
        self.resolve_input.is_none()
            && self.validate_input.is_none()
            && self.before_operation.is_none()
            && self.after_operation.is_none()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("resolve_input", &self.resolve_input.is_some())
            .field("validate_input", &self.validate_input.is_some())
            .field("before_operation", &self.before_operation.is_some())
            .field("after_operation", &self.after_operation.is_some())
            .finish()
    }
}
