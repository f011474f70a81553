//! Tool domain value objects — the uniform result envelope
//!
//! Every tool invocation, on every path (success, module error, unknown tool,
//! timeout), funnels into a [`ToolResult`]. The wire shape is
//! `{ data?, error?, partial? }`: exactly one of `data`/`error` is populated,
//! and `partial: true` marks a failure where some work may have completed
//! (the registry timeout, or a module error that mentions a timeout).

use serde::{Deserialize, Serialize};

/// Exact error message produced when the registry's execution race elapses.
pub const TIMEOUT_ERROR: &str = "Tool timeout (15s)";

/// Result of a tool invocation.
///
/// Fields are private so the success/error exclusivity invariant can only be
/// produced through the constructors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Structured payload (success case)
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    /// Human-readable message (failure case)
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// True if the failure was a timeout and some work may have completed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    partial: bool,
}

impl ToolResult {
    /// Create a successful result carrying a structured payload
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            error: None,
            partial: false,
        }
    }

    /// Create a failed result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
            partial: false,
        }
    }

    /// Create the registry-timeout result
    pub fn timed_out() -> Self {
        Self {
            data: None,
            error: Some(TIMEOUT_ERROR.to_string()),
            partial: true,
        }
    }

    /// Mark a failure as partial (no effect on success results)
    pub fn with_partial(mut self, partial: bool) -> Self {
        if self.error.is_some() {
            self.partial = partial;
        }
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }
}
