//! Tool module abstraction
//!
//! A [`ToolModule`] is a cohesive group of tools sharing a CRM domain (deals,
//! buyers, tasks, ...) with one executor that dispatches by tool name within
//! the group. The registry treats modules as opaque beyond two members: the
//! definition list (for enumeration and category filtering) and the executor
//! (for dispatch).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ToolRegistry                            │
//! │  (flattens definitions, routes calls by tool name)          │
//! └─────────────────────────────────────────────────────────────┘
//!       │         │         │         │          │
//!       ▼         ▼         ▼         ▼          ▼
//!  ┌────────┐ ┌────────┐ ┌───────┐ ┌────────┐ ┌─────┐
//!  │ deals  │ │ buyers │ │ tasks │ │ alerts │ │ ... │
//!  └────────┘ └────────┘ └───────┘ └────────┘ └─────┘
//! ```
//!
//! Modules validate their own required arguments; the registry does not check
//! calls against the declared parameter schema. A module is expected to settle
//! in finite time — the registry races every execution against a fixed timeout.

use async_trait::async_trait;
use thiserror::Error;

use super::entities::{ToolCall, ToolDefinition};
use crate::crm::store::StoreError;

/// Error produced by a tool module's executor
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Missing or malformed argument
    #[error("{0}")]
    InvalidArgument(String),

    /// A referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The call named a tool this module does not declare
    #[error("Tool '{0}' is not provided by this module")]
    Unsupported(String),

    /// Underlying data-store failure
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// A cohesive group of tools with one executor
#[async_trait]
pub trait ToolModule: Send + Sync {
    /// Short identifier for logging (e.g., "deals", "alerts")
    fn id(&self) -> &str;

    /// Tools this module declares, in exposure order
    fn definitions(&self) -> &[ToolDefinition];

    /// Execute one of this module's tools.
    ///
    /// `call.tool_name` is guaranteed by the registry to be one of the names
    /// in [`definitions`](Self::definitions), and the caller sentinel has
    /// already been resolved.
    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_error_display() {
        let err = ModuleError::InvalidArgument("Missing required argument: deal_id".into());
        assert_eq!(err.to_string(), "Missing required argument: deal_id");

        let err = ModuleError::NotFound("deal deal-9".into());
        assert_eq!(err.to_string(), "Not found: deal deal-9");

        let err = ModuleError::Unsupported("mystery_tool".into());
        assert!(err.to_string().contains("mystery_tool"));
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ModuleError = StoreError::Connection("connection refused".into()).into();
        assert_eq!(err.to_string(), "connection refused");
    }
}
