//! Tool Executor port
//!
//! The sole inbound contract the agent orchestration consumes: enumerate
//! tools, scope them to an intent, check the confirmation policy, execute.

use async_trait::async_trait;
use dealdesk_domain::tool::{
    category::ToolCategory,
    entities::{ToolCall, ToolDefinition},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer. `execute` is
/// error-total: every failure mode is folded into the returned [`ToolResult`].
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// All registered tools, in registration order
    fn catalog(&self) -> &[ToolDefinition];

    /// Tools exposed for one conversation turn.
    ///
    /// A non-empty `explicit_names` list wins over the category; in both cases
    /// results keep catalog order and unknown names are silently dropped.
    fn tools_for_category(
        &self,
        category: ToolCategory,
        explicit_names: &[String],
    ) -> Vec<&ToolDefinition>;

    /// Whether the tool mutates CRM state and needs user confirmation
    fn requires_confirmation(&self, tool_name: &str) -> bool;

    /// Execute a tool call. Never fails; failures are in-band.
    async fn execute(&self, call: &ToolCall) -> ToolResult;

    /// Check if a tool is registered
    fn has_tool(&self, name: &str) -> bool {
        self.catalog().iter().any(|t| t.name == name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.catalog().iter().find(|t| t.name == name)
    }

    /// Names of all registered tools
    fn tool_names(&self) -> Vec<&str> {
        self.catalog().iter().map(|t| t.name.as_str()).collect()
    }
}
