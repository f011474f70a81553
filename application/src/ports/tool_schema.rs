//! Tool Schema port
//!
//! Converts tool definitions into the JSON shape the LLM's native tool-use
//! API expects.

use dealdesk_domain::tool::entities::ToolDefinition;

/// Port for converting tool definitions to LLM-facing JSON Schema
pub trait ToolSchemaPort: Send + Sync {
    /// Convert one definition to `{name, description, input_schema}`
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert a set of definitions, preserving order
    fn tools_to_schema(&self, tools: &[&ToolDefinition]) -> Vec<serde_json::Value> {
        tools.iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
