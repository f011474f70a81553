//! Command center facade
//!
//! The surface the agent orchestration layer talks to: fetch the tool schemas
//! for one conversation turn, check the confirmation policy, invoke a tool.
//! Pure delegation over injected ports; no orchestration logic lives here.

use std::collections::HashMap;
use std::sync::Arc;

use dealdesk_domain::tool::{
    category::ToolCategory,
    entities::ToolCall,
    value_objects::ToolResult,
};

use crate::ports::{ToolExecutorPort, ToolSchemaPort};

/// Facade wiring the executor and schema converter together for the agent loop
pub struct CommandCenter {
    executor: Arc<dyn ToolExecutorPort>,
    schema: Arc<dyn ToolSchemaPort>,
}

impl CommandCenter {
    pub fn new(executor: Arc<dyn ToolExecutorPort>, schema: Arc<dyn ToolSchemaPort>) -> Self {
        Self { executor, schema }
    }

    /// LLM-facing schemas for the tools exposed on this turn.
    ///
    /// `category` is the raw intent label from the orchestration layer;
    /// unknown labels degrade to GENERAL. A non-empty `explicit_names` list
    /// overrides the category.
    pub fn exposed_tool_schemas(
        &self,
        category: &str,
        explicit_names: &[String],
    ) -> Vec<serde_json::Value> {
        let category = ToolCategory::parse(category);
        let tools = self.executor.tools_for_category(category, explicit_names);
        self.schema.tools_to_schema(&tools)
    }

    /// Whether a tool needs user confirmation before running
    pub fn requires_confirmation(&self, tool_name: &str) -> bool {
        self.executor.requires_confirmation(tool_name)
    }

    /// Invoke a tool on behalf of `caller_id`
    pub async fn invoke(
        &self,
        tool_name: &str,
        arguments: HashMap<String, serde_json::Value>,
        caller_id: &str,
    ) -> ToolResult {
        let call = ToolCall {
            tool_name: tool_name.to_string(),
            arguments,
            caller_id: Some(caller_id.to_string()),
        };
        self.executor.execute(&call).await
    }

    /// Access the underlying executor (for enumeration commands)
    pub fn executor(&self) -> &dyn ToolExecutorPort {
        self.executor.as_ref()
    }
}
