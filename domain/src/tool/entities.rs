//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reserved argument value meaning "substitute the authenticated caller's id".
///
/// The LLM is told to pass this literal wherever a tool wants the current
/// user's identifier; [`ToolCall::resolve_caller`] rewrites it before dispatch.
pub const CURRENT_USER_SENTINEL: &str = "CURRENT_USER";

/// Definition of a tool that can be invoked by the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "get_deal_overview")
    pub name: String,
    /// Usage guidance for the LLM, including disambiguation cues
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "number", "boolean", "array")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
    /// Authenticated caller identity, if the transport attached one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            caller_id: None,
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_caller(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }

    /// Rewrite every top-level argument equal to [`CURRENT_USER_SENTINEL`] to
    /// the caller's id. Exact string match only; nested objects and arrays are
    /// not recursed into. Without a caller id the sentinel passes through.
    pub fn resolve_caller(mut self) -> Self {
        let Some(caller) = self.caller_id.clone() else {
            return self;
        };
        for value in self.arguments.values_mut() {
            if value.as_str() == Some(CURRENT_USER_SENTINEL) {
                *value = serde_json::Value::String(caller.clone());
            }
        }
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an optional i64 argument
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }

    /// Get an optional f64 argument
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.arguments.get(key).and_then(|v| v.as_f64())
    }

    /// Get an optional bool argument
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }

    /// Get an optional result-limit argument, clamped to `max`
    pub fn get_limit(&self, key: &str, default: usize, max: usize) -> usize {
        self.get_i64(key)
            .map(|v| v.max(0) as usize)
            .unwrap_or(default)
            .min(max)
    }
}
