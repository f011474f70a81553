//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces provider-neutral
//! JSON Schema for the Native Tool Use API.

use dealdesk_application::ports::tool_schema::ToolSchemaPort;
use dealdesk_domain::tool::entities::ToolDefinition;

/// Default implementation producing provider-neutral JSON Schema.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "string" => "string",
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), serde_json::json!(schema_type));
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealdesk_domain::tool::entities::ToolParameter;

    #[test]
    fn test_tool_to_schema() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("search_deals", "Search deals by keyword")
            .with_parameter(ToolParameter::new("query", "Search text", true))
            .with_parameter(
                ToolParameter::new("limit", "Maximum results", false).with_type("number"),
            );

        let schema = converter.tool_to_schema(&tool);

        assert_eq!(schema["name"], "search_deals");
        assert_eq!(schema["input_schema"]["type"], "object");
        assert_eq!(schema["input_schema"]["properties"]["query"]["type"], "string");
        assert_eq!(schema["input_schema"]["properties"]["limit"]["type"], "number");
        assert_eq!(schema["input_schema"]["required"], serde_json::json!(["query"]));
    }

    #[test]
    fn test_unknown_type_maps_to_string() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("t", "d")
            .with_parameter(ToolParameter::new("p", "x", false).with_type("blob"));

        let schema = converter.tool_to_schema(&tool);
        assert_eq!(schema["input_schema"]["properties"]["p"]["type"], "string");
    }

    #[test]
    fn test_tools_to_schema_preserves_order() {
        let converter = JsonSchemaToolConverter;
        let a = ToolDefinition::new("b_tool", "second alphabetically, first in order");
        let b = ToolDefinition::new("a_tool", "first alphabetically, second in order");

        let schemas = converter.tools_to_schema(&[&a, &b]);
        assert_eq!(schemas[0]["name"], "b_tool");
        assert_eq!(schemas[1]["name"], "a_tool");
    }
}
