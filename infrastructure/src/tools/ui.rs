//! UI action tools: navigation payloads the client interprets, no data mutation

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use dealdesk_domain::crm::store::CrmStore;
use dealdesk_domain::tool::entities::{ToolCall, ToolDefinition, ToolParameter};
use dealdesk_domain::tool::module::{ModuleError, ToolModule};

pub const OPEN_DEAL_ROOM: &str = "open_deal_room";
pub const SHOW_BUYER_LIST: &str = "show_buyer_list";

fn open_deal_room_definition() -> ToolDefinition {
    ToolDefinition::new(
        OPEN_DEAL_ROOM,
        "Navigate the client to a deal's workspace. Fails if the deal does not exist.",
    )
    .with_parameter(ToolParameter::new("deal_id", "Deal to open", true))
}

fn show_buyer_list_definition() -> ToolDefinition {
    ToolDefinition::new(
        SHOW_BUYER_LIST,
        "Show the buyer list view, optionally pre-filtered by deal or industry.",
    )
    .with_parameter(ToolParameter::new("deal_id", "Pre-filter to one deal's matches", false))
    .with_parameter(ToolParameter::new("industry", "Pre-filter by industry", false))
}

/// Tool module emitting navigation instructions for the client shell
pub struct UiModule {
    store: Arc<dyn CrmStore>,
    definitions: Vec<ToolDefinition>,
}

impl UiModule {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self {
            store,
            definitions: vec![open_deal_room_definition(), show_buyer_list_definition()],
        }
    }

    async fn open_deal_room(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let deal_id = call
            .require_string("deal_id")
            .map_err(ModuleError::InvalidArgument)?;

        let deal = self
            .store
            .deal(deal_id)
            .await?
            .ok_or_else(|| ModuleError::NotFound(format!("deal {}", deal_id)))?;

        Ok(json!({
            "ui_action": {
                "action": "open_deal_room",
                "deal_id": deal.id,
                "deal_name": deal.name,
            }
        }))
    }

    async fn show_buyer_list(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        if let Some(deal_id) = call.get_string("deal_id") {
            if self.store.deal(deal_id).await?.is_none() {
                return Err(ModuleError::NotFound(format!("deal {}", deal_id)));
            }
        }

        Ok(json!({
            "ui_action": {
                "action": "show_buyer_list",
                "deal_id": call.get_string("deal_id"),
                "industry": call.get_string("industry"),
            }
        }))
    }
}

#[async_trait]
impl ToolModule for UiModule {
    fn id(&self) -> &str {
        "ui"
    }

    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        match call.tool_name.as_str() {
            OPEN_DEAL_ROOM => self.open_deal_room(call).await,
            SHOW_BUYER_LIST => self.show_buyer_list(call).await,
            other => Err(ModuleError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCrmStore;

    fn module() -> UiModule {
        UiModule::new(Arc::new(InMemoryCrmStore::seeded()))
    }

    #[tokio::test]
    async fn test_open_deal_room_payload() {
        let call = ToolCall::new(OPEN_DEAL_ROOM).with_arg("deal_id", "deal-1");
        let data = module().execute(&call).await.unwrap();

        assert_eq!(data["ui_action"]["action"], "open_deal_room");
        assert_eq!(data["ui_action"]["deal_id"], "deal-1");
    }

    #[tokio::test]
    async fn test_open_deal_room_unknown_deal() {
        let call = ToolCall::new(OPEN_DEAL_ROOM).with_arg("deal_id", "deal-404");
        let err = module().execute(&call).await.unwrap_err();
        assert!(matches!(err, ModuleError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_show_buyer_list_passes_filters() {
        let call = ToolCall::new(SHOW_BUYER_LIST).with_arg("industry", "software");
        let data = module().execute(&call).await.unwrap();

        assert_eq!(data["ui_action"]["action"], "show_buyer_list");
        assert_eq!(data["ui_action"]["industry"], "software");
        assert!(data["ui_action"]["deal_id"].is_null());
    }
}
