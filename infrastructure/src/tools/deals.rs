//! Deal tools: pipeline listing, per-deal overview, timeline, search

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use dealdesk_domain::crm::entities::DealStage;
use dealdesk_domain::crm::store::{ActivityFilter, CrmStore, DealFilter, TaskFilter};
use dealdesk_domain::tool::entities::{ToolCall, ToolDefinition, ToolParameter};
use dealdesk_domain::tool::module::{ModuleError, ToolModule};

pub const LIST_DEALS: &str = "list_deals";
pub const GET_DEAL_OVERVIEW: &str = "get_deal_overview";
pub const GET_DEAL_TIMELINE: &str = "get_deal_timeline";
pub const SEARCH_DEALS: &str = "search_deals";

const DEFAULT_LIMIT: usize = 25;
const MAX_LIMIT: usize = 100;

fn list_deals_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_DEALS,
        "List deals in the pipeline, optionally filtered by stage, industry, or owner. \
         Use search_deals instead when the user names a specific deal.",
    )
    .with_parameter(
        ToolParameter::new(
            "stage",
            "Filter by stage: preparation, marketing, ioi, loi, due_diligence, closing, closed, dead",
            false,
        ),
    )
    .with_parameter(ToolParameter::new("industry", "Filter by industry", false))
    .with_parameter(
        ToolParameter::new(
            "owner_id",
            "Filter by deal owner. Pass CURRENT_USER for the caller's own deals.",
            false,
        ),
    )
    .with_parameter(
        ToolParameter::new("active_only", "Exclude closed and dead deals", false)
            .with_type("boolean"),
    )
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of deals to return", false)
            .with_type("number"),
    )
}

fn get_deal_overview_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_DEAL_OVERVIEW,
        "Get a full overview of one deal: record, open tasks, and recent activity. \
         Requires the deal id; use search_deals first if you only have a name.",
    )
    .with_parameter(ToolParameter::new("deal_id", "Deal identifier", true))
}

fn get_deal_timeline_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_DEAL_TIMELINE,
        "Chronological activity timeline for one deal, most recent first.",
    )
    .with_parameter(ToolParameter::new("deal_id", "Deal identifier", true))
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of entries", false).with_type("number"),
    )
}

fn search_deals_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_DEALS,
        "Search deals by name, industry, or description substring. \
         Case-insensitive; returns matches with stage summaries.",
    )
    .with_parameter(ToolParameter::new("query", "Search text", true))
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of matches", false).with_type("number"),
    )
}

/// Tool module for deal queries
pub struct DealsModule {
    store: Arc<dyn CrmStore>,
    definitions: Vec<ToolDefinition>,
}

impl DealsModule {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self {
            store,
            definitions: vec![
                list_deals_definition(),
                get_deal_overview_definition(),
                get_deal_timeline_definition(),
                search_deals_definition(),
            ],
        }
    }

    async fn list_deals(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let stage = call
            .get_string("stage")
            .map(DealStage::from_str)
            .transpose()
            .map_err(|e| ModuleError::InvalidArgument(e.to_string()))?;

        let filter = DealFilter {
            stage,
            industry: call.get_string("industry").map(str::to_string),
            owner_id: call.get_string("owner_id").map(str::to_string),
            active_only: call.get_bool("active_only").unwrap_or(false),
            limit: Some(call.get_limit("limit", DEFAULT_LIMIT, MAX_LIMIT)),
        };
        let deals = self.store.deals(&filter).await?;

        let total = deals.len();
        let by_stage = super::count_by(&deals, |d| d.stage.as_str().to_string());
        Ok(json!({
            "deals": deals,
            "total": total,
            "by_stage": by_stage,
        }))
    }

    async fn get_deal_overview(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let deal_id = call
            .require_string("deal_id")
            .map_err(ModuleError::InvalidArgument)?;

        let task_filter = TaskFilter {
            deal_id: Some(deal_id.to_string()),
            ..Default::default()
        };
        let activity_filter = ActivityFilter {
            deal_id: Some(deal_id.to_string()),
            limit: Some(10),
            ..Default::default()
        };

        // Independent reads, issued in parallel
        let (deal, tasks, activities) = tokio::try_join!(
            self.store.deal(deal_id),
            self.store.tasks(&task_filter),
            self.store.activities(&activity_filter),
        )?;

        let deal = deal.ok_or_else(|| ModuleError::NotFound(format!("deal {}", deal_id)))?;
        let open_tasks: Vec<_> = tasks.iter().filter(|t| t.status.is_open()).collect();
        let open_task_count = open_tasks.len();

        Ok(json!({
            "deal": deal,
            "open_tasks": open_tasks,
            "open_task_count": open_task_count,
            "recent_activity": activities,
        }))
    }

    async fn get_deal_timeline(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let deal_id = call
            .require_string("deal_id")
            .map_err(ModuleError::InvalidArgument)?;
        let limit = call.get_limit("limit", 50, 200);

        let mut activities = self
            .store
            .activities(&ActivityFilter {
                deal_id: Some(deal_id.to_string()),
                limit: Some(limit),
                ..Default::default()
            })
            .await?;
        activities.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

        let total = activities.len();
        let by_kind = super::count_by(&activities, |a| a.kind.as_str().to_string());
        Ok(json!({
            "deal_id": deal_id,
            "timeline": activities,
            "total": total,
            "by_kind": by_kind,
        }))
    }

    async fn search_deals(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let query = call
            .require_string("query")
            .map_err(ModuleError::InvalidArgument)?
            .to_lowercase();
        let limit = call.get_limit("limit", DEFAULT_LIMIT, MAX_LIMIT);

        // Substring search is done client-side; the store only projects rows
        let deals = self.store.deals(&DealFilter::default()).await?;
        let matches: Vec<_> = deals
            .into_iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&query)
                    || d.industry.to_lowercase().contains(&query)
                    || d.description
                        .as_deref()
                        .is_some_and(|desc| desc.to_lowercase().contains(&query))
            })
            .take(limit)
            .collect();

        let total = matches.len();
        let by_stage = super::count_by(&matches, |d| d.stage.as_str().to_string());
        Ok(json!({
            "deals": matches,
            "total": total,
            "by_stage": by_stage,
        }))
    }
}

#[async_trait]
impl ToolModule for DealsModule {
    fn id(&self) -> &str {
        "deals"
    }

    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        match call.tool_name.as_str() {
            LIST_DEALS => self.list_deals(call).await,
            GET_DEAL_OVERVIEW => self.get_deal_overview(call).await,
            GET_DEAL_TIMELINE => self.get_deal_timeline(call).await,
            SEARCH_DEALS => self.search_deals(call).await,
            other => Err(ModuleError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCrmStore;

    fn module() -> DealsModule {
        DealsModule::new(Arc::new(InMemoryCrmStore::seeded()))
    }

    #[tokio::test]
    async fn test_list_deals_with_stage_filter() {
        let call = ToolCall::new(LIST_DEALS).with_arg("stage", "marketing");
        let data = module().execute(&call).await.unwrap();

        let deals = data["deals"].as_array().unwrap();
        assert!(!deals.is_empty());
        assert!(deals.iter().all(|d| d["stage"] == "marketing"));
        assert_eq!(data["total"], deals.len());
    }

    #[tokio::test]
    async fn test_list_deals_rejects_bad_stage() {
        let call = ToolCall::new(LIST_DEALS).with_arg("stage", "escrow");
        let err = module().execute(&call).await.unwrap_err();
        assert!(matches!(err, ModuleError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_deal_overview_fans_out() {
        let call = ToolCall::new(GET_DEAL_OVERVIEW).with_arg("deal_id", "deal-1");
        let data = module().execute(&call).await.unwrap();

        assert_eq!(data["deal"]["id"], "deal-1");
        assert!(data["open_task_count"].as_u64().is_some());
        assert!(data["recent_activity"].is_array());
    }

    #[tokio::test]
    async fn test_deal_overview_unknown_deal() {
        let call = ToolCall::new(GET_DEAL_OVERVIEW).with_arg("deal_id", "deal-999");
        let err = module().execute(&call).await.unwrap_err();
        assert!(matches!(err, ModuleError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_timeline_is_most_recent_first() {
        let call = ToolCall::new(GET_DEAL_TIMELINE).with_arg("deal_id", "deal-1");
        let data = module().execute(&call).await.unwrap();

        let timeline = data["timeline"].as_array().unwrap();
        assert!(timeline.len() >= 2);
        let times: Vec<&str> = timeline
            .iter()
            .map(|a| a["occurred_at"].as_str().unwrap())
            .collect();
        let mut sorted = times.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(times, sorted);
    }

    #[tokio::test]
    async fn test_search_deals_case_insensitive() {
        let call = ToolCall::new(SEARCH_DEALS).with_arg("query", "HARBOR");
        let data = module().execute(&call).await.unwrap();

        let deals = data["deals"].as_array().unwrap();
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0]["name"], "Project Harbor");
    }

    #[tokio::test]
    async fn test_unsupported_tool_name() {
        let err = module()
            .execute(&ToolCall::new("mystery"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModuleError::Unsupported(_)));
    }
}
