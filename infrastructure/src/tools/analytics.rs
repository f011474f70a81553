//! Analytics tools: pipeline rollups, cross-deal buyer activity, briefings

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;

use dealdesk_domain::crm::aging::{self, AgeTier};
use dealdesk_domain::crm::entities::TaskStatus;
use dealdesk_domain::crm::store::{
    ActivityFilter, AlertFilter, BuyerFilter, CrmStore, DealFilter, TaskFilter,
};
use dealdesk_domain::tool::entities::{ToolCall, ToolDefinition, ToolParameter};
use dealdesk_domain::tool::module::{ModuleError, ToolModule};

pub const GET_PIPELINE_ANALYTICS: &str = "get_pipeline_analytics";
pub const GET_CROSS_DEAL_ANALYTICS: &str = "get_cross_deal_analytics";
pub const GET_ENGAGEMENT_STATS: &str = "get_engagement_stats";
pub const GET_DAILY_BRIEFING: &str = "get_daily_briefing";

fn get_pipeline_analytics_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_PIPELINE_ANALYTICS,
        "Pipeline rollup: deal counts and value by stage, plus active totals.",
    )
    .with_parameter(ToolParameter::new("owner_id", "Restrict to one owner's deals", false))
}

fn get_cross_deal_analytics_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_CROSS_DEAL_ANALYTICS,
        "Buyers active on two or more deals at once, ranked by breadth of activity.",
    )
    .with_parameter(
        ToolParameter::new("days", "Look-back window in days (default 90)", false)
            .with_type("number"),
    )
}

fn get_engagement_stats_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_ENGAGEMENT_STATS,
        "Buyer engagement distribution and the most and least responsive buyers.",
    )
}

fn get_daily_briefing_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_DAILY_BRIEFING,
        "A user's morning rollup: overdue tasks, visible alerts, active pipeline, \
         and interactions from the last day.",
    )
    .with_parameter(ToolParameter::new("user_id", "User the briefing is for", true))
}

/// Tool module for aggregate reporting
pub struct AnalyticsModule {
    store: Arc<dyn CrmStore>,
    definitions: Vec<ToolDefinition>,
}

impl AnalyticsModule {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self {
            store,
            definitions: vec![
                get_pipeline_analytics_definition(),
                get_cross_deal_analytics_definition(),
                get_engagement_stats_definition(),
                get_daily_briefing_definition(),
            ],
        }
    }

    async fn get_pipeline_analytics(
        &self,
        call: &ToolCall,
    ) -> Result<serde_json::Value, ModuleError> {
        let deals = self
            .store
            .deals(&DealFilter {
                owner_id: call.get_string("owner_id").map(str::to_string),
                ..Default::default()
            })
            .await?;

        let mut stage_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut stage_value: BTreeMap<&'static str, f64> = BTreeMap::new();
        for deal in &deals {
            *stage_counts.entry(deal.stage.as_str()).or_default() += 1;
            if let Some(asking) = deal.asking_price {
                *stage_value.entry(deal.stage.as_str()).or_default() += asking;
            }
        }

        let active: Vec<_> = deals.iter().filter(|d| d.stage.is_active()).collect();
        let active_value: f64 = active.iter().filter_map(|d| d.asking_price).sum();
        let total = deals.len();
        let active_count = active.len();

        Ok(json!({
            "total_deals": total,
            "active_deals": active_count,
            "active_pipeline_value": active_value,
            "by_stage": stage_counts,
            "value_by_stage": stage_value,
        }))
    }

    async fn get_cross_deal_analytics(
        &self,
        call: &ToolCall,
    ) -> Result<serde_json::Value, ModuleError> {
        let days = call.get_i64("days").unwrap_or(90).clamp(1, 365);
        let since = Utc::now() - Duration::days(days);

        let activities = self
            .store
            .activities(&ActivityFilter {
                since: Some(since),
                ..Default::default()
            })
            .await?;

        // buyer -> set of deals they have recent activity on
        let mut deals_per_buyer: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for activity in &activities {
            if let (Some(buyer_id), Some(deal_id)) = (&activity.buyer_id, &activity.deal_id) {
                let deals = deals_per_buyer.entry(buyer_id.clone()).or_default();
                if !deals.contains(deal_id) {
                    deals.push(deal_id.clone());
                }
            }
        }

        let mut multi_deal = Vec::new();
        for (buyer_id, deal_ids) in deals_per_buyer {
            if deal_ids.len() < 2 {
                continue;
            }
            let buyer = self.store.buyer(&buyer_id).await?;
            multi_deal.push(json!({
                "buyer_id": buyer_id,
                "buyer_name": buyer.map(|b| b.name),
                "deal_ids": deal_ids,
                "deal_count": deal_ids.len(),
            }));
        }
        multi_deal.sort_by_key(|b| std::cmp::Reverse(b["deal_count"].as_u64().unwrap_or(0)));

        let total = multi_deal.len();
        Ok(json!({
            "multi_deal_buyers": multi_deal,
            "total": total,
            "window_days": days,
        }))
    }

    async fn get_engagement_stats(&self) -> Result<serde_json::Value, ModuleError> {
        let buyers = self.store.buyers(&BuyerFilter::default()).await?;

        let mut scored: Vec<_> = buyers
            .iter()
            .filter_map(|b| b.engagement_score.map(|s| (b, s)))
            .collect();
        scored.sort_by_key(|(_, s)| std::cmp::Reverse(*s));

        let bucket = |score: i64| match score {
            70.. => "high",
            40..=69 => "medium",
            _ => "low",
        };
        let mut distribution: BTreeMap<&'static str, usize> = BTreeMap::new();
        for (_, score) in &scored {
            *distribution.entry(bucket(*score)).or_default() += 1;
        }

        let top: Vec<_> = scored
            .iter()
            .take(5)
            .map(|(b, s)| json!({ "buyer_id": b.id, "name": b.name, "score": s }))
            .collect();
        let bottom: Vec<_> = scored
            .iter()
            .rev()
            .take(5)
            .map(|(b, s)| json!({ "buyer_id": b.id, "name": b.name, "score": s }))
            .collect();
        let scored_count = scored.len();
        let unscored = buyers.len() - scored_count;

        Ok(json!({
            "scored_buyers": scored_count,
            "unscored_buyers": unscored,
            "distribution": distribution,
            "most_engaged": top,
            "least_engaged": bottom,
        }))
    }

    async fn get_daily_briefing(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let user_id = call
            .require_string("user_id")
            .map_err(ModuleError::InvalidArgument)?;
        let now = Utc::now();
        let today = now.date_naive();

        let task_filter = TaskFilter {
            assigned_to: Some(user_id.to_string()),
            ..Default::default()
        };
        let alert_filter = AlertFilter {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        };
        let deal_filter = DealFilter {
            owner_id: Some(user_id.to_string()),
            active_only: true,
            ..Default::default()
        };
        let activity_filter = ActivityFilter {
            since: Some(now - Duration::days(1)),
            ..Default::default()
        };

        let (tasks, alerts, deals, recent) = tokio::try_join!(
            self.store.tasks(&task_filter),
            self.store.alerts(&alert_filter),
            self.store.deals(&deal_filter),
            self.store.activities(&activity_filter),
        )?;

        let mut overdue: Vec<_> = tasks
            .iter()
            .filter(|t| t.status.is_open())
            .filter_map(|t| {
                let due = t.due_date?;
                let tier = aging::classify(due, today);
                (tier != AgeTier::Current).then(|| {
                    json!({
                        "task": t,
                        "days_overdue": aging::days_overdue(due, today),
                        "age_tier": tier.as_str(),
                    })
                })
            })
            .collect();
        overdue.sort_by_key(|e| std::cmp::Reverse(e["days_overdue"].as_i64().unwrap_or(0)));

        let visible_alerts: Vec<_> = alerts.iter().filter(|a| a.is_visible(now)).collect();
        let due_today = tasks
            .iter()
            .filter(|t| t.status.is_open() && t.due_date == Some(today))
            .count();
        let open_tasks = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Open || t.status == TaskStatus::InProgress)
            .count();
        let overdue_count = overdue.len();
        let alert_count = visible_alerts.len();
        let active_deal_count = deals.len();
        let recent_count = recent.len();

        Ok(json!({
            "user_id": user_id,
            "date": today,
            "overdue_tasks": overdue,
            "overdue_count": overdue_count,
            "due_today": due_today,
            "open_tasks": open_tasks,
            "alerts": visible_alerts,
            "alert_count": alert_count,
            "active_deals": deals,
            "active_deal_count": active_deal_count,
            "interactions_last_24h": recent_count,
        }))
    }
}

#[async_trait]
impl ToolModule for AnalyticsModule {
    fn id(&self) -> &str {
        "analytics"
    }

    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        match call.tool_name.as_str() {
            GET_PIPELINE_ANALYTICS => self.get_pipeline_analytics(call).await,
            GET_CROSS_DEAL_ANALYTICS => self.get_cross_deal_analytics(call).await,
            GET_ENGAGEMENT_STATS => self.get_engagement_stats().await,
            GET_DAILY_BRIEFING => self.get_daily_briefing(call).await,
            other => Err(ModuleError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCrmStore;

    fn module() -> AnalyticsModule {
        AnalyticsModule::new(Arc::new(InMemoryCrmStore::seeded()))
    }

    #[tokio::test]
    async fn test_pipeline_analytics_counts_stages() {
        let data = module()
            .execute(&ToolCall::new(GET_PIPELINE_ANALYTICS))
            .await
            .unwrap();

        assert!(data["total_deals"].as_u64().unwrap() >= 3);
        assert!(data["by_stage"]["marketing"].as_u64().unwrap() >= 1);
        assert!(data["active_deals"].as_u64().unwrap() <= data["total_deals"].as_u64().unwrap());
    }

    #[tokio::test]
    async fn test_cross_deal_finds_multi_deal_buyers() {
        let call = ToolCall::new(GET_CROSS_DEAL_ANALYTICS).with_arg("days", 365);
        let data = module().execute(&call).await.unwrap();

        let buyers = data["multi_deal_buyers"].as_array().unwrap();
        assert!(
            buyers
                .iter()
                .all(|b| b["deal_count"].as_u64().unwrap() >= 2)
        );
    }

    #[tokio::test]
    async fn test_engagement_stats_ordering() {
        let data = module()
            .execute(&ToolCall::new(GET_ENGAGEMENT_STATS))
            .await
            .unwrap();

        let top = data["most_engaged"].as_array().unwrap();
        assert!(!top.is_empty());
        let scores: Vec<i64> = top.iter().map(|b| b["score"].as_i64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_daily_briefing_shape() {
        let call = ToolCall::new(GET_DAILY_BRIEFING).with_arg("user_id", "user-1");
        let data = module().execute(&call).await.unwrap();

        assert_eq!(data["user_id"], "user-1");
        assert!(data["overdue_count"].as_u64().unwrap() >= 1);
        assert!(data["alert_count"].as_u64().unwrap() >= 1);
        assert!(data["active_deal_count"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_daily_briefing_requires_user() {
        let err = module()
            .execute(&ToolCall::new(GET_DAILY_BRIEFING))
            .await
            .unwrap_err();
        assert!(matches!(err, ModuleError::InvalidArgument(_)));
    }
}
