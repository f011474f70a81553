//! Buyer tools: universe search, profiles, deal matching

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use dealdesk_domain::crm::entities::{Buyer, BuyerType, Deal};
use dealdesk_domain::crm::store::{ActivityFilter, BuyerFilter, ContactFilter, CrmStore};
use dealdesk_domain::tool::entities::{ToolCall, ToolDefinition, ToolParameter};
use dealdesk_domain::tool::module::{ModuleError, ToolModule};

pub const SEARCH_BUYERS: &str = "search_buyers";
pub const GET_BUYER_PROFILE: &str = "get_buyer_profile";
pub const MATCH_BUYERS_TO_DEAL: &str = "match_buyers_to_deal";

const DEFAULT_LIMIT: usize = 25;
const MAX_LIMIT: usize = 100;

fn search_buyers_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_BUYERS,
        "Search the buyer universe by name or notes, optionally filtered by buyer type \
         and industry. Use match_buyers_to_deal to rank buyers against a specific deal.",
    )
    .with_parameter(ToolParameter::new("query", "Search text over name and notes", false))
    .with_parameter(
        ToolParameter::new(
            "buyer_type",
            "Filter: strategic, financial_sponsor, family_office, individual",
            false,
        ),
    )
    .with_parameter(ToolParameter::new("industry", "Filter by acquisition industry", false))
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of buyers to return", false)
            .with_type("number"),
    )
}

fn get_buyer_profile_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_BUYER_PROFILE,
        "Full profile of one buyer: record, contacts, and recent interaction history.",
    )
    .with_parameter(ToolParameter::new("buyer_id", "Buyer identifier", true))
}

fn match_buyers_to_deal_definition() -> ToolDefinition {
    ToolDefinition::new(
        MATCH_BUYERS_TO_DEAL,
        "Rank the buyer universe against one deal by industry fit, EBITDA appetite, \
         and engagement. Returns scored matches, best first.",
    )
    .with_parameter(ToolParameter::new("deal_id", "Deal identifier", true))
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of matches", false).with_type("number"),
    )
}

/// Fit score for one buyer against one deal, with the contributing reasons
fn score_buyer(buyer: &Buyer, deal: &Deal) -> (i64, Vec<&'static str>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    if buyer
        .industries
        .iter()
        .any(|i| i.eq_ignore_ascii_case(&deal.industry))
    {
        score += 40;
        reasons.push("industry match");
    }

    if let Some(ebitda) = deal.ebitda {
        let above_min = buyer.ebitda_min.is_none_or(|min| ebitda >= min);
        let below_max = buyer.ebitda_max.is_none_or(|max| ebitda <= max);
        if above_min && below_max {
            score += 30;
            reasons.push("ebitda in appetite range");
        }
    }

    if let Some(engagement) = buyer.engagement_score {
        // Scale 0-100 engagement into up to 30 points
        score += (engagement.clamp(0, 100) * 30) / 100;
        if engagement >= 50 {
            reasons.push("actively engaged");
        }
    }

    (score, reasons)
}

/// Tool module for buyer queries
pub struct BuyersModule {
    store: Arc<dyn CrmStore>,
    definitions: Vec<ToolDefinition>,
}

impl BuyersModule {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self {
            store,
            definitions: vec![
                search_buyers_definition(),
                get_buyer_profile_definition(),
                match_buyers_to_deal_definition(),
            ],
        }
    }

    async fn search_buyers(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let buyer_type = call
            .get_string("buyer_type")
            .map(BuyerType::from_str)
            .transpose()
            .map_err(|e| ModuleError::InvalidArgument(e.to_string()))?;
        let limit = call.get_limit("limit", DEFAULT_LIMIT, MAX_LIMIT);

        let filter = BuyerFilter {
            buyer_type,
            industry: call.get_string("industry").map(str::to_string),
            limit: None,
        };
        let buyers = self.store.buyers(&filter).await?;

        let query = call.get_string("query").map(str::to_lowercase);
        let matches: Vec<_> = buyers
            .into_iter()
            .filter(|b| match &query {
                Some(q) => {
                    b.name.to_lowercase().contains(q)
                        || b.notes.as_deref().is_some_and(|n| n.to_lowercase().contains(q))
                }
                None => true,
            })
            .take(limit)
            .collect();

        let total = matches.len();
        let by_type = super::count_by(&matches, |b| b.buyer_type.as_str().to_string());
        Ok(json!({
            "buyers": matches,
            "total": total,
            "by_type": by_type,
        }))
    }

    async fn get_buyer_profile(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let buyer_id = call
            .require_string("buyer_id")
            .map_err(ModuleError::InvalidArgument)?;

        let contact_filter = ContactFilter {
            buyer_id: Some(buyer_id.to_string()),
            ..Default::default()
        };
        let activity_filter = ActivityFilter {
            buyer_id: Some(buyer_id.to_string()),
            limit: Some(15),
            ..Default::default()
        };

        let (buyer, contacts, activities) = tokio::try_join!(
            self.store.buyer(buyer_id),
            self.store.contacts(&contact_filter),
            self.store.activities(&activity_filter),
        )?;

        let buyer = buyer.ok_or_else(|| ModuleError::NotFound(format!("buyer {}", buyer_id)))?;
        let last_touch = activities.iter().map(|a| a.occurred_at).max();

        Ok(json!({
            "buyer": buyer,
            "contacts": contacts,
            "recent_activity": activities,
            "last_touch": last_touch,
        }))
    }

    async fn match_buyers_to_deal(
        &self,
        call: &ToolCall,
    ) -> Result<serde_json::Value, ModuleError> {
        let deal_id = call
            .require_string("deal_id")
            .map_err(ModuleError::InvalidArgument)?;
        let limit = call.get_limit("limit", 10, 50);

        let buyer_filter = BuyerFilter::default();
        let (deal, buyers) = tokio::try_join!(
            self.store.deal(deal_id),
            self.store.buyers(&buyer_filter),
        )?;
        let deal = deal.ok_or_else(|| ModuleError::NotFound(format!("deal {}", deal_id)))?;

        let mut scored: Vec<_> = buyers
            .into_iter()
            .map(|buyer| {
                let (score, reasons) = score_buyer(&buyer, &deal);
                (score, reasons, buyer)
            })
            .filter(|(score, _, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.2.name.cmp(&b.2.name)));

        let matches: Vec<_> = scored
            .into_iter()
            .take(limit)
            .map(|(score, reasons, buyer)| {
                json!({
                    "buyer": buyer,
                    "fit_score": score,
                    "reasons": reasons,
                })
            })
            .collect();

        let total = matches.len();
        Ok(json!({
            "deal_id": deal_id,
            "deal_name": deal.name,
            "matches": matches,
            "total": total,
        }))
    }
}

#[async_trait]
impl ToolModule for BuyersModule {
    fn id(&self) -> &str {
        "buyers"
    }

    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        match call.tool_name.as_str() {
            SEARCH_BUYERS => self.search_buyers(call).await,
            GET_BUYER_PROFILE => self.get_buyer_profile(call).await,
            MATCH_BUYERS_TO_DEAL => self.match_buyers_to_deal(call).await,
            other => Err(ModuleError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCrmStore;

    fn module() -> BuyersModule {
        BuyersModule::new(Arc::new(InMemoryCrmStore::seeded()))
    }

    #[tokio::test]
    async fn test_search_buyers_by_type() {
        let call = ToolCall::new(SEARCH_BUYERS).with_arg("buyer_type", "strategic");
        let data = module().execute(&call).await.unwrap();

        let buyers = data["buyers"].as_array().unwrap();
        assert!(!buyers.is_empty());
        assert!(buyers.iter().all(|b| b["buyer_type"] == "strategic"));
    }

    #[tokio::test]
    async fn test_search_buyers_query_over_notes() {
        let call = ToolCall::new(SEARCH_BUYERS).with_arg("query", "roll-up");
        let data = module().execute(&call).await.unwrap();
        assert!(data["total"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_buyer_profile_includes_contacts() {
        let call = ToolCall::new(GET_BUYER_PROFILE).with_arg("buyer_id", "buyer-1");
        let data = module().execute(&call).await.unwrap();

        assert_eq!(data["buyer"]["id"], "buyer-1");
        assert!(!data["contacts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_match_buyers_ranks_by_fit() {
        let call = ToolCall::new(MATCH_BUYERS_TO_DEAL).with_arg("deal_id", "deal-1");
        let data = module().execute(&call).await.unwrap();

        let matches = data["matches"].as_array().unwrap();
        assert!(matches.len() >= 2);
        let scores: Vec<i64> = matches
            .iter()
            .map(|m| m["fit_score"].as_i64().unwrap())
            .collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted);
        // Top match should cite industry fit for the seeded deal
        assert!(
            matches[0]["reasons"]
                .as_array()
                .unwrap()
                .iter()
                .any(|r| r == "industry match")
        );
    }

    #[test]
    fn test_score_buyer_ebitda_bounds() {
        let deal = crate::store::memory::demo_deal("deal-x", "Project X", "software", 4_000_000.0);
        let mut buyer = crate::store::memory::demo_buyer("buyer-x", "Acme Holdings", "software");
        buyer.ebitda_min = Some(1_000_000.0);
        buyer.ebitda_max = Some(3_000_000.0);

        // Outside appetite: no ebitda points, still industry points
        let (score, reasons) = score_buyer(&buyer, &deal);
        assert!(reasons.contains(&"industry match"));
        assert!(!reasons.contains(&"ebitda in appetite range"));
        assert!(score >= 40);
    }
}
