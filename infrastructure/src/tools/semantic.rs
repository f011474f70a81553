//! Cross-entity search: keyword scoring over deals, buyers, contacts, activities

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use dealdesk_domain::crm::store::{
    ActivityFilter, BuyerFilter, ContactFilter, CrmStore, DealFilter,
};
use dealdesk_domain::tool::entities::{ToolCall, ToolDefinition, ToolParameter};
use dealdesk_domain::tool::module::{ModuleError, ToolModule};

pub const SEMANTIC_SEARCH: &str = "semantic_search";

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

/// Name/title hits outrank free-text hits
const NAME_WEIGHT: i64 = 10;
const FIELD_WEIGHT: i64 = 5;
const TEXT_WEIGHT: i64 = 2;

fn semantic_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEMANTIC_SEARCH,
        "Search across deals, buyers, contacts, and activity notes at once. \
         Matches on names, industries, titles, and free text; ranked by relevance.",
    )
    .with_parameter(ToolParameter::new("query", "Search text", true))
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of results", false).with_type("number"),
    )
}

/// Tool module for workspace-wide search
pub struct SemanticModule {
    store: Arc<dyn CrmStore>,
    definitions: Vec<ToolDefinition>,
}

/// Sum of weights for each query term found in each candidate field
fn score_fields(terms: &[String], fields: &[(&str, i64)]) -> i64 {
    let mut score = 0;
    for term in terms {
        for (text, weight) in fields {
            if text.to_lowercase().contains(term.as_str()) {
                score += weight;
            }
        }
    }
    score
}

impl SemanticModule {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self {
            store,
            definitions: vec![semantic_search_definition()],
        }
    }

    async fn semantic_search(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let query = call
            .require_string("query")
            .map_err(ModuleError::InvalidArgument)?;
        let limit = call.get_limit("limit", DEFAULT_LIMIT, MAX_LIMIT);

        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if terms.is_empty() {
            return Err(ModuleError::InvalidArgument(
                "query must contain at least one term".to_string(),
            ));
        }

        let deal_filter = DealFilter::default();
        let buyer_filter = BuyerFilter::default();
        let contact_filter = ContactFilter::default();
        let activity_filter = ActivityFilter::default();

        let (deals, buyers, contacts, activities) = tokio::try_join!(
            self.store.deals(&deal_filter),
            self.store.buyers(&buyer_filter),
            self.store.contacts(&contact_filter),
            self.store.activities(&activity_filter),
        )?;

        let mut hits = Vec::new();
        for deal in &deals {
            let score = score_fields(
                &terms,
                &[
                    (&deal.name, NAME_WEIGHT),
                    (&deal.industry, FIELD_WEIGHT),
                    (deal.description.as_deref().unwrap_or(""), TEXT_WEIGHT),
                ],
            );
            if score > 0 {
                hits.push((score, json!({ "kind": "deal", "score": score, "deal": deal })));
            }
        }
        for buyer in &buyers {
            let industries = buyer.industries.join(" ");
            let score = score_fields(
                &terms,
                &[
                    (&buyer.name, NAME_WEIGHT),
                    (&industries, FIELD_WEIGHT),
                    (buyer.notes.as_deref().unwrap_or(""), TEXT_WEIGHT),
                ],
            );
            if score > 0 {
                hits.push((score, json!({ "kind": "buyer", "score": score, "buyer": buyer })));
            }
        }
        for contact in &contacts {
            let score = score_fields(
                &terms,
                &[
                    (&contact.name, NAME_WEIGHT),
                    (contact.title.as_deref().unwrap_or(""), FIELD_WEIGHT),
                    (contact.email.as_deref().unwrap_or(""), FIELD_WEIGHT),
                ],
            );
            if score > 0 {
                hits.push((
                    score,
                    json!({ "kind": "contact", "score": score, "contact": contact }),
                ));
            }
        }
        for activity in &activities {
            let score = score_fields(
                &terms,
                &[
                    (&activity.subject, FIELD_WEIGHT),
                    (activity.notes.as_deref().unwrap_or(""), TEXT_WEIGHT),
                ],
            );
            if score > 0 {
                hits.push((
                    score,
                    json!({ "kind": "activity", "score": score, "activity": activity }),
                ));
            }
        }

        hits.sort_by_key(|(score, _)| std::cmp::Reverse(*score));
        let results: Vec<_> = hits.into_iter().take(limit).map(|(_, hit)| hit).collect();
        let total = results.len();

        Ok(json!({
            "query": query,
            "results": results,
            "total": total,
        }))
    }
}

#[async_trait]
impl ToolModule for SemanticModule {
    fn id(&self) -> &str {
        "semantic"
    }

    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        match call.tool_name.as_str() {
            SEMANTIC_SEARCH => self.semantic_search(call).await,
            other => Err(ModuleError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCrmStore;

    fn module() -> SemanticModule {
        SemanticModule::new(Arc::new(InMemoryCrmStore::seeded()))
    }

    #[tokio::test]
    async fn test_search_ranks_name_match_first() {
        let call = ToolCall::new(SEMANTIC_SEARCH).with_arg("query", "Harbor");
        let data = module().execute(&call).await.unwrap();

        let results = data["results"].as_array().unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0]["kind"], "deal");
        assert_eq!(results[0]["deal"]["name"], "Project Harbor");
    }

    #[tokio::test]
    async fn test_search_spans_entity_kinds() {
        let call = ToolCall::new(SEMANTIC_SEARCH)
            .with_arg("query", "software")
            .with_arg("limit", 50);
        let data = module().execute(&call).await.unwrap();

        let kinds: Vec<&str> = data["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["kind"].as_str().unwrap())
            .collect();
        assert!(kinds.contains(&"deal"));
        assert!(kinds.contains(&"buyer"));
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let call = ToolCall::new(SEMANTIC_SEARCH)
            .with_arg("query", "software deal")
            .with_arg("limit", 2);
        let data = module().execute(&call).await.unwrap();
        assert!(data["results"].as_array().unwrap().len() <= 2);
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let call = ToolCall::new(SEMANTIC_SEARCH).with_arg("query", "   ");
        let err = module().execute(&call).await.unwrap_err();
        assert!(matches!(err, ModuleError::InvalidArgument(_)));
    }
}
