//! Contact tools: people search, details, relationship mapping

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use dealdesk_domain::crm::store::{ActivityFilter, ContactFilter, CrmStore};
use dealdesk_domain::tool::entities::{ToolCall, ToolDefinition, ToolParameter};
use dealdesk_domain::tool::module::{ModuleError, ToolModule};

pub const SEARCH_CONTACTS: &str = "search_contacts";
pub const GET_CONTACT_DETAILS: &str = "get_contact_details";
pub const FIND_CONNECTIONS: &str = "find_connections";

const DEFAULT_LIMIT: usize = 25;
const MAX_LIMIT: usize = 100;

fn search_contacts_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_CONTACTS,
        "Search contacts by name, title, or email substring, optionally scoped to one buyer.",
    )
    .with_parameter(ToolParameter::new("query", "Search text", true))
    .with_parameter(ToolParameter::new("buyer_id", "Restrict to one buyer's contacts", false))
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of matches", false).with_type("number"),
    )
}

fn get_contact_details_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_CONTACT_DETAILS,
        "One contact's record plus their recent interaction history.",
    )
    .with_parameter(ToolParameter::new("contact_id", "Contact identifier", true))
}

fn find_connections_definition() -> ToolDefinition {
    ToolDefinition::new(
        FIND_CONNECTIONS,
        "Colleagues of a contact (people at the same buyer) with interaction counts, \
         for finding a warm path into an organization.",
    )
    .with_parameter(ToolParameter::new("contact_id", "Contact identifier", true))
}

/// Tool module for contact queries
pub struct ContactsModule {
    store: Arc<dyn CrmStore>,
    definitions: Vec<ToolDefinition>,
}

impl ContactsModule {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self {
            store,
            definitions: vec![
                search_contacts_definition(),
                get_contact_details_definition(),
                find_connections_definition(),
            ],
        }
    }

    async fn search_contacts(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let query = call
            .require_string("query")
            .map_err(ModuleError::InvalidArgument)?
            .to_lowercase();
        let limit = call.get_limit("limit", DEFAULT_LIMIT, MAX_LIMIT);

        let contacts = self
            .store
            .contacts(&ContactFilter {
                buyer_id: call.get_string("buyer_id").map(str::to_string),
                limit: None,
            })
            .await?;

        let matches: Vec<_> = contacts
            .into_iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&query)
                    || c.title.as_deref().is_some_and(|t| t.to_lowercase().contains(&query))
                    || c.email.as_deref().is_some_and(|e| e.to_lowercase().contains(&query))
            })
            .take(limit)
            .collect();

        let total = matches.len();
        Ok(json!({ "contacts": matches, "total": total }))
    }

    async fn get_contact_details(
        &self,
        call: &ToolCall,
    ) -> Result<serde_json::Value, ModuleError> {
        let contact_id = call
            .require_string("contact_id")
            .map_err(ModuleError::InvalidArgument)?;

        let activity_filter = ActivityFilter {
            contact_id: Some(contact_id.to_string()),
            limit: Some(15),
            ..Default::default()
        };
        let (contact, activities) = tokio::try_join!(
            self.store.contact(contact_id),
            self.store.activities(&activity_filter),
        )?;
        let contact =
            contact.ok_or_else(|| ModuleError::NotFound(format!("contact {}", contact_id)))?;

        let interaction_count = activities.len();
        Ok(json!({
            "contact": contact,
            "recent_activity": activities,
            "interaction_count": interaction_count,
        }))
    }

    async fn find_connections(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let contact_id = call
            .require_string("contact_id")
            .map_err(ModuleError::InvalidArgument)?;

        let contact = self
            .store
            .contact(contact_id)
            .await?
            .ok_or_else(|| ModuleError::NotFound(format!("contact {}", contact_id)))?;

        let Some(buyer_id) = contact.buyer_id.clone() else {
            return Ok(json!({
                "contact": contact,
                "connections": [],
                "total": 0,
            }));
        };

        let colleagues = self
            .store
            .contacts(&ContactFilter {
                buyer_id: Some(buyer_id.clone()),
                limit: None,
            })
            .await?;

        // One history lookup per colleague, issued in parallel
        let colleagues: Vec<_> = colleagues
            .into_iter()
            .filter(|c| c.id != contact.id)
            .collect();
        let history_filters: Vec<ActivityFilter> = colleagues
            .iter()
            .map(|colleague| ActivityFilter {
                contact_id: Some(colleague.id.clone()),
                ..Default::default()
            })
            .collect();
        let histories = futures::future::try_join_all(
            history_filters
                .iter()
                .map(|filter| self.store.activities(filter)),
        )
        .await?;

        let mut connections: Vec<_> = colleagues
            .iter()
            .zip(histories)
            .map(|(colleague, interactions)| {
                json!({
                    "contact": colleague,
                    "interaction_count": interactions.len(),
                })
            })
            .collect();
        connections.sort_by_key(|c| {
            std::cmp::Reverse(c["interaction_count"].as_u64().unwrap_or(0))
        });

        let total = connections.len();
        Ok(json!({
            "contact": contact,
            "buyer_id": buyer_id,
            "connections": connections,
            "total": total,
        }))
    }
}

#[async_trait]
impl ToolModule for ContactsModule {
    fn id(&self) -> &str {
        "contacts"
    }

    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        match call.tool_name.as_str() {
            SEARCH_CONTACTS => self.search_contacts(call).await,
            GET_CONTACT_DETAILS => self.get_contact_details(call).await,
            FIND_CONNECTIONS => self.find_connections(call).await,
            other => Err(ModuleError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCrmStore;

    fn module() -> ContactsModule {
        ContactsModule::new(Arc::new(InMemoryCrmStore::seeded()))
    }

    #[tokio::test]
    async fn test_search_contacts_by_title() {
        let call = ToolCall::new(SEARCH_CONTACTS).with_arg("query", "partner");
        let data = module().execute(&call).await.unwrap();
        assert!(data["total"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_search_contacts_requires_query() {
        let err = module()
            .execute(&ToolCall::new(SEARCH_CONTACTS))
            .await
            .unwrap_err();
        assert!(matches!(err, ModuleError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_contact_details() {
        let call = ToolCall::new(GET_CONTACT_DETAILS).with_arg("contact_id", "contact-1");
        let data = module().execute(&call).await.unwrap();

        assert_eq!(data["contact"]["id"], "contact-1");
        assert!(data["recent_activity"].is_array());
    }

    #[tokio::test]
    async fn test_find_connections_excludes_self() {
        let call = ToolCall::new(FIND_CONNECTIONS).with_arg("contact_id", "contact-1");
        let data = module().execute(&call).await.unwrap();

        let connections = data["connections"].as_array().unwrap();
        assert!(
            connections
                .iter()
                .all(|c| c["contact"]["id"] != "contact-1")
        );
    }
}
