//! Outreach tools: interaction history, unanswered threads, drafting, logging

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;

use dealdesk_domain::crm::entities::{ActivityKind, Direction};
use dealdesk_domain::crm::store::{ActivityFilter, CrmStore, NewActivity};
use dealdesk_domain::tool::entities::{ToolCall, ToolDefinition, ToolParameter};
use dealdesk_domain::tool::module::{ModuleError, ToolModule};

pub const GET_OUTREACH_ACTIVITY: &str = "get_outreach_activity";
pub const GET_UNANSWERED_OUTREACH: &str = "get_unanswered_outreach";
pub const DRAFT_OUTREACH_EMAIL: &str = "draft_outreach_email";
pub const LOG_OUTREACH: &str = "log_outreach";

/// Outbound threads older than this with no reply count as unanswered
const DEFAULT_UNANSWERED_DAYS: i64 = 3;

fn get_outreach_activity_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_OUTREACH_ACTIVITY,
        "Recent emails, calls, and meetings, optionally scoped to a deal or buyer.",
    )
    .with_parameter(ToolParameter::new("deal_id", "Restrict to one deal", false))
    .with_parameter(ToolParameter::new("buyer_id", "Restrict to one buyer", false))
    .with_parameter(
        ToolParameter::new("days", "Look-back window in days (default 30)", false)
            .with_type("number"),
    )
}

fn get_unanswered_outreach_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_UNANSWERED_OUTREACH,
        "Outbound emails and calls that have received no inbound reply, oldest first.",
    )
    .with_parameter(
        ToolParameter::new(
            "days",
            "Minimum age in days before a thread counts as unanswered (default 3)",
            false,
        )
        .with_type("number"),
    )
}

fn draft_outreach_email_definition() -> ToolDefinition {
    ToolDefinition::new(
        DRAFT_OUTREACH_EMAIL,
        "Draft a follow-up email to a contact using their buyer and deal context. \
         Returns the draft only; nothing is sent.",
    )
    .with_parameter(ToolParameter::new("contact_id", "Recipient contact", true))
    .with_parameter(ToolParameter::new("deal_id", "Deal to reference in the draft", false))
    .with_parameter(ToolParameter::new("tone", "formal | friendly (default formal)", false))
}

fn log_outreach_definition() -> ToolDefinition {
    ToolDefinition::new(
        LOG_OUTREACH,
        "Record an email, call, or meeting against a deal, buyer, or contact.",
    )
    .with_parameter(ToolParameter::new("kind", "email | call | meeting | note", true))
    .with_parameter(ToolParameter::new("subject", "Short summary of the interaction", true))
    .with_parameter(ToolParameter::new("direction", "outbound | inbound", false))
    .with_parameter(ToolParameter::new("deal_id", "Related deal", false))
    .with_parameter(ToolParameter::new("buyer_id", "Related buyer", false))
    .with_parameter(ToolParameter::new("contact_id", "Related contact", false))
    .with_parameter(ToolParameter::new("notes", "Free-form detail", false))
    .with_parameter(ToolParameter::new("user_id", "User recording the interaction", true))
}

/// Tool module for outreach history and logging
pub struct OutreachModule {
    store: Arc<dyn CrmStore>,
    definitions: Vec<ToolDefinition>,
}

impl OutreachModule {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self {
            store,
            definitions: vec![
                get_outreach_activity_definition(),
                get_unanswered_outreach_definition(),
                draft_outreach_email_definition(),
                log_outreach_definition(),
            ],
        }
    }

    async fn get_outreach_activity(
        &self,
        call: &ToolCall,
    ) -> Result<serde_json::Value, ModuleError> {
        let days = call.get_i64("days").unwrap_or(30).clamp(1, 365);
        let since = Utc::now() - Duration::days(days);

        let activities = self
            .store
            .activities(&ActivityFilter {
                deal_id: call.get_string("deal_id").map(str::to_string),
                buyer_id: call.get_string("buyer_id").map(str::to_string),
                since: Some(since),
                ..Default::default()
            })
            .await?;

        let by_kind = super::count_by(&activities, |a| a.kind.as_str().to_string());
        let outbound = activities
            .iter()
            .filter(|a| a.direction == Some(Direction::Outbound))
            .count();
        let total = activities.len();

        Ok(json!({
            "activities": activities,
            "total": total,
            "outbound": outbound,
            "by_kind": by_kind,
            "window_days": days,
        }))
    }

    async fn get_unanswered_outreach(
        &self,
        call: &ToolCall,
    ) -> Result<serde_json::Value, ModuleError> {
        let days = call
            .get_i64("days")
            .unwrap_or(DEFAULT_UNANSWERED_DAYS)
            .clamp(0, 365);
        let cutoff = Utc::now() - Duration::days(days);

        let activities = self.store.activities(&ActivityFilter::default()).await?;

        // An outbound email/call is answered once any inbound activity for the
        // same contact (or, lacking one, the same buyer) occurs after it.
        let mut unanswered = Vec::new();
        for outreach in activities.iter().filter(|a| {
            a.direction == Some(Direction::Outbound)
                && matches!(a.kind, ActivityKind::Email | ActivityKind::Call)
                && a.occurred_at <= cutoff
        }) {
            let answered = activities.iter().any(|reply| {
                reply.direction == Some(Direction::Inbound)
                    && reply.occurred_at > outreach.occurred_at
                    && match (&outreach.contact_id, &reply.contact_id) {
                        (Some(a), Some(b)) => a == b,
                        _ => {
                            outreach.buyer_id.is_some() && outreach.buyer_id == reply.buyer_id
                        }
                    }
            });
            if !answered {
                let days_waiting = (Utc::now() - outreach.occurred_at).num_days();
                unanswered.push(json!({
                    "activity": outreach,
                    "days_waiting": days_waiting,
                }));
            }
        }
        unanswered.sort_by_key(|u| std::cmp::Reverse(u["days_waiting"].as_i64().unwrap_or(0)));

        let total = unanswered.len();
        Ok(json!({
            "unanswered": unanswered,
            "total": total,
            "threshold_days": days,
        }))
    }

    async fn draft_outreach_email(
        &self,
        call: &ToolCall,
    ) -> Result<serde_json::Value, ModuleError> {
        let contact_id = call
            .require_string("contact_id")
            .map_err(ModuleError::InvalidArgument)?;
        let tone = call.get_string("tone").unwrap_or("formal");

        let contact = self
            .store
            .contact(contact_id)
            .await?
            .ok_or_else(|| ModuleError::NotFound(format!("contact {}", contact_id)))?;

        let deal = match call.get_string("deal_id") {
            Some(deal_id) => Some(
                self.store
                    .deal(deal_id)
                    .await?
                    .ok_or_else(|| ModuleError::NotFound(format!("deal {}", deal_id)))?,
            ),
            None => None,
        };

        let first_name = contact.name.split_whitespace().next().unwrap_or("there");
        let greeting = match tone {
            "friendly" => format!("Hi {},", first_name),
            _ => format!("Dear {},", first_name),
        };
        let body = match &deal {
            Some(deal) => format!(
                "{}\n\nI wanted to follow up regarding {}. We believe it could be a strong \
                 fit given your acquisition focus, and I'd welcome the chance to walk you \
                 through the latest materials.\n\nWould you have 20 minutes this week?",
                greeting, deal.name
            ),
            None => format!(
                "{}\n\nIt has been a little while since we last spoke, and I wanted to check \
                 in on your current acquisition priorities. We have several opportunities in \
                 the pipeline that may be of interest.\n\nWould you have 20 minutes this week?",
                greeting
            ),
        };
        let subject = match &deal {
            Some(deal) => format!("Following up: {}", deal.name),
            None => "Checking in".to_string(),
        };

        Ok(json!({
            "to": contact.email,
            "contact": contact,
            "draft_subject": subject,
            "draft_body": body,
            "tone": tone,
        }))
    }

    async fn log_outreach(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let kind: ActivityKind = call
            .require_string("kind")
            .map_err(ModuleError::InvalidArgument)?
            .parse()
            .map_err(|e: dealdesk_domain::core::error::DomainError| {
                ModuleError::InvalidArgument(e.to_string())
            })?;
        let subject = call
            .require_string("subject")
            .map_err(ModuleError::InvalidArgument)?;
        let created_by = call
            .require_string("user_id")
            .map_err(ModuleError::InvalidArgument)?;
        let direction = match call.get_string("direction") {
            Some(raw) => Some(raw.parse().map_err(
                |e: dealdesk_domain::core::error::DomainError| {
                    ModuleError::InvalidArgument(e.to_string())
                },
            )?),
            None => Some(Direction::Outbound),
        };

        let activity = self
            .store
            .insert_activity(NewActivity {
                deal_id: call.get_string("deal_id").map(str::to_string),
                buyer_id: call.get_string("buyer_id").map(str::to_string),
                contact_id: call.get_string("contact_id").map(str::to_string),
                kind,
                direction,
                subject: subject.to_string(),
                notes: call.get_string("notes").map(str::to_string),
                created_by: created_by.to_string(),
            })
            .await?;

        Ok(json!({ "logged": true, "activity": activity }))
    }
}

#[async_trait]
impl ToolModule for OutreachModule {
    fn id(&self) -> &str {
        "outreach"
    }

    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        match call.tool_name.as_str() {
            GET_OUTREACH_ACTIVITY => self.get_outreach_activity(call).await,
            GET_UNANSWERED_OUTREACH => self.get_unanswered_outreach(call).await,
            DRAFT_OUTREACH_EMAIL => self.draft_outreach_email(call).await,
            LOG_OUTREACH => self.log_outreach(call).await,
            other => Err(ModuleError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCrmStore;

    fn module() -> OutreachModule {
        OutreachModule::new(Arc::new(InMemoryCrmStore::seeded()))
    }

    #[tokio::test]
    async fn test_outreach_activity_counts_outbound() {
        let call = ToolCall::new(GET_OUTREACH_ACTIVITY).with_arg("days", 90);
        let data = module().execute(&call).await.unwrap();

        assert!(data["total"].as_u64().unwrap() >= 1);
        assert!(data["outbound"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_unanswered_outreach_sorted_oldest_first() {
        let data = module()
            .execute(&ToolCall::new(GET_UNANSWERED_OUTREACH))
            .await
            .unwrap();

        let unanswered = data["unanswered"].as_array().unwrap();
        assert!(!unanswered.is_empty());
        let waits: Vec<i64> = unanswered
            .iter()
            .map(|u| u["days_waiting"].as_i64().unwrap())
            .collect();
        assert!(waits.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_draft_email_references_deal() {
        let call = ToolCall::new(DRAFT_OUTREACH_EMAIL)
            .with_arg("contact_id", "contact-1")
            .with_arg("deal_id", "deal-1")
            .with_arg("tone", "friendly");
        let data = module().execute(&call).await.unwrap();

        assert!(data["draft_subject"].as_str().unwrap().contains("Project Harbor"));
        assert!(data["draft_body"].as_str().unwrap().starts_with("Hi "));
    }

    #[tokio::test]
    async fn test_log_outreach_persists() {
        let store = Arc::new(InMemoryCrmStore::seeded());
        let module = OutreachModule::new(store.clone());

        let call = ToolCall::new(LOG_OUTREACH)
            .with_arg("kind", "call")
            .with_arg("subject", "Intro call with CFO")
            .with_arg("deal_id", "deal-1")
            .with_arg("user_id", "user-1");
        let data = module.execute(&call).await.unwrap();
        assert_eq!(data["logged"], true);

        let logged = store
            .activities(&ActivityFilter {
                deal_id: Some("deal-1".to_string()),
                kind: Some(ActivityKind::Call),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(logged.iter().any(|a| a.subject == "Intro call with CFO"));
    }

    #[tokio::test]
    async fn test_log_outreach_rejects_bad_kind() {
        let call = ToolCall::new(LOG_OUTREACH)
            .with_arg("kind", "telegram")
            .with_arg("subject", "x")
            .with_arg("user_id", "user-1");
        let err = module().execute(&call).await.unwrap_err();
        assert!(matches!(err, ModuleError::InvalidArgument(_)));
    }
}
