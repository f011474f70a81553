//! Alert tools: surfacing, dismissing, and snoozing workspace alerts

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;

use dealdesk_domain::crm::entities::AlertState;
use dealdesk_domain::crm::store::{AlertFilter, CrmStore};
use dealdesk_domain::tool::entities::{ToolCall, ToolDefinition, ToolParameter};
use dealdesk_domain::tool::module::{ModuleError, ToolModule};

pub const GET_ACTIVE_ALERTS: &str = "get_active_alerts";
pub const DISMISS_ALERT: &str = "dismiss_alert";
pub const SNOOZE_ALERT: &str = "snooze_alert";

const DEFAULT_SNOOZE_DAYS: i64 = 7;

fn get_active_alerts_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_ACTIVE_ALERTS,
        "Alerts currently visible to a user. Snoozed alerts resurface once their \
         snooze window has passed.",
    )
    .with_parameter(ToolParameter::new("user_id", "User whose alerts to show", true))
}

fn dismiss_alert_definition() -> ToolDefinition {
    ToolDefinition::new(DISMISS_ALERT, "Permanently dismiss one alert.")
        .with_parameter(ToolParameter::new("alert_id", "Alert identifier", true))
}

fn snooze_alert_definition() -> ToolDefinition {
    ToolDefinition::new(
        SNOOZE_ALERT,
        "Hide one alert until a later date (default 7 days).",
    )
    .with_parameter(ToolParameter::new("alert_id", "Alert identifier", true))
    .with_parameter(
        ToolParameter::new("days", "Days to snooze for", false).with_type("number"),
    )
}

/// Tool module for alert lifecycle operations
pub struct AlertsModule {
    store: Arc<dyn CrmStore>,
    definitions: Vec<ToolDefinition>,
}

impl AlertsModule {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self {
            store,
            definitions: vec![
                get_active_alerts_definition(),
                dismiss_alert_definition(),
                snooze_alert_definition(),
            ],
        }
    }

    async fn get_active_alerts(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let user_id = call
            .require_string("user_id")
            .map_err(ModuleError::InvalidArgument)?;
        let now = Utc::now();

        let mut alerts: Vec<_> = self
            .store
            .alerts(&AlertFilter {
                user_id: Some(user_id.to_string()),
                ..Default::default()
            })
            .await?
            .into_iter()
            .filter(|a| a.is_visible(now))
            .collect();
        alerts.sort_by(|a, b| b.severity.cmp(&a.severity).then(b.created_at.cmp(&a.created_at)));

        let by_severity = super::count_by(&alerts, |a| a.severity.as_str().to_string());
        let total = alerts.len();

        Ok(json!({
            "alerts": alerts,
            "total": total,
            "by_severity": by_severity,
        }))
    }

    async fn dismiss_alert(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let alert_id = call
            .require_string("alert_id")
            .map_err(ModuleError::InvalidArgument)?;

        let alert = self
            .store
            .update_alert_state(alert_id, AlertState::Dismissed, None)
            .await?;

        Ok(json!({ "dismissed": true, "alert": alert }))
    }

    async fn snooze_alert(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let alert_id = call
            .require_string("alert_id")
            .map_err(ModuleError::InvalidArgument)?;
        let days = call
            .get_i64("days")
            .unwrap_or(DEFAULT_SNOOZE_DAYS)
            .clamp(1, 90);
        let until = Utc::now() + Duration::days(days);

        let alert = self
            .store
            .update_alert_state(alert_id, AlertState::Snoozed, Some(until))
            .await?;

        Ok(json!({
            "snoozed": true,
            "snoozed_until": until,
            "alert": alert,
        }))
    }
}

#[async_trait]
impl ToolModule for AlertsModule {
    fn id(&self) -> &str {
        "alerts"
    }

    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        match call.tool_name.as_str() {
            GET_ACTIVE_ALERTS => self.get_active_alerts(call).await,
            DISMISS_ALERT => self.dismiss_alert(call).await,
            SNOOZE_ALERT => self.snooze_alert(call).await,
            other => Err(ModuleError::Unsupported(other.to_string())),
        }
    }
}
