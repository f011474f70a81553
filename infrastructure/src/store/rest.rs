//! REST-backed CRM store.
//!
//! Talks to a PostgREST-style API: one route per collection, equality filters
//! as query parameters, JSON rows back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use dealdesk_domain::crm::entities::{
    Activity, Alert, AlertState, Buyer, Contact, Deal, TaskItem, TaskStatus,
};
use dealdesk_domain::crm::store::{
    ActivityFilter, AlertFilter, BuyerFilter, ContactFilter, CrmStore, DealFilter, NewActivity,
    NewTask, StoreError, TaskFilter,
};

/// [`CrmStore`] backed by a remote CRM API
pub struct RestCrmStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestCrmStore {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{}/{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    async fn get_rows<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .request(reqwest::Method::GET, path)
            .query(params)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        decode_rows(response).await
    }

    async fn get_row<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        let response = self
            .request(reqwest::Method::GET, &format!("{}/{}", path, id))
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let row = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(Some(row))
    }

    async fn post_row<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, StoreError> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn patch_row<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        id: &str,
        body: &serde_json::Value,
    ) -> Result<T, StoreError> {
        let response = self
            .request(reqwest::Method::PATCH, &format!("{}/{}", path, id))
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{} {}", path, id)));
        }
        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Query(format!("HTTP {}: {}", status, body)))
}

async fn decode_rows<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Vec<T>, StoreError> {
    check_status(response)
        .await?
        .json()
        .await
        .map_err(|e| StoreError::Query(e.to_string()))
}

fn push_param(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(value) = value {
        params.push((key, value));
    }
}

#[async_trait]
impl CrmStore for RestCrmStore {
    async fn deals(&self, filter: &DealFilter) -> Result<Vec<Deal>, StoreError> {
        let mut params = Vec::new();
        push_param(&mut params, "stage", filter.stage.map(|s| s.as_str().to_string()));
        push_param(&mut params, "industry", filter.industry.clone());
        push_param(&mut params, "owner_id", filter.owner_id.clone());
        if filter.active_only {
            params.push(("active", "true".to_string()));
        }
        push_param(&mut params, "limit", filter.limit.map(|l| l.to_string()));
        self.get_rows("deals", &params).await
    }

    async fn deal(&self, id: &str) -> Result<Option<Deal>, StoreError> {
        self.get_row("deals", id).await
    }

    async fn buyers(&self, filter: &BuyerFilter) -> Result<Vec<Buyer>, StoreError> {
        let mut params = Vec::new();
        push_param(
            &mut params,
            "buyer_type",
            filter.buyer_type.map(|t| t.as_str().to_string()),
        );
        push_param(&mut params, "industry", filter.industry.clone());
        push_param(&mut params, "limit", filter.limit.map(|l| l.to_string()));
        self.get_rows("buyers", &params).await
    }

    async fn buyer(&self, id: &str) -> Result<Option<Buyer>, StoreError> {
        self.get_row("buyers", id).await
    }

    async fn tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskItem>, StoreError> {
        let mut params = Vec::new();
        push_param(&mut params, "deal_id", filter.deal_id.clone());
        push_param(&mut params, "assigned_to", filter.assigned_to.clone());
        push_param(&mut params, "status", filter.status.map(|s| s.as_str().to_string()));
        push_param(
            &mut params,
            "due_before",
            filter.due_before.map(|d| d.to_string()),
        );
        push_param(&mut params, "limit", filter.limit.map(|l| l.to_string()));
        self.get_rows("tasks", &params).await
    }

    async fn insert_task(&self, task: NewTask) -> Result<TaskItem, StoreError> {
        self.post_row(
            "tasks",
            &serde_json::json!({
                "deal_id": task.deal_id,
                "title": task.title,
                "description": task.description,
                "assigned_to": task.assigned_to,
                "due_date": task.due_date,
                "priority": task.priority,
            }),
        )
        .await
    }

    async fn update_task_status(
        &self,
        id: &str,
        status: TaskStatus,
    ) -> Result<TaskItem, StoreError> {
        self.patch_row("tasks", id, &serde_json::json!({ "status": status }))
            .await
    }

    async fn contacts(&self, filter: &ContactFilter) -> Result<Vec<Contact>, StoreError> {
        let mut params = Vec::new();
        push_param(&mut params, "buyer_id", filter.buyer_id.clone());
        push_param(&mut params, "limit", filter.limit.map(|l| l.to_string()));
        self.get_rows("contacts", &params).await
    }

    async fn contact(&self, id: &str) -> Result<Option<Contact>, StoreError> {
        self.get_row("contacts", id).await
    }

    async fn activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>, StoreError> {
        let mut params = Vec::new();
        push_param(&mut params, "deal_id", filter.deal_id.clone());
        push_param(&mut params, "buyer_id", filter.buyer_id.clone());
        push_param(&mut params, "contact_id", filter.contact_id.clone());
        push_param(&mut params, "kind", filter.kind.map(|k| k.as_str().to_string()));
        push_param(
            &mut params,
            "direction",
            filter.direction.map(|d| d.as_str().to_string()),
        );
        push_param(&mut params, "since", filter.since.map(|s| s.to_rfc3339()));
        push_param(&mut params, "limit", filter.limit.map(|l| l.to_string()));
        self.get_rows("activities", &params).await
    }

    async fn insert_activity(&self, activity: NewActivity) -> Result<Activity, StoreError> {
        self.post_row(
            "activities",
            &serde_json::json!({
                "deal_id": activity.deal_id,
                "buyer_id": activity.buyer_id,
                "contact_id": activity.contact_id,
                "kind": activity.kind,
                "direction": activity.direction,
                "subject": activity.subject,
                "notes": activity.notes,
                "created_by": activity.created_by,
            }),
        )
        .await
    }

    async fn alerts(&self, filter: &AlertFilter) -> Result<Vec<Alert>, StoreError> {
        let mut params = Vec::new();
        push_param(&mut params, "user_id", filter.user_id.clone());
        push_param(&mut params, "state", filter.state.map(|s| s.as_str().to_string()));
        push_param(&mut params, "limit", filter.limit.map(|l| l.to_string()));
        self.get_rows("alerts", &params).await
    }

    async fn update_alert_state(
        &self,
        id: &str,
        state: AlertState,
        snoozed_until: Option<DateTime<Utc>>,
    ) -> Result<Alert, StoreError> {
        self.patch_row(
            "alerts",
            id,
            &serde_json::json!({ "state": state, "snoozed_until": snoozed_until }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = RestCrmStore::new("https://crm.example/api/", None).unwrap();
        assert_eq!(store.base_url, "https://crm.example/api");
    }
}
