//! CRM data-store abstraction
//!
//! The store is a reusable, read-thread-safe handle to the hosted relational
//! database. Tool modules fan out independent reads against it in parallel and
//! perform in-process filtering for anything not expressible as a single query.
//! Writes are narrow: task creation/completion, outreach logging, alert state.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use super::entities::{
    Activity, ActivityKind, Alert, AlertState, Buyer, BuyerType, Contact, Deal, DealStage,
    Direction, TaskItem, TaskPriority, TaskStatus,
};

/// Error from the data-store collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Query rejected or failed server-side
    #[error("Query failed: {0}")]
    Query(String),

    /// Transport-level failure reaching the store
    #[error("{0}")]
    Connection(String),
}

/// Equality/membership filters for deal queries
#[derive(Debug, Clone, Default)]
pub struct DealFilter {
    pub stage: Option<DealStage>,
    pub industry: Option<String>,
    pub owner_id: Option<String>,
    /// When true, exclude closed and dead deals
    pub active_only: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct BuyerFilter {
    pub buyer_type: Option<BuyerType>,
    pub industry: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub deal_id: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<TaskStatus>,
    /// Only tasks due strictly before this date
    pub due_before: Option<NaiveDate>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub buyer_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub deal_id: Option<String>,
    pub buyer_id: Option<String>,
    pub contact_id: Option<String>,
    pub kind: Option<ActivityKind>,
    pub direction: Option<Direction>,
    /// Only activities at or after this instant
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub user_id: Option<String>,
    pub state: Option<AlertState>,
    pub limit: Option<usize>,
}

/// Fields for a new task row
#[derive(Debug, Clone)]
pub struct NewTask {
    pub deal_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: String,
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
}

/// Fields for a new activity row
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub deal_id: Option<String>,
    pub buyer_id: Option<String>,
    pub contact_id: Option<String>,
    pub kind: ActivityKind,
    pub direction: Option<Direction>,
    pub subject: String,
    pub notes: Option<String>,
    pub created_by: String,
}

/// Read/write handle to the CRM data store.
///
/// Implementations must be safe to share across concurrent invocations; no
/// module may assume exclusive access.
#[async_trait]
pub trait CrmStore: Send + Sync {
    async fn deals(&self, filter: &DealFilter) -> Result<Vec<Deal>, StoreError>;
    async fn deal(&self, id: &str) -> Result<Option<Deal>, StoreError>;

    async fn buyers(&self, filter: &BuyerFilter) -> Result<Vec<Buyer>, StoreError>;
    async fn buyer(&self, id: &str) -> Result<Option<Buyer>, StoreError>;

    async fn tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskItem>, StoreError>;
    async fn insert_task(&self, task: NewTask) -> Result<TaskItem, StoreError>;
    async fn update_task_status(
        &self,
        id: &str,
        status: TaskStatus,
    ) -> Result<TaskItem, StoreError>;

    async fn contacts(&self, filter: &ContactFilter) -> Result<Vec<Contact>, StoreError>;
    async fn contact(&self, id: &str) -> Result<Option<Contact>, StoreError>;

    async fn activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>, StoreError>;
    async fn insert_activity(&self, activity: NewActivity) -> Result<Activity, StoreError>;

    async fn alerts(&self, filter: &AlertFilter) -> Result<Vec<Alert>, StoreError>;
    async fn update_alert_state(
        &self,
        id: &str,
        state: AlertState,
        snoozed_until: Option<DateTime<Utc>>,
    ) -> Result<Alert, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::NotFound("deal deal-9".into()).to_string(),
            "Not found: deal deal-9"
        );
        assert_eq!(
            StoreError::Connection("connection refused".into()).to_string(),
            "connection refused"
        );
        assert_eq!(
            StoreError::Query("column does not exist".into()).to_string(),
            "Query failed: column does not exist"
        );
    }

    #[test]
    fn test_filters_default_to_unfiltered() {
        let filter = DealFilter::default();
        assert!(filter.stage.is_none());
        assert!(!filter.active_only);
        assert!(filter.limit.is_none());
    }
}
