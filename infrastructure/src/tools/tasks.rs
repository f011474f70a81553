//! Task tools: follow-up queries, overdue aging, creation and completion

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::json;

use dealdesk_domain::crm::aging;
use dealdesk_domain::crm::entities::{TaskPriority, TaskStatus};
use dealdesk_domain::crm::store::{CrmStore, NewTask, TaskFilter};
use dealdesk_domain::tool::entities::{ToolCall, ToolDefinition, ToolParameter};
use dealdesk_domain::tool::module::{ModuleError, ToolModule};

pub const GET_TASKS: &str = "get_tasks";
pub const GET_OVERDUE_TASKS: &str = "get_overdue_tasks";
pub const CREATE_TASK: &str = "create_task";
pub const COMPLETE_TASK: &str = "complete_task";

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

fn get_tasks_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_TASKS,
        "List follow-up tasks, optionally scoped to an assignee, deal, or status. \
         Pass assigned_to=CURRENT_USER for the caller's own tasks.",
    )
    .with_parameter(ToolParameter::new("assigned_to", "Filter by assignee user id", false))
    .with_parameter(ToolParameter::new("deal_id", "Filter by deal", false))
    .with_parameter(
        ToolParameter::new("status", "Filter: open, in_progress, completed, cancelled", false),
    )
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of tasks", false).with_type("number"),
    )
}

fn get_overdue_tasks_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_OVERDUE_TASKS,
        "Open tasks past their due date, classified into aging tiers \
         (recent, aging, stale, critical). Use this for escalation summaries.",
    )
    .with_parameter(ToolParameter::new("assigned_to", "Filter by assignee user id", false))
}

fn create_task_definition() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_TASK,
        "Create a follow-up task. Requires user confirmation before execution.",
    )
    .with_parameter(ToolParameter::new("title", "Task title", true))
    .with_parameter(ToolParameter::new("description", "Longer description", false))
    .with_parameter(
        ToolParameter::new(
            "assigned_to",
            "Assignee user id. Pass CURRENT_USER to assign to the caller.",
            true,
        ),
    )
    .with_parameter(ToolParameter::new("deal_id", "Deal to attach the task to", false))
    .with_parameter(ToolParameter::new("due_date", "Due date, YYYY-MM-DD", false))
    .with_parameter(ToolParameter::new("priority", "low, medium, or high", false))
}

fn complete_task_definition() -> ToolDefinition {
    ToolDefinition::new(
        COMPLETE_TASK,
        "Mark a task completed. Requires user confirmation before execution.",
    )
    .with_parameter(ToolParameter::new("task_id", "Task identifier", true))
}

/// Tool module for follow-up tasks
pub struct TasksModule {
    store: Arc<dyn CrmStore>,
    definitions: Vec<ToolDefinition>,
}

impl TasksModule {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self {
            store,
            definitions: vec![
                get_tasks_definition(),
                get_overdue_tasks_definition(),
                create_task_definition(),
                complete_task_definition(),
            ],
        }
    }

    async fn get_tasks(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let status = call
            .get_string("status")
            .map(TaskStatus::from_str)
            .transpose()
            .map_err(|e| ModuleError::InvalidArgument(e.to_string()))?;

        let filter = TaskFilter {
            deal_id: call.get_string("deal_id").map(str::to_string),
            assigned_to: call.get_string("assigned_to").map(str::to_string),
            status,
            due_before: None,
            limit: Some(call.get_limit("limit", DEFAULT_LIMIT, MAX_LIMIT)),
        };
        let tasks = self.store.tasks(&filter).await?;

        let total = tasks.len();
        let by_status = super::count_by(&tasks, |t| t.status.as_str().to_string());
        let by_priority = super::count_by(&tasks, |t| t.priority.as_str().to_string());
        Ok(json!({
            "tasks": tasks,
            "total": total,
            "by_status": by_status,
            "by_priority": by_priority,
        }))
    }

    async fn get_overdue_tasks(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let today = Utc::now().date_naive();
        let filter = TaskFilter {
            assigned_to: call.get_string("assigned_to").map(str::to_string),
            due_before: Some(today),
            ..Default::default()
        };
        let tasks = self.store.tasks(&filter).await?;

        let mut overdue: Vec<_> = tasks
            .into_iter()
            .filter(|t| t.status.is_open())
            .filter_map(|t| {
                let due = t.due_date?;
                let tier = aging::classify(due, today);
                Some(json!({
                    "task": t,
                    "days_overdue": aging::days_overdue(due, today),
                    "age_tier": tier.as_str(),
                }))
            })
            .collect();
        overdue.sort_by_key(|entry| {
            std::cmp::Reverse(entry["days_overdue"].as_i64().unwrap_or(0))
        });

        let mut by_tier = std::collections::BTreeMap::new();
        for entry in &overdue {
            *by_tier
                .entry(entry["age_tier"].as_str().unwrap_or("current").to_string())
                .or_insert(0u64) += 1;
        }

        let total = overdue.len();
        Ok(json!({
            "overdue": overdue,
            "total": total,
            "by_tier": by_tier,
        }))
    }

    async fn create_task(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let title = call
            .require_string("title")
            .map_err(ModuleError::InvalidArgument)?;
        let assigned_to = call
            .require_string("assigned_to")
            .map_err(ModuleError::InvalidArgument)?;

        let due_date = call
            .get_string("due_date")
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|_| ModuleError::InvalidArgument(format!("Invalid date: {}", s)))
            })
            .transpose()?;
        let priority = call
            .get_string("priority")
            .map(TaskPriority::from_str)
            .transpose()
            .map_err(|e| ModuleError::InvalidArgument(e.to_string()))?
            .unwrap_or(TaskPriority::Medium);

        let task = self
            .store
            .insert_task(NewTask {
                deal_id: call.get_string("deal_id").map(str::to_string),
                title: title.to_string(),
                description: call.get_string("description").map(str::to_string),
                assigned_to: assigned_to.to_string(),
                due_date,
                priority,
            })
            .await?;

        Ok(json!({ "task": task, "created": true }))
    }

    async fn complete_task(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        let task_id = call
            .require_string("task_id")
            .map_err(ModuleError::InvalidArgument)?;

        let task = self
            .store
            .update_task_status(task_id, TaskStatus::Completed)
            .await?;

        Ok(json!({ "task": task, "completed": true }))
    }
}

#[async_trait]
impl ToolModule for TasksModule {
    fn id(&self) -> &str {
        "tasks"
    }

    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
        match call.tool_name.as_str() {
            GET_TASKS => self.get_tasks(call).await,
            GET_OVERDUE_TASKS => self.get_overdue_tasks(call).await,
            CREATE_TASK => self.create_task(call).await,
            COMPLETE_TASK => self.complete_task(call).await,
            other => Err(ModuleError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCrmStore;

    fn module() -> TasksModule {
        TasksModule::new(Arc::new(InMemoryCrmStore::seeded()))
    }

    #[tokio::test]
    async fn test_get_tasks_by_assignee() {
        let call = ToolCall::new(GET_TASKS).with_arg("assigned_to", "user-1");
        let data = module().execute(&call).await.unwrap();

        let tasks = data["tasks"].as_array().unwrap();
        assert!(!tasks.is_empty());
        assert!(tasks.iter().all(|t| t["assigned_to"] == "user-1"));
        assert!(data["by_status"].is_object());
    }

    #[tokio::test]
    async fn test_get_overdue_tasks_classifies_tiers() {
        let data = module()
            .execute(&ToolCall::new(GET_OVERDUE_TASKS))
            .await
            .unwrap();

        let overdue = data["overdue"].as_array().unwrap();
        assert!(!overdue.is_empty());
        for entry in overdue {
            assert!(entry["days_overdue"].as_i64().unwrap() >= 1);
            assert!(entry["age_tier"].is_string());
        }
        // Sorted worst-first
        let days: Vec<i64> = overdue
            .iter()
            .map(|e| e["days_overdue"].as_i64().unwrap())
            .collect();
        let mut sorted = days.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(days, sorted);
    }

    #[tokio::test]
    async fn test_create_task_with_defaults() {
        let call = ToolCall::new(CREATE_TASK)
            .with_arg("title", "Send NDA to Meridian Capital")
            .with_arg("assigned_to", "user-2")
            .with_arg("due_date", "2026-09-15");
        let data = module().execute(&call).await.unwrap();

        assert_eq!(data["created"], true);
        assert_eq!(data["task"]["priority"], "medium");
        assert_eq!(data["task"]["status"], "open");
        assert_eq!(data["task"]["due_date"], "2026-09-15");
    }

    #[tokio::test]
    async fn test_create_task_rejects_bad_date() {
        let call = ToolCall::new(CREATE_TASK)
            .with_arg("title", "x")
            .with_arg("assigned_to", "user-2")
            .with_arg("due_date", "next tuesday");
        let err = module().execute(&call).await.unwrap_err();
        assert!(matches!(err, ModuleError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_complete_task() {
        let module = module();
        let call = ToolCall::new(COMPLETE_TASK).with_arg("task_id", "task-1");
        let data = module.execute(&call).await.unwrap();

        assert_eq!(data["completed"], true);
        assert_eq!(data["task"]["status"], "completed");
    }

    #[tokio::test]
    async fn test_complete_unknown_task() {
        let call = ToolCall::new(COMPLETE_TASK).with_arg("task_id", "task-999");
        let err = module().execute(&call).await.unwrap_err();
        assert!(matches!(err, ModuleError::Store(_)));
    }
}
