//! End-to-end checks of the full tool registry wired to the seeded store:
//! dispatch, category scoping, sentinel substitution, confirmation policy,
//! and the failure envelope.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use dealdesk_application::ports::tool_executor::ToolExecutorPort;
use dealdesk_application::use_cases::command_center::CommandCenter;
use dealdesk_domain::tool::category::ToolCategory;
use dealdesk_domain::tool::entities::{CURRENT_USER_SENTINEL, ToolCall};
use dealdesk_infrastructure::store::memory::InMemoryCrmStore;
use dealdesk_infrastructure::tools::{JsonSchemaToolConverter, ToolRegistry, build_registry};

fn registry() -> ToolRegistry {
    match build_registry(Arc::new(InMemoryCrmStore::seeded()), None) {
        Ok(registry) => registry,
        Err(e) => panic!("registry failed to build: {}", e),
    }
}

#[test]
fn full_catalog_has_every_category_covered() {
    let registry = registry();
    assert_eq!(registry.catalog().len(), 28);

    for category in ToolCategory::all() {
        let exposed = registry.tools_for_category(*category, &[]);
        assert!(
            !exposed.is_empty(),
            "category {} exposes no tools",
            category.as_str()
        );
        for tool in &exposed {
            assert!(registry.has_tool(&tool.name));
        }
    }
}

#[test]
fn category_scoping_falls_back_to_general() {
    let registry = registry();

    let general = registry.tools_for_category(ToolCategory::General, &[]);
    let unknown = registry.tools_for_category(ToolCategory::parse("astrology"), &[]);

    let general_names: Vec<&str> = general.iter().map(|t| t.name.as_str()).collect();
    let unknown_names: Vec<&str> = unknown.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(general_names, unknown_names);
}

#[test]
fn explicit_names_override_category() {
    let registry = registry();

    let exposed = registry.tools_for_category(
        ToolCategory::General,
        &["snooze_alert".to_string(), "no_such_tool".to_string()],
    );
    let names: Vec<&str> = exposed.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["snooze_alert"]);
}

#[tokio::test]
async fn successful_invocation_returns_data_envelope() {
    let registry = registry();

    let call = ToolCall::new("list_deals").with_arg("stage", "marketing");
    let result = registry.execute(&call).await;

    assert!(result.is_success());
    let data = result.data().cloned().unwrap_or_default();
    assert!(data["total"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn unknown_tool_yields_error_envelope() {
    let registry = registry();

    let result = registry.execute(&ToolCall::new("forecast_weather")).await;
    assert!(!result.is_success());
    assert_eq!(result.error_message(), Some("Unknown tool: forecast_weather"));
    assert!(!result.is_partial());
}

#[tokio::test]
async fn module_error_becomes_error_envelope() {
    let registry = registry();

    // Missing required argument
    let result = registry.execute(&ToolCall::new("get_deal_overview")).await;
    assert!(!result.is_success());
    assert!(result.error_message().is_some());
    assert!(!result.is_partial());
}

#[tokio::test]
async fn sentinel_resolves_against_caller() {
    let registry = registry();

    let call = ToolCall::new("get_tasks")
        .with_arg("assigned_to", CURRENT_USER_SENTINEL)
        .with_caller("user-1");
    let result = registry.execute(&call).await;

    assert!(result.is_success());
    let data = result.data().cloned().unwrap_or_default();
    let tasks = data["tasks"].as_array().cloned().unwrap_or_default();
    assert!(!tasks.is_empty());
    assert!(tasks.iter().all(|t| t["assigned_to"] == "user-1"));
}

#[tokio::test]
async fn write_tools_require_confirmation_and_run() {
    let registry = registry();

    assert!(registry.requires_confirmation("create_task"));
    assert!(registry.requires_confirmation("dismiss_alert"));
    assert!(!registry.requires_confirmation("list_deals"));

    let call = ToolCall::new("create_task")
        .with_arg("title", "Chase Cascade on the teaser")
        .with_arg("assigned_to", CURRENT_USER_SENTINEL)
        .with_caller("user-2");
    let result = registry.execute(&call).await;

    assert!(result.is_success());
    let data = result.data().cloned().unwrap_or_default();
    assert_eq!(data["task"]["assigned_to"], "user-2");
}

#[tokio::test]
async fn command_center_round_trip() {
    let registry = Arc::new(registry());
    let center = CommandCenter::new(registry, Arc::new(JsonSchemaToolConverter));

    let schemas = center.exposed_tool_schemas("UI_ACTION", &[]);
    let names: Vec<&str> = schemas
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert!(names.contains(&"open_deal_room"));

    let mut args = HashMap::new();
    args.insert("user_id".to_string(), json!(CURRENT_USER_SENTINEL));
    let result = center.invoke("get_daily_briefing", args, "user-1").await;

    assert!(result.is_success());
    let data = result.data().cloned().unwrap_or_default();
    assert_eq!(data["user_id"], "user-1");
    assert!(data["overdue_count"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn briefing_surfaces_expired_snooze() {
    let registry = registry();

    let call = ToolCall::new("get_active_alerts").with_arg("user_id", "user-1");
    let result = registry.execute(&call).await;

    let data = result.data().cloned().unwrap_or_default();
    let alerts = data["alerts"].as_array().cloned().unwrap_or_default();
    // The seed includes an alert whose snooze window has already passed
    assert!(alerts.iter().any(|a| a["state"] == "snoozed"));
}
