//! Tool Registry
//!
//! The [`ToolRegistry`] aggregates the tool modules into one catalog and
//! implements [`ToolExecutorPort`]: name-based routing, category scoping,
//! timeout enforcement, and failure normalization.
//!
//! # Usage
//!
//! ```ignore
//! let registry = ToolRegistry::builder()
//!     .register(DealsModule::new(store.clone()))
//!     .register(AlertsModule::new(store.clone()))
//!     .build()?;
//!
//! let call = ToolCall::new("get_active_alerts")
//!     .with_arg("user_id", "CURRENT_USER")
//!     .with_caller("user-42");
//! let result = registry.execute(&call).await;
//! ```
//!
//! # Routing
//!
//! Construction flattens every module's definitions into an ordered catalog
//! (module registration order, then declaration order) and builds a
//! name → module index map, so dispatch is a single hash lookup. A duplicate
//! tool name across modules is a configuration defect and fails `build()`,
//! as does a category list naming a tool that no module declares.
//!
//! # Execution discipline
//!
//! `execute` never fails outward. The module future is raced against a fixed
//! 15-second timeout and dropped if the timer wins, so in-flight store calls
//! are torn down; the caller sees `{error: "Tool timeout (15s)", partial: true}`
//! at ~15s regardless. A module error whose message contains "timeout" also
//! reports `partial: true` — callers cannot tell the two apart, which is the
//! documented compatibility tradeoff.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;

use dealdesk_application::ports::invocation_logger::{
    InvocationLogger, InvocationOutcome, InvocationRecord,
};
use dealdesk_application::ports::tool_executor::ToolExecutorPort;
use dealdesk_domain::tool::{
    category::{ToolCategory, requires_confirmation},
    entities::{ToolCall, ToolDefinition},
    module::ToolModule,
    value_objects::ToolResult,
};

/// Hard upper bound for a single tool execution
pub const TOOL_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration defects caught at registry construction
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two modules declare the same tool name
    #[error("Duplicate tool name '{name}' declared by modules '{first}' and '{second}'")]
    DuplicateTool {
        name: String,
        first: String,
        second: String,
    },

    /// A category list references a tool no module declares
    #[error("Category {category} references unknown tool '{name}'")]
    UnknownCategoryTool { category: ToolCategory, name: String },
}

/// Builder collecting modules in registration order
#[derive(Default)]
pub struct ToolRegistryBuilder {
    modules: Vec<Arc<dyn ToolModule>>,
    audit: Option<Arc<dyn InvocationLogger>>,
}

impl ToolRegistryBuilder {
    /// Register a tool module
    pub fn register<M: ToolModule + 'static>(mut self, module: M) -> Self {
        self.modules.push(Arc::new(module));
        self
    }

    /// Register a tool module (Arc version)
    pub fn register_arc(mut self, module: Arc<dyn ToolModule>) -> Self {
        self.modules.push(module);
        self
    }

    /// Attach an invocation audit logger
    pub fn with_audit_logger(mut self, logger: Arc<dyn InvocationLogger>) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Validate and build the registry.
    ///
    /// Fails fast on duplicate tool names and on category-map drift.
    pub fn build(self) -> Result<ToolRegistry, RegistryError> {
        let mut catalog = Vec::new();
        let mut routes: HashMap<String, usize> = HashMap::new();

        for (index, module) in self.modules.iter().enumerate() {
            for definition in module.definitions() {
                if let Some(&existing) = routes.get(&definition.name) {
                    return Err(RegistryError::DuplicateTool {
                        name: definition.name.clone(),
                        first: self.modules[existing].id().to_string(),
                        second: module.id().to_string(),
                    });
                }
                routes.insert(definition.name.clone(), index);
                catalog.push(definition.clone());
            }
        }

        // Referential integrity of the curated category lists
        for category in ToolCategory::all() {
            for name in category.tool_names() {
                if !routes.contains_key(*name) {
                    return Err(RegistryError::UnknownCategoryTool {
                        category: *category,
                        name: name.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            modules = self.modules.len(),
            tools = catalog.len(),
            "Tool registry built"
        );

        Ok(ToolRegistry {
            modules: self.modules,
            catalog,
            routes,
            audit: self.audit,
        })
    }
}

/// Registry routing tool calls to the owning module
pub struct ToolRegistry {
    modules: Vec<Arc<dyn ToolModule>>,
    /// Flattened definitions, registration order then declaration order
    catalog: Vec<ToolDefinition>,
    /// Tool name -> module index
    routes: HashMap<String, usize>,
    /// Optional audit sink; logging never affects results
    audit: Option<Arc<dyn InvocationLogger>>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Identifiers of the registered modules, in registration order
    pub fn module_ids(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.id()).collect()
    }

    fn record(&self, call: &ToolCall, outcome: InvocationOutcome, error: Option<&str>, elapsed: Duration) {
        let elapsed_ms = elapsed.as_millis() as u64;
        tracing::info!(
            tool = %call.tool_name,
            elapsed_ms,
            outcome = outcome.as_str(),
            "Tool invocation"
        );
        if let Some(audit) = &self.audit {
            audit.log(&InvocationRecord {
                tool_name: call.tool_name.clone(),
                caller_id: call.caller_id.clone(),
                elapsed_ms,
                outcome,
                error: error.map(str::to_string),
            });
        }
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn catalog(&self) -> &[ToolDefinition] {
        &self.catalog
    }

    fn tools_for_category(
        &self,
        category: ToolCategory,
        explicit_names: &[String],
    ) -> Vec<&ToolDefinition> {
        if !explicit_names.is_empty() {
            return self
                .catalog
                .iter()
                .filter(|t| explicit_names.iter().any(|n| n == &t.name))
                .collect();
        }
        let names = category.tool_names();
        self.catalog
            .iter()
            .filter(|t| names.contains(&t.name.as_str()))
            .collect()
    }

    fn requires_confirmation(&self, tool_name: &str) -> bool {
        requires_confirmation(tool_name)
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        let call = call.clone().resolve_caller();

        let Some(&index) = self.routes.get(&call.tool_name) else {
            let message = format!("Unknown tool: {}", call.tool_name);
            self.record(
                &call,
                InvocationOutcome::UnknownTool,
                Some(&message),
                start.elapsed(),
            );
            return ToolResult::error(message);
        };
        let module = &self.modules[index];

        match tokio::time::timeout(TOOL_TIMEOUT, module.execute(&call)).await {
            Err(_elapsed) => {
                // The module future is dropped here; in-flight store calls
                // are torn down with it.
                self.record(&call, InvocationOutcome::Timeout, None, start.elapsed());
                ToolResult::timed_out()
            }
            Ok(Ok(data)) => {
                self.record(&call, InvocationOutcome::Ok, None, start.elapsed());
                ToolResult::ok(data)
            }
            Ok(Err(e)) => {
                let message = e.to_string();
                let partial = message.contains("timeout");
                self.record(
                    &call,
                    InvocationOutcome::Error,
                    Some(&message),
                    start.elapsed(),
                );
                ToolResult::error(message).with_partial(partial)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealdesk_domain::crm::store::StoreError;
    use dealdesk_domain::tool::entities::CURRENT_USER_SENTINEL;
    use dealdesk_domain::tool::module::ModuleError;
    use dealdesk_domain::tool::value_objects::TIMEOUT_ERROR;
    use serde_json::json;
    use std::sync::Mutex;

    /// Module covering the whole catalog so category integrity checks pass
    struct CatalogModule {
        definitions: Vec<ToolDefinition>,
    }

    impl CatalogModule {
        fn full() -> Self {
            let mut names: Vec<&str> = Vec::new();
            for category in ToolCategory::all() {
                for name in category.tool_names() {
                    if !names.contains(name) {
                        names.push(name);
                    }
                }
            }
            Self {
                definitions: names
                    .into_iter()
                    .map(|n| ToolDefinition::new(n, "test tool"))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl ToolModule for CatalogModule {
        fn id(&self) -> &str {
            "catalog"
        }

        fn definitions(&self) -> &[ToolDefinition] {
            &self.definitions
        }

        async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
            Ok(json!({ "tool": call.tool_name }))
        }
    }

    /// Single-tool module with scripted behavior
    struct ScriptedModule {
        id: String,
        definitions: Vec<ToolDefinition>,
        behavior: Behavior,
        seen_args: Mutex<Option<HashMap<String, serde_json::Value>>>,
    }

    enum Behavior {
        Echo,
        Fail(String),
        StoreFail(String),
        Hang,
    }

    impl ScriptedModule {
        fn new(id: &str, tool: &str, behavior: Behavior) -> Self {
            Self {
                id: id.to_string(),
                definitions: vec![ToolDefinition::new(tool, "scripted")],
                behavior,
                seen_args: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ToolModule for ScriptedModule {
        fn id(&self) -> &str {
            &self.id
        }

        fn definitions(&self) -> &[ToolDefinition] {
            &self.definitions
        }

        async fn execute(&self, call: &ToolCall) -> Result<serde_json::Value, ModuleError> {
            *self.seen_args.lock().unwrap() = Some(call.arguments.clone());
            match &self.behavior {
                Behavior::Echo => Ok(json!({ "args": call.arguments })),
                Behavior::Fail(msg) => Err(ModuleError::InvalidArgument(msg.clone())),
                Behavior::StoreFail(msg) => {
                    Err(ModuleError::Store(StoreError::Connection(msg.clone())))
                }
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(json!(null))
                }
            }
        }
    }

    fn full_registry() -> ToolRegistry {
        ToolRegistry::builder()
            .register(CatalogModule::full())
            .build()
            .unwrap()
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let registry = full_registry();
        let mut names: Vec<&str> = registry.catalog().iter().map(|t| t.name.as_str()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_duplicate_tool_fails_build() {
        let result = ToolRegistry::builder()
            .register(CatalogModule::full())
            .register(ScriptedModule::new("dup", "list_deals", Behavior::Echo))
            .build();

        match result {
            Err(RegistryError::DuplicateTool { name, first, second }) => {
                assert_eq!(name, "list_deals");
                assert_eq!(first, "catalog");
                assert_eq!(second, "dup");
            }
            _ => panic!("expected duplicate tool error"),
        }
    }

    #[test]
    fn test_category_integrity_fails_build() {
        // A registry missing most of the catalog violates the curated lists
        let result = ToolRegistry::builder()
            .register(ScriptedModule::new("lonely", "only_tool", Behavior::Echo))
            .build();

        assert!(matches!(
            result,
            Err(RegistryError::UnknownCategoryTool { .. })
        ));
    }

    #[test]
    fn test_tools_for_category_general_fallback() {
        let registry = full_registry();

        let general = registry.tools_for_category(ToolCategory::General, &[]);
        assert!(!general.is_empty());

        let fallback =
            registry.tools_for_category(ToolCategory::parse("nonexistent-category-xyz"), &[]);
        let general_names: Vec<_> = general.iter().map(|t| &t.name).collect();
        let fallback_names: Vec<_> = fallback.iter().map(|t| &t.name).collect();
        assert_eq!(general_names, fallback_names);
    }

    #[test]
    fn test_tools_for_category_explicit_names_win() {
        let registry = full_registry();

        let tools = registry.tools_for_category(
            ToolCategory::UiAction,
            &["get_pipeline_analytics".to_string()],
        );
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "get_pipeline_analytics");
    }

    #[test]
    fn test_tools_for_category_drops_unknown_names() {
        let registry = full_registry();

        let tools = registry.tools_for_category(
            ToolCategory::General,
            &["list_deals".to_string(), "no_such_tool".to_string()],
        );
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "list_deals");
    }

    #[test]
    fn test_explicit_names_keep_catalog_order() {
        let registry = full_registry();
        let catalog_order: Vec<String> = registry
            .catalog()
            .iter()
            .map(|t| t.name.clone())
            .collect();

        // Request in reverse catalog order; result must follow the catalog
        let request = vec![catalog_order[3].clone(), catalog_order[0].clone()];
        let tools = registry.tools_for_category(ToolCategory::General, &request);
        assert_eq!(tools[0].name, catalog_order[0]);
        assert_eq!(tools[1].name, catalog_order[3]);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = full_registry();
        let call = ToolCall::new("does_not_exist").with_caller("user-1");
        let result = registry.execute(&call).await;

        assert!(!result.is_success());
        assert_eq!(
            result.error_message(),
            Some("Unknown tool: does_not_exist")
        );
        assert!(!result.is_partial());
    }

    #[tokio::test]
    async fn test_execute_resolves_sentinel_before_dispatch() {
        let module = Arc::new(ScriptedModule::new("echo", "only_tool", Behavior::Echo));
        // The full catalog keeps the category lists satisfied; the scripted
        // module adds the tool under test.
        let registry = ToolRegistry::builder()
            .register(CatalogModule::full())
            .register_arc(module.clone() as Arc<dyn ToolModule>)
            .build()
            .unwrap();

        let call = ToolCall::new("only_tool")
            .with_arg("foo", CURRENT_USER_SENTINEL)
            .with_arg("bar", 1)
            .with_caller("user-42");
        let result = registry.execute(&call).await;
        assert!(result.is_success());

        let seen = module.seen_args.lock().unwrap().clone().unwrap();
        assert_eq!(seen["foo"], json!("user-42"));
        assert_eq!(seen["bar"], json!(1));
    }

    #[tokio::test]
    async fn test_execute_module_error_is_not_partial() {
        let registry = ToolRegistry::builder()
            .register(CatalogModule::full())
            .register(ScriptedModule::new(
                "failing",
                "only_tool",
                Behavior::StoreFail("connection refused".into()),
            ))
            .build()
            .unwrap();

        let result = registry.execute(&ToolCall::new("only_tool")).await;
        assert_eq!(result.error_message(), Some("connection refused"));
        assert!(!result.is_partial());
    }

    #[tokio::test]
    async fn test_execute_module_timeout_message_is_partial() {
        let registry = ToolRegistry::builder()
            .register(CatalogModule::full())
            .register(ScriptedModule::new(
                "failing",
                "only_tool",
                Behavior::Fail("upstream query timeout after 5s".into()),
            ))
            .build()
            .unwrap();

        let result = registry.execute(&ToolCall::new("only_tool")).await;
        assert!(result.error_message().unwrap().contains("timeout"));
        assert!(result.is_partial());
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_times_out_at_fifteen_seconds() {
        let registry = ToolRegistry::builder()
            .register(CatalogModule::full())
            .register(ScriptedModule::new("slow", "only_tool", Behavior::Hang))
            .build()
            .unwrap();

        let started = tokio::time::Instant::now();
        let result = registry.execute(&ToolCall::new("only_tool")).await;
        let waited = started.elapsed();

        assert_eq!(result.error_message(), Some(TIMEOUT_ERROR));
        assert!(result.is_partial());
        assert!(waited >= TOOL_TIMEOUT);
        assert!(waited < TOOL_TIMEOUT + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_concurrent_executions_are_independent() {
        let registry = Arc::new(full_registry());

        let a = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.execute(&ToolCall::new("list_deals")).await })
        };
        let b = {
            let registry = registry.clone();
            tokio::spawn(
                async move { registry.execute(&ToolCall::new("search_buyers")).await },
            )
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(a.data().unwrap()["tool"], "list_deals");
        assert_eq!(b.data().unwrap()["tool"], "search_buyers");
    }

    #[test]
    fn test_requires_confirmation_matches_policy() {
        let registry = full_registry();
        assert!(registry.requires_confirmation("dismiss_alert"));
        assert!(!registry.requires_confirmation("list_deals"));
    }
}
