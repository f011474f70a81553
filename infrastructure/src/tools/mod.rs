//! Tool layer: the registry plus one module per CRM capability area

pub mod alerts;
pub mod analytics;
pub mod buyers;
pub mod contacts;
pub mod deals;
pub mod outreach;
pub mod registry;
pub mod schema;
pub mod semantic;
pub mod tasks;
pub mod ui;

use std::collections::BTreeMap;
use std::sync::Arc;

use dealdesk_domain::crm::store::CrmStore;
use dealdesk_application::ports::invocation_logger::InvocationLogger;

pub use registry::{ToolRegistry, ToolRegistryBuilder, RegistryError, TOOL_TIMEOUT};
pub use schema::JsonSchemaToolConverter;

/// Bucket counts keyed by a derived label, serialized as a JSON object.
/// BTreeMap keeps the keys in stable order.
pub(crate) fn count_by<T>(
    items: &[T],
    key: impl Fn(&T) -> String,
) -> serde_json::Value {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(key(item)).or_default() += 1;
    }
    serde_json::json!(counts)
}

/// Wire every tool module to one store and produce a ready registry.
pub fn build_registry(
    store: Arc<dyn CrmStore>,
    audit: Option<Arc<dyn InvocationLogger>>,
) -> Result<ToolRegistry, RegistryError> {
    let mut builder = ToolRegistryBuilder::default()
        .register(deals::DealsModule::new(store.clone()))
        .register(buyers::BuyersModule::new(store.clone()))
        .register(contacts::ContactsModule::new(store.clone()))
        .register(tasks::TasksModule::new(store.clone()))
        .register(outreach::OutreachModule::new(store.clone()))
        .register(alerts::AlertsModule::new(store.clone()))
        .register(analytics::AnalyticsModule::new(store.clone()))
        .register(semantic::SemanticModule::new(store.clone()))
        .register(ui::UiModule::new(store));
    if let Some(audit) = audit {
        builder = builder.with_audit_logger(audit);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCrmStore;
    use dealdesk_application::ports::tool_executor::ToolExecutorPort;

    #[test]
    fn test_count_by_stable_keys() {
        let items = vec!["a", "b", "a", "c", "a"];
        let counts = count_by(&items, |s| s.to_string());
        assert_eq!(counts["a"], 3);
        assert_eq!(counts["b"], 1);
    }

    #[test]
    fn test_build_registry_covers_every_category() {
        let registry = build_registry(Arc::new(InMemoryCrmStore::seeded()), None).unwrap();
        assert_eq!(registry.catalog().len(), 28);
    }
}
