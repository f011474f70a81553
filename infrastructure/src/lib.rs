//! Infrastructure layer for dealdesk
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the tool registry and tool modules,
//! CRM store backends, configuration loading, and audit logging.

pub mod config;
pub mod logging;
pub mod store;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlInvocationLogger;
pub use store::InMemoryCrmStore;
#[cfg(feature = "rest-store")]
pub use store::RestCrmStore;
pub use tools::{
    JsonSchemaToolConverter, RegistryError, ToolRegistry, ToolRegistryBuilder, build_registry,
};
