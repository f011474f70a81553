//! Port definitions
//!
//! Ports define interfaces the application layer needs; adapters in the
//! infrastructure layer implement them.

pub mod invocation_logger;
pub mod tool_executor;
pub mod tool_schema;

pub use invocation_logger::{InvocationLogger, InvocationOutcome, InvocationRecord};
pub use tool_executor::ToolExecutorPort;
pub use tool_schema::ToolSchemaPort;
