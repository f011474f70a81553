//! Application layer for dealdesk
//!
//! This crate contains port definitions and the command-center facade the
//! agent orchestration consumes. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    invocation_logger::{InvocationLogger, InvocationOutcome, InvocationRecord},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::command_center::CommandCenter;
