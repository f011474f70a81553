//! Tool domain module
//!
//! Core abstractions for the command center's **tool layer** — the named,
//! schema-described capabilities an LLM agent may invoke against the CRM.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolCategory │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (exposure)   │    │ (invocation) │    │ (envelope)   │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`] — static metadata for one tool (name, description,
//!   parameter contract)
//! - [`ToolModule`] — a cohesive group of tools with one executor
//! - [`ToolCall`] — an invocation request with arguments and caller identity
//! - [`ToolResult`] — the uniform `{data?, error?, partial?}` envelope
//! - [`ToolCategory`] — curated intent → tool-subset mapping
//! - [`CURRENT_USER_SENTINEL`] — reserved argument value substituted with the
//!   caller's id before dispatch
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`ToolExecutorPort`): port trait for tool execution
//! - **Infrastructure** (`ToolRegistry` + modules): routing, timeout
//!   enforcement, CRM queries

pub mod category;
pub mod entities;
pub mod module;
pub mod value_objects;

pub use category::{CONFIRMATION_REQUIRED, ToolCategory, requires_confirmation};
pub use entities::{CURRENT_USER_SENTINEL, ToolCall, ToolDefinition, ToolParameter};
pub use module::{ModuleError, ToolModule};
pub use value_objects::{TIMEOUT_ERROR, ToolResult};
