//! Domain layer for dealdesk
//!
//! This crate contains the tool-layer contracts and CRM entities for the
//! deal-brokerage command center. It has no dependencies on infrastructure or
//! transport concerns.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A tool is a named, schema-described capability the calling agent may
//! invoke: query deals, buyers, tasks, contacts, outreach, alerts, analytics.
//! Tools are grouped into [`ToolModule`]s by CRM domain and scoped per
//! conversation turn through [`ToolCategory`] intents.
//!
//! ## Results
//!
//! Every invocation returns a [`ToolResult`]: `data` on success, `error` (+
//! `partial` for timeouts) on failure. Nothing at this layer ever escapes as a
//! raised error.

pub mod core;
pub mod crm;
pub mod tool;

// Re-export commonly used types
pub use core::error::DomainError;
pub use crm::{
    Activity, ActivityKind, Alert, AlertKind, AlertSeverity, AlertState, Buyer, BuyerType,
    Contact, CrmStore, Deal, DealStage, Direction, StoreError, TaskItem, TaskPriority, TaskStatus,
};
pub use tool::{
    CURRENT_USER_SENTINEL, ModuleError, ToolCall, ToolCategory, ToolDefinition, ToolModule,
    ToolParameter, ToolResult, requires_confirmation,
};
