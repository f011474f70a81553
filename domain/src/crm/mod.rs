//! CRM domain module
//!
//! Record types for the deal-brokerage CRM, the async store abstraction the
//! tool modules query, and the pure aging classification used by follow-up
//! tooling.

pub mod aging;
pub mod entities;
pub mod store;

pub use aging::AgeTier;
pub use entities::{
    Activity, ActivityKind, Alert, AlertKind, AlertSeverity, AlertState, Buyer, BuyerType,
    Contact, Deal, DealStage, Direction, TaskItem, TaskPriority, TaskStatus,
};
pub use store::{
    ActivityFilter, AlertFilter, BuyerFilter, ContactFilter, CrmStore, DealFilter, NewActivity,
    NewTask, StoreError, TaskFilter,
};
