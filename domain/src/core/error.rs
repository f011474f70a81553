//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid deal stage: {0}")]
    InvalidStage(String),

    #[error("Invalid buyer type: {0}")]
    InvalidBuyerType(String),

    #[error("Invalid task status: {0}")]
    InvalidTaskStatus(String),

    #[error("Invalid task priority: {0}")]
    InvalidTaskPriority(String),

    #[error("Invalid activity kind: {0}")]
    InvalidActivityKind(String),

    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
