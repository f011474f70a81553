//! Invocation audit logging port
//!
//! Fire-and-forget: logging failures must never affect tool results, so
//! `log` is infallible and implementations swallow their own I/O errors.

use serde::Serialize;

/// Outcome classification for one tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationOutcome {
    Ok,
    Error,
    Timeout,
    UnknownTool,
}

impl InvocationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Timeout => "timeout",
            Self::UnknownTool => "unknown_tool",
        }
    }
}

/// One audit record per `execute` call
#[derive(Debug, Clone, Serialize)]
pub struct InvocationRecord {
    pub tool_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<String>,
    pub elapsed_ms: u64,
    pub outcome: InvocationOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Port for recording tool invocations
pub trait InvocationLogger: Send + Sync {
    fn log(&self, record: &InvocationRecord);
}
