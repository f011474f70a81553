//! Overdue-task aging tiers
//!
//! Tiers drive the follow-up briefing: how hard to escalate a slipped task.
//! Thresholds are days past due.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How far past due a task has slipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeTier {
    /// Not yet due (or no due date)
    Current,
    /// 1-3 days overdue
    Recent,
    /// 4-7 days overdue
    Aging,
    /// 8-14 days overdue
    Stale,
    /// More than 14 days overdue
    Critical,
}

impl AgeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Recent => "recent",
            Self::Aging => "aging",
            Self::Stale => "stale",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AgeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a due date against today
pub fn classify(due_date: NaiveDate, today: NaiveDate) -> AgeTier {
    let days_overdue = (today - due_date).num_days();
    match days_overdue {
        i64::MIN..=0 => AgeTier::Current,
        1..=3 => AgeTier::Recent,
        4..=7 => AgeTier::Aging,
        8..=14 => AgeTier::Stale,
        _ => AgeTier::Critical,
    }
}

/// Days a task is overdue; zero when not yet due
pub fn days_overdue(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - due_date).num_days().max(0)
}
