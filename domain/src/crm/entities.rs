//! CRM record types
//!
//! Typed rows decoded at the data-store boundary. Tool modules work over these
//! instead of raw JSON so summaries and breakdowns stay testable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

/// Sell-side process stage of a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    Preparation,
    Marketing,
    Ioi,
    Loi,
    DueDiligence,
    Closing,
    Closed,
    Dead,
}

impl DealStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preparation => "preparation",
            Self::Marketing => "marketing",
            Self::Ioi => "ioi",
            Self::Loi => "loi",
            Self::DueDiligence => "due_diligence",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Dead => "dead",
        }
    }

    /// Stages that count toward the live pipeline
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Closed | Self::Dead)
    }
}

impl std::str::FromStr for DealStage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preparation" => Ok(Self::Preparation),
            "marketing" => Ok(Self::Marketing),
            "ioi" => Ok(Self::Ioi),
            "loi" => Ok(Self::Loi),
            "due_diligence" => Ok(Self::DueDiligence),
            "closing" => Ok(Self::Closing),
            "closed" => Ok(Self::Closed),
            "dead" => Ok(Self::Dead),
            _ => Err(DomainError::InvalidStage(s.to_string())),
        }
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sell-side engagement being brokered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub stage: DealStage,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebitda: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asking_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Acquirer archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerType {
    Strategic,
    FinancialSponsor,
    FamilyOffice,
    Individual,
}

impl BuyerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strategic => "strategic",
            Self::FinancialSponsor => "financial_sponsor",
            Self::FamilyOffice => "family_office",
            Self::Individual => "individual",
        }
    }
}

impl std::str::FromStr for BuyerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strategic" => Ok(Self::Strategic),
            "financial_sponsor" => Ok(Self::FinancialSponsor),
            "family_office" => Ok(Self::FamilyOffice),
            "individual" => Ok(Self::Individual),
            _ => Err(DomainError::InvalidBuyerType(s.to_string())),
        }
    }
}

/// A prospective acquirer in the buyer universe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buyer {
    pub id: String,
    pub name: String,
    pub buyer_type: BuyerType,
    /// Industries this buyer acquires in
    pub industries: Vec<String>,
    /// Geographies this buyer covers
    #[serde(default)]
    pub regions: Vec<String>,
    /// Lower bound of the buyer's EBITDA appetite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebitda_min: Option<f64>,
    /// Upper bound of the buyer's EBITDA appetite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebitda_max: Option<f64>,
    /// 0-100 composite of recent responsiveness
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidTaskStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(DomainError::InvalidTaskPriority(s.to_string())),
        }
    }
}

/// A follow-up item owned by a broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub assigned_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A person at a buyer (or an unattached lead)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_contacted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Email,
    Call,
    Meeting,
    Note,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Call => "call",
            Self::Meeting => "meeting",
            Self::Note => "note",
        }
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "call" => Ok(Self::Call),
            "meeting" => Ok(Self::Meeting),
            "note" => Ok(Self::Note),
            _ => Err(DomainError::InvalidActivityKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            _ => Err(DomainError::InvalidDirection(s.to_string())),
        }
    }
}

/// A logged touchpoint: email, call, meeting, or internal note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    pub kind: ActivityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    StaleDeal,
    OverdueTask,
    BuyerGoneQuiet,
    MissingFollowUp,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StaleDeal => "stale_deal",
            Self::OverdueTask => "overdue_task",
            Self::BuyerGoneQuiet => "buyer_gone_quiet",
            Self::MissingFollowUp => "missing_follow_up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    Active,
    Dismissed,
    Snoozed,
}

impl AlertState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Dismissed => "dismissed",
            Self::Snoozed => "snoozed",
        }
    }
}

/// A proactive nudge surfaced to a broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    pub state: AlertState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snoozed_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Whether this alert should currently be shown to its user.
    ///
    /// Snoozed alerts resurface once the snooze window has passed.
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        match self.state {
            AlertState::Active => true,
            AlertState::Dismissed => false,
            AlertState::Snoozed => self.snoozed_until.is_none_or(|until| until <= now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deal_stage_parse() {
        assert_eq!("due_diligence".parse::<DealStage>().unwrap(), DealStage::DueDiligence);
        assert!("escrow".parse::<DealStage>().is_err());
    }

    #[test]
    fn test_deal_stage_active() {
        assert!(DealStage::Marketing.is_active());
        assert!(DealStage::Loi.is_active());
        assert!(!DealStage::Closed.is_active());
        assert!(!DealStage::Dead.is_active());
    }

    #[test]
    fn test_task_status_open() {
        assert!(TaskStatus::Open.is_open());
        assert!(TaskStatus::InProgress.is_open());
        assert!(!TaskStatus::Completed.is_open());
        assert!(!TaskStatus::Cancelled.is_open());
    }

    #[test]
    fn test_enum_serde_snake_case() {
        assert_eq!(serde_json::to_value(DealStage::Ioi).unwrap(), "ioi");
        assert_eq!(
            serde_json::to_value(BuyerType::FinancialSponsor).unwrap(),
            "financial_sponsor"
        );
        assert_eq!(serde_json::to_value(AlertState::Snoozed).unwrap(), "snoozed");
    }

    #[test]
    fn test_alert_visibility() {
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap();
        let mut alert = Alert {
            id: "a-1".into(),
            user_id: "user-1".into(),
            deal_id: None,
            kind: AlertKind::StaleDeal,
            severity: AlertSeverity::Warning,
            message: "No activity on Project Harbor in 21 days".into(),
            state: AlertState::Active,
            snoozed_until: None,
            created_at: now,
        };

        assert!(alert.is_visible(now));

        alert.state = AlertState::Dismissed;
        assert!(!alert.is_visible(now));

        alert.state = AlertState::Snoozed;
        alert.snoozed_until = Some(now + chrono::Duration::days(3));
        assert!(!alert.is_visible(now));

        // Snooze window elapsed: alert resurfaces
        alert.snoozed_until = Some(now - chrono::Duration::hours(1));
        assert!(alert.is_visible(now));
    }
}
