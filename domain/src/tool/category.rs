//! Intent categories and the confirmation policy
//!
//! Categories model conversational *intents*, not a partition of the tool
//! catalog: the same tool legitimately appears under several intents (a daily
//! briefing and a pipeline report both want pipeline analytics). The lists are
//! hand-curated; the registry checks at construction that every listed name
//! exists in the catalog, so drift after a tool rename fails fast.

use serde::{Deserialize, Serialize};

/// Conversational intent used to scope which tools the LLM sees on a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolCategory {
    DealStatus,
    FollowUp,
    BuyerSearch,
    BuyerAnalysis,
    BuyerUniverse,
    MeetingIntel,
    PipelineAnalytics,
    DailyBriefing,
    General,
    Action,
    UiAction,
    Remarketing,
    MeetingPrep,
    OutreachDraft,
    PipelineReport,
    LeadIntel,
    Engagement,
    Connection,
    Contacts,
    Industry,
    CrossDeal,
    SemanticSearch,
}

impl ToolCategory {
    /// Parse a category name. Unrecognized names fall back to `GENERAL` —
    /// the orchestration layer sends free-form intent labels and a typo must
    /// degrade to the broad default, never to an empty tool list.
    pub fn parse(name: &str) -> Self {
        match name {
            "DEAL_STATUS" => Self::DealStatus,
            "FOLLOW_UP" => Self::FollowUp,
            "BUYER_SEARCH" => Self::BuyerSearch,
            "BUYER_ANALYSIS" => Self::BuyerAnalysis,
            "BUYER_UNIVERSE" => Self::BuyerUniverse,
            "MEETING_INTEL" => Self::MeetingIntel,
            "PIPELINE_ANALYTICS" => Self::PipelineAnalytics,
            "DAILY_BRIEFING" => Self::DailyBriefing,
            "GENERAL" => Self::General,
            "ACTION" => Self::Action,
            "UI_ACTION" => Self::UiAction,
            "REMARKETING" => Self::Remarketing,
            "MEETING_PREP" => Self::MeetingPrep,
            "OUTREACH_DRAFT" => Self::OutreachDraft,
            "PIPELINE_REPORT" => Self::PipelineReport,
            "LEAD_INTEL" => Self::LeadIntel,
            "ENGAGEMENT" => Self::Engagement,
            "CONNECTION" => Self::Connection,
            "CONTACTS" => Self::Contacts,
            "INDUSTRY" => Self::Industry,
            "CROSS_DEAL" => Self::CrossDeal,
            "SEMANTIC_SEARCH" => Self::SemanticSearch,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DealStatus => "DEAL_STATUS",
            Self::FollowUp => "FOLLOW_UP",
            Self::BuyerSearch => "BUYER_SEARCH",
            Self::BuyerAnalysis => "BUYER_ANALYSIS",
            Self::BuyerUniverse => "BUYER_UNIVERSE",
            Self::MeetingIntel => "MEETING_INTEL",
            Self::PipelineAnalytics => "PIPELINE_ANALYTICS",
            Self::DailyBriefing => "DAILY_BRIEFING",
            Self::General => "GENERAL",
            Self::Action => "ACTION",
            Self::UiAction => "UI_ACTION",
            Self::Remarketing => "REMARKETING",
            Self::MeetingPrep => "MEETING_PREP",
            Self::OutreachDraft => "OUTREACH_DRAFT",
            Self::PipelineReport => "PIPELINE_REPORT",
            Self::LeadIntel => "LEAD_INTEL",
            Self::Engagement => "ENGAGEMENT",
            Self::Connection => "CONNECTION",
            Self::Contacts => "CONTACTS",
            Self::Industry => "INDUSTRY",
            Self::CrossDeal => "CROSS_DEAL",
            Self::SemanticSearch => "SEMANTIC_SEARCH",
        }
    }

    /// Every category, for enumeration and startup validation
    pub fn all() -> &'static [ToolCategory] {
        &[
            Self::DealStatus,
            Self::FollowUp,
            Self::BuyerSearch,
            Self::BuyerAnalysis,
            Self::BuyerUniverse,
            Self::MeetingIntel,
            Self::PipelineAnalytics,
            Self::DailyBriefing,
            Self::General,
            Self::Action,
            Self::UiAction,
            Self::Remarketing,
            Self::MeetingPrep,
            Self::OutreachDraft,
            Self::PipelineReport,
            Self::LeadIntel,
            Self::Engagement,
            Self::Connection,
            Self::Contacts,
            Self::Industry,
            Self::CrossDeal,
            Self::SemanticSearch,
        ]
    }

    /// Curated tool names for this intent, in exposure order
    pub fn tool_names(&self) -> &'static [&'static str] {
        match self {
            Self::DealStatus => &[
                "list_deals",
                "get_deal_overview",
                "get_deal_timeline",
                "search_deals",
            ],
            Self::FollowUp => &[
                "get_tasks",
                "get_overdue_tasks",
                "get_unanswered_outreach",
                "create_task",
                "complete_task",
            ],
            Self::BuyerSearch => &["search_buyers", "get_buyer_profile", "semantic_search"],
            Self::BuyerAnalysis => &[
                "get_buyer_profile",
                "get_outreach_activity",
                "get_engagement_stats",
                "find_connections",
            ],
            Self::BuyerUniverse => &["match_buyers_to_deal", "search_buyers"],
            Self::MeetingIntel => &[
                "get_outreach_activity",
                "get_deal_timeline",
                "get_contact_details",
            ],
            Self::PipelineAnalytics => &[
                "get_pipeline_analytics",
                "get_cross_deal_analytics",
                "list_deals",
            ],
            Self::DailyBriefing => &[
                "get_daily_briefing",
                "get_active_alerts",
                "get_overdue_tasks",
                "get_tasks",
            ],
            Self::General => &[
                "search_deals",
                "search_buyers",
                "search_contacts",
                "semantic_search",
                "get_tasks",
                "get_active_alerts",
                "get_pipeline_analytics",
                "get_daily_briefing",
            ],
            Self::Action => &[
                "create_task",
                "complete_task",
                "log_outreach",
                "dismiss_alert",
                "snooze_alert",
            ],
            Self::UiAction => &["open_deal_room", "show_buyer_list"],
            Self::Remarketing => &[
                "get_unanswered_outreach",
                "match_buyers_to_deal",
                "get_outreach_activity",
            ],
            Self::MeetingPrep => &[
                "get_buyer_profile",
                "get_deal_overview",
                "get_contact_details",
                "get_deal_timeline",
            ],
            Self::OutreachDraft => &[
                "draft_outreach_email",
                "get_buyer_profile",
                "get_unanswered_outreach",
            ],
            Self::PipelineReport => &[
                "get_pipeline_analytics",
                "list_deals",
                "get_engagement_stats",
            ],
            Self::LeadIntel => &[
                "get_buyer_profile",
                "get_contact_details",
                "search_contacts",
            ],
            Self::Engagement => &["get_engagement_stats", "get_outreach_activity"],
            Self::Connection => &["find_connections", "get_contact_details"],
            Self::Contacts => &[
                "search_contacts",
                "get_contact_details",
                "find_connections",
            ],
            Self::Industry => &[
                "get_cross_deal_analytics",
                "search_buyers",
                "search_deals",
            ],
            Self::CrossDeal => &["get_cross_deal_analytics", "match_buyers_to_deal"],
            Self::SemanticSearch => &["semantic_search"],
        }
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tools that mutate CRM state and require explicit user confirmation.
///
/// Advisory only: the registry reports membership, the orchestration layer
/// decides whether to ask the human before executing.
pub const CONFIRMATION_REQUIRED: &[&str] = &[
    "create_task",
    "complete_task",
    "log_outreach",
    "dismiss_alert",
    "snooze_alert",
];

/// Check whether a tool requires user confirmation before execution
pub fn requires_confirmation(tool_name: &str) -> bool {
    CONFIRMATION_REQUIRED.contains(&tool_name)
}
