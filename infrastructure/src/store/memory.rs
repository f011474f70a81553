//! In-memory CRM store.
//!
//! Backs tests and the demo configuration. Holds every collection behind one
//! async RwLock set; reads clone out so no lock is held across awaits.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::RwLock;

use dealdesk_domain::crm::entities::{
    Activity, ActivityKind, Alert, AlertKind, AlertSeverity, AlertState, Buyer, BuyerType,
    Contact, Deal, DealStage, Direction, TaskItem, TaskPriority, TaskStatus,
};
use dealdesk_domain::crm::store::{
    ActivityFilter, AlertFilter, BuyerFilter, ContactFilter, CrmStore, DealFilter, NewActivity,
    NewTask, StoreError, TaskFilter,
};

/// In-memory [`CrmStore`] implementation
pub struct InMemoryCrmStore {
    deals: RwLock<Vec<Deal>>,
    buyers: RwLock<Vec<Buyer>>,
    tasks: RwLock<Vec<TaskItem>>,
    contacts: RwLock<Vec<Contact>>,
    activities: RwLock<Vec<Activity>>,
    alerts: RwLock<Vec<Alert>>,
    next_id: AtomicU64,
}

fn apply_limit<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

impl InMemoryCrmStore {
    pub fn new() -> Self {
        Self {
            deals: RwLock::new(Vec::new()),
            buyers: RwLock::new(Vec::new()),
            tasks: RwLock::new(Vec::new()),
            contacts: RwLock::new(Vec::new()),
            activities: RwLock::new(Vec::new()),
            alerts: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// A small brokerage workspace with deals in several stages, a buyer
    /// universe, overdue tasks, and a mixed alert history. Timestamps are
    /// relative to now so aging behavior stays observable.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let today = now.date_naive();
        Self {
            deals: RwLock::new(seed_deals(now)),
            buyers: RwLock::new(seed_buyers(now)),
            tasks: RwLock::new(seed_tasks(now, today)),
            contacts: RwLock::new(seed_contacts(now)),
            activities: RwLock::new(seed_activities(now)),
            alerts: RwLock::new(seed_alerts(now)),
            next_id: AtomicU64::new(100),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", prefix, n)
    }
}

impl Default for InMemoryCrmStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CrmStore for InMemoryCrmStore {
    async fn deals(&self, filter: &DealFilter) -> Result<Vec<Deal>, StoreError> {
        let deals = self.deals.read().await;
        let matches: Vec<Deal> = deals
            .iter()
            .filter(|d| filter.stage.is_none_or(|s| d.stage == s))
            .filter(|d| {
                filter
                    .industry
                    .as_deref()
                    .is_none_or(|i| d.industry.eq_ignore_ascii_case(i))
            })
            .filter(|d| filter.owner_id.as_deref().is_none_or(|o| d.owner_id == o))
            .filter(|d| !filter.active_only || d.stage.is_active())
            .cloned()
            .collect();
        Ok(apply_limit(matches, filter.limit))
    }

    async fn deal(&self, id: &str) -> Result<Option<Deal>, StoreError> {
        Ok(self.deals.read().await.iter().find(|d| d.id == id).cloned())
    }

    async fn buyers(&self, filter: &BuyerFilter) -> Result<Vec<Buyer>, StoreError> {
        let buyers = self.buyers.read().await;
        let matches: Vec<Buyer> = buyers
            .iter()
            .filter(|b| filter.buyer_type.is_none_or(|t| b.buyer_type == t))
            .filter(|b| {
                filter.industry.as_deref().is_none_or(|i| {
                    b.industries.iter().any(|bi| bi.eq_ignore_ascii_case(i))
                })
            })
            .cloned()
            .collect();
        Ok(apply_limit(matches, filter.limit))
    }

    async fn buyer(&self, id: &str) -> Result<Option<Buyer>, StoreError> {
        Ok(self.buyers.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskItem>, StoreError> {
        let tasks = self.tasks.read().await;
        let matches: Vec<TaskItem> = tasks
            .iter()
            .filter(|t| filter.deal_id.as_deref().is_none_or(|d| t.deal_id.as_deref() == Some(d)))
            .filter(|t| filter.assigned_to.as_deref().is_none_or(|a| t.assigned_to == a))
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| {
                filter
                    .due_before
                    .is_none_or(|cutoff| t.due_date.is_some_and(|due| due < cutoff))
            })
            .cloned()
            .collect();
        Ok(apply_limit(matches, filter.limit))
    }

    async fn insert_task(&self, task: NewTask) -> Result<TaskItem, StoreError> {
        let item = TaskItem {
            id: self.next_id("task"),
            deal_id: task.deal_id,
            title: task.title,
            description: task.description,
            assigned_to: task.assigned_to,
            due_date: task.due_date,
            status: TaskStatus::Open,
            priority: task.priority,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.tasks.write().await.push(item.clone());
        Ok(item)
    }

    async fn update_task_status(
        &self,
        id: &str,
        status: TaskStatus,
    ) -> Result<TaskItem, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("task {}", id)))?;
        task.status = status;
        task.completed_at = (status == TaskStatus::Completed).then(Utc::now);
        Ok(task.clone())
    }

    async fn contacts(&self, filter: &ContactFilter) -> Result<Vec<Contact>, StoreError> {
        let contacts = self.contacts.read().await;
        let matches: Vec<Contact> = contacts
            .iter()
            .filter(|c| {
                filter
                    .buyer_id
                    .as_deref()
                    .is_none_or(|b| c.buyer_id.as_deref() == Some(b))
            })
            .cloned()
            .collect();
        Ok(apply_limit(matches, filter.limit))
    }

    async fn contact(&self, id: &str) -> Result<Option<Contact>, StoreError> {
        Ok(self.contacts.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>, StoreError> {
        let activities = self.activities.read().await;
        let mut matches: Vec<Activity> = activities
            .iter()
            .filter(|a| filter.deal_id.as_deref().is_none_or(|d| a.deal_id.as_deref() == Some(d)))
            .filter(|a| {
                filter
                    .buyer_id
                    .as_deref()
                    .is_none_or(|b| a.buyer_id.as_deref() == Some(b))
            })
            .filter(|a| {
                filter
                    .contact_id
                    .as_deref()
                    .is_none_or(|c| a.contact_id.as_deref() == Some(c))
            })
            .filter(|a| filter.kind.is_none_or(|k| a.kind == k))
            .filter(|a| filter.direction.is_none_or(|d| a.direction == Some(d)))
            .filter(|a| filter.since.is_none_or(|s| a.occurred_at >= s))
            .cloned()
            .collect();
        // Most recent first, so a limit keeps the newest entries
        matches.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(apply_limit(matches, filter.limit))
    }

    async fn insert_activity(&self, activity: NewActivity) -> Result<Activity, StoreError> {
        let item = Activity {
            id: self.next_id("act"),
            deal_id: activity.deal_id,
            buyer_id: activity.buyer_id,
            contact_id: activity.contact_id,
            kind: activity.kind,
            direction: activity.direction,
            subject: activity.subject,
            notes: activity.notes,
            occurred_at: Utc::now(),
            created_by: activity.created_by,
        };
        self.activities.write().await.push(item.clone());
        Ok(item)
    }

    async fn alerts(&self, filter: &AlertFilter) -> Result<Vec<Alert>, StoreError> {
        let alerts = self.alerts.read().await;
        let matches: Vec<Alert> = alerts
            .iter()
            .filter(|a| filter.user_id.as_deref().is_none_or(|u| a.user_id == u))
            .filter(|a| filter.state.is_none_or(|s| a.state == s))
            .cloned()
            .collect();
        Ok(apply_limit(matches, filter.limit))
    }

    async fn update_alert_state(
        &self,
        id: &str,
        state: AlertState,
        snoozed_until: Option<DateTime<Utc>>,
    ) -> Result<Alert, StoreError> {
        let mut alerts = self.alerts.write().await;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("alert {}", id)))?;
        alert.state = state;
        alert.snoozed_until = snoozed_until;
        Ok(alert.clone())
    }
}

/// Minimal deal for scoring and matching tests
pub fn demo_deal(id: &str, name: &str, industry: &str, ebitda: f64) -> Deal {
    let now = Utc::now();
    Deal {
        id: id.to_string(),
        name: name.to_string(),
        industry: industry.to_string(),
        stage: DealStage::Marketing,
        owner_id: "user-1".to_string(),
        revenue: None,
        ebitda: Some(ebitda),
        asking_price: None,
        description: None,
        created_at: now,
        updated_at: now,
    }
}

/// Minimal buyer for scoring and matching tests
pub fn demo_buyer(id: &str, name: &str, industry: &str) -> Buyer {
    Buyer {
        id: id.to_string(),
        name: name.to_string(),
        buyer_type: BuyerType::Strategic,
        industries: vec![industry.to_string()],
        regions: Vec::new(),
        ebitda_min: None,
        ebitda_max: None,
        engagement_score: None,
        notes: None,
        created_at: Utc::now(),
    }
}

fn seed_deals(now: DateTime<Utc>) -> Vec<Deal> {
    vec![
        Deal {
            id: "deal-1".to_string(),
            name: "Project Harbor".to_string(),
            industry: "software".to_string(),
            stage: DealStage::DueDiligence,
            owner_id: "user-1".to_string(),
            revenue: Some(18_000_000.0),
            ebitda: Some(4_500_000.0),
            asking_price: Some(32_000_000.0),
            description: Some("Vertical SaaS provider for marine logistics".to_string()),
            created_at: now - Duration::days(120),
            updated_at: now - Duration::days(2),
        },
        Deal {
            id: "deal-2".to_string(),
            name: "Project Atlas".to_string(),
            industry: "industrial services".to_string(),
            stage: DealStage::Marketing,
            owner_id: "user-1".to_string(),
            revenue: Some(9_500_000.0),
            ebitda: Some(2_100_000.0),
            asking_price: Some(9_000_000.0),
            description: Some("Regional equipment maintenance roll-up platform".to_string()),
            created_at: now - Duration::days(60),
            updated_at: now - Duration::days(5),
        },
        Deal {
            id: "deal-3".to_string(),
            name: "Project Copper".to_string(),
            industry: "manufacturing".to_string(),
            stage: DealStage::Marketing,
            owner_id: "user-2".to_string(),
            revenue: Some(22_000_000.0),
            ebitda: Some(3_200_000.0),
            asking_price: Some(15_000_000.0),
            description: Some("Precision components manufacturer, family owned".to_string()),
            created_at: now - Duration::days(45),
            updated_at: now - Duration::days(9),
        },
        Deal {
            id: "deal-4".to_string(),
            name: "Project Birch".to_string(),
            industry: "software".to_string(),
            stage: DealStage::Closed,
            owner_id: "user-1".to_string(),
            revenue: Some(6_000_000.0),
            ebitda: Some(1_400_000.0),
            asking_price: Some(8_500_000.0),
            description: Some("Billing software for dental practices, sold in spring".to_string()),
            created_at: now - Duration::days(400),
            updated_at: now - Duration::days(90),
        },
    ]
}

fn seed_buyers(now: DateTime<Utc>) -> Vec<Buyer> {
    vec![
        Buyer {
            id: "buyer-1".to_string(),
            name: "Meridian Capital Partners".to_string(),
            buyer_type: BuyerType::FinancialSponsor,
            industries: vec!["software".to_string(), "business services".to_string()],
            regions: vec!["north america".to_string()],
            ebitda_min: Some(2_000_000.0),
            ebitda_max: Some(10_000_000.0),
            engagement_score: Some(82),
            notes: Some(
                "Pursuing a vertical software roll-up; moves fast on diligence.".to_string(),
            ),
            created_at: now - Duration::days(300),
        },
        Buyer {
            id: "buyer-2".to_string(),
            name: "Cascade Strategic Group".to_string(),
            buyer_type: BuyerType::Strategic,
            industries: vec!["software".to_string()],
            regions: vec!["north america".to_string(), "europe".to_string()],
            ebitda_min: Some(1_000_000.0),
            ebitda_max: None,
            engagement_score: Some(55),
            notes: None,
            created_at: now - Duration::days(200),
        },
        Buyer {
            id: "buyer-3".to_string(),
            name: "Hawthorne Family Office".to_string(),
            buyer_type: BuyerType::FamilyOffice,
            industries: vec!["manufacturing".to_string()],
            regions: vec!["midwest".to_string()],
            ebitda_min: None,
            ebitda_max: None,
            engagement_score: Some(30),
            notes: Some("Prefers asset-heavy businesses with long-tenured staff.".to_string()),
            created_at: now - Duration::days(500),
        },
        Buyer {
            id: "buyer-4".to_string(),
            name: "Birchwood Industrial Holdings".to_string(),
            buyer_type: BuyerType::Strategic,
            industries: vec!["industrial services".to_string()],
            regions: vec!["north america".to_string()],
            ebitda_min: Some(1_500_000.0),
            ebitda_max: Some(5_000_000.0),
            engagement_score: None,
            notes: None,
            created_at: now - Duration::days(30),
        },
    ]
}

fn seed_tasks(now: DateTime<Utc>, today: NaiveDate) -> Vec<TaskItem> {
    vec![
        TaskItem {
            id: "task-1".to_string(),
            deal_id: Some("deal-1".to_string()),
            title: "Follow up with Meridian on diligence list".to_string(),
            description: Some("Outstanding items: customer churn detail, ARR bridge".to_string()),
            assigned_to: "user-1".to_string(),
            due_date: Some(today - Duration::days(2)),
            status: TaskStatus::Open,
            priority: TaskPriority::High,
            created_at: now - Duration::days(9),
            completed_at: None,
        },
        TaskItem {
            id: "task-2".to_string(),
            deal_id: Some("deal-2".to_string()),
            title: "Prepare Atlas marketing materials".to_string(),
            description: None,
            assigned_to: "user-1".to_string(),
            due_date: Some(today - Duration::days(10)),
            status: TaskStatus::Open,
            priority: TaskPriority::Medium,
            created_at: now - Duration::days(20),
            completed_at: None,
        },
        TaskItem {
            id: "task-3".to_string(),
            deal_id: Some("deal-1".to_string()),
            title: "Schedule management presentation debrief".to_string(),
            description: None,
            assigned_to: "user-1".to_string(),
            due_date: Some(today),
            status: TaskStatus::InProgress,
            priority: TaskPriority::Medium,
            created_at: now - Duration::days(3),
            completed_at: None,
        },
        TaskItem {
            id: "task-4".to_string(),
            deal_id: Some("deal-3".to_string()),
            title: "Request updated financials from Copper".to_string(),
            description: None,
            assigned_to: "user-2".to_string(),
            due_date: Some(today + Duration::days(5)),
            status: TaskStatus::Open,
            priority: TaskPriority::Low,
            created_at: now - Duration::days(1),
            completed_at: None,
        },
        TaskItem {
            id: "task-5".to_string(),
            deal_id: Some("deal-1".to_string()),
            title: "Send CIM to Meridian".to_string(),
            description: None,
            assigned_to: "user-1".to_string(),
            due_date: Some(today - Duration::days(14)),
            status: TaskStatus::Completed,
            priority: TaskPriority::High,
            created_at: now - Duration::days(16),
            completed_at: Some(now - Duration::days(12)),
        },
    ]
}

fn seed_contacts(now: DateTime<Utc>) -> Vec<Contact> {
    vec![
        Contact {
            id: "contact-1".to_string(),
            buyer_id: Some("buyer-1".to_string()),
            name: "Elena Vasquez".to_string(),
            title: Some("Managing Partner".to_string()),
            email: Some("elena.vasquez@meridiancp.example".to_string()),
            phone: Some("+1-312-555-0142".to_string()),
            last_contacted_at: Some(now - Duration::days(2)),
            created_at: now - Duration::days(290),
        },
        Contact {
            id: "contact-2".to_string(),
            buyer_id: Some("buyer-1".to_string()),
            name: "Daniel Ross".to_string(),
            title: Some("VP Corporate Development".to_string()),
            email: Some("daniel.ross@meridiancp.example".to_string()),
            phone: None,
            last_contacted_at: Some(now - Duration::days(8)),
            created_at: now - Duration::days(250),
        },
        Contact {
            id: "contact-3".to_string(),
            buyer_id: Some("buyer-2".to_string()),
            name: "Priya Shah".to_string(),
            title: Some("Head of M&A".to_string()),
            email: Some("priya.shah@cascadestrategic.example".to_string()),
            phone: None,
            last_contacted_at: Some(now - Duration::days(5)),
            created_at: now - Duration::days(180),
        },
        Contact {
            id: "contact-4".to_string(),
            buyer_id: None,
            name: "Tom Keller".to_string(),
            title: Some("Owner".to_string()),
            email: Some("tom@kellerandsons.example".to_string()),
            phone: Some("+1-614-555-0188".to_string()),
            last_contacted_at: None,
            created_at: now - Duration::days(40),
        },
    ]
}

fn seed_activities(now: DateTime<Utc>) -> Vec<Activity> {
    vec![
        Activity {
            id: "act-1".to_string(),
            deal_id: Some("deal-1".to_string()),
            buyer_id: Some("buyer-1".to_string()),
            contact_id: Some("contact-1".to_string()),
            kind: ActivityKind::Email,
            direction: Some(Direction::Outbound),
            subject: "CIM sent to Meridian".to_string(),
            notes: Some("Full CIM plus data room invite".to_string()),
            occurred_at: now - Duration::days(12),
            created_by: "user-1".to_string(),
        },
        Activity {
            id: "act-2".to_string(),
            deal_id: Some("deal-1".to_string()),
            buyer_id: Some("buyer-1".to_string()),
            contact_id: Some("contact-1".to_string()),
            kind: ActivityKind::Email,
            direction: Some(Direction::Inbound),
            subject: "Re: CIM - initial questions".to_string(),
            notes: Some("Asked about customer concentration and churn".to_string()),
            occurred_at: now - Duration::days(10),
            created_by: "user-1".to_string(),
        },
        Activity {
            id: "act-3".to_string(),
            deal_id: Some("deal-1".to_string()),
            buyer_id: Some("buyer-1".to_string()),
            contact_id: Some("contact-1".to_string()),
            kind: ActivityKind::Call,
            direction: Some(Direction::Outbound),
            subject: "Walked through Q2 financials".to_string(),
            notes: None,
            occurred_at: now - Duration::days(6),
            created_by: "user-1".to_string(),
        },
        Activity {
            id: "act-4".to_string(),
            deal_id: Some("deal-1".to_string()),
            buyer_id: Some("buyer-2".to_string()),
            contact_id: Some("contact-3".to_string()),
            kind: ActivityKind::Email,
            direction: Some(Direction::Outbound),
            subject: "Teaser sent to Cascade".to_string(),
            notes: None,
            occurred_at: now - Duration::days(5),
            created_by: "user-1".to_string(),
        },
        Activity {
            id: "act-5".to_string(),
            deal_id: Some("deal-2".to_string()),
            buyer_id: Some("buyer-1".to_string()),
            contact_id: Some("contact-2".to_string()),
            kind: ActivityKind::Email,
            direction: Some(Direction::Outbound),
            subject: "Atlas teaser shared".to_string(),
            notes: Some("Second live deal with Meridian".to_string()),
            occurred_at: now - Duration::days(8),
            created_by: "user-1".to_string(),
        },
        Activity {
            id: "act-6".to_string(),
            deal_id: Some("deal-1".to_string()),
            buyer_id: Some("buyer-1".to_string()),
            contact_id: Some("contact-1".to_string()),
            kind: ActivityKind::Meeting,
            direction: Some(Direction::Outbound),
            subject: "Management presentation".to_string(),
            notes: Some("Founders presented roadmap; strong buyer interest".to_string()),
            occurred_at: now - Duration::days(2),
            created_by: "user-1".to_string(),
        },
    ]
}

fn seed_alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        Alert {
            id: "alert-1".to_string(),
            user_id: "user-1".to_string(),
            deal_id: Some("deal-1".to_string()),
            kind: AlertKind::BuyerGoneQuiet,
            severity: AlertSeverity::Warning,
            message: "Cascade Strategic Group has not responded in 5 days on Project Harbor"
                .to_string(),
            state: AlertState::Active,
            snoozed_until: None,
            created_at: now - Duration::days(1),
        },
        Alert {
            id: "alert-2".to_string(),
            user_id: "user-1".to_string(),
            deal_id: Some("deal-2".to_string()),
            kind: AlertKind::OverdueTask,
            severity: AlertSeverity::Critical,
            message: "Atlas marketing materials are 10 days overdue".to_string(),
            state: AlertState::Active,
            snoozed_until: None,
            created_at: now - Duration::days(3),
        },
        Alert {
            id: "alert-3".to_string(),
            user_id: "user-1".to_string(),
            deal_id: None,
            kind: AlertKind::MissingFollowUp,
            severity: AlertSeverity::Info,
            message: "No follow-up scheduled after Keller intro call".to_string(),
            state: AlertState::Dismissed,
            snoozed_until: None,
            created_at: now - Duration::days(14),
        },
        Alert {
            id: "alert-4".to_string(),
            user_id: "user-2".to_string(),
            deal_id: Some("deal-3".to_string()),
            kind: AlertKind::StaleDeal,
            severity: AlertSeverity::Warning,
            message: "Project Copper has had no activity in 9 days".to_string(),
            state: AlertState::Active,
            snoozed_until: None,
            created_at: now - Duration::days(2),
        },
        Alert {
            id: "alert-5".to_string(),
            user_id: "user-1".to_string(),
            deal_id: Some("deal-1".to_string()),
            kind: AlertKind::StaleDeal,
            severity: AlertSeverity::Info,
            message: "Harbor data room has unanswered buyer questions".to_string(),
            state: AlertState::Snoozed,
            snoozed_until: Some(now - Duration::days(1)),
            created_at: now - Duration::days(10),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_harbor_deal_is_in_due_diligence() {
        let store = InMemoryCrmStore::seeded();

        let deal = store.deal("deal-1").await.unwrap().unwrap();
        assert_eq!(deal.name, "Project Harbor");
        assert_eq!(deal.stage, DealStage::DueDiligence);
        assert!(deal.stage.is_active());
    }

    #[tokio::test]
    async fn test_deal_filters_compose() {
        let store = InMemoryCrmStore::seeded();

        let active = store
            .deals(&DealFilter {
                owner_id: Some("user-1".to_string()),
                active_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!active.is_empty());
        assert!(active.iter().all(|d| d.owner_id == "user-1" && d.stage.is_active()));
    }

    #[tokio::test]
    async fn test_activities_newest_first_with_limit() {
        let store = InMemoryCrmStore::seeded();

        let recent = store
            .activities(&ActivityFilter {
                deal_id: Some("deal-1".to_string()),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].occurred_at >= recent[1].occurred_at);
    }

    #[tokio::test]
    async fn test_insert_task_assigns_fresh_id() {
        let store = InMemoryCrmStore::seeded();

        let created = store
            .insert_task(NewTask {
                deal_id: None,
                title: "Call Keller".to_string(),
                description: None,
                assigned_to: "user-1".to_string(),
                due_date: None,
                priority: TaskPriority::Low,
            })
            .await
            .unwrap();
        assert!(created.id.starts_with("task-"));
        assert_eq!(created.status, TaskStatus::Open);

        let existing = store.tasks(&TaskFilter::default()).await.unwrap();
        assert_eq!(existing.iter().filter(|t| t.id == created.id).count(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_alert_is_not_found() {
        let store = InMemoryCrmStore::seeded();
        let err = store
            .update_alert_state("alert-999", AlertState::Dismissed, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_due_before_filter() {
        let store = InMemoryCrmStore::seeded();
        let today = Utc::now().date_naive();

        let overdue = store
            .tasks(&TaskFilter {
                status: Some(TaskStatus::Open),
                due_before: Some(today),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!overdue.is_empty());
        assert!(overdue.iter().all(|t| t.due_date.is_some_and(|d| d < today)));
    }
}
