//! Canned fixture bundles substituted when an identity has no synced data

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregation::models::{
    CognitiveLoad, Context, Insight, InsightKind, LoadStatus, Recommendation, Severity, Task,
    Urgency,
};
use crate::items::{parse_timestamp, Item, ItemKind, ItemMeta, ItemSource, ItemStatus};

/// Number of distinct bundles an identity rotates through
pub const DATASET_COUNT: u8 = 2;

/// Fixture email previews are cut shorter than synced ones
const FIXTURE_BODY_LIMIT: usize = 200;

/// One complete canned dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureBundle {
    /// 1-based dataset number, as shown to users
    pub dataset: u8,
    pub calendar: Vec<Item>,
    pub emails: Vec<Item>,
    pub tasks: Vec<Task>,
    pub contexts: Vec<Context>,
    pub cognitive_load: CognitiveLoad,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
}

struct EmailSeed {
    subject: &'static str,
    from: &'static str,
    date: &'static str,
    body: &'static str,
    read: bool,
    labels: &'static [&'static str],
}

struct EventSeed {
    title: &'static str,
    start: &'static str,
    end: &'static str,
    description: &'static str,
    location: &'static str,
    attendees: &'static [&'static str],
}

struct TaskSeed {
    title: &'static str,
    deadline: (i32, u32, u32),
    score: u8,
    status: ItemStatus,
    explanation: &'static str,
}

struct ContextSeed {
    name: &'static str,
    urgency: Urgency,
    deadline: Option<(i32, u32, u32)>,
    /// 1-based email numbers
    emails: &'static [usize],
    tasks: &'static [&'static str],
}

struct LoadSeed {
    score: u8,
    active_contexts: usize,
    urgent_tasks: usize,
    switches: u32,
}

struct InsightSeed {
    kind: InsightKind,
    severity: Severity,
    message: &'static str,
}

struct BundleSeed {
    task_context: &'static str,
    emails: [EmailSeed; 3],
    events: [EventSeed; 2],
    tasks: [TaskSeed; 3],
    contexts: [ContextSeed; 2],
    load: LoadSeed,
    /// (switching insight, proximity insight); the proximity one lists the first task
    insights: [InsightSeed; 2],
    recommendations: [(&'static str, &'static str, &'static str); 2],
}

static ENGINEERING: BundleSeed = BundleSeed {
    task_context: "Engineering Sprint",
    emails: [
        EmailSeed {
            subject: "Code Review Request - Payment API",
            from: "tech-lead@company.com",
            date: "2026-01-08T10:00:00Z",
            body: "Please review the payment API implementation before deployment.",
            read: false,
            labels: &["IMPORTANT", "WORK"],
        },
        EmailSeed {
            subject: "Sprint Planning Meeting Tomorrow",
            from: "scrum-master@company.com",
            date: "2026-01-08T09:30:00Z",
            body: "Sprint planning session scheduled for tomorrow at 2 PM.",
            read: true,
            labels: &["WORK"],
        },
        EmailSeed {
            subject: "Database Migration Status Update",
            from: "devops@company.com",
            date: "2026-01-08T08:15:00Z",
            body: "Database migration completed successfully. All systems operational.",
            read: false,
            labels: &["IMPORTANT"],
        },
    ],
    events: [
        EventSeed {
            title: "Engineering Standup",
            start: "2026-01-09T09:00:00Z",
            end: "2026-01-09T09:30:00Z",
            description: "Daily engineering team standup meeting",
            location: "Conference Room A",
            attendees: &["team@company.com"],
        },
        EventSeed {
            title: "API Architecture Review",
            start: "2026-01-10T14:00:00Z",
            end: "2026-01-10T15:30:00Z",
            description: "Review new API architecture design",
            location: "Zoom",
            attendees: &["architect@company.com", "tech-lead@company.com"],
        },
    ],
    tasks: [
        TaskSeed {
            title: "Complete Payment API Integration",
            deadline: (2026, 1, 10),
            score: 88,
            status: ItemStatus::InProgress,
            explanation: "High priority - blocking deployment",
        },
        TaskSeed {
            title: "Review Database Migration Plan",
            deadline: (2026, 1, 9),
            score: 75,
            status: ItemStatus::NotStarted,
            explanation: "Due before next migration",
        },
        TaskSeed {
            title: "Update API Documentation",
            deadline: (2026, 1, 12),
            score: 65,
            status: ItemStatus::NotStarted,
            explanation: "Documentation update needed",
        },
    ],
    contexts: [
        ContextSeed {
            name: "Engineering Sprint",
            urgency: Urgency::High,
            deadline: Some((2026, 1, 12)),
            emails: &[1, 2],
            tasks: &["Complete Payment API Integration", "Review Database Migration Plan"],
        },
        ContextSeed {
            name: "Code Reviews",
            urgency: Urgency::Medium,
            deadline: None,
            emails: &[1],
            tasks: &["Code Review Request - Payment API"],
        },
    ],
    load: LoadSeed {
        score: 82,
        active_contexts: 2,
        urgent_tasks: 2,
        switches: 8,
    },
    insights: [
        InsightSeed {
            kind: InsightKind::ContextSwitching,
            severity: Severity::High,
            message: "You switched between contexts 8 times today, losing ~2.5 hours of focus time",
        },
        InsightSeed {
            kind: InsightKind::DeadlineProximity,
            severity: Severity::Medium,
            message: "1 urgent task(s) require immediate attention.",
        },
    ],
    recommendations: [
        (
            "Block 9-11 AM tomorrow for Payment API Integration only",
            "Deadline tomorrow + high switching detected",
            "Complete integration in single focus session",
        ),
        (
            "Batch code reviews together",
            "Reduce cognitive load from 82 to ~60",
            "Lower stress and finish urgent work first",
        ),
    ],
};

static DESIGN: BundleSeed = BundleSeed {
    task_context: "Q1 Campaign",
    emails: [
        EmailSeed {
            subject: "Brand Identity Design Review",
            from: "design-director@company.com",
            date: "2026-01-08T11:00:00Z",
            body: "Please review the new brand identity designs for the Q1 campaign.",
            read: false,
            labels: &["IMPORTANT", "WORK"],
        },
        EmailSeed {
            subject: "Marketing Campaign Launch Meeting",
            from: "marketing-manager@company.com",
            date: "2026-01-08T10:15:00Z",
            body: "Campaign launch meeting scheduled for next week.",
            read: true,
            labels: &["WORK"],
        },
        EmailSeed {
            subject: "Social Media Content Approval",
            from: "social-media@company.com",
            date: "2026-01-08T09:00:00Z",
            body: "Pending approval for this week's social media content.",
            read: false,
            labels: &["IMPORTANT"],
        },
    ],
    events: [
        EventSeed {
            title: "Design Team Sync",
            start: "2026-01-09T10:00:00Z",
            end: "2026-01-09T10:45:00Z",
            description: "Weekly design team synchronization meeting",
            location: "Design Studio",
            attendees: &["design-team@company.com"],
        },
        EventSeed {
            title: "Q1 Campaign Strategy Review",
            start: "2026-01-11T13:00:00Z",
            end: "2026-01-11T14:30:00Z",
            description: "Review Q1 marketing campaign strategy",
            location: "Conference Room B",
            attendees: &["marketing@company.com", "design-director@company.com"],
        },
    ],
    tasks: [
        TaskSeed {
            title: "Finalize Brand Identity Designs",
            deadline: (2026, 1, 11),
            score: 92,
            status: ItemStatus::InProgress,
            explanation: "Critical - needed for campaign launch",
        },
        TaskSeed {
            title: "Approve Social Media Content",
            deadline: (2026, 1, 9),
            score: 78,
            status: ItemStatus::NotStarted,
            explanation: "Content approval needed before publishing",
        },
        TaskSeed {
            title: "Create Campaign Presentation",
            deadline: (2026, 1, 13),
            score: 70,
            status: ItemStatus::NotStarted,
            explanation: "Presentation for stakeholders",
        },
    ],
    contexts: [
        ContextSeed {
            name: "Q1 Campaign",
            urgency: Urgency::High,
            deadline: Some((2026, 1, 15)),
            emails: &[1, 2],
            tasks: &["Finalize Brand Identity Designs", "Approve Social Media Content"],
        },
        ContextSeed {
            name: "Design Reviews",
            urgency: Urgency::Medium,
            deadline: None,
            emails: &[1],
            tasks: &["Brand Identity Design Review"],
        },
    ],
    load: LoadSeed {
        score: 85,
        active_contexts: 2,
        urgent_tasks: 2,
        switches: 10,
    },
    insights: [
        InsightSeed {
            kind: InsightKind::ContextSwitching,
            severity: Severity::High,
            message: "You switched between contexts 10 times today, losing ~3 hours of focus time",
        },
        InsightSeed {
            kind: InsightKind::DeadlineProximity,
            severity: Severity::High,
            message: "1 urgent task(s) require immediate attention.",
        },
    ],
    recommendations: [
        (
            "Block 10 AM-12 PM tomorrow for Brand Identity work only",
            "Deadline in 3 days + high switching detected",
            "Complete designs in single focus session",
        ),
        (
            "Defer content approval to afternoon",
            "Reduce cognitive load from 85 to ~65",
            "Lower stress and finish urgent design work first",
        ),
    ],
};

fn date(ymd: (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// First eight characters of the identity, used to namespace fixture ids
fn short_key(identity: &str) -> String {
    identity.chars().take(8).collect()
}

impl FixtureBundle {
    /// Build bundle `index` (wrapped into `0..DATASET_COUNT`) for an identity
    pub fn build(index: u8, identity: &str) -> Self {
        let index = index % DATASET_COUNT;
        let seed = if index == 0 { &ENGINEERING } else { &DESIGN };
        let key = short_key(identity);
        let email_id = |n: usize| format!("email_{}_{}", key, n);

        let calendar = seed
            .events
            .iter()
            .enumerate()
            .map(|(i, event)| Item {
                id: format!("meeting_{}_{}", key, i + 1),
                source: ItemSource::Calendar,
                kind: ItemKind::Meeting,
                title: event.title.to_string(),
                content: event.description.to_string(),
                timestamp: parse_timestamp(event.start),
                deadline: parse_timestamp(event.end),
                participants: strings(event.attendees),
                status: ItemStatus::Scheduled,
                meta: ItemMeta {
                    location: Some(event.location.to_string()),
                    ..ItemMeta::default()
                },
            })
            .collect();

        let emails = seed
            .emails
            .iter()
            .enumerate()
            .map(|(i, email)| Item {
                id: email_id(i + 1),
                source: ItemSource::Email,
                kind: ItemKind::Email,
                title: email.subject.to_string(),
                content: email.body.chars().take(FIXTURE_BODY_LIMIT).collect(),
                timestamp: parse_timestamp(email.date),
                deadline: None,
                participants: vec![email.from.to_string()],
                status: if email.read { ItemStatus::Read } else { ItemStatus::Unread },
                meta: ItemMeta {
                    labels: strings(email.labels),
                    ..ItemMeta::default()
                },
            })
            .collect();

        let tasks: Vec<Task> = seed
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| Task {
                id: format!("task_{}_{}", key, i + 1),
                title: task.title.to_string(),
                context: seed.task_context.to_string(),
                deadline: date(task.deadline),
                priority_score: task.score,
                status: task.status,
                explanation: task.explanation.to_string(),
            })
            .collect();

        let contexts = seed
            .contexts
            .iter()
            .enumerate()
            .map(|(i, ctx)| Context {
                id: format!("ctx_{}_{}", key, i + 1),
                name: ctx.name.to_string(),
                urgency: ctx.urgency,
                deadline: ctx.deadline.and_then(date),
                related_items: ctx.emails.iter().map(|n| email_id(*n)).collect(),
                tasks: strings(ctx.tasks),
            })
            .collect();

        let load = &seed.load;
        let cognitive_load = CognitiveLoad {
            score: load.score,
            status: LoadStatus::from_score(load.score),
            active_contexts: load.active_contexts,
            urgent_tasks: load.urgent_tasks,
            switches: load.switches,
            breakdown: format!(
                "{} parallel contexts + {} urgent deadlines + {} switches today",
                load.active_contexts, load.urgent_tasks, load.switches
            ),
        };

        let insights = seed
            .insights
            .iter()
            .map(|insight| Insight {
                kind: insight.kind,
                severity: insight.severity,
                count: match insight.kind {
                    InsightKind::ContextSwitching => Some(load.switches),
                    InsightKind::DeadlineProximity => None,
                },
                tasks: match insight.kind {
                    InsightKind::ContextSwitching => None,
                    InsightKind::DeadlineProximity => Some(strings(&[seed.tasks[0].title])),
                },
                message: insight.message.to_string(),
            })
            .collect();

        let recommendations = seed
            .recommendations
            .iter()
            .map(|(action, reason, impact)| Recommendation {
                action: action.to_string(),
                reason: reason.to_string(),
                expected_impact: impact.to_string(),
            })
            .collect();

        Self {
            dataset: index + 1,
            calendar,
            emails,
            tasks,
            contexts,
            cognitive_load,
            insights,
            recommendations,
        }
    }

    /// Calendar events followed by emails, the order a store read produces
    pub fn items(&self) -> Vec<Item> {
        self.calendar.iter().chain(self.emails.iter()).cloned().collect()
    }

    /// Task substituted when real items yield none
    pub fn default_task(&self) -> Option<Task> {
        self.tasks.first().cloned()
    }
}
