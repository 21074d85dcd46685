//! End-to-end aggregation scenarios over the public pipeline API

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use workload_dashboard::aggregation::{aggregate, LoadStatus};
use workload_dashboard::items::{sanitize, Item, ItemKind, ItemMeta, ItemSource, ItemStatus};
use workload_dashboard::sources::{
    initial_index, FallbackResolver, InMemoryRotationStore, ItemOrigin, ItemProvider,
    RotationStore,
};
use workload_dashboard::Result;

struct StaticProvider(Vec<Item>);

#[async_trait]
impl ItemProvider for StaticProvider {
    async fn list_items(&self, _identity: &str) -> Result<Vec<Item>> {
        Ok(self.0.clone())
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

fn meeting(id: &str, title: &str, deadline: Option<DateTime<Utc>>) -> Item {
    Item {
        id: id.to_string(),
        source: ItemSource::Calendar,
        kind: ItemKind::Meeting,
        title: title.to_string(),
        content: String::new(),
        timestamp: deadline,
        deadline,
        participants: vec!["Ana <ana@corp.com>".to_string()],
        status: ItemStatus::Scheduled,
        meta: ItemMeta::default(),
    }
}

fn email(id: &str, title: &str, content: &str, status: ItemStatus) -> Item {
    Item {
        id: id.to_string(),
        source: ItemSource::Email,
        kind: ItemKind::Email,
        title: title.to_string(),
        content: content.to_string(),
        timestamp: Some(now()),
        deadline: None,
        participants: vec!["Ben <ben@corp.com>".to_string(), "me@corp.com".to_string()],
        status,
        meta: ItemMeta::default(),
    }
}

fn resolver(items: Vec<Item>) -> (FallbackResolver, Arc<InMemoryRotationStore>) {
    let rotation = Arc::new(InMemoryRotationStore::new());
    let resolver = FallbackResolver::new(Arc::new(StaticProvider(items)), rotation.clone());
    (resolver, rotation)
}

#[tokio::test]
async fn test_fresh_identity_gets_hash_selected_fixture() {
    let (resolver, rotation) = resolver(vec![]);

    let first = resolver.resolve("fresh-user@example.com").await.unwrap();
    let second = resolver.resolve("fresh-user@example.com").await.unwrap();

    let expected = initial_index("fresh-user@example.com") + 1;
    assert_eq!(first.origin, ItemOrigin::Fixture { dataset: expected });
    assert_eq!(second.origin, first.origin);
    assert_eq!(first.items, second.items);

    // A sync flips the selection
    rotation.toggle("fresh-user@example.com");
    let third = resolver.resolve("fresh-user@example.com").await.unwrap();
    assert_ne!(third.origin, first.origin);
}

#[tokio::test]
async fn test_meeting_one_day_out_scores_85() {
    let (resolver, _) = resolver(vec![meeting(
        "calendar_1",
        "Quarterly planning",
        Some(now() + Duration::days(1)),
    )]);

    let resolved = resolver.resolve("alice").await.unwrap();
    let snapshot = aggregate(&resolved, now());

    let task = snapshot.tasks.iter().find(|t| t.id == "calendar_1").unwrap();
    assert_eq!(task.priority_score, 85);
    assert_eq!(task.title, "Attend: Quarterly planning");
}

#[tokio::test]
async fn test_urgent_unread_email_scores_90() {
    let (resolver, _) = resolver(vec![email(
        "email_1",
        "Server status",
        "This is urgent, the deadline is today",
        ItemStatus::Unread,
    )]);

    let resolved = resolver.resolve("alice").await.unwrap();
    let snapshot = aggregate(&resolved, now());

    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].priority_score, 90);
}

#[tokio::test]
async fn test_four_contexts_drive_load() {
    let items = vec![
        meeting("calendar_1", "Team standup", None),
        email("email_1", "Project kickoff notes", "", ItemStatus::Read),
        email("email_2", "New message from support", "", ItemStatus::Read),
        email("email_3", "Lunch plans", "", ItemStatus::Read),
    ];
    let (resolver, _) = resolver(items);

    let resolved = resolver.resolve("alice").await.unwrap();
    let snapshot = aggregate(&resolved, now());

    assert_eq!(snapshot.contexts.len(), 4);
    assert_eq!(snapshot.cognitive_load.active_contexts, 4);
    assert!(snapshot.cognitive_load.score >= 60);
    assert!(snapshot.cognitive_load.score <= 100);
    assert!(snapshot.cognitive_load.breakdown.starts_with("4 parallel contexts"));
}

#[tokio::test]
async fn test_load_is_clamped() {
    let mut items = Vec::new();
    for i in 0..6 {
        items.push(email(
            &format!("email_{}", i),
            &format!("Project {} urgent review", i),
            "urgent",
            ItemStatus::Unread,
        ));
    }
    items.push(meeting("calendar_a", "Design sync", Some(now())));
    items.push(email("email_x", "Notification digest", "", ItemStatus::Read));
    items.push(email("email_y", "Lunch", "", ItemStatus::Unread));

    let (resolver, _) = resolver(items);
    let resolved = resolver.resolve("alice").await.unwrap();
    let snapshot = aggregate(&resolved, now());

    assert_eq!(snapshot.cognitive_load.score, 100);
    assert_eq!(snapshot.cognitive_load.status, LoadStatus::High);
}

#[tokio::test]
async fn test_aggregate_is_deterministic_and_bounded() {
    let mut items = Vec::new();
    for i in 0..12 {
        items.push(meeting(
            &format!("calendar_{}", i),
            &format!("Review meeting {}", i),
            Some(now() + Duration::days(i)),
        ));
        items.push(email(
            &format!("email_{}", i),
            &format!("Please approve item {}", i),
            "due friday",
            if i % 2 == 0 { ItemStatus::Unread } else { ItemStatus::Read },
        ));
    }
    let (resolver, _) = resolver(items);

    let resolved = resolver.resolve("bob").await.unwrap();
    let first = aggregate(&resolved, now());
    let second = aggregate(&resolved, now());

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    for task in &first.tasks {
        assert!(task.priority_score <= 100);
    }
    for context in &first.contexts {
        assert!(context.related_items.len() <= 5);
        assert!(context.tasks.len() <= 3);
    }
}

#[test]
fn test_sanitizer_bounds_content_and_hides_participants() {
    let mut long = email("email_1", "Report", &"x".repeat(600), ItemStatus::Read);
    long.participants = (0..8).map(|i| format!("person{}@corp.com", i)).collect();

    let sanitized = sanitize([&long]);
    assert!(sanitized[0].content.chars().count() <= 203);
    assert_eq!(sanitized[0].participant_count, 8);

    let json = serde_json::to_string(&sanitized).unwrap();
    assert!(!json.contains("person3@corp.com"));
    assert!(!json.contains("\"participants\""));
}
