//! Context derivation: bucket items by title keywords

use chrono::NaiveDate;
use indexmap::IndexMap;

use super::models::{Context, Urgency};
use super::rules::{classify_context, ContextBucket};
use crate::items::Item;

/// Related item ids kept per context
pub const MAX_RELATED_ITEMS: usize = 5;

/// Task titles kept per context
pub const MAX_CONTEXT_TASKS: usize = 3;

#[derive(Default)]
struct Bucket {
    related_items: Vec<String>,
    tasks: Vec<String>,
    deadline: Option<NaiveDate>,
}

/// Group items into contexts in first-seen bucket order.
///
/// The first bucket is marked high urgency, the rest medium.
pub fn derive_contexts(items: &[Item]) -> Vec<Context> {
    let mut buckets: IndexMap<ContextBucket, Bucket> = IndexMap::new();

    for item in items {
        let bucket = buckets.entry(classify_context(&item.title)).or_default();

        if bucket.related_items.len() < MAX_RELATED_ITEMS {
            bucket.related_items.push(item.id.clone());
        }

        if bucket.tasks.len() < MAX_CONTEXT_TASKS
            && !item.title.is_empty()
            && !bucket.tasks.contains(&item.title)
        {
            bucket.tasks.push(item.title.clone());
        }

        if let Some(deadline) = item.deadline.map(|d| d.date_naive()) {
            bucket.deadline = Some(bucket.deadline.map_or(deadline, |d| d.min(deadline)));
        }
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(position, (kind, bucket))| Context {
            id: format!("ctx_{}", kind.slug()),
            name: kind.name().to_string(),
            urgency: if position == 0 { Urgency::High } else { Urgency::Medium },
            deadline: bucket.deadline,
            related_items: bucket.related_items,
            tasks: bucket.tasks,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemKind, ItemMeta, ItemSource, ItemStatus};
    use chrono::{TimeZone, Utc};

    fn item(id: &str, title: &str) -> Item {
        Item {
            id: id.to_string(),
            source: ItemSource::Email,
            kind: ItemKind::Email,
            title: title.to_string(),
            content: String::new(),
            timestamp: None,
            deadline: None,
            participants: vec![],
            status: ItemStatus::Read,
            meta: ItemMeta::default(),
        }
    }

    #[test]
    fn test_buckets_in_first_seen_order() {
        let items = vec![
            item("1", "Homework 3"),
            item("2", "Daily standup"),
            item("3", "Notification: password expiry"),
            item("4", "Group project kickoff"),
        ];

        let contexts = derive_contexts(&items);
        let names: Vec<&str> = contexts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Projects", "Team Meetings", "Communications"]);
        assert_eq!(contexts[0].urgency, Urgency::High);
        assert!(contexts[1..].iter().all(|c| c.urgency == Urgency::Medium));
        assert_eq!(contexts[0].related_items, vec!["1", "4"]);
    }

    #[test]
    fn test_bounds_and_distinct_titles() {
        let items: Vec<Item> = (0..9)
            .map(|i| {
                let id = format!("m{}", i);
                let title = if i % 2 == 0 { "Sync".to_string() } else { format!("Review {}", id) };
                item(&id, &title)
            })
            .collect();

        let contexts = derive_contexts(&items);
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].related_items.len(), MAX_RELATED_ITEMS);
        assert_eq!(contexts[0].tasks, vec!["Sync", "Review m1", "Review m3"]);
    }

    #[test]
    fn test_deadline_is_earliest_in_bucket() {
        let mut a = item("a", "Design review");
        a.deadline = Some(Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap());
        let mut b = item("b", "Budget review");
        b.deadline = Some(Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap());

        let contexts = derive_contexts(&[a, b]);
        assert_eq!(contexts[0].deadline, NaiveDate::from_ymd_opt(2026, 3, 4));
    }

    #[test]
    fn test_empty_items_yield_no_contexts() {
        assert!(derive_contexts(&[]).is_empty());
    }
}
