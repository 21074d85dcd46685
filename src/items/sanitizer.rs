//! Privacy filter applied before items are shown to the language model
//!
//! Keeps identifying metadata only, truncates previews and collapses
//! participant lists to a count plus one local-part.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{truncate_chars, Item, ItemKind, ItemSource, ItemStatus};

/// Maximum preview characters passed to the model
pub const SANITIZED_CONTENT_LIMIT: usize = 200;

/// Appended when a preview was cut
pub const ELLIPSIS: &str = "...";

/// Labels that may be forwarded to the model
pub const ALLOWED_LABELS: &[&str] = &["INBOX", "IMPORTANT", "UNREAD"];

/// Privacy-safe view of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedItem {
    pub id: String,
    pub source: ItemSource,
    pub kind: ItemKind,
    pub title: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub status: ItemStatus,
    pub content: String,
    pub participant_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_participant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<SafeMeta>,
}

/// Allow-listed metadata flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_location: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_meeting_link: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl SafeMeta {
    fn is_empty(&self) -> bool {
        self.has_location.is_none() && self.has_meeting_link.is_none() && self.labels.is_none()
    }
}

/// Sanitize a sequence of items
pub fn sanitize<'a, I>(items: I) -> Vec<SanitizedItem>
where
    I: IntoIterator<Item = &'a Item>,
{
    items.into_iter().map(sanitize_item).collect()
}

/// Sanitize a single item
pub fn sanitize_item(item: &Item) -> SanitizedItem {
    SanitizedItem {
        id: item.id.clone(),
        source: item.source,
        kind: item.kind,
        title: item.title.clone(),
        timestamp: item.timestamp,
        status: item.status,
        content: preview(&item.content),
        participant_count: item.participants.len(),
        main_participant: item.participants.first().map(|p| local_part(p)),
        deadline: item.deadline,
        meta: safe_meta(item),
    }
}

fn preview(content: &str) -> String {
    if content.chars().count() > SANITIZED_CONTENT_LIMIT {
        format!("{}{}", truncate_chars(content, SANITIZED_CONTENT_LIMIT), ELLIPSIS)
    } else {
        content.to_string()
    }
}

/// `"Jane Doe <jane@corp.com>"` and `"jane@corp.com"` both become `"jane"`
fn local_part(participant: &str) -> String {
    let address = match (participant.find('<'), participant.rfind('>')) {
        (Some(start), Some(end)) if start < end => &participant[start + 1..end],
        _ => participant,
    };

    address
        .split('@')
        .next()
        .unwrap_or(address)
        .trim()
        .to_string()
}

fn safe_meta(item: &Item) -> Option<SafeMeta> {
    let meta = &item.meta;
    let mut safe = SafeMeta::default();

    if meta.location.as_deref().is_some_and(|l| !l.trim().is_empty()) {
        safe.has_location = Some(true);
    }

    if meta.meeting_link.as_deref().is_some_and(|l| !l.trim().is_empty()) {
        safe.has_meeting_link = Some(true);
    }

    let labels: Vec<String> = meta
        .labels
        .iter()
        .filter(|l| ALLOWED_LABELS.contains(&l.as_str()))
        .cloned()
        .collect();
    if !labels.is_empty() {
        safe.labels = Some(labels);
    }

    if safe.is_empty() {
        None
    } else {
        Some(safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::models::ItemMeta;

    fn email(content: &str, participants: Vec<&str>, labels: Vec<&str>) -> Item {
        Item {
            id: "email_1".to_string(),
            source: ItemSource::Email,
            kind: ItemKind::Email,
            title: "Quarterly numbers".to_string(),
            content: content.to_string(),
            timestamp: None,
            deadline: None,
            participants: participants.into_iter().map(String::from).collect(),
            status: ItemStatus::Unread,
            meta: ItemMeta {
                labels: labels.into_iter().map(String::from).collect(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_long_content_is_truncated_with_ellipsis() {
        let item = email(&"a".repeat(450), vec![], vec![]);
        let sanitized = sanitize_item(&item);
        assert_eq!(sanitized.content.chars().count(), SANITIZED_CONTENT_LIMIT + ELLIPSIS.len());
        assert!(sanitized.content.ends_with("..."));
    }

    #[test]
    fn test_short_content_is_untouched() {
        let item = email(&"b".repeat(200), vec![], vec![]);
        assert_eq!(sanitize_item(&item).content, "b".repeat(200));
    }

    #[test]
    fn test_participants_collapse_to_count_and_local_part() {
        let item = email(
            "",
            vec!["Tech Lead <tech-lead@company.com>", "dev@company.com", "ops@company.com"],
            vec![],
        );
        let sanitized = sanitize_item(&item);
        assert_eq!(sanitized.participant_count, 3);
        assert_eq!(sanitized.main_participant.as_deref(), Some("tech-lead"));

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("dev@company.com"));
        assert!(!json.contains("participants\""));
    }

    #[test]
    fn test_no_participants_omits_main_participant() {
        let sanitized = sanitize_item(&email("", vec![], vec![]));
        assert_eq!(sanitized.participant_count, 0);
        assert!(sanitized.main_participant.is_none());
    }

    #[test]
    fn test_meta_is_allow_listed() {
        let mut item = email("", vec![], vec!["IMPORTANT", "CATEGORY_PROMOTIONS", "UNREAD"]);
        item.meta.location = Some("Zoom".to_string());
        item.meta
            .extra
            .insert("thread_id".to_string(), serde_json::json!("t-123"));

        let sanitized = sanitize_item(&item);
        let meta = sanitized.meta.clone().unwrap();
        assert_eq!(meta.has_location, Some(true));
        assert_eq!(meta.has_meeting_link, None);
        assert_eq!(meta.labels.unwrap(), vec!["IMPORTANT", "UNREAD"]);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("thread_id"));
        assert!(!json.contains("Zoom"));
    }

    #[test]
    fn test_empty_meta_is_omitted() {
        let mut item = email("", vec![], vec!["SPAM"]);
        item.meta.location = Some("   ".to_string());
        assert!(sanitize_item(&item).meta.is_none());
    }
}
