//! Item Model: the normalised unit of calendar or email signal

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Maximum characters of free text an Item may carry
pub const CONTENT_PREVIEW_LIMIT: usize = 500;

/// Maximum participants retained per Item
pub const MAX_PARTICIPANTS: usize = 10;

/// Where an item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSource {
    Calendar,
    Email,
}

impl ItemSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Email => "email",
        }
    }
}

/// What kind of work signal an item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Meeting,
    Email,
}

/// Lifecycle state shared by items and derived tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Scheduled,
    Read,
    Unread,
    NotStarted,
    InProgress,
    Completed,
}

impl ItemStatus {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Some(Self::Scheduled),
            "read" => Some(Self::Read),
            "unread" => Some(Self::Unread),
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Source-specific auxiliary fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Anything else the provider attached (organizer, thread id, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A unit of external work signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub source: ItemSource,
    pub kind: ItemKind,
    pub title: String,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    pub participants: Vec<String>,
    pub status: ItemStatus,
    #[serde(default)]
    pub meta: ItemMeta,
}

impl Item {
    pub fn is_calendar(&self) -> bool {
        self.source == ItemSource::Calendar
    }

    pub fn is_email(&self) -> bool {
        self.source == ItemSource::Email
    }

    pub fn is_unread(&self) -> bool {
        self.status == ItemStatus::Unread
    }

    /// Normalise a leniently-decoded stored record
    pub fn from_raw(raw: RawItem) -> Self {
        let source = match raw.source.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("calendar") => ItemSource::Calendar,
            Some("email") => ItemSource::Email,
            _ => match raw.kind.as_deref() {
                Some("meeting") => ItemSource::Calendar,
                _ => ItemSource::Email,
            },
        };

        let kind = match source {
            ItemSource::Calendar => ItemKind::Meeting,
            ItemSource::Email => ItemKind::Email,
        };

        let status = raw
            .status
            .as_deref()
            .and_then(ItemStatus::parse)
            .unwrap_or(match source {
                ItemSource::Calendar => ItemStatus::Scheduled,
                ItemSource::Email => ItemStatus::Read,
            });

        let mut participants: Vec<String> = raw
            .participants
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();
        participants.truncate(MAX_PARTICIPANTS);

        Self {
            id: raw.id.unwrap_or_default(),
            source,
            kind,
            title: raw.title.unwrap_or_default(),
            content: truncate_chars(raw.content.as_deref().unwrap_or_default(), CONTENT_PREVIEW_LIMIT),
            timestamp: raw.timestamp.as_deref().and_then(parse_timestamp),
            deadline: raw.deadline.as_deref().and_then(parse_timestamp),
            participants,
            status,
            meta: raw.meta.unwrap_or_default(),
        }
    }
}

/// Stored record shape; every field is optional so bad documents degrade instead of failing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub meta: Option<ItemMeta>,
}

/// Parse RFC 3339, RFC 2822 (mail `Date` header) or a bare `YYYY-MM-DD`.
///
/// Anything else is treated as absent.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Truncate to at most `limit` characters (not bytes)
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
