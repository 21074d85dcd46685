//! Calendar and Gmail REST fetches, normalised into Items

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::GoogleError;
use crate::config::GoogleConfig;
use crate::items::{
    parse_timestamp, truncate_chars, Item, ItemKind, ItemMeta, ItemSource, ItemStatus,
    CONTENT_PREVIEW_LIMIT, MAX_PARTICIPANTS,
};

/// Gmail snippets are previews only
const SNIPPET_LIMIT: usize = 200;

/// Concurrent per-message metadata fetches
const MESSAGE_FETCH_CONCURRENCY: usize = 8;

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
    date: Option<String>,
}

impl EventTime {
    fn value(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct Attendee {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Organizer {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarEvent {
    #[serde(default)]
    id: String,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    hangout_link: Option<String>,
    html_link: Option<String>,
    organizer: Option<Organizer>,
    #[serde(default)]
    start: EventTime,
    #[serde(default)]
    end: EventTime,
    #[serde(default)]
    attendees: Vec<Attendee>,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[derive(Debug, Default, Deserialize)]
struct Payload {
    #[serde(default)]
    headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Message {
    #[serde(default)]
    id: String,
    thread_id: Option<String>,
    #[serde(default)]
    label_ids: Vec<String>,
    snippet: Option<String>,
    #[serde(default)]
    payload: Payload,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn event_to_item(event: CalendarEvent, now: DateTime<Utc>) -> Item {
    let start = event.start.value().and_then(parse_timestamp);
    let end = event.end.value().and_then(parse_timestamp);

    let mut extra = BTreeMap::new();
    if let Some(email) = event.organizer.and_then(|o| non_empty(o.email)) {
        extra.insert("organizer".to_string(), Value::String(email));
    }
    if let Some(link) = non_empty(event.html_link) {
        extra.insert("html_link".to_string(), Value::String(link));
    }
    extra.insert("calendar_id".to_string(), Value::String(event.id.clone()));

    Item {
        id: format!("calendar_{}", event.id),
        source: ItemSource::Calendar,
        kind: ItemKind::Meeting,
        title: non_empty(event.summary).unwrap_or_else(|| "No Title".to_string()),
        content: truncate_chars(event.description.as_deref().unwrap_or_default(), CONTENT_PREVIEW_LIMIT),
        timestamp: start.or(Some(now)),
        deadline: end.or(start),
        participants: event
            .attendees
            .into_iter()
            .filter_map(|a| non_empty(a.email))
            .take(MAX_PARTICIPANTS)
            .collect(),
        status: ItemStatus::Scheduled,
        meta: ItemMeta {
            location: non_empty(event.location),
            meeting_link: non_empty(event.hangout_link),
            labels: Vec::new(),
            extra,
        },
    }
}

fn message_to_item(message: Message, now: DateTime<Utc>) -> Item {
    let header = |name: &str| {
        message
            .payload
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.clone())
    };

    let mut participants: Vec<String> = header("From").into_iter().collect();
    if let Some(to) = header("To") {
        participants.extend(
            to.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from),
        );
    }
    participants.truncate(MAX_PARTICIPANTS);

    let status = if message.label_ids.iter().any(|l| l == "UNREAD") {
        ItemStatus::Unread
    } else {
        ItemStatus::Read
    };

    let mut extra = BTreeMap::new();
    if let Some(thread) = non_empty(message.thread_id.clone()) {
        extra.insert("thread_id".to_string(), Value::String(thread));
    }
    extra.insert("message_id".to_string(), Value::String(message.id.clone()));

    Item {
        id: format!("email_{}", message.id),
        source: ItemSource::Email,
        kind: ItemKind::Email,
        title: non_empty(header("Subject")).unwrap_or_else(|| "No Subject".to_string()),
        content: truncate_chars(message.snippet.as_deref().unwrap_or_default(), SNIPPET_LIMIT),
        timestamp: header("Date").as_deref().and_then(parse_timestamp).or(Some(now)),
        deadline: None,
        participants,
        status,
        meta: ItemMeta {
            location: None,
            meeting_link: None,
            labels: message.label_ids.clone(),
            extra,
        },
    }
}

/// Thin client over the Calendar v3 and Gmail v1 REST APIs
#[derive(Clone)]
pub struct GoogleApiClient {
    http: Client,
    config: GoogleConfig,
}

impl GoogleApiClient {
    pub fn new(http: Client, config: GoogleConfig) -> Self {
        Self { http, config }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: &Secret<String>,
    ) -> Result<T, GoogleError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(GoogleError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GoogleError::InvalidResponse(e.to_string()))
    }

    /// Primary-calendar events in the configured window around `now`
    pub async fn fetch_calendar(
        &self,
        token: &Secret<String>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Item>, GoogleError> {
        let url = format!("{}/calendars/primary/events", self.config.calendar_api);
        let time_min = now - Duration::days(self.config.calendar_days_back);
        let time_max = now + Duration::days(self.config.calendar_days_forward);

        let list: EventList = self
            .get_json(
                &url,
                &[
                    ("timeMin", time_min.to_rfc3339()),
                    ("timeMax", time_max.to_rfc3339()),
                    ("maxResults", self.config.calendar_max_results.to_string()),
                    ("singleEvents", "true".to_string()),
                    ("orderBy", "startTime".to_string()),
                ],
                token,
            )
            .await?;

        debug!("Fetched {} calendar events", list.items.len());
        Ok(list
            .items
            .into_iter()
            .map(|event| event_to_item(event, now))
            .collect())
    }

    /// Recent message metadata; messages that fail individually are skipped
    pub async fn fetch_gmail(
        &self,
        token: &Secret<String>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Item>, GoogleError> {
        let base = format!("{}/users/me/messages", self.config.gmail_api);
        let list: MessageList = self
            .get_json(
                &base,
                &[
                    ("maxResults", self.config.gmail_max_results.to_string()),
                    ("q", format!("newer_than:{}d", self.config.gmail_days_back)),
                ],
                token,
            )
            .await?;

        let total = list.messages.len();
        let base = base.as_str();
        let items: Vec<Item> = stream::iter(list.messages)
            .map(move |message| async move {
                let url = format!("{}/{}", base, message.id);
                let result = self
                    .get_json::<Message>(
                        &url,
                        &[
                            ("format", "metadata".to_string()),
                            ("metadataHeaders", "Subject".to_string()),
                            ("metadataHeaders", "From".to_string()),
                            ("metadataHeaders", "To".to_string()),
                            ("metadataHeaders", "Date".to_string()),
                        ],
                        token,
                    )
                    .await;
                (message.id, result)
            })
            .buffered(MESSAGE_FETCH_CONCURRENCY)
            .filter_map(move |(id, result)| async move {
                match result {
                    Ok(message) => Some(message_to_item(message, now)),
                    Err(e) => {
                        warn!("Skipping message {}: {}", id, e);
                        None
                    }
                }
            })
            .collect()
            .await;

        debug!("Fetched {}/{} email messages", items.len(), total);
        Ok(items)
    }
}
