//! Task derivation and priority scoring

use chrono::{DateTime, Utc};

use super::models::Task;
use super::rules::{
    is_actionable_title, last_match, BASE_SCORE, EMAIL_CONTENT_RULES, MEETING_STEPS,
    UNREAD_EMAIL_SCORE,
};
use crate::items::{Item, ItemKind, ItemSource, ItemStatus};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days from `now` until `deadline`, rounded down (negative once passed)
pub fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (deadline - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Stepped meeting score by proximity of the meeting end
pub fn meeting_score(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u8 {
    let Some(deadline) = deadline else {
        return BASE_SCORE;
    };

    let days = days_until(deadline, now);
    MEETING_STEPS
        .iter()
        .find(|(max_days, _)| days <= *max_days)
        .map(|(_, score)| *score)
        .unwrap_or(BASE_SCORE)
}

/// Score for an email task, 70 when unread and bumped by body keywords
pub fn email_score(item: &Item) -> u8 {
    let base = if item.is_unread() { UNREAD_EMAIL_SCORE } else { BASE_SCORE };
    last_match(EMAIL_CONTENT_RULES, &item.content.to_lowercase()).unwrap_or(base)
}

fn clamp_score(score: u8) -> u8 {
    score.min(100)
}

fn meeting_task(item: &Item, now: DateTime<Utc>) -> Task {
    let explanation = match item.deadline.map(|d| days_until(d, now)) {
        None => "Scheduled meeting with no end time".to_string(),
        Some(days) if days < 0 => "Meeting has already ended".to_string(),
        Some(0) => "Meeting happens today".to_string(),
        Some(1) => "Meeting within 1 day".to_string(),
        Some(days) => format!("Meeting in {} days", days),
    };

    Task {
        id: item.id.clone(),
        title: format!("Attend: {}", item.title),
        context: "Calendar".to_string(),
        deadline: item.deadline.map(|d| d.date_naive()),
        priority_score: clamp_score(meeting_score(item.deadline, now)),
        status: ItemStatus::NotStarted,
        explanation,
    }
}

fn email_task(item: &Item) -> Option<Task> {
    let actionable = is_actionable_title(&item.title);
    if !item.is_unread() && !actionable {
        return None;
    }

    let score = email_score(item);

    let mut reasons = Vec::new();
    if item.is_unread() {
        reasons.push("Unread email");
    }
    if actionable {
        reasons.push("action requested in subject");
    }
    match score {
        90 => reasons.push("marked urgent"),
        80 => reasons.push("mentions a deadline"),
        _ => {}
    }

    Some(Task {
        id: item.id.clone(),
        title: item.title.clone(),
        context: "Email".to_string(),
        deadline: None,
        priority_score: clamp_score(score),
        status: ItemStatus::NotStarted,
        explanation: reasons.join(" + "),
    })
}

/// Derive tasks from items, highest priority first.
///
/// Ties keep item order.
pub fn derive_tasks(items: &[Item], now: DateTime<Utc>) -> Vec<Task> {
    let mut tasks: Vec<Task> = items
        .iter()
        .filter_map(|item| match (item.source, item.kind) {
            (ItemSource::Calendar, ItemKind::Meeting) => Some(meeting_task(item, now)),
            (ItemSource::Email, _) => email_task(item),
            _ => None,
        })
        .collect();

    tasks.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemMeta;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 2, 8, 0, 0).unwrap()
    }

    fn meeting(id: &str, deadline: Option<DateTime<Utc>>) -> Item {
        Item {
            id: id.to_string(),
            source: ItemSource::Calendar,
            kind: ItemKind::Meeting,
            title: "Architecture sync".to_string(),
            content: String::new(),
            timestamp: None,
            deadline,
            participants: vec![],
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
            timestamp: None,
            deadline: None,
            participants: vec![],
            status,
            meta: ItemMeta::default(),
        }
    }

    #[test]
    fn test_meeting_score_steps() {
        let now = now();
        assert_eq!(meeting_score(Some(now + Duration::hours(20)), now), 85);
        assert_eq!(meeting_score(Some(now + Duration::days(1)), now), 85);
        assert_eq!(meeting_score(Some(now + Duration::days(3)), now), 70);
        assert_eq!(meeting_score(Some(now + Duration::days(6)), now), 60);
        assert_eq!(meeting_score(Some(now + Duration::days(7)), now), 60);
        assert_eq!(meeting_score(Some(now + Duration::days(8)), now), 50);
        assert_eq!(meeting_score(Some(now - Duration::days(2)), now), 85);
        assert_eq!(meeting_score(None, now), 50);
    }

    #[test]
    fn test_days_until_rounds_down() {
        let now = now();
        assert_eq!(days_until(now + Duration::hours(47), now), 1);
        assert_eq!(days_until(now - Duration::hours(1), now), -1);
    }

    #[test]
    fn test_meeting_task_shape() {
        let now = now();
        let tasks = derive_tasks(&[meeting("cal_1", Some(now + Duration::days(1)))], now);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Attend: Architecture sync");
        assert_eq!(tasks[0].context, "Calendar");
        assert_eq!(tasks[0].priority_score, 85);
        assert_eq!(tasks[0].deadline, Some((now + Duration::days(1)).date_naive()));
    }

    #[test]
    fn test_email_scores() {
        let unread = email("e1", "Lunch?", "", ItemStatus::Unread);
        assert_eq!(email_score(&unread), 70);

        let due = email("e2", "Submit report", "Report is due Friday", ItemStatus::Read);
        assert_eq!(email_score(&due), 80);

        let both = email("e3", "Budget", "URGENT: the deadline moved up", ItemStatus::Unread);
        assert_eq!(email_score(&both), 90);
    }

    #[test]
    fn test_read_non_actionable_email_is_skipped() {
        let read = email("e1", "Team lunch photos", "urgent", ItemStatus::Read);
        assert!(derive_tasks(&[read], now()).is_empty());
    }

    #[test]
    fn test_sorted_descending_and_stable() {
        let now = now();
        let items = vec![
            email("a", "Lunch?", "", ItemStatus::Unread),
            meeting("b", Some(now + Duration::days(10))),
            email("c", "Approve PO", "asap please", ItemStatus::Read),
            email("d", "Coffee?", "", ItemStatus::Unread),
        ];

        let ids: Vec<String> = derive_tasks(&items, now).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["c", "a", "d", "b"]);
    }
}
