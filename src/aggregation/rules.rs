//! Keyword rule tables
//!
//! Each classifier is an ordered list of (keywords, label) pairs. Matching
//! is case-insensitive substring search; the table decides precedence.

/// One row of a rule table
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<L: 'static> {
    pub keywords: &'static [&'static str],
    pub label: L,
}

impl<L> KeywordRule<L> {
    /// `text` must already be lowercase
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

/// First matching row wins, otherwise the fallback label
pub fn first_match<L: Copy>(rules: &[KeywordRule<L>], text: &str, fallback: L) -> L {
    rules
        .iter()
        .find(|rule| rule.matches(text))
        .map(|rule| rule.label)
        .unwrap_or(fallback)
}

/// Last matching row wins (later rows override earlier ones)
pub fn last_match<L: Copy>(rules: &[KeywordRule<L>], text: &str) -> Option<L> {
    rules
        .iter()
        .rev()
        .find(|rule| rule.matches(text))
        .map(|rule| rule.label)
}

/// Context buckets items are grouped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextBucket {
    Meetings,
    Projects,
    Communications,
    General,
}

impl ContextBucket {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Meetings => "Team Meetings",
            Self::Projects => "Projects",
            Self::Communications => "Communications",
            Self::General => "General Work",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Meetings => "meetings",
            Self::Projects => "projects",
            Self::Communications => "communications",
            Self::General => "general",
        }
    }
}

/// Title classifier for context derivation
pub const CONTEXT_RULES: &[KeywordRule<ContextBucket>] = &[
    KeywordRule {
        keywords: &["meeting", "sync", "standup", "review"],
        label: ContextBucket::Meetings,
    },
    KeywordRule {
        keywords: &["assignment", "paper", "project", "homework"],
        label: ContextBucket::Projects,
    },
    KeywordRule {
        keywords: &["email", "message", "notification"],
        label: ContextBucket::Communications,
    },
];

pub fn classify_context(title: &str) -> ContextBucket {
    first_match(CONTEXT_RULES, &title.to_lowercase(), ContextBucket::General)
}

/// Subject keywords that make a read email actionable
pub const ACTIONABLE_KEYWORDS: &[&str] = &[
    "action", "review", "approve", "complete", "submit", "deadline", "urgent", "important",
];

pub fn is_actionable_title(title: &str) -> bool {
    let title = title.to_lowercase();
    ACTIONABLE_KEYWORDS.iter().any(|k| title.contains(k))
}

/// Email body bumps; later rows take precedence
pub const EMAIL_CONTENT_RULES: &[KeywordRule<u8>] = &[
    KeywordRule {
        keywords: &["deadline", "due"],
        label: 80,
    },
    KeywordRule {
        keywords: &["urgent", "asap"],
        label: 90,
    },
];

pub const UNREAD_EMAIL_SCORE: u8 = 70;
pub const BASE_SCORE: u8 = 50;

/// Meeting score steps as (max days until deadline, score)
pub const MEETING_STEPS: &[(i64, u8)] = &[(1, 85), (3, 70), (7, 60)];

/// Tasks at or above this score count as urgent
pub const URGENT_THRESHOLD: u8 = 75;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_context_first_rule_wins() {
        assert_eq!(classify_context("Weekly Standup"), ContextBucket::Meetings);
        // "review" beats "project" because the meetings row comes first
        assert_eq!(classify_context("Project Review"), ContextBucket::Meetings);
        assert_eq!(classify_context("Research Paper draft"), ContextBucket::Projects);
        assert_eq!(classify_context("New message from HR"), ContextBucket::Communications);
        assert_eq!(classify_context("Lunch"), ContextBucket::General);
    }

    #[test]
    fn test_actionable_titles() {
        assert!(is_actionable_title("Please APPROVE the budget"));
        assert!(is_actionable_title("Code Review Request"));
        assert!(!is_actionable_title("Team lunch photos"));
    }

    #[test]
    fn test_email_content_later_rule_wins() {
        assert_eq!(last_match(EMAIL_CONTENT_RULES, "due friday"), Some(80));
        assert_eq!(last_match(EMAIL_CONTENT_RULES, "urgent: deadline moved"), Some(90));
        assert_eq!(last_match(EMAIL_CONTENT_RULES, "asap"), Some(90));
        assert_eq!(last_match(EMAIL_CONTENT_RULES, "hello"), None);
    }
}
