//! System prompt assembly for the work assistant

use serde::Serialize;

use crate::aggregation::DashboardSnapshot;
use crate::items::{sanitize, Item};

/// Sanitized emails and calendar events included in the prompt, each
pub const MAX_PROMPT_ITEMS: usize = 15;

const PREAMBLE: &str = "You are an intelligent work assistant analyzing a user's digital work environment. \
You help users understand their work patterns and make better decisions.";

const EXAMPLES: &str = r#"=== EXAMPLES ===

Q: What should I focus on first?
A: Start with "Complete Payment API Integration" (priority 88, due tomorrow). It is the highest-priority task in your Engineering Sprint context and is blocking deployment.

Q: Why is my cognitive load high?
A: Your load score is 82/100: you are working across 2 parallel contexts with 2 urgent deadlines and about 8 context switches today.

Q: Who is my dentist?
A: I don't have that information in your current work data."#;

const RULES: &str = r#"=== RULES ===
1. Answer ONLY using the system data above - never invent information
2. Always cite specific context names, task titles, and metric values
3. Explain WHY something matters by referencing the data
4. Be concise and actionable (2-3 sentences max unless asked for details)
5. If asked about something not in the data, say "I don't have that information in your current work data"
6. Use natural language, avoid jargon like "context_id" - say "your Engineering Sprint project" instead"#;

fn dump<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

/// Build the full system prompt.
///
/// Sections, in order: preamble, examples, contexts, tasks, emails,
/// calendar events, cognitive load, insights, recommendations, rules.
/// Emails and events are sanitized and capped at [`MAX_PROMPT_ITEMS`].
pub fn build_system_prompt(snapshot: &DashboardSnapshot, items: &[Item]) -> String {
    let emails = sanitize(items.iter().filter(|i| i.is_email()).take(MAX_PROMPT_ITEMS));
    let events = sanitize(items.iter().filter(|i| i.is_calendar()).take(MAX_PROMPT_ITEMS));
    let load = &snapshot.cognitive_load;

    let sections = [
        PREAMBLE.to_string(),
        EXAMPLES.to_string(),
        "=== SYSTEM DATA ===".to_string(),
        format!("ACTIVE CONTEXTS:\n{}", dump(&snapshot.contexts)),
        format!("TASKS BY PRIORITY:\n{}", dump(&snapshot.tasks)),
        format!("RECENT EMAILS:\n{}", dump(&emails)),
        format!("CALENDAR EVENTS:\n{}", dump(&events)),
        format!(
            "COGNITIVE LOAD ANALYSIS:\nCurrent Score: {}/100\nStatus: {}\nContributing Factors:\n\
             - Active Contexts: {}\n- Urgent Tasks: {}\n- Recent Context Switches: {}",
            load.score,
            dump(&load.status).trim_matches('"'),
            load.active_contexts,
            load.urgent_tasks,
            load.switches
        ),
        format!("BEHAVIORAL INSIGHTS:\n{}", dump(&snapshot.insights)),
        format!("RECOMMENDATIONS:\n{}", dump(&snapshot.recommendations)),
        RULES.to_string(),
    ];

    sections.join("\n\n")
}
