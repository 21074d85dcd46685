//! Cognitive load estimate

use super::models::{CognitiveLoad, Context, LoadStatus, Task};
use super::rules::URGENT_THRESHOLD;
use crate::items::Item;

const CONTEXT_WEIGHT: u32 = 15;
const URGENT_TASK_WEIGHT: u32 = 10;
const MEETING_WEIGHT: u32 = 3;
const SWITCHES_PER_ITEM: u32 = 2;
const MAX_SWITCHES: u32 = 20;
const MAX_SCORE: u32 = 100;

/// Estimated context switches: two per item, capped at 20
pub fn estimate_switches(item_count: usize) -> u32 {
    let count = u32::try_from(item_count).unwrap_or(u32::MAX);
    count.saturating_mul(SWITCHES_PER_ITEM).min(MAX_SWITCHES)
}

pub fn urgent_task_count(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|t| t.priority_score >= URGENT_THRESHOLD)
        .count()
}

/// Weighted, clamped sum of contexts, urgent tasks, meetings and switches
pub fn compute_load(items: &[Item], contexts: &[Context], tasks: &[Task]) -> CognitiveLoad {
    let active_contexts = contexts.len();
    let urgent_tasks = urgent_task_count(tasks);
    let meetings = items.iter().filter(|i| i.is_calendar()).count();
    let switches = estimate_switches(items.len());

    let weighted = |count: usize, weight: u32| -> u32 {
        u32::try_from(count).unwrap_or(u32::MAX).saturating_mul(weight)
    };

    let raw = weighted(active_contexts, CONTEXT_WEIGHT)
        .saturating_add(weighted(urgent_tasks, URGENT_TASK_WEIGHT))
        .saturating_add(weighted(meetings, MEETING_WEIGHT))
        .saturating_add(switches);
    let score = raw.min(MAX_SCORE) as u8;

    CognitiveLoad {
        score,
        status: LoadStatus::from_score(score),
        active_contexts,
        urgent_tasks,
        switches,
        breakdown: format!(
            "{} parallel contexts + {} urgent deadlines + {} meetings + {} switches today",
            active_contexts, urgent_tasks, meetings, switches
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::models::Urgency;
    use crate::items::{ItemKind, ItemMeta, ItemSource, ItemStatus};

    fn context(name: &str) -> Context {
        Context {
            id: format!("ctx_{}", name),
            name: name.to_string(),
            urgency: Urgency::Medium,
            deadline: None,
            related_items: vec![],
            tasks: vec![],
        }
    }

    fn task(score: u8) -> Task {
        Task {
            id: format!("t{}", score),
            title: "t".to_string(),
            context: "Email".to_string(),
            deadline: None,
            priority_score: score,
            status: ItemStatus::NotStarted,
            explanation: String::new(),
        }
    }

    fn calendar_item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            source: ItemSource::Calendar,
            kind: ItemKind::Meeting,
            title: String::new(),
            content: String::new(),
            timestamp: None,
            deadline: None,
            participants: vec![],
            status: ItemStatus::Scheduled,
            meta: ItemMeta::default(),
        }
    }

    #[test]
    fn test_switches_capped() {
        assert_eq!(estimate_switches(0), 0);
        assert_eq!(estimate_switches(3), 6);
        assert_eq!(estimate_switches(10), 20);
        assert_eq!(estimate_switches(500), 20);
    }

    #[test]
    fn test_weighted_sum() {
        let items = vec![calendar_item("a"), calendar_item("b")];
        let contexts = vec![context("one")];
        let tasks = vec![task(85), task(70)];

        let load = compute_load(&items, &contexts, &tasks);
        // 15*1 + 10*1 + 3*2 + 4
        assert_eq!(load.score, 35);
        assert_eq!(load.status, LoadStatus::Low);
        assert_eq!(load.urgent_tasks, 1);
        assert_eq!(load.switches, 4);
        assert!(load.breakdown.contains("1 parallel contexts"));
    }

    #[test]
    fn test_score_is_clamped() {
        let items: Vec<Item> = (0..12).map(|i| calendar_item(&i.to_string())).collect();
        let contexts: Vec<Context> = (0..4).map(|i| context(&i.to_string())).collect();
        let tasks: Vec<Task> = (0..5).map(|_| task(90)).collect();

        let load = compute_load(&items, &contexts, &tasks);
        assert_eq!(load.score, 100);
        assert_eq!(load.status, LoadStatus::High);
    }
}
