//! Insights and recommendations derived from tasks, contexts and load

use super::models::{CognitiveLoad, Context, Insight, InsightKind, Recommendation, Severity, Task};
use super::rules::URGENT_THRESHOLD;

/// More contexts than this makes context switching severe
const SEVERE_CONTEXT_COUNT: usize = 3;

/// More urgent tasks than this makes deadline proximity severe
const SEVERE_URGENT_COUNT: usize = 2;

/// Load above this triggers the batching recommendation
const BATCHING_LOAD_THRESHOLD: u8 = 70;

fn urgent_tasks(tasks: &[Task]) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(|t| t.priority_score >= URGENT_THRESHOLD)
}

/// Rule-based insights; empty when nothing fires
pub fn derive_insights(contexts: &[Context], tasks: &[Task], load: &CognitiveLoad) -> Vec<Insight> {
    let mut insights = Vec::new();

    if contexts.len() > 1 {
        let severity = if contexts.len() > SEVERE_CONTEXT_COUNT {
            Severity::High
        } else {
            Severity::Medium
        };
        insights.push(Insight {
            kind: InsightKind::ContextSwitching,
            severity,
            count: Some(load.switches),
            tasks: None,
            message: format!(
                "You are juggling {} active contexts with an estimated {} switches today",
                contexts.len(),
                load.switches
            ),
        });
    }

    let urgent: Vec<String> = urgent_tasks(tasks).map(|t| t.title.clone()).collect();
    if !urgent.is_empty() {
        let severity = if urgent.len() > SEVERE_URGENT_COUNT {
            Severity::High
        } else {
            Severity::Medium
        };
        insights.push(Insight {
            kind: InsightKind::DeadlineProximity,
            severity,
            count: None,
            message: format!("{} urgent task(s) require immediate attention.", urgent.len()),
            tasks: Some(urgent),
        });
    }

    insights
}

/// Rule-based recommendations; empty when nothing fires
pub fn derive_recommendations(tasks: &[Task], load: &CognitiveLoad) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    // tasks arrive sorted, so the first urgent one is the top one
    if let Some(top) = urgent_tasks(tasks).next() {
        recommendations.push(Recommendation {
            action: format!("Prioritize: {}", top.title),
            reason: format!("Highest priority task (score {}): {}", top.priority_score, top.explanation),
            expected_impact: "Clear the most pressing deadline before switching context".to_string(),
        });
    }

    if load.score > BATCHING_LOAD_THRESHOLD {
        recommendations.push(Recommendation {
            action: "Batch similar tasks together".to_string(),
            reason: format!(
                "Cognitive load is {}/100 across {} contexts",
                load.score, load.active_contexts
            ),
            expected_impact: "Fewer context switches and a lower load score".to_string(),
        });
    }

    recommendations
}
