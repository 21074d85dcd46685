//! Synthetic data injection for demos

use std::collections::HashSet;

use tracing::debug;

use super::models::DashboardSnapshot;
use crate::sources::FixtureBundle;

/// Merge a bundle's canned tasks, insights and recommendations into a snapshot.
///
/// Tasks whose id is already present are skipped and the task list is
/// re-sorted by priority. Entries already in the snapshot are not duplicated.
pub fn inject_synthetic(snapshot: &mut DashboardSnapshot, bundle: &FixtureBundle) {
    let known: HashSet<String> = snapshot.tasks.iter().map(|t| t.id.clone()).collect();
    let before = snapshot.tasks.len();

    snapshot.tasks.extend(
        bundle
            .tasks
            .iter()
            .filter(|t| !known.contains(&t.id))
            .cloned(),
    );
    snapshot
        .tasks
        .sort_by(|a, b| b.priority_score.cmp(&a.priority_score));

    for insight in &bundle.insights {
        if !snapshot.insights.contains(insight) {
            snapshot.insights.push(insight.clone());
        }
    }

    for recommendation in &bundle.recommendations {
        if !snapshot.recommendations.contains(recommendation) {
            snapshot.recommendations.push(recommendation.clone());
        }
    }

    debug!(
        dataset = bundle.dataset,
        added_tasks = snapshot.tasks.len() - before,
        "Injected synthetic data"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::models::{CognitiveLoad, LoadStatus, Task};
    use crate::items::ItemStatus;

    fn task(id: &str, score: u8) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            context: "Email".to_string(),
            deadline: None,
            priority_score: score,
            status: ItemStatus::NotStarted,
            explanation: String::new(),
        }
    }

    fn snapshot(tasks: Vec<Task>) -> DashboardSnapshot {
        DashboardSnapshot {
            contexts: vec![],
            tasks,
            cognitive_load: CognitiveLoad {
                score: 40,
                status: LoadStatus::Low,
                active_contexts: 1,
                urgent_tasks: 0,
                switches: 2,
                breakdown: String::new(),
            },
            insights: vec![],
            recommendations: vec![],
        }
    }

    #[test]
    fn test_merges_and_resorts() {
        let bundle = FixtureBundle::build(0, "alice");
        let mut snap = snapshot(vec![task("real_1", 70), task("real_2", 50)]);

        inject_synthetic(&mut snap, &bundle);

        let scores: Vec<u8> = snap.tasks.iter().map(|t| t.priority_score).collect();
        assert_eq!(scores, vec![88, 75, 70, 65, 50]);
        assert_eq!(snap.insights.len(), 2);
        assert_eq!(snap.recommendations.len(), 2);
    }

    #[test]
    fn test_injection_is_not_duplicated() {
        let bundle = FixtureBundle::build(1, "alice");
        let mut snap = snapshot(vec![bundle.tasks[0].clone()]);

        inject_synthetic(&mut snap, &bundle);
        inject_synthetic(&mut snap, &bundle);

        assert_eq!(snap.tasks.len(), 3);
        assert_eq!(snap.insights.len(), 2);
        assert_eq!(snap.recommendations.len(), 2);
    }
}
