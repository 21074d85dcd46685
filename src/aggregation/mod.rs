//! Aggregation pipeline
//!
//! Turns the effective item list for one identity into contexts, prioritised
//! tasks, a cognitive-load estimate, insights and recommendations. Every
//! stage is a pure function of its inputs; the only fallback source is the
//! fixture bundle already chosen by the resolver.

pub mod advice;
pub mod contexts;
pub mod load;
pub mod models;
pub mod rules;
pub mod synthetic;
pub mod tasks;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::sources::ResolvedItems;

pub use advice::{derive_insights, derive_recommendations};
pub use contexts::derive_contexts;
pub use load::compute_load;
pub use models::{
    CognitiveLoad, Context, DashboardSnapshot, Insight, InsightKind, LoadStatus, Recommendation,
    Severity, Task, Urgency,
};
pub use synthetic::inject_synthetic;
pub use tasks::derive_tasks;

/// Fixture insights or recommendations substituted when no rule fires
const MAX_FALLBACK_ADVICE: usize = 2;

/// Run the full pipeline over resolved items.
///
/// `now` anchors deadline proximity so identical inputs give identical output.
pub fn aggregate(resolved: &ResolvedItems, now: DateTime<Utc>) -> DashboardSnapshot {
    let items = resolved.items.as_slice();
    let bundle = &resolved.bundle;

    let contexts = if items.is_empty() {
        debug!(dataset = bundle.dataset, "No items, using fixture contexts");
        bundle.contexts.clone()
    } else {
        derive_contexts(items)
    };

    let mut tasks = derive_tasks(items, now);
    if tasks.is_empty() {
        debug!(dataset = bundle.dataset, "No qualifying tasks, using default task");
        tasks.extend(bundle.default_task());
    }

    let mut cognitive_load = compute_load(items, &contexts, &tasks);
    if cognitive_load.score == 0 && !items.is_empty() {
        warn!(
            identity = %resolved.identity,
            items = items.len(),
            "Computed cognitive load is zero with items present, using fixture load"
        );
        cognitive_load = bundle.cognitive_load.clone();
    }

    let mut insights = derive_insights(&contexts, &tasks, &cognitive_load);
    if insights.is_empty() {
        insights = bundle
            .insights
            .iter()
            .take(MAX_FALLBACK_ADVICE)
            .cloned()
            .collect();
    }

    let mut recommendations = derive_recommendations(&tasks, &cognitive_load);
    if recommendations.is_empty() {
        recommendations = bundle
            .recommendations
            .iter()
            .take(MAX_FALLBACK_ADVICE)
            .cloned()
            .collect();
    }

    debug!(
        contexts = contexts.len(),
        tasks = tasks.len(),
        load = cognitive_load.score,
        "Aggregated dashboard"
    );

    DashboardSnapshot {
        contexts,
        tasks,
        cognitive_load,
        insights,
        recommendations,
    }
}
