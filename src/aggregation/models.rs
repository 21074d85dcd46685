//! Derived entities produced by the aggregation pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::items::ItemStatus;

/// Context urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Insight severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A thematic grouping of related items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub name: String,
    pub urgency: Urgency,
    pub deadline: Option<NaiveDate>,
    pub related_items: Vec<String>,
    pub tasks: Vec<String>,
}

/// A prioritized unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub context: String,
    pub deadline: Option<NaiveDate>,
    /// Always within `0..=100`
    pub priority_score: u8,
    pub status: ItemStatus,
    pub explanation: String,
}

/// Load band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    Low,
    Medium,
    High,
}

impl LoadStatus {
    /// Low below 50, Medium up to 74, High from 75
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=49 => Self::Low,
            50..=74 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// Snapshot of workload fragmentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveLoad {
    pub score: u8,
    pub status: LoadStatus,
    pub active_contexts: usize,
    pub urgent_tasks: usize,
    pub switches: u32,
    pub breakdown: String,
}

/// Insight category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    ContextSwitching,
    DeadlineProximity,
}

/// Advisory observation about the current workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<String>>,
    pub message: String,
}

/// Suggested next action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub reason: String,
    pub expected_impact: String,
}

/// Everything one aggregation call produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub contexts: Vec<Context>,
    pub tasks: Vec<Task>,
    pub cognitive_load: CognitiveLoad,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_status_thresholds() {
        assert_eq!(LoadStatus::from_score(0), LoadStatus::Low);
        assert_eq!(LoadStatus::from_score(49), LoadStatus::Low);
        assert_eq!(LoadStatus::from_score(50), LoadStatus::Medium);
        assert_eq!(LoadStatus::from_score(74), LoadStatus::Medium);
        assert_eq!(LoadStatus::from_score(75), LoadStatus::High);
        assert_eq!(LoadStatus::from_score(100), LoadStatus::High);
    }

    #[test]
    fn test_insight_serializes_type_field() {
        let insight = Insight {
            kind: InsightKind::ContextSwitching,
            severity: Severity::High,
            count: Some(8),
            tasks: None,
            message: "switching".to_string(),
        };
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "context_switching");
        assert_eq!(json["severity"], "high");
        assert!(json.get("tasks").is_none());
    }
}
