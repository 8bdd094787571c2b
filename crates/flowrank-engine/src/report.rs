//! Run diagnostics for operators.
//!
//! A [`FlowReport`] accompanies every run. It never affects scores; it
//! records what the engine tolerated along the way: dangling references,
//! circular dependencies and ancestor relaxations that hit their cap.

use flowrank_core::DanglingRef;
use serde::Serialize;

use crate::priority::Guardrails;

/// Diagnostics for one flow computation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    /// Number of node records scored.
    pub nodes: usize,
    /// Number of resolved dependency edges.
    pub edges: usize,
    /// Dependencies naming unknown nodes, in input order.
    pub dangling: Vec<DanglingRef>,
    /// Detected cycles as id chains closed by the first id.
    pub cycles: Vec<Vec<String>>,
    /// Ids of every node on at least one cycle.
    pub cycle_members: Vec<String>,
    /// Floor raises and ancestor relaxation on raw priorities.
    pub raw_guardrails: Guardrails,
    /// Floor raises and ancestor relaxation on normalized priorities.
    pub published_guardrails: Guardrails,
}

impl FlowReport {
    /// Whether both relaxation phases reached a fixed point.
    pub fn converged(&self) -> bool {
        self.raw_guardrails.relaxation.converged && self.published_guardrails.relaxation.converged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::Relaxation;
    use serde_json::json;

    #[test]
    fn serializes_camel_case() {
        let report = FlowReport {
            nodes: 3,
            edges: 3,
            cycles: vec![vec!["a".into(), "b".into(), "a".into()]],
            cycle_members: vec!["a".into(), "b".into()],
            raw_guardrails: Guardrails {
                floor_raises: 1,
                relaxation: Relaxation { passes: 2, converged: true, raises: 1 },
            },
            published_guardrails: Guardrails {
                floor_raises: 0,
                relaxation: Relaxation { passes: 1, converged: false, raises: 4 },
            },
            ..FlowReport::default()
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["cycleMembers"], json!(["a", "b"]));
        assert_eq!(value["rawGuardrails"]["floorRaises"], json!(1));
        assert_eq!(value["rawGuardrails"]["relaxation"]["passes"], json!(2));
        assert!(!report.converged());
    }
}
