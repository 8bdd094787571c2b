//! Raw Priority: how strategically important a node is.
//!
//! The base score of a node is the sum of five components:
//!
//! | Component      | Value                                        |
//! |----------------|----------------------------------------------|
//! | strategy       | `strategyBase * sectorWeight(sector)`         |
//! | centrality     | `ln(1 + dependents) * centralityScale`        |
//! | stage          | `priorityStage[signal]`                       |
//! | tier boost     | `tierBoosts[tier]`, 0 when absent or unknown |
//! | time pressure  | `timePressure` (0..=10)                      |
//!
//! Two guardrails then run in order:
//!
//! 1. **Foundational floor**: foundational nodes are raised to at least
//!    `foundationalFloor`. Never lowers a value.
//! 2. **Ancestor override**: for every edge `child -> parent`,
//!    `priority(parent) >= priority(child) - ancestorMargin`. The constraint
//!    chains transitively, so it is enforced by fixed-point relaxation: full
//!    passes over all edges raise violating parents until a pass changes
//!    nothing or the pass cap is reached.
//!
//! Relaxation only ever raises a parent to `child - margin`, which is below
//! the child, so no value grows past the largest value present before
//! relaxation. Together with the pass cap this bounds the work on cyclic
//! graphs; on a DAG the fixed point is reached within one pass per node.

use flowrank_core::{DependencyGraph, FlowConfig, NodeRecord};
use serde::Serialize;

/// The five additive components of a node's base priority.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorityBreakdown {
    pub strategy: f64,
    pub centrality: f64,
    pub stage: f64,
    pub tier_boost: f64,
    pub time_pressure: f64,
}

impl PriorityBreakdown {
    pub fn total(&self) -> f64 {
        self.strategy + self.centrality + self.stage + self.tier_boost + self.time_pressure
    }
}

/// Outcome of one ancestor relaxation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Relaxation {
    /// Full passes over the edge set that were run.
    pub passes: usize,
    /// Whether the last pass changed nothing.
    pub converged: bool,
    /// Total number of parent raises across all passes.
    pub raises: usize,
}

/// Outcome of both guardrails over one set of values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Guardrails {
    /// Foundational nodes raised to the floor.
    pub floor_raises: usize,
    pub relaxation: Relaxation,
}

/// Splits a record's base priority into its components.
pub fn breakdown(record: &NodeRecord, dependent_count: usize, config: &FlowConfig) -> PriorityBreakdown {
    let strategy_base = record.strategy_base.unwrap_or(config.default_strategy_base);
    PriorityBreakdown {
        strategy: strategy_base * config.sector_weight(&record.sector),
        centrality: (1.0 + dependent_count as f64).ln() * config.centrality_scale,
        stage: config.priority_stage.get(record.signal),
        tier_boost: config.tier_boost(record.tier.as_deref()),
        time_pressure: f64::from(record.time_pressure),
    }
}

/// Base priority of one record, before guardrails.
pub fn base_priority(record: &NodeRecord, dependent_count: usize, config: &FlowConfig) -> f64 {
    breakdown(record, dependent_count, config).total()
}

/// Raises every foundational node to at least `floor`.
///
/// Returns how many values were raised.
pub fn apply_floor(graph: &DependencyGraph<'_>, values: &mut [f64], floor: f64) -> usize {
    let mut raised = 0;
    for node in graph.node_ids() {
        let v = &mut values[node.index()];
        if graph.record(node).foundational && *v < floor {
            *v = floor;
            raised += 1;
        }
    }
    raised
}

/// Enforces `parent >= child - margin` along every edge by repeated full
/// passes, stopping after a pass with no change or after `cap` passes.
pub fn relax_ancestors(
    graph: &DependencyGraph<'_>,
    values: &mut [f64],
    margin: f64,
    cap: usize,
) -> Relaxation {
    let mut outcome = Relaxation::default();

    while outcome.passes < cap {
        outcome.passes += 1;
        let mut changed = false;

        for (child, parent) in graph.edges() {
            if child == parent {
                continue;
            }
            let required = values[child.index()] - margin;
            if values[parent.index()] < required {
                values[parent.index()] = required;
                outcome.raises += 1;
                changed = true;
            }
        }

        if !changed {
            outcome.converged = true;
            break;
        }
    }

    outcome
}

/// Applies the foundational floor and then the ancestor override, in place.
pub fn enforce_guardrails(
    graph: &DependencyGraph<'_>,
    values: &mut [f64],
    config: &FlowConfig,
) -> Guardrails {
    let floor_raises = apply_floor(graph, values, f64::from(config.foundational_floor));
    let relaxation = relax_ancestors(
        graph,
        values,
        f64::from(config.ancestor_margin),
        config.relaxation_cap(graph.len()),
    );
    Guardrails {
        floor_raises,
        relaxation,
    }
}

/// Raw priority for every node with both guardrails applied.
pub fn raw_priorities(graph: &DependencyGraph<'_>, config: &FlowConfig) -> (Vec<f64>, Guardrails) {
    let mut values: Vec<f64> = graph
        .node_ids()
        .map(|n| base_priority(graph.record(n), graph.dependent_count(n), config))
        .collect();
    let outcome = enforce_guardrails(graph, &mut values, config);
    (values, outcome)
}
