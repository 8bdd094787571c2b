//! A synchronous, single-threaded flow computation engine.
//!
//! [`FlowEngine`] owns a validated [`FlowConfig`] and runs the full pipeline
//! over a borrowed record set. Each call is an independent batch: the engine
//! keeps no state between runs, and the result depends only on the input
//! fields of the records (stale outputs on the input are ignored).

use flowrank_core::{DependencyGraph, FlowConfig, NodeRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::{flow_index, TierClassifier};
use crate::cycles::detect_cycles;
use crate::energy::raw_energies;
use crate::error::EngineError;
use crate::normalize::{min_max, to_score};
use crate::priority::{enforce_guardrails, raw_priorities, Guardrails};
use crate::report::FlowReport;
use crate::writer::apply_scores;

/// Computed fields for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeScore {
    pub id: String,
    /// Normalized energy, 0..=100.
    pub energy: u8,
    /// Normalized priority with guardrails applied, 0..=100.
    pub priority: u8,
    /// Flow index, 0..=100.
    pub flow: u8,
    /// Id of the matching tier band.
    pub flow_tier: String,
    /// Energy before normalization.
    pub raw_energy: f64,
    /// Priority before normalization, guardrails applied.
    pub raw_priority: f64,
    /// Whether the node sits on a dependency cycle.
    pub in_cycle: bool,
}

/// Result of [`FlowEngine::compute`]: one score per input record, in input
/// order, plus diagnostics.
#[derive(Debug, Clone)]
pub struct FlowRun {
    pub scores: Vec<NodeScore>,
    pub report: FlowReport,
}

/// Runs the flow pipeline under one rule configuration.
#[derive(Debug, Clone)]
pub struct FlowEngine {
    config: FlowConfig,
}

impl Default for FlowEngine {
    fn default() -> Self {
        FlowEngine {
            config: FlowConfig::default(),
        }
    }
}

impl FlowEngine {
    /// Creates an engine, rejecting configurations that could produce
    /// out-of-range scores or unclassifiable flow indices.
    pub fn new(config: FlowConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(FlowEngine { config })
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Scores every record without modifying it.
    ///
    /// Fails only when the records break an input invariant; nothing is
    /// computed in that case.
    pub fn compute(&self, records: &[NodeRecord]) -> Result<FlowRun, EngineError> {
        let config = &self.config;
        let graph = DependencyGraph::load(records)?;
        debug!(
            "loaded dependency graph: {} nodes, {} edges, {} dangling reference(s)",
            graph.len(),
            graph.edge_count(),
            graph.dangling().len()
        );
        for dangling in graph.dangling() {
            debug!("node '{}' depends on unknown node '{}'", dangling.node, dangling.missing);
        }

        let cycles = detect_cycles(&graph);
        let named_cycles = cycles.named_cycles(&graph);
        if !cycles.is_acyclic() {
            warn!("{} node(s) sit on dependency cycles", cycles.members.len());
            for chain in &named_cycles {
                warn!("circular dependency: {}", chain.join(" -> "));
            }
        }

        // Raw scores.
        let energy_raw = raw_energies(&graph, config);
        let (priority_raw, raw_guardrails) = raw_priorities(&graph, config);
        log_guardrails("raw", raw_guardrails);

        // Published scale. Rescaling can stretch gaps or pull a foundational
        // node under the floor, so both guardrails run again here.
        let energy_norm = min_max(&energy_raw);
        let mut priority_norm = min_max(&priority_raw);
        let published_guardrails = enforce_guardrails(&graph, &mut priority_norm, config);
        log_guardrails("published", published_guardrails);

        let tiers = TierClassifier::new(config);
        let scores: Vec<NodeScore> = graph
            .node_ids()
            .map(|node| {
                let i = node.index();
                let energy = to_score(energy_norm[i]);
                let priority = to_score(priority_norm[i]);
                let flow = flow_index(f64::from(energy), f64::from(priority), config);
                NodeScore {
                    id: graph.name(node).to_string(),
                    energy,
                    priority,
                    flow,
                    flow_tier: tiers.classify(flow).to_string(),
                    raw_energy: energy_raw[i],
                    raw_priority: priority_raw[i],
                    in_cycle: cycles.contains(node),
                }
            })
            .collect();

        let report = FlowReport {
            nodes: graph.len(),
            edges: graph.edge_count(),
            dangling: graph.dangling().to_vec(),
            cycles: named_cycles,
            cycle_members: cycles
                .members
                .iter()
                .map(|&n| graph.name(n).to_string())
                .collect(),
            raw_guardrails,
            published_guardrails,
        };
        info!(
            "computed flow for {} node(s): {} cycle(s), {} dangling reference(s)",
            report.nodes,
            report.cycles.len(),
            report.dangling.len()
        );

        Ok(FlowRun { scores, report })
    }

    /// Scores every record and writes the computed fields onto it.
    pub fn run(&self, records: &mut [NodeRecord]) -> Result<FlowReport, EngineError> {
        let FlowRun { scores, report } = self.compute(records)?;
        apply_scores(records, &scores);
        Ok(report)
    }
}

fn log_guardrails(phase: &str, outcome: Guardrails) {
    let Guardrails {
        floor_raises,
        relaxation,
    } = outcome;
    if relaxation.converged {
        debug!(
            "{} guardrails: {} node(s) raised to the floor, ancestor relaxation converged after {} pass(es), {} raise(s)",
            phase, floor_raises, relaxation.passes, relaxation.raises
        );
    } else {
        warn!(
            "{} ancestor relaxation stopped at the {}-pass cap without converging; priorities are best effort",
            phase, relaxation.passes
        );
    }
}
