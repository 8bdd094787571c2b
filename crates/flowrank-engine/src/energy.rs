//! Raw Energy: how active and ready a node currently is.
//!
//! ```text
//! energy = (baseline[stage] + min(usageBonusCap, dependents)) * cooldown
//! ```
//!
//! `cooldown` is `cooldownFactor` for Echo-stage or done nodes and 1.0
//! otherwise. The raw value is not bounded to 0..=100; the normalizer
//! rescales it across the whole set.

use flowrank_core::{DependencyGraph, FlowConfig, NodeRecord, Signal};

/// Raw Energy of one record with `dependent_count` dependents.
pub fn raw_energy(record: &NodeRecord, dependent_count: usize, config: &FlowConfig) -> f64 {
    let baseline = config.energy_baseline.get(record.signal);
    let usage_bonus = (dependent_count as f64).min(config.usage_bonus_cap);
    (baseline + usage_bonus) * cooldown(record, config)
}

/// Energy multiplier for a record.
pub fn cooldown(record: &NodeRecord, config: &FlowConfig) -> f64 {
    if record.signal == Signal::Echo || record.done {
        config.cooldown_factor
    } else {
        1.0
    }
}

/// Raw Energy for every node, indexed by node position.
pub fn raw_energies(graph: &DependencyGraph<'_>, config: &FlowConfig) -> Vec<f64> {
    graph
        .node_ids()
        .map(|n| raw_energy(graph.record(n), graph.dependent_count(n), config))
        .collect()
}
