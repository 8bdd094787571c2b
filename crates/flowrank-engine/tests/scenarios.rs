//! End-to-end scenarios over small, hand-built record sets.

use flowrank_core::{decode_records, FlowConfig, NodeRecord, Signal};
use flowrank_engine::energy::raw_energy;
use flowrank_engine::{FlowEngine, NodeScore};
use serde_json::json;

fn score<'a>(scores: &'a [NodeScore], id: &str) -> &'a NodeScore {
    scores.iter().find(|s| s.id == id).unwrap()
}

#[test]
fn foundational_kernel_and_dependent_transport() {
    let records = decode_records(vec![
        json!({"id": "k", "sector": "Core", "signal": "Wiring", "dependsOn": [], "foundational": true, "timePressure": 3}),
        json!({"id": "t", "sector": "Transport", "signal": "Live", "dependsOn": ["k"], "timePressure": 1}),
    ])
    .unwrap();
    let engine = FlowEngine::default();
    let floor = engine.config().foundational_floor;
    let margin = engine.config().ancestor_margin;

    let run = engine.compute(&records).unwrap();
    let k = score(&run.scores, "k");
    let t = score(&run.scores, "t");

    assert!(k.priority >= floor);
    assert!(i32::from(k.priority) >= i32::from(t.priority) - i32::from(margin));
    assert!(run.report.converged());
}

#[test]
fn live_node_with_dependents_has_more_raw_energy() {
    let config = FlowConfig::default();
    let hub = NodeRecord::new("hub", "Ops", Signal::Live);
    let leaf = NodeRecord::new("leaf", "Ops", Signal::Live);
    assert_eq!(raw_energy(&hub, 8, &config), 98.0);
    assert_eq!(raw_energy(&leaf, 0, &config), 90.0);

    // The same comparison through the full pipeline.
    let mut records = vec![hub, leaf];
    for i in 0..8 {
        records.push(NodeRecord::new(format!("user{i}"), "Play", Signal::Seed).depends_on(["hub"]));
    }
    let run = FlowEngine::default().compute(&records).unwrap();
    let hub = score(&run.scores, "hub");
    let leaf = score(&run.scores, "leaf");
    assert_eq!(hub.raw_energy, 98.0);
    assert_eq!(leaf.raw_energy, 90.0);
    assert_eq!(hub.energy, 100);
    assert!(hub.energy > leaf.energy);
}

#[test]
fn three_node_cycle_completes_within_cap() {
    let records = vec![
        NodeRecord::new("a", "Ops", Signal::Live).depends_on(["b"]),
        NodeRecord::new("b", "Core", Signal::Wiring).depends_on(["c"]),
        NodeRecord::new("c", "Meta", Signal::Seed).depends_on(["a"]),
    ];
    let config = FlowConfig {
        max_relaxation_passes: Some(3),
        ..FlowConfig::default()
    };
    let run = FlowEngine::new(config).unwrap().compute(&records).unwrap();

    assert!(run.report.raw_guardrails.relaxation.passes <= 3);
    assert!(run.report.published_guardrails.relaxation.passes <= 3);
    assert_eq!(run.report.cycles.len(), 1);
    assert_eq!(run.report.cycle_members, vec!["a", "b", "c"]);
    assert!(run.scores.iter().all(|s| s.in_cycle && s.flow <= 100));
}

#[test]
fn dangling_dependencies_are_ignored() {
    let with_ghost = vec![
        NodeRecord::new("a", "Ops", Signal::Live).depends_on(["ghost"]),
        NodeRecord::new("b", "Ops", Signal::Awake).depends_on(["a"]),
    ];
    let without = vec![
        NodeRecord::new("a", "Ops", Signal::Live),
        NodeRecord::new("b", "Ops", Signal::Awake).depends_on(["a"]),
    ];
    let engine = FlowEngine::default();
    let ghost_run = engine.compute(&with_ghost).unwrap();
    let clean_run = engine.compute(&without).unwrap();

    assert_eq!(ghost_run.scores, clean_run.scores);
    assert_eq!(ghost_run.report.dangling.len(), 1);
    assert_eq!(ghost_run.report.dangling[0].missing, "ghost");
}

#[test]
fn identical_nodes_land_on_midpoint() {
    let records: Vec<NodeRecord> = (0..4)
        .map(|i| NodeRecord::new(format!("n{i}"), "Life", Signal::Awake))
        .collect();
    let run = FlowEngine::default().compute(&records).unwrap();
    for s in &run.scores {
        assert_eq!((s.energy, s.priority, s.flow), (50, 50, 50));
        assert_eq!(s.flow_tier, "supporting");
    }
}

#[test]
fn archive_nodes_score_lowest_energy() {
    let records = vec![
        NodeRecord::new("old", "Ops", Signal::Archive),
        NodeRecord::new("new", "Ops", Signal::Seed),
        NodeRecord::new("hot", "Ops", Signal::Live),
    ];
    let run = FlowEngine::default().compute(&records).unwrap();
    assert_eq!(score(&run.scores, "old").energy, 0);
    assert_eq!(score(&run.scores, "hot").energy, 100);
}

#[test]
fn second_run_over_written_records_is_identical() {
    let mut records = decode_records(vec![
        json!({"id": "core", "sector": "Core", "signal": "Live", "tier": "Platform", "foundational": true, "title": "Core"}),
        json!({"id": "api", "sector": "Web.Rest", "signal": "Wiring", "dependsOn": ["core", "missing"], "timePressure": 7}),
        json!({"id": "bot", "sector": "AI/Agents", "signal": "Awake", "dependsOn": ["api"], "done": true}),
        json!({"id": "shop", "sector": "Creator", "signal": "Echo", "dependsOn": ["api", "bot"]}),
    ])
    .unwrap();
    let engine = FlowEngine::default();

    engine.run(&mut records).unwrap();
    let first = serde_json::to_value(&records).unwrap();

    let mut again: Vec<NodeRecord> = serde_json::from_value(first.clone()).unwrap();
    engine.run(&mut again).unwrap();
    let second = serde_json::to_value(&again).unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0]["title"], json!("Core"));
}

#[test]
fn flow_follows_configured_weight_pair() {
    let records = vec![
        NodeRecord::new("a", "Core", Signal::Wiring),
        NodeRecord::new("b", "Play", Signal::Seed).depends_on(["a"]),
    ];
    let config = FlowConfig {
        energy_weight: 0.4,
        priority_weight: 0.6,
        ..FlowConfig::default()
    };
    let run = FlowEngine::new(config).unwrap().compute(&records).unwrap();
    for s in &run.scores {
        let expected = (0.4 * f64::from(s.energy) + 0.6 * f64::from(s.priority) + 0.5).floor() as u8;
        assert_eq!(s.flow, expected);
    }
}

#[test]
fn long_chain_listed_leaf_first_completes() {
    // n0 depends on n1, n1 on n2, and so on down a 50k-node chain.
    let n = 50_000;
    let records: Vec<NodeRecord> = (0..n)
        .map(|i| {
            let record = NodeRecord::new(format!("n{i}"), "Ops", Signal::Live);
            if i + 1 < n {
                record.depends_on([format!("n{}", i + 1)])
            } else {
                record
            }
        })
        .collect();

    let run = FlowEngine::default().compute(&records).unwrap();
    assert_eq!(run.scores.len(), n);
    assert!(run.report.cycles.is_empty());
    assert!(run.report.converged());
}

#[test]
fn malformed_stale_outputs_are_recomputed() {
    let mut records = decode_records(vec![
        json!({"id": "a", "sector": "Ops", "signal": "Live", "energy": 300, "flow": 55.5, "flowTier": 3}),
        json!({"id": "b", "sector": "Ops", "signal": "Seed", "dependsOn": ["a"], "priority": -4}),
    ])
    .unwrap();
    FlowEngine::default().run(&mut records).unwrap();

    assert!(records.iter().all(NodeRecord::is_scored));
    assert!(records.iter().all(|r| r.flow_tier.is_some()));
    assert_eq!(records[0].energy, Some(100));
    assert_eq!(records[1].energy, Some(0));
}
