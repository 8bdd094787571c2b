//! Node records: one catalog entry with its lifecycle and dependency metadata.
//!
//! A [`NodeRecord`] is the typed view of one JSON object from the record set.
//! Keys the engine does not know about (titles, links, page copy) are kept in
//! [`NodeRecord::extra`] so that writing the record back does not lose them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Lifecycle stage
// ---------------------------------------------------------------------------

/// Lifecycle stage of a node, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Signal {
    Seed,
    Awake,
    Wiring,
    Live,
    Echo,
    Archive,
}

impl Signal {
    /// All stages in lifecycle order.
    pub const ALL: [Signal; 6] = [
        Signal::Seed,
        Signal::Awake,
        Signal::Wiring,
        Signal::Live,
        Signal::Echo,
        Signal::Archive,
    ];

    /// The wire name of the stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Seed => "Seed",
            Signal::Awake => "Awake",
            Signal::Wiring => "Wiring",
            Signal::Live => "Live",
            Signal::Echo => "Echo",
            Signal::Archive => "Archive",
        }
    }

    /// Parses a wire name. Matching is exact.
    pub fn parse(name: &str) -> Option<Signal> {
        Signal::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

// ---------------------------------------------------------------------------
// Node record
// ---------------------------------------------------------------------------

/// One node record as read from and written back to the record set.
///
/// The first block of fields is input; `energy`, `priority`, `flow` and
/// `flow_tier` are outputs and are overwritten on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Unique stable key.
    pub id: String,
    /// Category used for sector weighting.
    pub sector: String,
    /// Lifecycle stage.
    pub signal: Signal,
    /// Ids this node requires, in declared order. May name unknown nodes.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Declared tier (Platform, Prod-Critical, Internal, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Establishes a priority floor when set.
    #[serde(default, skip_serializing_if = "is_false")]
    pub foundational: bool,
    /// Manual urgency dial, 0..=10.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub time_pressure: u8,
    /// Marks the node as finished; triggers the energy cooldown.
    #[serde(default, skip_serializing_if = "is_false")]
    pub done: bool,
    /// Per-node strategy base for priority. Falls back to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_base: Option<f64>,

    /// Normalized energy, 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<u8>,
    /// Normalized priority, 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    /// Flow index, 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<u8>,
    /// Id of the flow tier band the flow index falls in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_tier: Option<String>,

    /// Every other key of the source object, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_zero(n: &u8) -> bool {
    *n == 0
}

impl NodeRecord {
    /// A bare record with no dependencies and no optional inputs.
    pub fn new(id: impl Into<String>, sector: impl Into<String>, signal: Signal) -> Self {
        NodeRecord {
            id: id.into(),
            sector: sector.into(),
            signal,
            depends_on: Vec::new(),
            tier: None,
            foundational: false,
            time_pressure: 0,
            done: false,
            strategy_base: None,
            energy: None,
            priority: None,
            flow: None,
            flow_tier: None,
            extra: Map::new(),
        }
    }

    /// Builder-style helper for declaring dependencies.
    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` once a run has written scores onto this record.
    pub fn is_scored(&self) -> bool {
        self.energy.is_some() && self.priority.is_some() && self.flow.is_some()
    }
}
