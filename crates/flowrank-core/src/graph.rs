//! DependencyGraph: the in-memory dependency graph of one record set.
//!
//! Built once per run from the input records. Node `i` of the graph is
//! record `i` of the input slice. An edge `child -> parent` means the child
//! lists the parent in `dependsOn`.
//!
//! # Dangling references
//!
//! A `dependsOn` entry naming no known record is kept in the declared list
//! ([`DependencyGraph::dependencies`]) but produces no edge, so it never
//! counts towards a dependent count or centrality. Dangling references are
//! collected for diagnostics and are not an error.
//!
//! # Self references
//!
//! A node listing itself gets a self-loop edge so cycle detection can see
//! it, but it is never its own dependent.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use petgraph::graph::DiGraph;
use serde::Serialize;

use crate::error::CoreError;
use crate::id::NodeId;
use crate::node::NodeRecord;
use crate::validate::check_records;

/// A `dependsOn` entry that names no record in the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingRef {
    /// Id of the node declaring the dependency.
    pub node: String,
    /// The unknown id it declared.
    pub missing: String,
}

/// Forward and reverse dependency structure over a borrowed record set.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    records: &'a [NodeRecord],
    /// Record id to node position, in input order.
    index: IndexMap<&'a str, NodeId>,
    /// Structural graph, edges child -> parent, used for SCC analysis.
    graph: DiGraph<(), (), u32>,
    /// Resolved parents per node, deduplicated, in declared order.
    parents: Vec<Vec<NodeId>>,
    /// Nodes depending on each node, self-references excluded.
    dependents: Vec<BTreeSet<NodeId>>,
    dangling: Vec<DanglingRef>,
}

impl<'a> DependencyGraph<'a> {
    /// Builds the graph for `records`.
    ///
    /// Fails only when the records break an input invariant (empty or
    /// duplicate id, out-of-range time pressure); dangling and circular
    /// dependencies are accepted.
    pub fn load(records: &'a [NodeRecord]) -> Result<Self, CoreError> {
        check_records(records).map_err(CoreError::Validation)?;

        let index: IndexMap<&'a str, NodeId> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.as_str(), NodeId::new(i)))
            .collect();

        let mut graph = DiGraph::<(), (), u32>::with_capacity(records.len(), records.len());
        for _ in records {
            graph.add_node(());
        }

        let mut parents = vec![Vec::new(); records.len()];
        let mut dependents = vec![BTreeSet::new(); records.len()];
        let mut dangling = Vec::new();

        for (i, record) in records.iter().enumerate() {
            let child = NodeId::new(i);
            for dep in &record.depends_on {
                let Some(&parent) = index.get(dep.as_str()) else {
                    dangling.push(DanglingRef {
                        node: record.id.clone(),
                        missing: dep.clone(),
                    });
                    continue;
                };
                if parents[i].contains(&parent) {
                    continue;
                }
                parents[i].push(parent);
                graph.add_edge(child.into(), parent.into(), ());
                if parent != child {
                    dependents[parent.index()].insert(child);
                }
            }
        }

        Ok(DependencyGraph {
            records,
            index,
            graph,
            parents,
            dependents,
            dangling,
        })
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All node positions in input order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.records.len()).map(NodeId::new)
    }

    /// Looks up a node by its record id.
    pub fn id_of(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// The record backing a node.
    pub fn record(&self, node: NodeId) -> &'a NodeRecord {
        &self.records[node.index()]
    }

    /// The record id of a node.
    pub fn name(&self, node: NodeId) -> &'a str {
        self.records[node.index()].id.as_str()
    }

    /// Declared dependency ids, dangling ones included.
    pub fn dependencies(&self, node: NodeId) -> &'a [String] {
        &self.records[node.index()].depends_on
    }

    /// Resolved parents of a node (known ids only, deduplicated).
    pub fn parents(&self, node: NodeId) -> &[NodeId] {
        &self.parents[node.index()]
    }

    /// Nodes that depend on `node`, excluding `node` itself.
    pub fn dependents(&self, node: NodeId) -> &BTreeSet<NodeId> {
        &self.dependents[node.index()]
    }

    pub fn dependent_count(&self, node: NodeId) -> usize {
        self.dependents[node.index()].len()
    }

    /// Every resolved edge as `(child, parent)`, self-loops included, in
    /// input order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.parents
            .iter()
            .enumerate()
            .flat_map(|(i, ps)| ps.iter().map(move |&p| (NodeId::new(i), p)))
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn dangling(&self) -> &[DanglingRef] {
        &self.dangling
    }

    /// The underlying petgraph structure, edges child -> parent.
    pub fn petgraph(&self) -> &DiGraph<(), (), u32> {
        &self.graph
    }
}
