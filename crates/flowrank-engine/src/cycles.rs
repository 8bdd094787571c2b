//! Cycle detection over the dependency graph.
//!
//! Two results come out of one call to [`detect_cycles`]:
//!
//! - **Cycles**: distinct circular chains found by a depth-first traversal
//!   that keeps a "visiting" state (on the current path) apart from a
//!   "visited" state (fully explored). Revisiting a node on the current path
//!   records the sub-path from that node back to itself. Each node is
//!   expanded once, so the traversal is O(V+E); the chains it reports are
//!   for diagnostics and are not an exhaustive enumeration.
//! - **Members**: every node that sits on at least one cycle, taken from
//!   strongly connected components (Kosaraju, also O(V+E)). A DFS alone can
//!   miss members whose closing edge reaches an already finished node.
//!
//! Both traversals keep explicit stacks, so a long dependency chain never
//! deepens the call stack. Nothing here mutates the graph or removes edges.

use std::collections::{BTreeSet, HashSet};

use flowrank_core::{DependencyGraph, NodeId};
use petgraph::algo::kosaraju_scc;

/// Circular dependencies found in one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Every node that participates in at least one cycle.
    pub members: BTreeSet<NodeId>,
    /// Distinct cycles, each starting at its smallest node, without the
    /// closing repeat.
    pub cycles: Vec<Vec<NodeId>>,
}

impl CycleReport {
    pub fn is_acyclic(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Cycles as record-id chains closed by repeating the first id,
    /// e.g. `["a", "b", "c", "a"]`.
    pub fn named_cycles(&self, graph: &DependencyGraph<'_>) -> Vec<Vec<String>> {
        self.cycles
            .iter()
            .map(|cycle| {
                cycle
                    .iter()
                    .chain(cycle.first())
                    .map(|&n| graph.name(n).to_string())
                    .collect()
            })
            .collect()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting,
    Visited,
}

struct Walk<'g, 'a> {
    graph: &'g DependencyGraph<'a>,
    state: Vec<VisitState>,
    path: Vec<NodeId>,
    seen: HashSet<Vec<NodeId>>,
    cycles: Vec<Vec<NodeId>>,
}

impl Walk<'_, '_> {
    /// Depth-first walk from `root` over parent edges.
    ///
    /// Each frame holds a node and the index of its next unexplored parent,
    /// so path depth is bounded by memory rather than by the thread stack.
    fn visit(&mut self, root: NodeId) {
        let graph = self.graph;
        self.enter(root);
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];

        while let Some((node, next)) = stack.pop() {
            let Some(&parent) = graph.parents(node).get(next) else {
                self.path.pop();
                self.state[node.index()] = VisitState::Visited;
                continue;
            };
            stack.push((node, next + 1));

            match self.state[parent.index()] {
                VisitState::None => {
                    self.enter(parent);
                    stack.push((parent, 0));
                }
                VisitState::Visiting => self.record(parent),
                VisitState::Visited => {}
            }
        }
    }

    fn enter(&mut self, node: NodeId) {
        self.state[node.index()] = VisitState::Visiting;
        self.path.push(node);
    }

    /// Records the path segment from `repeated` to the top of the path.
    fn record(&mut self, repeated: NodeId) {
        let Some(start) = self.path.iter().rposition(|&n| n == repeated) else {
            return;
        };
        let cycle = canonical(&self.path[start..]);
        if self.seen.insert(cycle.clone()) {
            self.cycles.push(cycle);
        }
    }
}

/// Rotates a cycle so it starts at its smallest node.
fn canonical(cycle: &[NodeId]) -> Vec<NodeId> {
    let pivot = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, n)| *n)
        .map(|(i, _)| i)
        .unwrap_or(0);
    cycle[pivot..].iter().chain(&cycle[..pivot]).copied().collect()
}

/// Finds cycles and cycle members in `graph`.
pub fn detect_cycles(graph: &DependencyGraph<'_>) -> CycleReport {
    let mut walk = Walk {
        graph,
        state: vec![VisitState::None; graph.len()],
        path: Vec::new(),
        seen: HashSet::new(),
        cycles: Vec::new(),
    };
    for node in graph.node_ids() {
        if walk.state[node.index()] == VisitState::None {
            walk.visit(node);
        }
    }

    let pg = graph.petgraph();
    let mut members: BTreeSet<NodeId> = BTreeSet::new();
    for component in kosaraju_scc(pg) {
        match component.as_slice() {
            [single] => {
                if pg.contains_edge(*single, *single) {
                    members.insert(NodeId::from(*single));
                }
            }
            many => members.extend(many.iter().map(|&idx| NodeId::from(idx))),
        }
    }
    members.extend(walk.cycles.iter().flatten().copied());

    CycleReport {
        members,
        cycles: walk.cycles,
    }
}
