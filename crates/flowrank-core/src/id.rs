//! Dense node identifiers for a loaded record set.
//!
//! A [`NodeId`] is the position of a record in the input set. It is only
//! meaningful for the run that produced it; the stable key of a node is its
//! string `id`.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Position of a node within one loaded record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn new(idx: usize) -> Self {
        NodeId(idx as u32)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Graph node `i` is record `i`, so both directions are a plain index copy.
impl From<NodeIndex<u32>> for NodeId {
    fn from(ix: NodeIndex<u32>) -> Self {
        NodeId::new(ix.index())
    }
}

impl From<NodeId> for NodeIndex<u32> {
    fn from(id: NodeId) -> Self {
        NodeIndex::new(id.index())
    }
}
