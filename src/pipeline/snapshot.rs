//! Read-only views of the graph handed to the editor UI.
//!
//! Snapshots are plain data: the UI can hold on to them, serialize them, or
//! diff them, without borrowing the live `Pipeline`.

use crate::pipeline::graph::{EdgeState, NodeStatus};
use crate::pipeline::id::{EdgeId, NodeId};
use crate::pipeline::pad::PadDeclaration;
use crate::types::TypeDescriptor;
use serde::{Deserialize, Serialize};

/// Snapshot of a single pipeline node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub inputs: Vec<PadDeclaration>,
    pub outputs: Vec<PadDeclaration>,
    pub status: NodeStatus,
    /// Validated output types, one per output pad.
    pub output_types: Option<Vec<TypeDescriptor>>,
    /// Why the last check failed, for tooltips.
    pub rejection: Option<String>,
}

/// Snapshot of a single pipeline edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub id: EdgeId,
    pub from_node: NodeId,
    pub from_pad: usize,
    pub to_node: NodeId,
    pub to_pad: usize,
    pub state: EdgeState,
}

/// Complete topology snapshot of the pipeline graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub generation: u64,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl TopologySnapshot {
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&EdgeSnapshot> {
        self.edges.iter().find(|e| e.id == id)
    }
}
