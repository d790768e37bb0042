//! Identity types for the pipeline graph.
//!
//! Node and edge IDs are newtypes over `u32` handed out by a per-graph
//! monotonic counter. They double as indices into the graph's slot vectors;
//! removed slots stay tombstoned, so an ID is never reused.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index into `Pipeline::nodes`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Compact pad address. High 20 bits = node index, low 12 bits = pad index.
/// Whether the pad is an input or an output follows from where it is used.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PadId(pub u32);

impl PadId {
    const PAD_BITS: u32 = 12;
    const PAD_MASK: u32 = (1 << Self::PAD_BITS) - 1;

    /// Largest pad count a single element may declare per direction.
    pub const MAX_PADS: usize = 1 << Self::PAD_BITS;

    /// Number of node slots a graph can address.
    pub const MAX_NODES: usize = 1 << (32 - Self::PAD_BITS);

    pub fn new(node: NodeId, pad_index: u16) -> Self {
        debug_assert!((pad_index as usize) < Self::MAX_PADS);
        Self((node.0 << Self::PAD_BITS) | (pad_index as u32 & Self::PAD_MASK))
    }

    #[inline]
    pub fn node(self) -> NodeId {
        NodeId(self.0 >> Self::PAD_BITS)
    }

    #[inline]
    pub fn pad_index(self) -> usize {
        (self.0 & Self::PAD_MASK) as usize
    }
}

impl fmt::Debug for PadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PadId(node={}, pad={})", self.node().0, self.pad_index())
    }
}

/// Index into `Pipeline::edges`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    /// Number of edge slots a graph can address.
    pub const MAX_EDGES: usize = u32::MAX as usize;

    /// The id for edge slot `slot`, if it is addressable.
    pub fn from_slot(slot: usize) -> Option<EdgeId> {
        if slot < Self::MAX_EDGES {
            Some(EdgeId(slot as u32))
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id.to_string(), "NodeId(42)");
    }

    #[test]
    fn test_pad_id_addresses_node_and_pad() {
        let pad = PadId::new(NodeId(100), 7);
        assert_eq!(pad.node(), NodeId(100));
        assert_eq!(pad.pad_index(), 7);
    }

    #[test]
    fn test_pad_id_limits() {
        let node = NodeId((1 << 20) - 1);
        let pad = PadId::new(node, (PadId::MAX_PADS - 1) as u16);
        assert_eq!(pad.node(), node);
        assert_eq!(pad.pad_index(), 4095);
    }

    #[test]
    fn test_edge_id() {
        let id = EdgeId(5);
        assert_eq!(id.index(), 5);
        assert_eq!(EdgeId::from_slot(5), Some(id));
    }

    #[test]
    fn test_edge_id_capacity() {
        let last = EdgeId::MAX_EDGES - 1;
        assert_eq!(EdgeId::from_slot(last), Some(EdgeId(u32::MAX - 1)));
        assert_eq!(EdgeId::from_slot(EdgeId::MAX_EDGES), None);
    }
}
