//! Pipeline-specific error types.

use crate::pipeline::id::{EdgeId, NodeId};
use crate::pipeline::pad::PadDirection;
use crate::types::TypeError;
use thiserror::Error;

/// An edge insertion that would close a cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("connecting {from} to {to} would create a cycle")]
pub struct CycleError {
    pub from: NodeId,
    pub to: NodeId,
}

/// Errors returned by graph mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Unknown edge {0}")]
    UnknownEdge(EdgeId),

    #[error("Node {node} has no {direction:?} pad {index}")]
    InvalidPad {
        node: NodeId,
        direction: PadDirection,
        index: usize,
    },

    #[error("Element declares {count} pads, more than a node can address")]
    TooManyPads { count: usize },

    #[error("Graph is full ({capacity} node slots used)")]
    GraphFull { capacity: usize },

    #[error("Graph has no edge slots left ({capacity} used)")]
    TooManyEdges { capacity: usize },

    #[error("Input pad {pad} of node {node} is already connected")]
    InputOccupied { node: NodeId, pad: usize },

    #[error(transparent)]
    CycleDetected(#[from] CycleError),

    #[error("Connection into node {node} rejected: {source}")]
    ConnectionRejected {
        node: NodeId,
        #[source]
        source: TypeError,
    },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
