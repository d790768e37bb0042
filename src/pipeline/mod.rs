//! Typed pipeline graph.
//!
//! Elements declare typed pads; the graph connects them and keeps every node
//! type-checked as the user edits.
//!
//! # Architecture
//!
//! ```text
//! [Constant int[3]]   ──► v0 ┐
//!                            [Matrix Multiply] ──► v1 ──► ...
//! [Constant int[3,3]] ──► M  ┘
//! ```
//!
//! # Design
//!
//! - **Enum dispatch for built-ins**: `BuiltinElement` covers shipped elements,
//!   plugin elements are boxed `dyn Element`.
//! - **Check on connect**: an edge is only added if the target accepts the
//!   source type.
//! - **Cascading re-validation**: every change re-checks downstream nodes in
//!   topological order.
//! - **Stable ids**: `NodeId` and `EdgeId` index tombstoned slot vectors.

pub mod cascade;
pub mod element;
pub mod element_kind;
pub mod elements;
pub mod error;
pub mod graph;
pub mod id;
pub mod pad;
pub mod snapshot;

pub use cascade::CascadePlanner;
pub use element::{check_declared, ensure_arity, AnyElement, BuiltinElement, ConfigValue, Element};
pub use element_kind::ElementKind;
pub use elements::{ConstantElement, MatrixMultiplyElement, PixmapElement};
pub use error::{CycleError, PipelineError, PipelineResult};
pub use graph::{Edge, EdgeState, NodeSlot, NodeStatus, Pipeline};
pub use id::{EdgeId, NodeId, PadId};
pub use pad::{PadConstraint, PadDeclaration, PadDirection};
pub use snapshot::{EdgeSnapshot, NodeSnapshot, TopologySnapshot};
