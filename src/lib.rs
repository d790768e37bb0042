//! # Fyre Pipeline: typed element graphs for the Fyre node editor
//!
//! Elements declare typed input and output pads. The pipeline graph wires
//! them together and keeps every node type-checked while the user edits:
//! connecting, disconnecting or reconfiguring a node re-checks everything
//! downstream of it.
//!
//! ## Architecture
//!
//! - **Types**: concrete type descriptors (`int`, `float[3,4]`, `pair(int)`,
//!   `color`, `image`) and relaxed type classes for pad constraints
//! - **Pipeline**: the element contract, built-in elements and the graph with
//!   cascading re-validation
//! - **Plugin**: discovery of element plugins in dynamic libraries and the
//!   published element catalog
//! - **Config**: TOML editor configuration in the app data directory
//!
//! ## Example
//!
//! ```ignore
//! use fyre_pipeline::{
//!     config::EditorConfig,
//!     pipeline::Pipeline,
//!     plugin::{DylibLoader, PluginRegistry},
//! };
//! use std::sync::Arc;
//!
//! let config = EditorConfig::load_or_default();
//! let registry = PluginRegistry::from_config(Arc::new(DylibLoader), &config);
//! registry.refresh();
//!
//! let mut pipeline = Pipeline::new();
//! let v = pipeline.add_node(registry.create_element("Constant")?)?;
//! let mul = pipeline.add_node(registry.create_element("Matrix Multiply")?)?;
//! pipeline.add_edge(v, 0, mul, 0)?;
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod plugin;
pub mod types;

// Re-export commonly used types
pub use config::EditorConfig;
pub use error::{FyreError, Result, ResultExt};
pub use pipeline::{AnyElement, Element, EdgeState, NodeStatus, Pipeline};
pub use plugin::{Catalog, PluginRegistry};
pub use types::{ScalarKind, TypeClass, TypeDescriptor, TypeError};
