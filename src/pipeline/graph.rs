//! Pipeline graph with typed nodes, edges and cascading re-validation.
//!
//! Every mutation runs to completion before returning:
//! 1. Validate ids, pads, input occupancy and acyclicity.
//! 2. Type-check the affected node against a trial set of inputs.
//! 3. Commit the change.
//! 4. Re-check every node downstream of it, in topological order.
//!
//! A rejected mutation leaves the graph untouched.

use crate::pipeline::cascade::CascadePlanner;
use crate::pipeline::element::{AnyElement, ConfigValue, Element};
use crate::pipeline::error::{CycleError, PipelineError, PipelineResult};
use crate::pipeline::id::{EdgeId, NodeId, PadId};
use crate::pipeline::pad::PadDirection;
use crate::pipeline::snapshot::{EdgeSnapshot, NodeSnapshot, TopologySnapshot};
use crate::types::{TypeDescriptor, TypeError};
use serde::{Deserialize, Serialize};

/// Validation state of an edge.
///
/// `Unvalidated → Valid → Invalid`; an invalid edge becomes valid again once
/// a re-check succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeState {
    /// The source has not produced a type yet.
    Unvalidated,
    Valid,
    /// A check failed on this edge, or its source lost a type it once had.
    Invalid,
}

/// Validation state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Some input is unconnected or has no known type.
    Pending,
    Valid,
    Invalid,
}

/// An edge from an output pad of one node to an input pad of another.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub from: PadId,
    pub to: PadId,
    pub state: EdgeState,
}

/// A slot holding a node and its validation results.
pub struct NodeSlot {
    pub element: AnyElement,
    /// Incoming edge per input pad.
    pub inputs: Vec<Option<EdgeId>>,
    /// Validated output types, one per output pad.
    pub output_types: Option<Vec<TypeDescriptor>>,
    pub status: NodeStatus,
    pub rejection: Option<TypeError>,
}

impl NodeSlot {
    pub fn new(element: AnyElement) -> Self {
        let inputs = vec![None; element.input_pads().len()];
        Self {
            element,
            inputs,
            output_types: None,
            status: NodeStatus::Pending,
            rejection: None,
        }
    }
}

/// The pipeline graph.
///
/// Node and edge slots are never reused: a removed node or edge leaves a
/// tombstone, so ids stay unique for the lifetime of the graph.
pub struct Pipeline {
    nodes: Vec<Option<NodeSlot>>,
    edges: Vec<Option<Edge>>,
    /// Bumped on every committed mutation.
    generation: u64,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            generation: 0,
        }
    }

    // ── Graph building ──

    /// Add a node to the pipeline and check it. Returns its NodeId.
    pub fn add_node(&mut self, element: impl Into<AnyElement>) -> PipelineResult<NodeId> {
        let element = element.into();
        let count = element.input_pads().len().max(element.output_pads().len());
        if count > PadId::MAX_PADS {
            return Err(PipelineError::TooManyPads { count });
        }
        if self.nodes.len() >= PadId::MAX_NODES {
            return Err(PipelineError::GraphFull {
                capacity: PadId::MAX_NODES,
            });
        }

        let id = NodeId(self.nodes.len() as u32);
        tracing::info!("Added node {:?} ({})", id, element.name());
        self.nodes.push(Some(NodeSlot::new(element)));
        self.generation += 1;
        self.revalidate_from(&[id]);
        Ok(id)
    }

    /// Remove a node and every edge touching it. Returns the element.
    pub fn remove_node(&mut self, id: NodeId) -> PipelineResult<AnyElement> {
        self.slot(id)?;

        let incident: Vec<EdgeId> = self
            .live_edges()
            .filter(|e| e.from.node() == id || e.to.node() == id)
            .map(|e| e.id)
            .collect();

        let mut downstream = Vec::new();
        for edge_id in incident {
            if let Some(edge) = self.detach_edge(edge_id) {
                if edge.to.node() != id {
                    downstream.push(edge.to.node());
                }
            }
        }

        let slot = self.nodes[id.index()]
            .take()
            .ok_or(PipelineError::UnknownNode(id))?;
        self.generation += 1;
        self.revalidate_from(&downstream);

        tracing::info!("Removed node {:?} ({})", id, slot.element.name());
        Ok(slot.element)
    }

    /// Connect output pad `out_pad` of `from` to input pad `in_pad` of `to`.
    ///
    /// When the source type is known the connection is type-checked first; a
    /// rejected connection is never added.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        out_pad: usize,
        to: NodeId,
        in_pad: usize,
    ) -> PipelineResult<EdgeId> {
        let source = self.slot(from)?;
        if out_pad >= source.element.output_pads().len() {
            return Err(PipelineError::InvalidPad {
                node: from,
                direction: PadDirection::Output,
                index: out_pad,
            });
        }
        let source_type = source
            .output_types
            .as_ref()
            .and_then(|types| types.get(out_pad))
            .cloned();

        let target = self.slot(to)?;
        if in_pad >= target.inputs.len() {
            return Err(PipelineError::InvalidPad {
                node: to,
                direction: PadDirection::Input,
                index: in_pad,
            });
        }
        if target.inputs[in_pad].is_some() {
            return Err(PipelineError::InputOccupied {
                node: to,
                pad: in_pad,
            });
        }

        if CascadePlanner::would_create_cycle(&self.adjacency(), from.index(), to.index()) {
            return Err(CycleError { from, to }.into());
        }

        if let Some(ty) = &source_type {
            self.trial_check(to, in_pad, ty)
                .map_err(|source| PipelineError::ConnectionRejected { node: to, source })?;
        }

        let id = EdgeId::from_slot(self.edges.len()).ok_or(PipelineError::TooManyEdges {
            capacity: EdgeId::MAX_EDGES,
        })?;
        self.edges.push(Some(Edge {
            id,
            from: PadId::new(from, out_pad as u16),
            to: PadId::new(to, in_pad as u16),
            state: EdgeState::Unvalidated,
        }));
        if let Some(slot) = self.nodes[to.index()].as_mut() {
            slot.inputs[in_pad] = Some(id);
        }
        self.generation += 1;
        self.revalidate_from(&[to]);

        tracing::info!(
            "Added edge {:?}: {:?}[{}] -> {:?}[{}]",
            id,
            from,
            out_pad,
            to,
            in_pad
        );
        Ok(id)
    }

    /// Remove an edge and re-check everything downstream of it.
    pub fn remove_edge(&mut self, id: EdgeId) -> PipelineResult<()> {
        let edge = self.detach_edge(id).ok_or(PipelineError::UnknownEdge(id))?;
        self.generation += 1;
        self.revalidate_from(&[edge.to.node()]);
        tracing::info!("Removed edge {:?}", id);
        Ok(())
    }

    /// Apply a setting to a node's element. When the element reports that its
    /// outputs may have changed, the node and everything downstream is
    /// re-checked. Returns whether that happened.
    pub fn configure_node(
        &mut self,
        id: NodeId,
        key: &str,
        value: &ConfigValue,
    ) -> PipelineResult<bool> {
        let changed = self.slot_mut(id)?.element.configure(key, value);
        if changed {
            self.generation += 1;
            self.revalidate_from(&[id]);
        }
        Ok(changed)
    }

    // ── Queries ──

    pub fn node(&self, id: NodeId) -> Option<&AnyElement> {
        self.slot(id).ok().map(|slot| &slot.element)
    }

    /// Validated output types of a node, one per output pad.
    pub fn output_types(&self, id: NodeId) -> Option<&[TypeDescriptor]> {
        self.slot(id).ok()?.output_types.as_deref()
    }

    pub fn node_status(&self, id: NodeId) -> Option<NodeStatus> {
        self.slot(id).ok().map(|slot| slot.status)
    }

    /// Why the node's last check failed.
    pub fn rejection(&self, id: NodeId) -> Option<&TypeError> {
        self.slot(id).ok()?.rejection.as_ref()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    pub fn edge_state(&self, id: EdgeId) -> Option<EdgeState> {
        self.edge(id).map(|e| e.state)
    }

    /// The edge feeding input pad `pad` of `node`, if connected.
    pub fn incoming_edge(&self, node: NodeId, pad: usize) -> Option<EdgeId> {
        self.slot(node).ok()?.inputs.get(pad).copied().flatten()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| NodeId(i as u32))
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.live_edges()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges().count()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All live nodes in dataflow order.
    pub fn topological_order(&self) -> Vec<NodeId> {
        let live: Vec<bool> = self.nodes.iter().map(Option::is_some).collect();
        CascadePlanner::topological_sort(&self.adjacency(), &live)
            .into_iter()
            .map(|i| NodeId(i as u32))
            .collect()
    }

    /// Snapshot of the whole graph for the editor.
    pub fn topology(&self) -> TopologySnapshot {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|slot| (i, slot)))
            .map(|(i, slot)| NodeSnapshot {
                id: NodeId(i as u32),
                name: slot.element.name().to_string(),
                category: slot.element.category().to_string(),
                description: slot.element.description().to_string(),
                inputs: slot.element.input_pads().to_vec(),
                outputs: slot.element.output_pads().to_vec(),
                status: slot.status,
                output_types: slot.output_types.clone(),
                rejection: slot.rejection.as_ref().map(ToString::to_string),
            })
            .collect();

        let edges = self
            .live_edges()
            .map(|e| EdgeSnapshot {
                id: e.id,
                from_node: e.from.node(),
                from_pad: e.from.pad_index(),
                to_node: e.to.node(),
                to_pad: e.to.pad_index(),
                state: e.state,
            })
            .collect();

        TopologySnapshot {
            generation: self.generation,
            nodes,
            edges,
        }
    }

    // ── Internals ──

    fn slot(&self, id: NodeId) -> PipelineResult<&NodeSlot> {
        self.nodes
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(PipelineError::UnknownNode(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> PipelineResult<&mut NodeSlot> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(PipelineError::UnknownNode(id))
    }

    fn live_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter_map(Option::as_ref)
    }

    fn adjacency(&self) -> Vec<Vec<usize>> {
        CascadePlanner::build_adjacency(
            self.nodes.len(),
            self.live_edges()
                .map(|e| (e.from.node().index(), e.to.node().index())),
        )
    }

    /// Take an edge out of the graph and free its target input pad.
    fn detach_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id.index())?.take()?;
        if let Some(slot) = self
            .nodes
            .get_mut(edge.to.node().index())
            .and_then(Option::as_mut)
        {
            if let Some(incoming) = slot.inputs.get_mut(edge.to.pad_index()) {
                *incoming = None;
            }
        }
        Some(edge)
    }

    /// Type currently produced at an edge's source pad.
    fn edge_source_type(&self, id: EdgeId) -> Option<&TypeDescriptor> {
        let edge = self.edge(id)?;
        self.nodes
            .get(edge.from.node().index())?
            .as_ref()?
            .output_types
            .as_ref()?
            .get(edge.from.pad_index())
    }

    /// Check `to` as if `ty` were connected to `in_pad`, without mutating.
    ///
    /// The element's own check only runs when every other input already
    /// carries a type and none of those edges is invalid.
    fn trial_check(&self, to: NodeId, in_pad: usize, ty: &TypeDescriptor) -> Result<(), TypeError> {
        let Ok(target) = self.slot(to) else {
            return Ok(());
        };

        let decl = &target.element.input_pads()[in_pad];
        if !decl.constraint.accepts(ty) {
            return Err(TypeError::Constraint {
                pad: in_pad,
                expected: decl.constraint.to_string(),
                found: ty.clone(),
            });
        }

        let mut types = Vec::with_capacity(target.inputs.len());
        for (pad, incoming) in target.inputs.iter().enumerate() {
            if pad == in_pad {
                types.push(ty.clone());
                continue;
            }
            let Some(edge_id) = *incoming else {
                return Ok(());
            };
            if self.edge_state(edge_id) == Some(EdgeState::Invalid) {
                return Ok(());
            }
            match self.edge_source_type(edge_id) {
                Some(other) => types.push(other.clone()),
                None => return Ok(()),
            }
        }

        let outputs = target.element.check(&types)?;
        Self::ensure_output_count(&target.element, outputs).map(|_| ())
    }

    fn ensure_output_count(
        element: &AnyElement,
        outputs: Vec<TypeDescriptor>,
    ) -> Result<Vec<TypeDescriptor>, TypeError> {
        let expected = element.output_pads().len();
        if outputs.len() != expected {
            return Err(TypeError::Rejected(format!(
                "{} produced {} output types for {} output pads",
                element.name(),
                outputs.len(),
                expected
            )));
        }
        Ok(outputs)
    }

    /// Re-check `roots` and everything downstream of them.
    fn revalidate_from(&mut self, roots: &[NodeId]) {
        let roots: Vec<usize> = roots
            .iter()
            .map(|id| id.index())
            .filter(|&i| matches!(self.nodes.get(i), Some(Some(_))))
            .collect();
        if roots.is_empty() {
            return;
        }

        for idx in CascadePlanner::plan(&roots, &self.adjacency()) {
            self.revalidate_node(NodeId(idx as u32));
        }
    }

    /// Recompute one node's status and outputs from its current inputs, and
    /// update the state of every incoming edge.
    fn revalidate_node(&mut self, id: NodeId) {
        let Ok(slot) = self.slot(id) else {
            return;
        };

        let mut types = Vec::with_capacity(slot.inputs.len());
        let mut complete = true;
        let mut typed_edges = Vec::new();
        let mut untyped_edges = Vec::new();
        let mut constraint_error = None;

        for (pad, incoming) in slot.inputs.iter().enumerate() {
            let Some(edge) = incoming.and_then(|edge_id| self.edge(edge_id)) else {
                complete = false;
                continue;
            };
            let upstream = self
                .nodes
                .get(edge.from.node().index())
                .and_then(Option::as_ref);

            match upstream
                .and_then(|u| u.output_types.as_ref())
                .and_then(|types| types.get(edge.from.pad_index()))
            {
                Some(ty) => {
                    let decl = &slot.element.input_pads()[pad];
                    if constraint_error.is_none() && !decl.constraint.accepts(ty) {
                        constraint_error = Some(TypeError::Constraint {
                            pad,
                            expected: decl.constraint.to_string(),
                            found: ty.clone(),
                        });
                    }
                    types.push(ty.clone());
                    typed_edges.push(edge.id);
                }
                None => {
                    complete = false;
                    let upstream_failed =
                        upstream.map_or(false, |u| u.status == NodeStatus::Invalid);
                    let state = if upstream_failed || edge.state != EdgeState::Unvalidated {
                        EdgeState::Invalid
                    } else {
                        EdgeState::Unvalidated
                    };
                    untyped_edges.push((edge.id, state));
                }
            }
        }

        let (status, outputs, rejection) = match constraint_error {
            Some(err) => (NodeStatus::Invalid, None, Some(err)),
            None if complete => match slot
                .element
                .check(&types)
                .and_then(|outs| Self::ensure_output_count(&slot.element, outs))
            {
                Ok(outs) => (NodeStatus::Valid, Some(outs), None),
                Err(err) => (NodeStatus::Invalid, None, Some(err)),
            },
            None => (NodeStatus::Pending, None, None),
        };

        if let Some(err) = &rejection {
            tracing::debug!("Node {:?} ({}) rejected: {}", id, slot.element.name(), err);
        }

        let typed_state = if status == NodeStatus::Invalid {
            EdgeState::Invalid
        } else {
            EdgeState::Valid
        };
        for edge_id in typed_edges {
            self.set_edge_state(edge_id, typed_state);
        }
        for (edge_id, state) in untyped_edges {
            self.set_edge_state(edge_id, state);
        }

        if let Ok(slot) = self.slot_mut(id) {
            slot.status = status;
            slot.output_types = outputs;
            slot.rejection = rejection;
        }
    }

    fn set_edge_state(&mut self, id: EdgeId, state: EdgeState) {
        if let Some(Some(edge)) = self.edges.get_mut(id.index()) {
            edge.state = state;
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
