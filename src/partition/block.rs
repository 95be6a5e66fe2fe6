use std::collections::HashMap;
use std::fmt;

use crate::internal::*;

/// Identifies a block within one partitioning run.
///
/// Reassignable: the partitioner renumbers blocks after merging or
/// splitting.
pub type BlockId = u64;

/// Execution backend that will run a block.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Target {
    /// The general-purpose graph interpreter.
    #[default]
    Host,
    /// The accelerator-specific compiled engine.
    Accelerator,
}

impl fmt::Display for Target {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Target::Host => write!(fmt, "Host"),
            Target::Accelerator => write!(fmt, "Accelerator"),
        }
    }
}

/// A contiguous run of original-graph nodes cloned into a private sub-graph,
/// tagged with the backend that will execute it.
///
/// The block owns its private [`Graph`] outright and refers to the original
/// graph only through [`OutletId`] and node-id handles, so its lifetime is
/// independent of the model it was cut from. Cross-boundary values are
/// materialized lazily: the first time a cloned node consumes a value the
/// block has not seen, the block grows a new input; values consumed outside
/// the block are registered as outputs by the partitioner.
///
/// Once the partition is final, the partitioner attaches a shape envelope
/// and an element type to every recorded input, in input order, and resolves
/// the envelopes into the working shapes engine construction consumes.
///
/// Nothing here is synchronized. A block is built and mutated on one thread;
/// distinct blocks are independent.
#[derive(Clone, Debug, Default)]
pub struct Block {
    id: BlockId,
    target: Target,
    graph: Graph,
    /// original node ids, in inclusion order
    nodes: Vec<usize>,
    /// original-graph values crossing into the block, in discovery order
    inputs: Vec<OutletId>,
    /// original-graph values crossing out of the block, in registration order
    outputs: Vec<OutletId>,
    in_profiles: Vec<ShapeProfile>,
    in_types: Vec<DatumType>,
    /// original value to block-local value
    old_to_new: HashMap<OutletId, OutletId>,
}

impl Block {
    pub fn new(id: BlockId, target: Target) -> Block {
        Block { id, target, ..Block::default() }
    }

    /// Builds a block by cloning `nodes` from `origin` in order.
    pub fn from_nodes(
        id: BlockId,
        target: Target,
        origin: &Graph,
        nodes: &[usize],
    ) -> GraphResult<Block> {
        let mut block = Block::new(id, target);
        for &node in nodes {
            block.clone_node(origin, node)?;
        }
        Ok(block)
    }

    /// The block-local stand-in for an original value, creating a new block
    /// input if the value has not been seen yet.
    ///
    /// Idempotent per original value: every reference to `outlet` resolves
    /// to the same block-local outlet.
    pub fn input_for_value(&mut self, origin: &Graph, outlet: OutletId) -> GraphResult<OutletId> {
        if let Some(local) = self.old_to_new.get(&outlet) {
            return Ok(*local);
        }
        let fact = origin.outlet_fact(outlet)?;
        trace!("block {}: tapping {:?} ({:?}) as new input", self.id, outlet, fact);
        let local =
            self.graph.add_source(format!("incoming-{}/{}", outlet.node, outlet.slot), fact.clone())?;
        self.inputs.push(outlet);
        self.old_to_new.insert(outlet, local);
        Ok(local)
    }

    /// Clones one original node into the private graph, rewiring its
    /// operands through the remapping table and growing the block input list
    /// for operands produced outside the block. Returns the clone's id in
    /// the private graph.
    pub fn clone_node(&mut self, origin: &Graph, node_id: usize) -> GraphResult<usize> {
        ensure!(
            !self.nodes.contains(&node_id),
            "Node {} is already part of block {}",
            node_id,
            self.id
        );
        let node = origin.node(node_id)?;
        let mut wires: TVec<OutletId> = tvec!();
        for outlet in &node.inputs {
            let local = match self.old_to_new.get(outlet) {
                Some(local) => *local,
                None => self.input_for_value(origin, *outlet)?,
            };
            wires.push(local);
        }
        let facts = node.outputs.iter().map(|o| o.fact.clone()).collect();
        let local_id = self.graph.add_node(&*node.name, node.op.clone(), facts)?;
        for (slot, wire) in wires.iter().enumerate() {
            self.graph.add_edge(*wire, InletId::new(local_id, slot))?;
        }
        for slot in 0..node.outputs.len() {
            self.old_to_new.insert(OutletId::new(node_id, slot), OutletId::new(local_id, slot));
        }
        self.nodes.push(node_id);
        Ok(local_id)
    }

    /// [`Block::clone_node`] for callers that do not need the clone handle.
    pub fn append_node(&mut self, origin: &Graph, node_id: usize) -> GraphResult<()> {
        self.clone_node(origin, node_id).map(|_| ())
    }

    /// Exposes an already-cloned value as a block output. Registering the
    /// same value again is a no-op. The value must have been produced by a
    /// node cloned into this block.
    pub fn register_output(&mut self, outlet: OutletId) -> GraphResult<()> {
        let local = *self
            .old_to_new
            .get(&outlet)
            .with_context(|| format!("Value {outlet:?} was never cloned into block {}", self.id))?;
        ensure!(
            !self.graph.node(local.node)?.is_source(),
            "Value {:?} crosses into block {}, it is not produced inside it",
            outlet,
            self.id
        );
        if !self.outputs.contains(&outlet) {
            self.graph.outputs.push(local);
            self.outputs.push(outlet);
        }
        Ok(())
    }

    /// Removes the i-th block input from the bookkeeping list and the
    /// private graph's input list, in lockstep. Later entries shift down by
    /// one. Must run before shape and type profiles are registered.
    pub fn erase_input(&mut self, i: usize) -> GraphResult<()> {
        assert!(
            self.in_profiles.is_empty() && self.in_types.is_empty(),
            "erase inputs before registering shape and type profiles"
        );
        ensure!(i < self.inputs.len(), "No input {} in block {}", i, self.id);
        self.inputs.remove(i);
        self.graph.inputs.remove(i);
        Ok(())
    }

    /// Removes the i-th block output, as [`Block::erase_input`] does for
    /// inputs.
    pub fn erase_output(&mut self, i: usize) -> GraphResult<()> {
        ensure!(i < self.outputs.len(), "No output {} in block {}", i, self.id);
        self.outputs.remove(i);
        self.graph.outputs.remove(i);
        Ok(())
    }

    /// True if the block already references this original value, as an
    /// input or as the output of a cloned node.
    pub fn contains_raw_value(&self, outlet: OutletId) -> bool {
        self.old_to_new.contains_key(&outlet)
    }

    // shape and type profiles

    /// Sets the baseline shape profile for all recorded inputs, in input
    /// order. This fixes the length contract for the opt and max
    /// registrations.
    pub fn register_in_shapes(&mut self, shapes: Vec<ShapeProfile>) {
        assert_eq!(
            shapes.len(),
            self.inputs.len(),
            "one shape profile per recorded block input"
        );
        self.in_profiles = shapes;
    }

    /// Overwrites the optimal snapshot of each input's profile.
    pub fn register_opt_shapes(&mut self, shapes: &[TVec<usize>]) {
        assert_eq!(
            self.in_profiles.len(),
            shapes.len(),
            "opt shape list length must match registered inputs"
        );
        for (profile, shape) in self.in_profiles.iter_mut().zip(shapes) {
            profile.set_opt(shape);
        }
    }

    /// Overwrites the maximum snapshot of each input's profile.
    pub fn register_max_shapes(&mut self, shapes: &[TVec<usize>]) {
        assert_eq!(
            self.in_profiles.len(),
            shapes.len(),
            "max shape list length must match registered inputs"
        );
        for (profile, shape) in self.in_profiles.iter_mut().zip(shapes) {
            profile.set_max(shape);
        }
    }

    /// Collapses each input's min/opt/max envelope into its working shape,
    /// marking axes on which the snapshots disagree as dynamic.
    ///
    /// Call exactly once, after all three snapshot kinds are registered for
    /// every input: resolving a partially registered envelope yields a stale
    /// working shape, which this method cannot detect.
    pub fn resolve_dynamic_shapes(&mut self) {
        for (ix, profile) in self.in_profiles.iter_mut().enumerate() {
            profile.resolve();
            if profile.is_dynamic() {
                debug!("block {}: input {} resolved to dynamic shape {}", self.id, ix, profile);
            }
        }
    }

    pub fn in_shapes(&self) -> &[ShapeProfile] {
        &self.in_profiles
    }

    pub fn register_in_types(&mut self, types: Vec<DatumType>) {
        assert_eq!(types.len(), self.inputs.len(), "one element type per recorded block input");
        self.in_types = types;
    }

    pub fn in_types(&self) -> &[DatumType] {
        &self.in_types
    }

    // accessors

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn set_id(&mut self, id: BlockId) {
        self.id = id;
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn set_target(&mut self, target: Target) {
        self.target = target;
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Swaps the whole private graph, for passes that rewrite a block
    /// wholesale. The caller is responsible for re-establishing
    /// input/output consistency afterwards.
    pub fn update_graph(&mut self, graph: Graph) {
        self.graph = graph;
    }

    /// Original node ids cloned into this block, in inclusion order.
    pub fn raw_nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Original-graph values feeding this block, in discovery order.
    pub fn raw_inputs(&self) -> &[OutletId] {
        &self.inputs
    }

    /// Original-graph values this block exposes, in registration order.
    pub fn raw_outputs(&self) -> &[OutletId] {
        &self.outputs
    }

    /// Block-local input values, index-aligned with [`Block::raw_inputs`].
    pub fn inputs(&self) -> &[OutletId] {
        &self.graph.inputs
    }

    /// Block-local output values, index-aligned with [`Block::raw_outputs`].
    pub fn outputs(&self) -> &[OutletId] {
        &self.graph.outputs
    }
}

impl fmt::Display for Block {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "Block #{} ({}) [{} nodes, {} inputs, {} outputs]",
            self.id,
            self.target,
            self.nodes.len(),
            self.inputs.len(),
            self.outputs.len()
        )
    }
}
