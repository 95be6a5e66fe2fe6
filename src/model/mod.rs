//! Graph arena: nodes, values and their type information.
//!
//! Values are addressed by stable [`OutletId`] handles into the arena, so a
//! block can record provenance into the original graph without borrowing
//! from it.

mod graph;
mod order;

pub use self::graph::Graph;
pub use self::order::eval_order;

use std::fmt;

use itertools::Itertools;

use crate::TVec;
use crate::datum::DatumType;
use crate::ops::Op;

/// Fully determined type information for a value: element type and shape.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TensorFact {
    pub datum_type: DatumType,
    pub shape: TVec<usize>,
}

impl TensorFact {
    pub fn dt_shape(datum_type: DatumType, shape: &[usize]) -> TensorFact {
        TensorFact { datum_type, shape: shape.iter().copied().collect() }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

impl fmt::Debug for TensorFact {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{},{:?}", self.shape.iter().join(","), self.datum_type)
    }
}

/// A node in a graph: a named operation, wired inputs, typed outputs.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: usize,
    pub name: String,
    pub op: Box<dyn Op>,
    pub inputs: Vec<OutletId>,
    pub outputs: TVec<Outlet>,
}

impl Node {
    pub fn op(&self) -> &dyn Op {
        &*self.op
    }

    pub fn is_source(&self) -> bool {
        crate::ops::is_source(&*self.op)
    }
}

/// One output of a node: its type information and the inlets it feeds.
#[derive(Clone, Debug)]
pub struct Outlet {
    pub fact: TensorFact,
    pub successors: TVec<InletId>,
}

/// Identifies a value: the producing node, and the output slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutletId {
    pub node: usize,
    pub slot: usize,
}

impl OutletId {
    pub fn new(node: usize, slot: usize) -> OutletId {
        OutletId { node, slot }
    }
}

impl From<usize> for OutletId {
    fn from(node: usize) -> OutletId {
        OutletId::new(node, 0)
    }
}

impl From<(usize, usize)> for OutletId {
    fn from((node, slot): (usize, usize)) -> OutletId {
        OutletId::new(node, slot)
    }
}

/// Identifies a value consumption site: the consuming node, and the input
/// slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InletId {
    pub node: usize,
    pub slot: usize,
}

impl InletId {
    pub fn new(node: usize, slot: usize) -> InletId {
        InletId { node, slot }
    }
}
