//! Segmentation of a graph into backend-tagged blocks.
//!
//! The boundary-decision pass walks the original graph in evaluation order,
//! builds one [`Block`] per contiguous run of nodes assigned to a backend,
//! registers the values consumed outside each block as block outputs, then
//! attaches shape and type profiles to the recorded block inputs and resolves
//! them. Engine construction consumes the resolved block verbatim.

mod block;
mod shape;

pub use self::block::{Block, BlockId, Target};
pub use self::shape::{DYNAMIC_DIM, ShapeProfile};
