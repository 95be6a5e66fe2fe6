//! # Blockgraph
//!
//! Backend-aware segmentation of typed computation graphs.
//!
//! A partitioning pass splits one computation graph into an ordered sequence
//! of contiguous sub-graphs ("blocks"), each tagged with the backend that
//! will execute it: the general-purpose host interpreter, or an accelerator
//! engine compiled ahead of time. This crate provides the block data
//! structure such a pass manipulates:
//!
//! * cloning original nodes into a block's private graph while preserving
//!   dataflow,
//! * discovering values that cross the block boundary and materializing them
//!   as explicit block inputs and outputs,
//! * registering per-input minimum/optimal/maximum shape profiles and
//!   element types, and resolving the profiles into a working shape where
//!   disagreeing axes become dynamic dimensions.
//!
//! Deciding where block boundaries go, compiling a block for its backend,
//! and dispatching between blocks at runtime are the caller's business.
//!
//! ## Example
//!
//! ```
//! use blockgraph::internal::*;
//!
//! # fn main() -> GraphResult<()> {
//! // original graph: a -> b -> c
//! let fact = TensorFact::dt_shape(DatumType::F32, &[1, 3, 224, 224]);
//! let mut model = Graph::default();
//! let a = model.add_source("a", fact.clone())?;
//! let b = model.add_node("b", Opaque::new("relu"), tvec!(fact.clone()))?;
//! model.add_edge(a, InletId::new(b, 0))?;
//! let c = model.add_node("c", Opaque::new("softmax"), tvec!(fact.clone()))?;
//! model.add_edge(OutletId::new(b, 0), InletId::new(c, 0))?;
//! model.auto_outputs()?;
//!
//! // segment {b} out for the accelerator
//! let mut block = Block::from_nodes(0, Target::Accelerator, &model, &[b])?;
//! block.register_output(OutletId::new(b, 0))?;
//! assert_eq!(block.raw_inputs(), &[a]);
//!
//! // declare the shape envelope for the block input, then resolve it
//! block.register_in_shapes(vec![ShapeProfile::fixed(&[1, 3, 224, 224])]);
//! block.register_opt_shapes(&[tvec!(1, 3, 224, 224)]);
//! block.register_max_shapes(&[tvec!(4, 3, 224, 224)]);
//! block.register_in_types(vec![DatumType::F32]);
//! block.resolve_dynamic_shapes();
//!
//! assert_eq!(block.in_shapes()[0].shape(), &[-1, 3, 224, 224]);
//! assert!(block.in_shapes()[0].is_dynamic());
//! # Ok(())
//! # }
//! ```

/// A SmallVec instantiation with 4 embeddable values.
///
/// Used about everywhere, for node inputs and outputs, and for tensor
/// dimensions.
pub type TVec<T> = smallvec::SmallVec<[T; 4]>;

/// This crate's Result type, from anyhow.
pub type GraphResult<T> = anyhow::Result<T>;

#[macro_export]
macro_rules! tvec {
    ($elem:expr; $n:expr) => ($crate::TVec::from_elem($elem, $n));
    ($($x:expr),* $(,)?) => ({
        #[allow(unused_mut)]
        let mut vec = $crate::TVec::new();
        $(vec.push($x);)*
        vec
    });
}

pub mod datum;
pub mod model;
pub mod ops;
pub mod partition;

pub mod prelude {
    pub use crate::datum::DatumType;
    pub use crate::model::{Graph, InletId, Node, Outlet, OutletId, TensorFact};
    pub use crate::ops::{Op, Opaque, Source};
    pub use crate::partition::{Block, BlockId, ShapeProfile, Target};
    pub use crate::tvec;
    pub use crate::{GraphResult, TVec};
}

pub mod internal {
    pub use crate::model::eval_order;
    pub use crate::prelude::*;
    pub use anyhow::{Context, bail, ensure, format_err};
    pub use log::{debug, error, info, trace, warn};
}
