use std::fmt;

use itertools::Itertools;

use crate::internal::*;

/// Marker for an axis left unconstrained after profile resolution.
pub const DYNAMIC_DIM: i64 = -1;

/// The minimum/optimal/maximum shape envelope declared for one block input,
/// and the working shape resolved from it.
///
/// The three snapshots share a rank, enforced at construction. The working
/// shape starts out as the optimal snapshot and is recomputed by
/// [`Block::resolve_dynamic_shapes`](super::Block::resolve_dynamic_shapes)
/// once the whole envelope is registered: axes on which the snapshots agree
/// stay fixed, the others become [`DYNAMIC_DIM`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeProfile {
    min: TVec<usize>,
    opt: TVec<usize>,
    max: TVec<usize>,
    shape: TVec<i64>,
    dynamic: bool,
}

impl ShapeProfile {
    /// Profile for an input whose shape is the same across the whole
    /// envelope.
    pub fn fixed(shape: &[usize]) -> ShapeProfile {
        let dims: TVec<usize> = shape.iter().copied().collect();
        ShapeProfile {
            min: dims.clone(),
            opt: dims.clone(),
            max: dims.clone(),
            shape: dims.iter().map(|&d| d as i64).collect(),
            dynamic: false,
        }
    }

    /// Profile from three distinct snapshots. The ranks must agree.
    pub fn ranged(min: &[usize], opt: &[usize], max: &[usize]) -> GraphResult<ShapeProfile> {
        ensure!(
            min.len() == opt.len() && opt.len() == max.len(),
            "Mismatched ranks in shape envelope: min {:?}, opt {:?}, max {:?}",
            min,
            opt,
            max
        );
        Ok(ShapeProfile {
            min: min.iter().copied().collect(),
            opt: opt.iter().copied().collect(),
            max: max.iter().copied().collect(),
            shape: opt.iter().map(|&d| d as i64).collect(),
            dynamic: false,
        })
    }

    pub fn rank(&self) -> usize {
        self.opt.len()
    }

    pub fn min(&self) -> &[usize] {
        &self.min
    }

    pub fn opt(&self) -> &[usize] {
        &self.opt
    }

    pub fn max(&self) -> &[usize] {
        &self.max
    }

    /// The working shape downstream engine construction consumes. Only
    /// meaningful once the block has resolved its profiles.
    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    /// True if any axis of the working shape is unconstrained.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub(crate) fn set_opt(&mut self, dims: &[usize]) {
        assert_eq!(self.rank(), dims.len(), "opt snapshot rank must match the profile rank");
        self.opt = dims.iter().copied().collect();
    }

    pub(crate) fn set_max(&mut self, dims: &[usize]) {
        assert_eq!(self.rank(), dims.len(), "max snapshot rank must match the profile rank");
        self.max = dims.iter().copied().collect();
    }

    /// Recompute the working shape from the envelope. An axis is fixed when
    /// min, opt and max agree on it.
    pub(crate) fn resolve(&mut self) {
        self.dynamic = false;
        self.shape = (0..self.rank())
            .map(|ix| {
                if self.min[ix] == self.opt[ix] && self.opt[ix] == self.max[ix] {
                    self.opt[ix] as i64
                } else {
                    self.dynamic = true;
                    DYNAMIC_DIM
                }
            })
            .collect();
    }
}

impl fmt::Display for ShapeProfile {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{}",
            self.shape
                .iter()
                .map(|&d| if d == DYNAMIC_DIM { "?".to_string() } else { d.to_string() })
                .join("x")
        )
    }
}
