//! Operation objects attached to graph nodes.
//!
//! The segmenter never evaluates an operation: ops only need an identity (a
//! kind name), cheap cloning when a node is copied into a block, and enough
//! introspection to tell sources apart from computing nodes. Clients wrap
//! their real operation payloads behind this trait.

use std::borrow::Cow;

use derive_new::new;
use downcast_rs::{Downcast, impl_downcast};

pub trait Op: std::fmt::Debug + dyn_clone::DynClone + Downcast + Send + Sync + 'static {
    /// The operation kind name ("conv2d", "relu", "Source"...).
    fn name(&self) -> Cow<'_, str>;
}

impl_downcast!(Op);
dyn_clone::clone_trait_object!(Op);

impl<O: Op> From<O> for Box<dyn Op> {
    fn from(op: O) -> Box<dyn Op> {
        Box::new(op)
    }
}

/// The operation behind every graph input, including the block inputs
/// created on demand while cloning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, new)]
pub struct Source;

impl Op for Source {
    fn name(&self) -> Cow<'_, str> {
        "Source".into()
    }
}

/// An operation the segmenter does not interpret, identified only by its
/// kind name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Opaque {
    pub name: String,
}

impl Opaque {
    pub fn new(name: impl Into<String>) -> Opaque {
        Opaque { name: name.into() }
    }
}

impl Op for Opaque {
    fn name(&self) -> Cow<'_, str> {
        (&*self.name).into()
    }
}

pub fn is_source(op: &dyn Op) -> bool {
    op.downcast_ref::<Source>().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_identification() {
        let source: Box<dyn Op> = Source::new().into();
        let relu: Box<dyn Op> = Opaque::new("relu").into();
        assert!(is_source(&*source));
        assert!(!is_source(&*relu));
        assert_eq!(relu.name(), "relu");
    }
}
