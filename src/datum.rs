//! Element types carried by graph values.

/// The element type of a tensor value.
///
/// Registered per block input so that the backend engine builder knows what
/// buffers to allocate without going back to the original graph. The
/// segmenter only records and hands back these tags; interpreting them is
/// the engine builder's business.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum DatumType {
    Bool,
    U8,
    I8,
    I32,
    I64,
    F16,
    F32,
    F64,
}
