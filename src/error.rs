use hedron::{AttributeKey, MeshError};

use crate::source::Topology;

/// Errors produced while converting a mesh. Each one concerns a single primitive or mesh; none of
/// them abort the conversion of sibling meshes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("primitives of topology {0:?} cannot be converted")]
    UnsupportedTopology(Topology),
    #[error("face vertex counts address {required} indices, but only {available} are present")]
    MalformedFaces { required: usize, available: usize },
    #[error("index {index} is below the list's initial index {base}")]
    IndexBelowBase { index: u32, base: u32 },
    #[error("index {index} into {key} is out of range: 0..{count} ∌ {index}")]
    IndexOutOfRange {
        key: AttributeKey,
        index: u32,
        count: usize,
    },
    #[error("vertex count {0} cannot be addressed by a 32-bit index")]
    TooManyVertices(usize),
    #[error("vertex ceiling {max_vertices} cannot hold a single element of {required} vertices")]
    InvalidCeiling {
        max_vertices: usize,
        required: usize,
    },
    #[error("connected primitive uses {vertices} vertices, which exceeds the ceiling of {max_vertices}")]
    PrimitiveTooLarge { vertices: usize, max_vertices: usize },
}
