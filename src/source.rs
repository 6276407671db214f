//! In-memory description of a parsed source mesh, as produced by an external scene reader.
//!
//! # Notes
//!
//! * Vertex values are mesh-level: every primitive of a mesh indexes into the same position,
//!   normal, texcoord, and color containers.
//! * Each primitive carries a separate index list per attribute, so a face-vertex may use position
//!   `i`, normal `j`, and texcoord `k`.
//! * A container may pack several named sets (ex. two UV channels) back to back in one array.

use hedron::{ComponentType, Semantic};

/// Source primitive topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    Lines,
    LineStrips,
    Polygons,
    Polylist,
    #[default]
    Triangles,
    TriangleFans,
    TriangleStrips,
    Points,
    /// Anything the reader couldn't classify; never converted.
    Undefined,
}

impl Topology {
    /// Whether faces of this topology have variable arity and must be triangulated.
    pub const fn is_polygonal(self) -> bool {
        matches!(self, Topology::Polygons | Topology::Polylist)
    }
}

/// A list of indices into one vertex-value container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexList {
    pub indices: Vec<u32>,
    /// Base added to every index by the reader; subtracted again during conversion.
    pub initial_index: u32,
}

impl IndexList {
    pub fn new(indices: impl Into<Vec<u32>>) -> Self {
        Self {
            indices: indices.into(),
            initial_index: 0,
        }
    }

    pub fn with_initial_index(mut self, initial_index: u32) -> Self {
        self.initial_index = initial_index;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<Vec<u32>> for IndexList {
    fn from(indices: Vec<u32>) -> Self {
        Self::new(indices)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourcePrimitive {
    pub topology: Topology,
    pub material_id: u32,
    pub position_indices: IndexList,
    pub normal_indices: Option<IndexList>,
    pub color_indices: Vec<IndexList>,
    pub texcoord_indices: Vec<IndexList>,
    /// Number of vertices of each face; only meaningful for polygonal topologies.
    pub face_vertex_counts: Vec<u32>,
}

/// Description of one named set within a [VertexData] container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputInfo {
    pub name: String,
    /// Components per element.
    pub stride: usize,
    /// Number of values (not elements) belonging to this set; zero means "all values".
    pub length: usize,
}

impl InputInfo {
    pub fn new(name: impl Into<String>, stride: usize, length: usize) -> Self {
        Self {
            name: name.into(),
            stride,
            length,
        }
    }
}

/// How the sets of a [VertexData] container are described.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputLayout {
    /// Per-set metadata, in packing order.
    Declared(Vec<InputInfo>),
    /// The reader provided no per-set metadata. The whole container is treated as a single set
    /// of three-component elements; only valid for positions and normals.
    #[default]
    Unannotated,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum VertexValues {
    Float(Vec<f32>),
    Double(Vec<f64>),
    #[default]
    Unknown,
}

impl VertexValues {
    /// Number of scalar values.
    pub fn len(&self) -> usize {
        match self {
            VertexValues::Float(v) => v.len(),
            VertexValues::Double(v) => v.len(),
            VertexValues::Unknown => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The declared component type, or `None` if the reader couldn't determine one.
    pub fn component_type(&self) -> Option<ComponentType> {
        match self {
            VertexValues::Float(_) => Some(ComponentType::F32),
            VertexValues::Double(_) => Some(ComponentType::F64),
            VertexValues::Unknown => None,
        }
    }
}

/// A container of vertex values for one semantic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexData {
    pub values: VertexValues,
    pub layout: InputLayout,
}

impl VertexData {
    pub fn new(values: VertexValues, layout: InputLayout) -> Self {
        Self { values, layout }
    }

    /// A single declared set of `f32` values.
    pub fn float_set(name: impl Into<String>, stride: usize, values: Vec<f32>) -> Self {
        let length = values.len();
        Self {
            values: VertexValues::Float(values),
            layout: InputLayout::Declared(vec![InputInfo::new(name, stride, length)]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceMesh {
    pub id: String,
    pub name: String,
    pub primitives: Vec<SourcePrimitive>,
    pub positions: VertexData,
    pub normals: VertexData,
    pub texcoords: VertexData,
    pub colors: VertexData,
}

impl SourceMesh {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// The mesh-level vertex container for `semantic`, if sources of that kind exist.
    pub fn vertex_data(&self, semantic: Semantic) -> Option<&VertexData> {
        match semantic {
            Semantic::Position => Some(&self.positions),
            Semantic::Normal => Some(&self.normals),
            Semantic::Texcoord => Some(&self.texcoords),
            Semantic::Color => Some(&self.colors),
            _ => None,
        }
    }
}
