use crate::{buffer::Buffer, primitive::attribute::AttributeKey, MeshError};

pub mod attribute;

/// GL primitive topology.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    Points = 0,
    Lines = 1,
    LineLoop = 2,
    LineStrip = 3,
    #[default]
    Triangles = 4,
    TriangleStrip = 5,
    TriangleFan = 6,
}

impl Mode {
    #[inline]
    pub fn to_gl(self) -> u32 {
        self as u32
    }

    /// Number of indices per independent element for list topologies; `None` for connected
    /// topologies (strips, fans, loops), which can't be broken apart without changing their shape.
    pub const fn vertices_per_element(self) -> Option<usize> {
        match self {
            Mode::Points => Some(1),
            Mode::Lines => Some(2),
            Mode::Triangles => Some(3),
            Mode::LineLoop | Mode::LineStrip | Mode::TriangleStrip | Mode::TriangleFan => None,
        }
    }
}

/// A sequence of `u32` indices, one per face-vertex.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexStream<'src> {
    buffer: Buffer<'src, u32>,
}

impl<'src> IndexStream<'src> {
    #[inline]
    pub fn new(buffer: impl Into<Buffer<'src, u32>>) -> Self {
        Self {
            buffer: buffer.into(),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn buffer(&self) -> &Buffer<'src, u32> {
        &self.buffer
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.buffer
    }

    #[inline]
    pub fn is_owned(&self) -> bool {
        self.buffer.is_owned()
    }

    pub fn into_owned(self) -> IndexStream<'static> {
        IndexStream {
            buffer: self.buffer.into_owned(),
        }
    }
}

/// How the vertices of a [Primitive] are addressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Indexing<'src> {
    /// One stream per attribute key, parallel to [Primitive::attributes]. Every stream has the
    /// same length.
    PerAttribute(Vec<IndexStream<'src>>),
    /// One stream addressing every attribute at once.
    Unified(IndexStream<'src>),
}

/// One drawable group of faces within a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive<'src> {
    /// The method by which vertices are interpreted as topological primitives
    mode: Mode,
    /// Material with which this primitive is rendered
    material_id: u32,
    /// Attribute keys referenced by this primitive, in stream order
    attributes: Vec<AttributeKey>,
    indexing: Indexing<'src>,
}

impl<'src> Primitive<'src> {
    /// Construct a primitive with per-attribute indexing and no attributes yet.
    pub fn new(mode: Mode, material_id: u32) -> Self {
        Self {
            mode,
            material_id,
            attributes: Vec::new(),
            indexing: Indexing::PerAttribute(Vec::new()),
        }
    }

    /// Construct a primitive addressing all of `attributes` through one index stream.
    pub fn unified(
        mode: Mode,
        material_id: u32,
        attributes: Vec<AttributeKey>,
        indices: IndexStream<'src>,
    ) -> Self {
        Self {
            mode,
            material_id,
            attributes,
            indexing: Indexing::Unified(indices),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn material_id(&self) -> u32 {
        self.material_id
    }

    pub fn attributes(&self) -> &[AttributeKey] {
        &self.attributes
    }

    pub fn indexing(&self) -> &Indexing<'src> {
        &self.indexing
    }

    pub fn is_unified(&self) -> bool {
        matches!(self.indexing, Indexing::Unified(_))
    }

    /// Number of face-vertices; every stream of a primitive has this length.
    pub fn index_count(&self) -> usize {
        match &self.indexing {
            Indexing::PerAttribute(streams) => streams.first().map_or(0, IndexStream::count),
            Indexing::Unified(stream) => stream.count(),
        }
    }

    /// Append the index stream of another attribute.
    ///
    /// Fails if the primitive is unified, if `key` is already present, or if the stream's length
    /// disagrees with the streams already appended.
    pub fn append_attribute(
        &mut self,
        key: AttributeKey,
        indices: IndexStream<'src>,
    ) -> Result<(), MeshError> {
        let streams = match &mut self.indexing {
            Indexing::PerAttribute(streams) => streams,
            Indexing::Unified(_) => return Err(MeshError::AlreadyUnified),
        };
        if self.attributes.contains(&key) {
            return Err(MeshError::DuplicateAttribute(key));
        }
        if let Some(first) = streams.first() {
            if first.count() != indices.count() {
                return Err(MeshError::InconsistentIndexLength {
                    key,
                    expected: first.count(),
                    actual: indices.count(),
                });
            }
        }
        self.attributes.push(key);
        streams.push(indices);
        Ok(())
    }

    /// The index stream of a single attribute, for primitives with per-attribute indexing.
    pub fn stream(&self, key: &AttributeKey) -> Option<&IndexStream<'src>> {
        match &self.indexing {
            Indexing::PerAttribute(streams) => self
                .attributes
                .iter()
                .position(|k| k == key)
                .and_then(|i| streams.get(i)),
            Indexing::Unified(_) => None,
        }
    }

    /// Iterate over `(key, stream)` pairs, for primitives with per-attribute indexing.
    pub fn streams(&self) -> Result<impl Iterator<Item = (&AttributeKey, &IndexStream<'src>)>, MeshError> {
        match &self.indexing {
            Indexing::PerAttribute(streams) => Ok(self.attributes.iter().zip(streams.iter())),
            Indexing::Unified(_) => Err(MeshError::AlreadyUnified),
        }
    }

    /// The shared index stream, for unified primitives.
    pub fn indices(&self) -> Result<&IndexStream<'src>, MeshError> {
        match &self.indexing {
            Indexing::Unified(stream) => Ok(stream),
            Indexing::PerAttribute(_) => Err(MeshError::NotUnified),
        }
    }

    /// Remove the attributes for which `keep` returns false, along with their streams.
    pub fn retain_attributes(&mut self, mut keep: impl FnMut(&AttributeKey) -> bool) {
        match &mut self.indexing {
            Indexing::PerAttribute(streams) => {
                let mut kept = Vec::with_capacity(streams.len());
                let mut keys = Vec::with_capacity(streams.len());
                for (key, stream) in self.attributes.drain(..).zip(streams.drain(..)) {
                    if keep(&key) {
                        keys.push(key);
                        kept.push(stream);
                    }
                }
                self.attributes = keys;
                *streams = kept;
            }
            Indexing::Unified(_) => self.attributes.retain(|k| keep(k)),
        }
    }

    pub fn into_owned(self) -> Primitive<'static> {
        Primitive {
            mode: self.mode,
            material_id: self.material_id,
            attributes: self.attributes,
            indexing: match self.indexing {
                Indexing::PerAttribute(streams) => Indexing::PerAttribute(
                    streams.into_iter().map(IndexStream::into_owned).collect(),
                ),
                Indexing::Unified(stream) => Indexing::Unified(stream.into_owned()),
            },
        }
    }
}
