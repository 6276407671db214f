pub mod primitive;

use std::collections::BTreeMap;

pub use primitive::{
    attribute::{
        storage::{AttributeError, MeshAttribute},
        Attribute, AttributeKey, ComponentType, Semantic,
    },
    IndexStream, Indexing, Mode, Primitive,
};

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("index stream for {key} has {actual} indices; expected {expected}")]
    InconsistentIndexLength {
        key: AttributeKey,
        expected: usize,
        actual: usize,
    },
    #[error("attribute {0} is already indexed by this primitive")]
    DuplicateAttribute(AttributeKey),
    #[error("attempted to use per-attribute indexing on a unified primitive")]
    AlreadyUnified,
    #[error("attempted to use unified indexing on a primitive with per-attribute indexing")]
    NotUnified,
    #[error("mesh has no attribute {0}")]
    MissingAttribute(AttributeKey),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}

/// Attribute sets of one [Semantic], keyed by set number.
pub type AttributeSets<'src> = BTreeMap<u32, MeshAttribute<'src>>;

/// A set of primitives sharing one pool of vertex attributes.
///
/// # Characteristics
///
/// * Attributes are mesh-scoped and keyed by [Semantic] and set number; primitives refer to them
///   through [AttributeKey]s.
/// * Index streams are primitive-scoped. Until unification a primitive carries one stream per
///   attribute key; afterwards it carries one stream for all of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh<'src> {
    id: String,
    name: String,
    primitives: Vec<Primitive<'src>>,
    attributes: BTreeMap<Semantic, AttributeSets<'src>>,
}

impl<'src> Mesh<'src> {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn primitives(&self) -> &[Primitive<'src>] {
        &self.primitives
    }

    pub fn primitives_mut(&mut self) -> &mut Vec<Primitive<'src>> {
        &mut self.primitives
    }

    pub fn append_primitive(&mut self, primitive: Primitive<'src>) {
        self.primitives.push(primitive);
    }

    /// Replace the attribute sets stored for `semantic`.
    pub fn set_attributes_for_semantic(&mut self, semantic: Semantic, sets: AttributeSets<'src>) {
        self.attributes.insert(semantic, sets);
    }

    pub fn attributes_for_semantic(&self, semantic: Semantic) -> Option<&AttributeSets<'src>> {
        self.attributes.get(&semantic)
    }

    pub fn attributes_for_semantic_mut(
        &mut self,
        semantic: Semantic,
    ) -> Option<&mut AttributeSets<'src>> {
        self.attributes.get_mut(&semantic)
    }

    pub fn attribute(&self, key: &AttributeKey) -> Option<&MeshAttribute<'src>> {
        self.attributes.get(&key.semantic)?.get(&key.set)
    }

    pub fn attribute_mut(&mut self, key: &AttributeKey) -> Option<&mut MeshAttribute<'src>> {
        self.attributes.get_mut(&key.semantic)?.get_mut(&key.set)
    }

    /// Insert a single attribute set, returning the one it replaced.
    pub fn insert_attribute(
        &mut self,
        key: AttributeKey,
        attribute: MeshAttribute<'src>,
    ) -> Option<MeshAttribute<'src>> {
        self.attributes
            .entry(key.semantic)
            .or_default()
            .insert(key.set, attribute)
    }

    /// Every `(key, attribute)` pair, ordered by semantic and then set.
    pub fn attributes(&self) -> impl Iterator<Item = (AttributeKey, &MeshAttribute<'src>)> {
        self.attributes.iter().flat_map(|(semantic, sets)| {
            sets.iter()
                .map(|(set, attr)| (AttributeKey::new(*semantic, *set), attr))
        })
    }

    /// Semantics with at least one attribute set.
    pub fn semantics(&self) -> Vec<Semantic> {
        self.attributes
            .iter()
            .filter(|(_, sets)| !sets.is_empty())
            .map(|(semantic, _)| *semantic)
            .collect()
    }

    /// Number of vertices addressable by a unified index stream.
    ///
    /// This is the element count of the `POSITION` set 0 attribute if present, and otherwise the
    /// largest element count among the mesh's attributes.
    pub fn vertex_count(&self) -> usize {
        self.attribute(&AttributeKey::new(Semantic::Position, 0))
            .map(MeshAttribute::count)
            .or_else(|| self.attributes().map(|(_, attr)| attr.count()).max())
            .unwrap_or(0)
    }

    /// Whether every primitive uses unified indexing.
    pub fn is_unified(&self) -> bool {
        self.primitives.iter().all(Primitive::is_unified)
    }

    /// Typed view of a single attribute set.
    pub fn view<T: Attribute>(&self, key: &AttributeKey) -> Result<&[T], MeshError> {
        self.attribute(key)
            .ok_or(MeshError::MissingAttribute(*key))?
            .try_view::<T>()
            .map_err(MeshError::from)
    }

    /// Detach from the source lifetime, copying any borrowed buffers.
    pub fn into_owned(self) -> Mesh<'static> {
        Mesh {
            id: self.id,
            name: self.name,
            primitives: self
                .primitives
                .into_iter()
                .map(Primitive::into_owned)
                .collect(),
            attributes: self
                .attributes
                .into_iter()
                .map(|(semantic, sets)| {
                    (
                        semantic,
                        sets.into_iter()
                            .map(|(set, attr)| (set, attr.into_owned()))
                            .collect(),
                    )
                })
                .collect(),
        }
    }
}
