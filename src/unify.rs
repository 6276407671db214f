//! Welding of per-attribute index streams into one index stream per primitive.
//!
//! A source face-vertex is a tuple of indices, one into each attribute it uses. GPUs want a single
//! index per vertex, so every distinct tuple becomes one output vertex whose attribute values are
//! copied out of the source attributes, and every face-vertex is re-addressed through it.

use std::collections::HashMap;

use hedron::{AttributeKey, IndexStream, Mesh, MeshAttribute, MeshError, Primitive};
use num_traits::{AsPrimitive, ToPrimitive};

use crate::error::Error;

/// Compacted output data for one attribute key.
struct Column<'a, 'src> {
    key: AttributeKey,
    source: &'a MeshAttribute<'src>,
    data: Vec<f32>,
}

impl<'a, 'src> Column<'a, 'src> {
    /// Append the element at `index` of the source attribute, or zeroes if the face-vertex doesn't
    /// use this attribute.
    fn push(&mut self, index: Option<u32>) -> Result<(), Error> {
        let width = self.source.components_per_attribute();
        match index {
            Some(index) => {
                let el = self
                    .source
                    .element(index.as_())
                    .ok_or(Error::IndexOutOfRange {
                        key: self.key,
                        index,
                        count: self.source.count(),
                    })?;
                self.data.extend_from_slice(el);
            }
            None => self.data.resize(self.data.len() + width, 0.0),
        }
        Ok(())
    }
}

/// Replace the per-attribute indexing of every primitive in `mesh` with a single index stream.
///
/// Distinct index tuples are numbered in the order they are first seen, scanning primitives in
/// order and each primitive's face-vertices in order; identical tuples share one output vertex,
/// including across primitives. The result owns all of its data and its attributes contain exactly
/// one element per distinct tuple.
///
/// If primitives use different sets of attributes, a vertex's value for an attribute its primitive
/// doesn't use is zero-filled.
pub fn unify_indices(mesh: &Mesh<'_>) -> Result<Mesh<'static>, Error> {
    // attribute keys used by any primitive, in mesh order
    let mut columns = Vec::new();
    for (key, source) in mesh.attributes() {
        if mesh
            .primitives()
            .iter()
            .any(|p| p.attributes().contains(&key))
        {
            columns.push(Column {
                key,
                source,
                data: Vec::new(),
            });
        }
    }
    for prim in mesh.primitives() {
        if let Some(key) = prim.attributes().iter().find(|k| mesh.attribute(k).is_none()) {
            return Err(MeshError::MissingAttribute(*key).into());
        }
    }

    let mut table: HashMap<Vec<Option<u32>>, u32> = HashMap::new();
    let mut vertex_count: usize = 0;
    let mut tuple: Vec<Option<u32>> = Vec::with_capacity(columns.len());
    let mut primitives = Vec::with_capacity(mesh.primitives().len());

    for prim in mesh.primitives() {
        if prim.is_unified() {
            return Err(MeshError::AlreadyUnified.into());
        }
        let streams: Vec<Option<&[u32]>> = columns
            .iter()
            .map(|c| prim.stream(&c.key).map(IndexStream::indices))
            .collect();

        let mut indices = Vec::with_capacity(prim.index_count());
        for i in 0..prim.index_count() {
            tuple.clear();
            tuple.extend(streams.iter().map(|s| s.map(|s| s[i])));

            let index = match table.get(tuple.as_slice()) {
                Some(&index) => index,
                None => {
                    let index = vertex_count
                        .to_u32()
                        .ok_or(Error::TooManyVertices(vertex_count))?;
                    for (column, value) in columns.iter_mut().zip(&tuple) {
                        column.push(*value)?;
                    }
                    table.insert(tuple.clone(), index);
                    vertex_count += 1;
                    index
                }
            };
            indices.push(index);
        }

        primitives.push(Primitive::unified(
            prim.mode(),
            prim.material_id(),
            prim.attributes().to_vec(),
            IndexStream::new(indices),
        ));
    }

    let mut res = Mesh::new(mesh.id(), mesh.name());
    for column in columns {
        let attr = MeshAttribute::packed(
            column.source.name(),
            column.data,
            column.source.components_per_attribute(),
        )
        .map_err(MeshError::from)?;
        res.insert_attribute(column.key, attr);
    }
    for prim in primitives {
        res.append_primitive(prim);
    }

    tracing::debug!(
        id = mesh.id(),
        face_vertices = mesh.primitives().iter().map(Primitive::index_count).sum::<usize>(),
        vertices = vertex_count,
        "unified mesh indices"
    );
    Ok(res)
}
