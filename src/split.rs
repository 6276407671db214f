//! Partitioning of unified meshes that address more vertices than a ceiling allows.

use std::{
    collections::{hash_map::Entry, HashMap},
    mem,
};

use hedron::{IndexStream, Mesh, MeshAttribute, MeshError, Primitive};
use num_traits::{AsPrimitive, ToPrimitive};

use crate::error::Error;

/// One output mesh under construction.
#[derive(Debug, Default)]
struct Part {
    /// Source vertex index -> compact index within this part
    remap: HashMap<u32, u32>,
    /// Source vertex indices in compact order
    vertices: Vec<u32>,
    /// (source primitive, remapped indices)
    primitives: Vec<(usize, Vec<u32>)>,
}

impl Part {
    /// Number of vertices of `element` this part doesn't contain yet.
    fn new_vertices(&self, element: &[u32]) -> usize {
        let mut seen: Vec<u32> = Vec::with_capacity(element.len());
        for &i in element {
            if !self.remap.contains_key(&i) && !seen.contains(&i) {
                seen.push(i);
            }
        }
        seen.len()
    }

    fn push(&mut self, primitive: usize, element: &[u32]) -> Result<(), Error> {
        if self.primitives.last().map(|(p, _)| *p) != Some(primitive) {
            self.primitives.push((primitive, Vec::new()));
        }
        let mut remapped = Vec::with_capacity(element.len());
        for &i in element {
            let index = match self.remap.entry(i) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    let len = self.vertices.len();
                    let index = len.to_u32().ok_or(Error::TooManyVertices(len))?;
                    self.vertices.push(i);
                    *e.insert(index)
                }
            };
            remapped.push(index);
        }
        if let Some((_, indices)) = self.primitives.last_mut() {
            indices.extend(remapped);
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Build a self-contained mesh holding only the vertices this part references.
    fn build(self, mesh: &Mesh<'_>, n: usize) -> Result<Mesh<'static>, Error> {
        let mut res = Mesh::new(format!("{}-{n}", mesh.id()), format!("{}-{n}", mesh.name()));
        for (key, attr) in mesh.attributes() {
            let width = attr.components_per_attribute();
            let mut data = Vec::with_capacity(self.vertices.len() * width);
            for &i in &self.vertices {
                let el = attr.element(i.as_()).ok_or(Error::IndexOutOfRange {
                    key,
                    index: i,
                    count: attr.count(),
                })?;
                data.extend_from_slice(el);
            }
            let packed = MeshAttribute::packed(attr.name(), data, width).map_err(MeshError::from)?;
            res.insert_attribute(key, packed);
        }
        for (p, indices) in self.primitives {
            let source = &mesh.primitives()[p];
            res.append_primitive(Primitive::unified(
                source.mode(),
                source.material_id(),
                source.attributes().to_vec(),
                IndexStream::new(indices),
            ));
        }
        Ok(res)
    }
}

/// Split a unified mesh so that no output mesh contains more than `max_vertices` vertices.
///
/// A mesh that already fits is returned as the only element, untouched. Otherwise primitives are
/// walked in order and their elements (triangles, lines, or points) are added to the current output
/// mesh until the next one would push it past the ceiling, at which point a new output mesh is
/// started. Strips, fans, and loops can't be cut and are moved as a whole. Output meshes have
/// compact attributes, keep each primitive's mode and material, and have `-<n>` appended to their
/// id and name.
///
/// # Errors
///
/// * [MeshError::NotUnified] if any primitive still has per-attribute indexing.
/// * [Error::InvalidCeiling] if the mesh doesn't fit and `max_vertices` can't hold a single element.
/// * [Error::PrimitiveTooLarge] if a strip, fan, or loop uses more than `max_vertices` vertices.
pub fn split_mesh<'src>(mesh: Mesh<'src>, max_vertices: usize) -> Result<Vec<Mesh<'src>>, Error> {
    if !mesh.is_unified() {
        return Err(MeshError::NotUnified.into());
    }
    let vertex_count = mesh.vertex_count();
    if vertex_count <= max_vertices {
        return Ok(vec![mesh]);
    }
    let required = mesh
        .primitives()
        .iter()
        .filter(|p| p.index_count() > 0)
        .map(|p| p.mode().vertices_per_element().unwrap_or(1))
        .max()
        .unwrap_or(0);
    if max_vertices < required {
        return Err(Error::InvalidCeiling {
            max_vertices,
            required,
        });
    }

    let mut parts = Vec::new();
    let mut current = Part::default();
    for (p, prim) in mesh.primitives().iter().enumerate() {
        let indices = prim.indices()?.indices();
        let elements: Vec<&[u32]> = match prim.mode().vertices_per_element() {
            Some(n) => indices.chunks_exact(n).collect(),
            None => vec![indices],
        };
        for element in elements.into_iter().filter(|e| !e.is_empty()) {
            let mut new = current.new_vertices(element);
            if current.vertices.len() + new > max_vertices && !current.is_empty() {
                parts.push(mem::take(&mut current));
                new = current.new_vertices(element);
            }
            if new > max_vertices {
                return Err(Error::PrimitiveTooLarge {
                    vertices: new,
                    max_vertices,
                });
            }
            current.push(p, element)?;
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }

    let res = parts
        .into_iter()
        .enumerate()
        .map(|(n, part)| part.build(&mesh, n))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(
        id = mesh.id(),
        vertices = vertex_count,
        max_vertices,
        meshes = res.len(),
        "split mesh"
    );
    Ok(res)
}
