//! Conversion of source primitives into [Primitives](Primitive) with one index stream per
//! attribute.

use std::iter;

use hedron::{AttributeKey, Buffer, IndexStream, Mode, Primitive, Semantic};

use crate::{
    error::Error,
    source::{IndexList, SourcePrimitive, Topology},
    triangulate::triangulate_fan,
};

/// The output mode of a source topology, and whether its faces must be triangulated first.
pub fn primitive_mode(topology: Topology) -> Result<(Mode, bool), Error> {
    Ok(match topology {
        Topology::Polylist | Topology::Polygons => (Mode::Triangles, true),
        Topology::Triangles => (Mode::Triangles, false),
        Topology::Lines => (Mode::Lines, false),
        Topology::LineStrips => (Mode::LineStrip, false),
        Topology::TriangleFans => (Mode::TriangleFan, false),
        Topology::TriangleStrips => (Mode::TriangleStrip, false),
        Topology::Points => (Mode::Points, false),
        Topology::Undefined => return Err(Error::UnsupportedTopology(topology)),
    })
}

/// Build the index stream for one attribute.
///
/// The stream borrows the source list when it can be used as-is; triangulation and removal of a
/// non-zero initial index both produce an owned stream.
fn index_stream<'src>(
    list: &'src IndexList,
    faces: Option<&[u32]>,
) -> Result<IndexStream<'src>, Error> {
    let mut buffer = match faces {
        Some(faces) => Buffer::Owned(triangulate_fan(faces, &list.indices)?),
        None => Buffer::Borrowed(list.indices.as_slice()),
    };

    let base = list.initial_index;
    if base != 0 {
        for index in buffer.to_mut().iter_mut() {
            *index = index
                .checked_sub(base)
                .ok_or(Error::IndexBelowBase {
                    index: *index,
                    base,
                })?;
        }
    }

    Ok(IndexStream::new(buffer))
}

/// Convert a source primitive.
///
/// Streams are appended in a fixed order: position, normal (if present), every color set, and
/// every texcoord set, each set numbered by its position in the source. Polygonal primitives are
/// triangulated with the same face layout for every stream, so all streams keep the length of the
/// position stream; a stream that disagrees is rejected along with the primitive.
pub fn convert_primitive(source: &SourcePrimitive) -> Result<Primitive<'_>, Error> {
    let (mode, triangulate) = primitive_mode(source.topology)?;
    let faces = triangulate.then_some(source.face_vertex_counts.as_slice());

    let lists = iter::once((Semantic::Position, 0, &source.position_indices))
        .chain(
            source
                .normal_indices
                .iter()
                .map(|list| (Semantic::Normal, 0, list)),
        )
        .chain(
            (0u32..)
                .zip(&source.color_indices)
                .map(|(set, list)| (Semantic::Color, set, list)),
        )
        .chain(
            (0u32..)
                .zip(&source.texcoord_indices)
                .map(|(set, list)| (Semantic::Texcoord, set, list)),
        );

    let mut primitive = Primitive::new(mode, source.material_id);
    for (semantic, set, list) in lists {
        let stream = index_stream(list, faces)?;
        primitive.append_attribute(AttributeKey::new(semantic, set), stream)?;
    }

    tracing::trace!(
        ?mode,
        material = source.material_id,
        attributes = primitive.attributes().len(),
        indices = primitive.index_count(),
        "converted primitive"
    );
    Ok(primitive)
}
