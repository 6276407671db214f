//! Fan triangulation of polygon faces.

use crate::error::Error;

/// Fan-triangulate a list of polygons.
///
/// `face_vertex_counts[f]` is the number of vertices of face `f`; `indices` holds every face's
/// vertices back to back. A face `p0..pn` becomes the triangles `(p0, p1, p2), (p0, p2, p3), …,
/// (p0, pn-2, pn-1)`, so a triangle comes out exactly as it went in. Faces with fewer than three
/// vertices produce no triangles.
///
/// # Limitations
///
/// Faces are assumed to be planar, convex, and consistently wound. Concave or self-intersecting
/// faces are not detected and will produce overlapping triangles.
pub fn triangulate_fan(face_vertex_counts: &[u32], indices: &[u32]) -> Result<Vec<u32>, Error> {
    let required: usize = face_vertex_counts.iter().map(|&n| n as usize).sum();
    if required > indices.len() {
        return Err(Error::MalformedFaces {
            required,
            available: indices.len(),
        });
    }

    let triangles: usize = face_vertex_counts
        .iter()
        .map(|&n| (n as usize).saturating_sub(2))
        .sum();
    let mut res = Vec::with_capacity(triangles * 3);

    let mut start = 0;
    for &n in face_vertex_counts {
        let face = &indices[start..start + n as usize];
        start += face.len();
        if let [p0, rest @ ..] = face {
            for edge in rest.windows(2) {
                res.extend_from_slice(&[*p0, edge[0], edge[1]]);
            }
        }
    }

    tracing::trace!(
        faces = face_vertex_counts.len(),
        triangles,
        "fan-triangulated polygons"
    );
    Ok(res)
}
