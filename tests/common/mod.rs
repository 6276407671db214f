#![allow(dead_code)]

use polyweld::source::{
    IndexList, InputLayout, SourceMesh, SourcePrimitive, Topology, VertexData, VertexValues,
};

/// Install a subscriber that writes through the test harness, filtered by `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Face-vertex indices of two quads sharing an edge, counter-clockwise.
pub const QUAD_INDICES: [u32; 8] = [0, 1, 4, 3, 1, 2, 5, 4];

/// Two unit quads side by side in the XY plane, with positions and texcoords indexed identically.
///
/// ```text
/// 3 --- 4 --- 5
/// |     |     |
/// 0 --- 1 --- 2
/// ```
pub fn two_quads() -> SourceMesh {
    let mut mesh = SourceMesh::new("quads", "Quads");
    mesh.positions = VertexData::new(
        VertexValues::Float(vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            2.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 1.0, 0.0, //
            2.0, 1.0, 0.0, //
        ]),
        InputLayout::Unannotated,
    );
    mesh.texcoords = VertexData::float_set(
        "quads-uv",
        2,
        vec![
            0.0, 0.0, //
            0.5, 0.0, //
            1.0, 0.0, //
            0.0, 1.0, //
            0.5, 1.0, //
            1.0, 1.0, //
        ],
    );
    mesh.primitives.push(SourcePrimitive {
        topology: Topology::Polylist,
        material_id: 3,
        position_indices: IndexList::new(QUAD_INDICES),
        texcoord_indices: vec![IndexList::new(QUAD_INDICES)],
        face_vertex_counts: vec![4, 4],
        ..Default::default()
    });
    mesh
}

/// [two_quads] with one flat normal per quad, so the shared edge can't be welded.
pub fn two_quads_flat_normals() -> SourceMesh {
    let mut mesh = two_quads();
    mesh.normals = VertexData::new(
        VertexValues::Float(vec![
            0.0, 0.0, 1.0, //
            0.0, 0.0, -1.0, //
        ]),
        InputLayout::Unannotated,
    );
    mesh.primitives[0].normal_indices = Some(IndexList::new([0u32, 0, 0, 0, 1, 1, 1, 1]));
    mesh
}
