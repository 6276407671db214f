mod common;

use std::collections::HashSet;

use hedron::{
    primitive::attribute::Position, AttributeKey, IndexStream, Mesh, MeshAttribute, MeshError,
    Mode, Ownership, Primitive, Semantic,
};
use polyweld::{
    assemble::assemble_mesh,
    extract::extract_attributes,
    primitive::convert_primitive,
    source::{IndexList, InputInfo, InputLayout, SourcePrimitive, Topology, VertexData, VertexValues},
    split::split_mesh,
    texcoord::{flip_texcoords, flip_v},
    triangulate::triangulate_fan,
    unify::unify_indices,
    Error, DEFAULT_MAX_VERTICES,
};
use quickcheck_macros::quickcheck;

const POSITION: AttributeKey = AttributeKey::new(Semantic::Position, 0);
const TEXCOORD: AttributeKey = AttributeKey::new(Semantic::Texcoord, 0);

#[test]
fn fan_keeps_triangles_intact() {
    assert_eq!(triangulate_fan(&[3], &[7, 8, 9]).unwrap(), vec![7, 8, 9]);
    assert_eq!(
        triangulate_fan(&[4], &[0, 1, 2, 3]).unwrap(),
        vec![0, 1, 2, 0, 2, 3]
    );
}

#[test]
fn fan_skips_degenerate_faces() {
    assert_eq!(
        triangulate_fan(&[2, 1, 3, 0], &[0, 1, 2, 3, 4, 5]).unwrap(),
        vec![3, 4, 5]
    );
}

#[test]
fn fan_rejects_short_index_lists() {
    assert!(matches!(
        triangulate_fan(&[4, 3], &[0, 1, 2, 3, 4]),
        Err(Error::MalformedFaces {
            required: 7,
            available: 5
        })
    ));
}

#[quickcheck]
fn fan_triangle_count(faces: Vec<u8>) -> bool {
    let counts: Vec<u32> = faces.iter().map(|&n| 3 + u32::from(n % 8)).collect();
    let total: u32 = counts.iter().sum();
    let indices: Vec<u32> = (0..total).collect();
    let tris = triangulate_fan(&counts, &indices).unwrap();
    let expected: u32 = counts.iter().map(|n| 3 * (n - 2)).sum();
    tris.len() == expected as usize
}

#[test]
fn extract_unannotated_positions() {
    common::init_logging();
    let data = VertexData::new(
        VertexValues::Float((0..9).map(|i| i as f32).collect()),
        InputLayout::Unannotated,
    );
    let sets = extract_attributes(&data, "mesh-position");
    assert_eq!(sets.len(), 1);
    let attr = &sets[&0];
    assert_eq!(attr.name(), "mesh-position");
    assert_eq!(attr.count(), 3);
    assert_eq!(attr.components_per_attribute(), 3);
    assert_eq!(attr.byte_stride(), 12);
    assert_eq!(attr.ownership(), Ownership::Borrowed);
    assert_eq!(attr.element(2).unwrap(), &[6.0, 7.0, 8.0]);
}

#[test]
fn extract_packed_sets() {
    common::init_logging();
    let data = VertexData::new(
        VertexValues::Float(vec![0.0, 0.1, 0.2, 0.3, 1.0, 1.1, 1.2, 1.3, 1.4, 1.5]),
        InputLayout::Declared(vec![
            InputInfo::new("uv0", 2, 4),
            // the rest of the container
            InputInfo::new("uv1", 3, 0),
        ]),
    );
    let sets = extract_attributes(&data, "unused");
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[&0].name(), "uv0");
    assert_eq!(sets[&0].count(), 2);
    assert_eq!(sets[&1].name(), "uv1");
    assert_eq!(sets[&1].count(), 2);
    assert_eq!(sets[&1].element(0).unwrap(), &[1.0, 1.1, 1.2]);
    assert!(sets.values().all(|a| a.ownership() == Ownership::Borrowed));
}

#[test]
fn extract_skips_unusable_data() {
    common::init_logging();
    let double = VertexData::new(
        VertexValues::Double(vec![0.0; 9]),
        InputLayout::Unannotated,
    );
    assert!(extract_attributes(&double, "d").is_empty());
    assert!(extract_attributes(&VertexData::default(), "u").is_empty());

    let data = VertexData::new(
        VertexValues::Float(vec![0.0; 6]),
        InputLayout::Declared(vec![
            InputInfo::new("zero", 0, 2),
            InputInfo::new("ok", 2, 2),
            InputInfo::new("past-end", 2, 8),
        ]),
    );
    let sets = extract_attributes(&data, "x");
    assert_eq!(sets.keys().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(sets[&1].name(), "ok");
}

#[test]
fn extract_survives_huge_declared_lengths() {
    common::init_logging();
    let data = VertexData::new(
        VertexValues::Float(vec![0.0; 6]),
        InputLayout::Declared(vec![
            InputInfo::new("a", 3, 6),
            InputInfo::new("b", 3, usize::MAX),
            InputInfo::new("c", 3, usize::MAX),
        ]),
    );
    let sets = extract_attributes(&data, "x");
    assert_eq!(sets.keys().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(sets[&0].count(), 2);
}

#[quickcheck]
fn extract_element_count(len: u16) -> bool {
    let data = VertexData::new(
        VertexValues::Float(vec![1.0; usize::from(len)]),
        InputLayout::Unannotated,
    );
    let sets = extract_attributes(&data, "p");
    sets[&0].count() == usize::from(len) / 3
}

#[test]
fn primitive_streams_borrow_untouched_lists() {
    let source = SourcePrimitive {
        topology: Topology::Triangles,
        position_indices: IndexList::new([0u32, 1, 2]),
        normal_indices: Some(IndexList::new([5u32, 6, 7]).with_initial_index(5)),
        ..Default::default()
    };
    let prim = convert_primitive(&source).unwrap();
    assert_eq!(prim.mode(), Mode::Triangles);
    assert_eq!(
        prim.attributes(),
        &[POSITION, AttributeKey::new(Semantic::Normal, 0)]
    );

    let position = prim.stream(&POSITION).unwrap();
    assert!(!position.is_owned());
    assert_eq!(position.indices(), &[0, 1, 2]);

    let normal = prim.stream(&AttributeKey::new(Semantic::Normal, 0)).unwrap();
    assert!(normal.is_owned());
    assert_eq!(normal.indices(), &[0, 1, 2]);
}

#[test]
fn primitive_initial_index_underflow() {
    let source = SourcePrimitive {
        topology: Topology::Lines,
        position_indices: IndexList::new([3u32, 2]).with_initial_index(3),
        ..Default::default()
    };
    assert!(matches!(
        convert_primitive(&source),
        Err(Error::IndexBelowBase { index: 2, base: 3 })
    ));
}

#[test]
fn primitive_polylist_is_triangulated() {
    let source = SourcePrimitive {
        topology: Topology::Polylist,
        material_id: 2,
        position_indices: IndexList::new(common::QUAD_INDICES),
        texcoord_indices: vec![IndexList::new([0u32, 1, 2, 3]), IndexList::new(common::QUAD_INDICES)],
        face_vertex_counts: vec![4, 4],
        ..Default::default()
    };
    // the first texcoord set doesn't cover every face
    assert!(matches!(
        convert_primitive(&source),
        Err(Error::MalformedFaces { .. })
    ));

    let source = SourcePrimitive {
        texcoord_indices: vec![IndexList::new(common::QUAD_INDICES)],
        ..source
    };
    let prim = convert_primitive(&source).unwrap();
    assert_eq!(prim.mode(), Mode::Triangles);
    assert_eq!(prim.material_id(), 2);
    assert_eq!(prim.index_count(), 12);
    let position = prim.stream(&POSITION).unwrap();
    assert!(position.is_owned());
    assert_eq!(position.indices(), &[0, 1, 4, 0, 4, 3, 1, 2, 5, 1, 5, 4]);
    assert_eq!(prim.stream(&TEXCOORD).unwrap().indices(), position.indices());
}

#[test]
fn primitive_topologies() {
    let convert = |topology| {
        convert_primitive(&SourcePrimitive {
            topology,
            position_indices: IndexList::new([0u32, 1, 2, 3]),
            ..Default::default()
        })
        .map(|p| p.mode())
    };
    assert_eq!(convert(Topology::Lines).unwrap(), Mode::Lines);
    assert_eq!(convert(Topology::LineStrips).unwrap(), Mode::LineStrip);
    assert_eq!(convert(Topology::TriangleFans).unwrap(), Mode::TriangleFan);
    assert_eq!(convert(Topology::TriangleStrips).unwrap(), Mode::TriangleStrip);
    assert_eq!(convert(Topology::Points).unwrap(), Mode::Points);
    assert!(matches!(
        convert(Topology::Undefined),
        Err(Error::UnsupportedTopology(Topology::Undefined))
    ));
}

#[test]
fn primitive_rejects_mismatched_streams() {
    let source = SourcePrimitive {
        topology: Topology::Triangles,
        position_indices: IndexList::new([0u32, 1, 2]),
        color_indices: vec![IndexList::new([0u32, 1])],
        ..Default::default()
    };
    assert!(matches!(
        convert_primitive(&source),
        Err(Error::Mesh(MeshError::InconsistentIndexLength {
            expected: 3,
            actual: 2,
            ..
        }))
    ));
}

#[test]
fn assemble_prunes_missing_attributes() {
    common::init_logging();
    let mut source = common::two_quads();
    // normals are referenced but the mesh has none
    source.primitives[0].normal_indices = Some(IndexList::new(common::QUAD_INDICES));
    source.primitives.push(SourcePrimitive {
        topology: Topology::Undefined,
        ..Default::default()
    });

    let mesh = assemble_mesh(&source);
    assert_eq!(mesh.id(), "quads");
    assert_eq!(mesh.primitives().len(), 1);
    assert_eq!(mesh.primitives()[0].attributes(), &[POSITION, TEXCOORD]);
    assert_eq!(mesh.semantics(), vec![Semantic::Position, Semantic::Texcoord]);
    assert_eq!(mesh.attribute(&POSITION).unwrap().name(), "quads-position");
    assert_eq!(
        mesh.attribute(&POSITION).unwrap().ownership(),
        Ownership::Borrowed
    );
}

#[test]
fn assemble_drops_primitives_without_positions() {
    common::init_logging();
    let mut source = common::two_quads();
    source.positions = VertexData::new(
        VertexValues::Double(vec![0.0; 18]),
        InputLayout::Unannotated,
    );
    let mesh = assemble_mesh(&source);
    assert!(mesh.primitives().is_empty());
}

#[test]
fn flip_promotes_borrowed_buffers() {
    let source = [0.25f32, 0.75, 1.0, 0.0];
    let mut attr = MeshAttribute::packed("uv", &source[..], 2).unwrap();
    assert!(flip_v(&mut attr));
    assert_eq!(attr.ownership(), Ownership::Owned);
    assert_eq!(attr.buffer().as_slice(), &[0.25, 0.25, 1.0, 1.0]);
    assert_eq!(source, [0.25, 0.75, 1.0, 0.0]);

    let mut scalar = MeshAttribute::packed("s", &source[..], 1).unwrap();
    assert!(!flip_v(&mut scalar));
    assert_eq!(scalar.ownership(), Ownership::Borrowed);
}

#[test]
fn flip_only_touches_texcoords() {
    let source = common::two_quads();
    let mut mesh = assemble_mesh(&source);
    flip_texcoords(&mut mesh);
    assert_eq!(
        mesh.attribute(&POSITION).unwrap().ownership(),
        Ownership::Borrowed
    );
    let uv = mesh.attribute(&TEXCOORD).unwrap();
    assert_eq!(uv.element(0).unwrap(), &[0.0, 1.0]);
    assert_eq!(uv.element(4).unwrap(), &[0.5, 0.0]);
}

/// Values are multiples of 1/256 so `1 - (1 - v)` is exact.
#[quickcheck]
fn flip_twice_is_identity(uvs: Vec<(u8, u8)>) -> bool {
    let data: Vec<f32> = uvs
        .iter()
        .flat_map(|&(u, v)| [f32::from(u) / 256.0, f32::from(v) / 256.0])
        .collect();
    let mut attr = MeshAttribute::packed("uv", data.as_slice(), 2).unwrap();
    flip_v(&mut attr);
    let flipped_u_unchanged = attr
        .elements()
        .zip(data.chunks_exact(2))
        .all(|(a, b)| a[0].to_bits() == b[0].to_bits());
    flip_v(&mut attr);
    flipped_u_unchanged && attr.buffer().as_slice() == data.as_slice()
}

/// A per-attribute mesh with four positions and three texcoords.
fn separate_mesh(tuples: &[(u32, u32)]) -> Mesh<'static> {
    let mut mesh = Mesh::new("m", "M");
    mesh.insert_attribute(
        POSITION,
        MeshAttribute::packed("p", (0..12).map(|i| i as f32).collect::<Vec<_>>(), 3).unwrap(),
    );
    mesh.insert_attribute(
        TEXCOORD,
        MeshAttribute::packed("t", vec![0.0f32, 0.5, 1.0, 0.25, 0.75, 0.125], 2).unwrap(),
    );
    let mut prim = Primitive::new(Mode::Points, 0);
    prim.append_attribute(
        POSITION,
        IndexStream::new(tuples.iter().map(|t| t.0).collect::<Vec<_>>()),
    )
    .unwrap();
    prim.append_attribute(
        TEXCOORD,
        IndexStream::new(tuples.iter().map(|t| t.1).collect::<Vec<_>>()),
    )
    .unwrap();
    mesh.append_primitive(prim);
    mesh
}

#[quickcheck]
fn unify_welds_identical_tuples(tuples: Vec<(u8, u8)>) -> bool {
    let tuples: Vec<(u32, u32)> = tuples
        .iter()
        .map(|&(p, t)| (u32::from(p % 4), u32::from(t % 3)))
        .collect();
    let mesh = separate_mesh(&tuples);
    let unified = unify_indices(&mesh).unwrap();

    let distinct: HashSet<_> = tuples.iter().collect();
    let indices = unified.primitives()[0].indices().unwrap().indices();
    let positions = unified.attribute(&POSITION).unwrap();
    let texcoords = unified.attribute(&TEXCOORD).unwrap();
    let src_positions = mesh.attribute(&POSITION).unwrap();
    let src_texcoords = mesh.attribute(&TEXCOORD).unwrap();

    // first-seen order: each index is at most one past the largest seen so far
    let mut next = 0;
    let ordered = indices.iter().all(|&i| {
        let ok = i <= next;
        if i == next {
            next += 1;
        }
        ok
    });
    let same_values = tuples.iter().zip(indices).all(|(&(p, t), &i)| {
        positions.element(i as usize) == src_positions.element(p as usize)
            && texcoords.element(i as usize) == src_texcoords.element(t as usize)
    });

    unified.is_unified()
        && positions.count() == distinct.len()
        && texcoords.count() == distinct.len()
        && ordered
        && same_values
        && unify_indices(&mesh).unwrap() == unified
}

#[test]
fn unify_shares_vertices_across_primitives() {
    let mut mesh = separate_mesh(&[(0, 0), (1, 1), (0, 0)]);
    let mut second = Primitive::new(Mode::Lines, 1);
    second
        .append_attribute(POSITION, IndexStream::new(vec![1u32, 3]))
        .unwrap();
    mesh.append_primitive(second);

    let unified = unify_indices(&mesh).unwrap();
    assert_eq!(unified.primitives()[0].indices().unwrap().indices(), &[0, 1, 0]);
    // (1, none) differs from (1, 1)
    assert_eq!(unified.primitives()[1].indices().unwrap().indices(), &[2, 3]);
    assert_eq!(unified.primitives()[1].attributes(), &[POSITION]);
    assert_eq!(unified.primitives()[1].material_id(), 1);
    // texcoords of vertices that don't use them are zeroed
    let texcoords = unified.attribute(&TEXCOORD).unwrap();
    assert_eq!(texcoords.count(), 4);
    assert_eq!(texcoords.element(3).unwrap(), &[0.0, 0.0]);
    assert!(unified.attributes().all(|(_, a)| a.ownership() == Ownership::Owned));
}

#[test]
fn unify_rejects_out_of_range_indices() {
    let mesh = separate_mesh(&[(0, 0), (4, 0)]);
    assert!(matches!(
        unify_indices(&mesh),
        Err(Error::IndexOutOfRange {
            key: POSITION,
            index: 4,
            count: 4
        })
    ));
}

/// A unified triangle mesh whose vertex `i` is at `(i, 0, 0)`.
fn triangle_mesh(vertices: u32, indices: Vec<u32>) -> Mesh<'static> {
    let mut mesh = Mesh::new("big", "Big");
    let positions: Vec<f32> = (0..vertices).flat_map(|i| [i as f32, 0.0, 0.0]).collect();
    mesh.insert_attribute(POSITION, MeshAttribute::packed("p", positions, 3).unwrap());
    mesh.append_primitive(Primitive::unified(
        Mode::Triangles,
        7,
        vec![POSITION],
        IndexStream::new(indices),
    ));
    mesh
}

/// Triangles of every mesh, as vertex numbers of the unsplit mesh.
fn triangles(meshes: &[Mesh<'_>]) -> Vec<[u32; 3]> {
    meshes
        .iter()
        .flat_map(|mesh| {
            let positions = mesh.view::<Position>(&POSITION).unwrap();
            mesh.primitives().iter().flat_map(move |prim| {
                prim.indices()
                    .unwrap()
                    .indices()
                    .chunks_exact(3)
                    .map(|t| [t[0], t[1], t[2]].map(|i| positions[i as usize].x as u32))
                    .collect::<Vec<_>>()
            })
        })
        .collect()
}

#[quickcheck]
fn split_respects_ceiling(tris: Vec<(u8, u8, u8)>, ceiling: u8) -> bool {
    const VERTICES: u32 = 64;
    let ceiling = 3 + usize::from(ceiling % 30);
    let indices: Vec<u32> = tris
        .iter()
        .flat_map(|&(a, b, c)| [a, b, c].map(|i| u32::from(i) % VERTICES))
        .collect();
    let mesh = triangle_mesh(VERTICES, indices);
    let expected = triangles(std::slice::from_ref(&mesh));

    let meshes = split_mesh(mesh, ceiling).unwrap();
    meshes.iter().all(|m| m.vertex_count() <= ceiling)
        && meshes
            .iter()
            .all(|m| m.primitives().iter().all(|p| p.material_id() == 7))
        && triangles(&meshes) == expected
}

#[test]
fn split_keeps_small_meshes() {
    let mesh = triangle_mesh(4, vec![0, 1, 2, 2, 3, 0]);
    let meshes = split_mesh(mesh.clone(), 4).unwrap();
    assert_eq!(meshes, vec![mesh]);
}

#[test]
fn split_names_parts() {
    common::init_logging();
    let mesh = triangle_mesh(6, vec![0, 1, 2, 3, 4, 5, 0, 2, 4]);
    let meshes = split_mesh(mesh, 4).unwrap();
    assert_eq!(meshes.len(), 3);
    assert_eq!(
        meshes.iter().map(|m| m.id()).collect::<Vec<_>>(),
        vec!["big-0", "big-1", "big-2"]
    );
    assert_eq!(meshes[1].name(), "Big-1");
    assert_eq!(
        meshes[0].primitives()[0].indices().unwrap().indices(),
        &[0, 1, 2]
    );
}

#[test]
fn split_errors() {
    let mesh = triangle_mesh(6, vec![0, 1, 2, 3, 4, 5]);
    assert!(matches!(
        split_mesh(mesh, 2),
        Err(Error::InvalidCeiling {
            max_vertices: 2,
            required: 3
        })
    ));

    let mut strip = Mesh::new("strip", "Strip");
    strip.insert_attribute(
        POSITION,
        MeshAttribute::packed("p", vec![0.0f32; 18], 3).unwrap(),
    );
    strip.append_primitive(Primitive::unified(
        Mode::TriangleStrip,
        0,
        vec![POSITION],
        IndexStream::new(vec![0u32, 1, 2, 3, 4, 5]),
    ));
    assert!(matches!(
        split_mesh(strip, 4),
        Err(Error::PrimitiveTooLarge {
            vertices: 6,
            max_vertices: 4
        })
    ));
}

#[test]
fn split_keeps_fitting_degenerate_meshes() {
    // two vertices can't hold a whole triangle, but the mesh already fits
    let mesh = triangle_mesh(2, vec![0, 0, 1]);
    let meshes = split_mesh(mesh.clone(), 2).unwrap();
    assert_eq!(meshes, vec![mesh]);
}

#[test]
fn split_requires_unified_indices() {
    let mesh = separate_mesh(&[(0, 0), (1, 1)]);
    assert!(matches!(
        split_mesh(mesh, DEFAULT_MAX_VERTICES),
        Err(Error::Mesh(MeshError::NotUnified))
    ));
}
