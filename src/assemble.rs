//! Aggregation of converted primitives and their attributes into a single [Mesh].

use hedron::{AttributeKey, Mesh, Semantic};

use crate::{
    extract::extract_attributes,
    primitive::{convert_primitive, primitive_mode},
    source::SourceMesh,
};

/// Build a mesh with per-attribute indexing from a source mesh.
///
/// Primitives that can't be converted are logged and skipped. Every semantic referenced by a
/// converted primitive is extracted from the mesh-level vertex containers; index streams whose
/// attribute set could not be extracted are dropped, and so are primitives left without positions.
/// The result has no primitives if nothing in `source` was convertible.
pub fn assemble_mesh(source: &SourceMesh) -> Mesh<'_> {
    let mut mesh = Mesh::new(source.id.as_str(), source.name.as_str());

    for (index, src) in source.primitives.iter().enumerate() {
        if let Err(e) = primitive_mode(src.topology) {
            tracing::warn!(index, error = %e, "skipping primitive");
            continue;
        }
        let mut primitive = match convert_primitive(src) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(index, error = %e, "failed to convert primitive; skipping");
                continue;
            }
        };

        for key in primitive.attributes() {
            if mesh.attributes_for_semantic(key.semantic).is_some() {
                continue;
            }
            let Some(data) = source.vertex_data(key.semantic) else {
                continue;
            };
            let fallback_name = format!("{}-{}", source.id, key.semantic.name().to_lowercase());
            mesh.set_attributes_for_semantic(
                key.semantic,
                extract_attributes(data, &fallback_name),
            );
        }

        primitive.retain_attributes(|key| {
            let present = mesh.attribute(key).is_some();
            if !present {
                tracing::debug!(index, attribute = %key, "no vertex data for attribute; dropping its indices");
            }
            present
        });
        if !primitive
            .attributes()
            .contains(&AttributeKey::new(Semantic::Position, 0))
        {
            tracing::warn!(index, "primitive has no usable positions; skipping");
            continue;
        }

        mesh.append_primitive(primitive);
    }

    tracing::debug!(
        id = mesh.id(),
        primitives = mesh.primitives().len(),
        semantics = ?mesh.semantics(),
        "assembled mesh"
    );
    mesh
}
