//! Texture-coordinate convention fix-up.
//!
//! The source convention puts the texture origin at the top left; GL puts it at the bottom left.

use hedron::{ComponentType, Mesh, MeshAttribute, Semantic};

/// Replace the V component of every element with `1 - V`.
///
/// Only `f32` attributes with at least two components are touched, and only their second
/// component. A borrowed attribute is copied into an owned buffer first. Returns whether the
/// attribute was modified.
pub fn flip_v(attribute: &mut MeshAttribute<'_>) -> bool {
    if attribute.component_type() != ComponentType::F32 || attribute.components_per_attribute() < 2
    {
        return false;
    }
    for uv in attribute.elements_mut() {
        uv[1] = 1.0 - uv[1];
    }
    true
}

/// Flip V on every texcoord set of `mesh`.
pub fn flip_texcoords(mesh: &mut Mesh<'_>) {
    let Some(sets) = mesh.attributes_for_semantic_mut(Semantic::Texcoord) else {
        return;
    };
    for (set, attr) in sets.iter_mut() {
        if flip_v(attr) {
            tracing::trace!(set, count = attr.count(), "flipped texcoord V");
        } else {
            tracing::debug!(
                set,
                components = attr.components_per_attribute(),
                "texcoord set has no V component; left as-is"
            );
        }
    }
}
