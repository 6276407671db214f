//! Conversion of source vertex containers into [MeshAttributes](hedron::MeshAttribute).

use hedron::{AttributeSets, MeshAttribute};

use crate::source::{InputLayout, VertexData, VertexValues};

/// Components per element assumed for [InputLayout::Unannotated] containers.
pub const UNANNOTATED_STRIDE: usize = 3;

/// Turn each set of a vertex container into an attribute viewing the container's values.
///
/// Sets are packed back to back, so each one starts where the previous one's values end. Only
/// `f32` data is converted; double-precision or untyped containers yield no attributes at all.
/// Sets with a zero stride, or which extend past the end of the container, are skipped.
///
/// `fallback_name` names the single set of an [InputLayout::Unannotated] container.
pub fn extract_attributes<'src>(data: &'src VertexData, fallback_name: &str) -> AttributeSets<'src> {
    let mut attributes = AttributeSets::new();

    let values: &'src [f32] = match &data.values {
        VertexValues::Float(values) => values,
        VertexValues::Double(values) => {
            tracing::warn!(
                container = fallback_name,
                len = values.len(),
                "double-precision vertex data is unsupported; skipping"
            );
            return attributes;
        }
        VertexValues::Unknown => {
            tracing::warn!(container = fallback_name, "vertex data of unknown type; skipping");
            return attributes;
        }
    };

    let sets: Vec<(&str, usize, usize)> = match &data.layout {
        InputLayout::Declared(infos) => infos
            .iter()
            .map(|info| (info.name.as_str(), info.stride, info.length))
            .collect(),
        InputLayout::Unannotated => vec![(fallback_name, UNANNOTATED_STRIDE, 0)],
    };

    let mut offset = 0;
    for (set, (name, stride, length)) in (0u32..).zip(sets) {
        let length = match length {
            0 => values.len().saturating_sub(offset),
            l => l,
        };
        let start = offset;
        offset = offset.saturating_add(length);

        if stride == 0 {
            tracing::warn!(set_name = name, set, "vertex set has a stride of zero; skipping");
            continue;
        }
        let elements = length / stride;
        let view = start
            .checked_add(elements * stride)
            .and_then(|end| values.get(start..end));
        let Some(view) = view else {
            tracing::warn!(
                set_name = name,
                set,
                start,
                length,
                available = values.len(),
                "vertex set extends past the end of its container; skipping"
            );
            continue;
        };

        match MeshAttribute::packed(name, view, stride) {
            Ok(attr) => {
                tracing::trace!(set_name = name, set, stride, count = attr.count(), start, "extracted vertex set");
                attributes.insert(set, attr);
            }
            Err(e) => tracing::warn!(set_name = name, set, error = %e, "could not view vertex set; skipping"),
        }
    }

    attributes
}
