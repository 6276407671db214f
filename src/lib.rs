//! Conversion of parsed scene meshes into GPU-ready indexed geometry.
//!
//! A [SourceMesh](source::SourceMesh) indexes each of its attributes separately and may contain
//! polygons of any arity. [convert_mesh] turns it into one or more [hedron::Mesh]es whose
//! primitives address every attribute through a single index stream, in four stages:
//!
//! 1. [assemble](assemble::assemble_mesh): extract attributes, triangulate polygons, and gather
//!    per-attribute index streams.
//! 2. [flip](texcoord::flip_texcoords): move texture coordinates to a bottom-left origin.
//! 3. [unify](unify::unify_indices): weld identical face-vertices into shared vertices.
//! 4. [split](split::split_mesh): break up meshes that exceed the vertex ceiling.
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod assemble;
pub mod error;
pub mod extract;
pub mod primitive;
pub mod source;
pub mod split;
pub mod texcoord;
pub mod triangulate;
pub mod unify;

pub use error::Error;
pub use hedron;

use hedron::Mesh;
use source::SourceMesh;

/// Largest number of vertices addressable by a 16-bit index.
pub const DEFAULT_MAX_VERTICES: usize = u16::MAX as usize;

/// Settings for [convert_mesh].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Most vertices any output mesh may contain.
    pub max_vertices: usize,
    /// Whether to replace texcoord V with `1 - V`.
    pub flip_texcoord_v: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_vertices: DEFAULT_MAX_VERTICES,
            flip_texcoord_v: true,
        }
    }
}

impl ConvertOptions {
    pub fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.max_vertices = max_vertices;
        self
    }

    pub fn with_flip_texcoord_v(mut self, flip: bool) -> Self {
        self.flip_texcoord_v = flip;
        self
    }
}

/// Convert one source mesh.
///
/// Returns no meshes if nothing in `source` could be converted, one mesh if the result fits within
/// [ConvertOptions::max_vertices], and several otherwise.
#[tracing::instrument(skip_all, fields(id = %source.id))]
pub fn convert_mesh(
    source: &SourceMesh,
    options: &ConvertOptions,
) -> Result<Vec<Mesh<'static>>, Error> {
    let mut mesh = assemble::assemble_mesh(source);
    if mesh.primitives().is_empty() {
        tracing::debug!("mesh has no convertible primitives");
        return Ok(Vec::new());
    }

    if options.flip_texcoord_v {
        texcoord::flip_texcoords(&mut mesh);
    }

    let unified = unify::unify_indices(&mesh)?;
    let meshes = split::split_mesh(unified, options.max_vertices)?;
    tracing::debug!(meshes = meshes.len(), "converted mesh");
    Ok(meshes)
}

/// Convert a batch of source meshes, in order.
///
/// A mesh that fails to convert is logged and left out; it doesn't affect the others.
pub fn convert_meshes<'a>(
    sources: impl IntoIterator<Item = &'a SourceMesh>,
    options: &ConvertOptions,
) -> Vec<Mesh<'static>> {
    let mut res = Vec::new();
    for source in sources {
        match convert_mesh(source, options) {
            Ok(meshes) => res.extend(meshes),
            Err(e) => tracing::error!(id = source.id.as_str(), error = %e, "failed to convert mesh"),
        }
    }
    res
}
