//! GPU-oriented mesh data: typed attribute streams, index streams, primitives, and meshes, with
//! explicit tracking of which buffers borrow from a source scene and which are owned.

mod data;
pub use data::*;
