//! # See Also
//!
//! * [glTF 2.0 Spec](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html), whose mesh model
//!   these types are meant to feed

pub mod buffer;
mod mesh;

pub use buffer::{Buffer, Ownership};
pub use mesh::*;
