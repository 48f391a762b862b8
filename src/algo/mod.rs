//! Mesh processing algorithms.
//!
//! - **Subdivision**: √3 subdivision
//! - **Normals**: per-face, per-vertex and per-corner normals
//! - **Components**: edge-connected face components
//!
//! Every algorithm takes a [`TriMesh`](crate::mesh::TriMesh) by reference and
//! returns freshly allocated results.

pub mod components;
pub mod normals;
pub mod progress;
pub mod subdivide;

pub use progress::Progress;
