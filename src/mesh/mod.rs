//! Core mesh data structures.
//!
//! The primary type is [`TriMesh`], an owned vertex list plus a list of
//! triangles given as vertex-id triples. Adjacency relations (edges, vertex
//! to face, vertex to vertex) live in [`adjacency`] and are derived from the
//! face list when an algorithm needs them.
//!
//! # Construction
//!
//! ```
//! use tessel::mesh::TriMesh;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh = TriMesh::new(vertices, faces).unwrap();
//! assert_eq!(mesh.num_faces(), 1);
//! ```

pub mod adjacency;
mod trimesh;

pub use adjacency::{vertex_faces, vertex_neighbors, EdgeRecord, EdgeTable};
pub use trimesh::TriMesh;
