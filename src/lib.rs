//! # Tessel
//!
//! Triangle mesh refinement with Kobbelt's √3 subdivision, plus the basic
//! mesh queries that go with it.
//!
//! ## Features
//!
//! - **Indexed triangle meshes**: plain vertex and face arrays with validation
//! - **Adjacency**: edge table with boundary classification, vertex-face and
//!   vertex-vertex relations
//! - **√3 subdivision**: optionally parallel, with deterministic output order
//! - **Normals**: per-face, per-vertex (uniform, area, angle weighted) and
//!   per-corner normals
//! - **Connected components** of the face graph
//! - **File formats**: OFF, OBJ, PLY, STL
//!
//! ## Quick Start
//!
//! ```no_run
//! use tessel::prelude::*;
//!
//! let mesh = tessel::io::load("bunny.off").unwrap();
//! let refined = sqrt3_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();
//!
//! println!("{} -> {} faces", mesh.num_faces(), refined.num_faces());
//! tessel::io::save(&refined, "bunny_sqrt3.off").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use tessel::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mesh = TriMesh::new(vertices, faces).unwrap();
//! let refined = sqrt3_subdivide(&mesh, &SubdivideOptions::default()).unwrap();
//!
//! // V + F vertices, two triangles per interior edge
//! assert_eq!(refined.num_vertices(), 8);
//! assert_eq!(refined.num_faces(), 12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use tessel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::subdivide::{sqrt3_subdivide, sqrt3_subdivide_once, SubdivideOptions};
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{EdgeRecord, EdgeTable, TriMesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
