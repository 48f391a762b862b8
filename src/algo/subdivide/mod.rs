//! Mesh subdivision.
//!
//! # Sqrt(3) Subdivision
//!
//! Kobbelt's √3 subdivision (Kobbelt, 2000) is an approximating scheme for
//! triangle meshes. Each iteration:
//!
//! 1. Inserts a new vertex at the barycenter of every face
//! 2. Relaxes the original vertices towards their one-ring
//! 3. Flips every original edge, so that it now connects the two barycenters
//!    of the faces it used to separate
//!
//! One iteration triples the number of faces of a closed mesh; two iterations
//! amount to a triadic split of every original triangle, hence the name.
//!
//! Boundary vertices are kept in place and boundary edges are not flipped:
//! each boundary edge yields a single triangle joining it to its face's
//! barycenter.
//!
//! # Example
//!
//! ```
//! use tessel::mesh::TriMesh;
//! use tessel::algo::subdivide::{sqrt3_subdivide, SubdivideOptions};
//! use nalgebra::Point3;
//!
//! let mesh = TriMesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.5, 1.0, 0.0),
//!         Point3::new(0.5, 0.5, 1.0),
//!     ],
//!     vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
//! )
//! .unwrap();
//!
//! let refined = sqrt3_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(refined.num_faces(), 36);
//! ```
//!
//! # References
//!
//! - Kobbelt, L. (2000). "√3-Subdivision." Proceedings of SIGGRAPH 2000,
//!   103-112.

mod sqrt3;

pub use sqrt3::{
    sqrt3_subdivide, sqrt3_subdivide_once, sqrt3_subdivide_with_progress, sqrt3_weight,
};

/// Options for subdivision algorithms.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            parallel: true,
        }
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
