//! Per-face, per-vertex and per-corner normals.
//!
//! - [`face_normals`]: one unit normal per triangle
//! - [`vertex_normals`]: weighted average of the normals of incident faces
//! - [`corner_normals`]: one normal per face corner, averaging only incident
//!   faces whose normal is within a threshold angle, so that creases stay
//!   sharp while smooth regions are shaded smoothly
//!
//! Normals are not stored in [`TriMesh`]; recompute them after any operation
//! that changes geometry, such as subdivision.

use nalgebra::Vector3;

use crate::error::{MeshError, Result};
use crate::mesh::{vertex_faces, TriMesh};

/// How incident faces contribute to a vertex normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalWeighting {
    /// Every incident face counts the same.
    Uniform,
    /// Faces are weighted by their area.
    #[default]
    Area,
    /// Faces are weighted by their interior angle at the vertex.
    Angle,
}

/// Unit normal of every face, following its winding.
///
/// Faces with zero area get the zero vector.
///
/// # Errors
///
/// Returns the [`TriMesh::validate`] error for a mesh that breaks its
/// invariants.
pub fn face_normals(mesh: &TriMesh) -> Result<Vec<Vector3<f64>>> {
    mesh.validate()?;
    Ok(unit_face_normals(mesh))
}

fn unit_face_normals(mesh: &TriMesh) -> Vec<Vector3<f64>> {
    (0..mesh.num_faces()).map(|f| mesh.face_normal(f)).collect()
}

/// Normal of every vertex, averaged from its incident faces.
///
/// Vertices without incident faces, or whose weighted sum cancels out, get
/// the zero vector.
///
/// # Errors
///
/// Returns the [`TriMesh::validate`] error for a mesh that breaks its
/// invariants.
///
/// # Example
///
/// ```
/// use tessel::algo::normals::{vertex_normals, NormalWeighting};
/// use tessel::mesh::TriMesh;
/// use nalgebra::{Point3, Vector3};
///
/// let mesh = TriMesh::new(
///     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
///     vec![[0, 1, 2]],
/// )
/// .unwrap();
///
/// let normals = vertex_normals(&mesh, NormalWeighting::Area).unwrap();
/// assert!((normals[0] - Vector3::z()).norm() < 1e-12);
/// ```
pub fn vertex_normals(mesh: &TriMesh, weighting: NormalWeighting) -> Result<Vec<Vector3<f64>>> {
    mesh.validate()?;
    let normals = unit_face_normals(mesh);
    let mut sums = vec![Vector3::zeros(); mesh.num_vertices()];

    for (f, face) in mesh.faces().iter().enumerate() {
        for corner in 0..3 {
            let weight = match weighting {
                NormalWeighting::Uniform => 1.0,
                NormalWeighting::Area => mesh.face_area(f),
                NormalWeighting::Angle => corner_angle(mesh, f, corner),
            };
            sums[face[corner]] += normals[f] * weight;
        }
    }

    Ok(sums.into_iter().map(normalize_or_zero).collect())
}

/// Normal of every face corner.
///
/// Entry `3 * f + c` belongs to corner `c` of face `f`. It is the
/// area-weighted average of the normals of the faces around that corner's
/// vertex that deviate from face `f`'s normal by at most `threshold_degrees`.
/// Face `f` itself always contributes.
///
/// # Errors
///
/// Returns [`MeshError::InvalidParameter`] unless the threshold is within
/// `[0, 180]`, and the [`TriMesh::validate`] error for a mesh that breaks its
/// invariants.
pub fn corner_normals(mesh: &TriMesh, threshold_degrees: f64) -> Result<Vec<Vector3<f64>>> {
    if !(0.0..=180.0).contains(&threshold_degrees) {
        return Err(MeshError::invalid_param(
            "threshold_degrees",
            threshold_degrees,
            "must be within [0, 180]",
        ));
    }

    mesh.validate()?;

    let min_cos = threshold_degrees.to_radians().cos();
    let normals = unit_face_normals(mesh);
    let areas: Vec<f64> = (0..mesh.num_faces()).map(|f| mesh.face_area(f)).collect();
    let (vf, _) = vertex_faces(mesh.num_vertices(), mesh.faces());

    let mut result = Vec::with_capacity(3 * mesh.num_faces());
    for (f, face) in mesh.faces().iter().enumerate() {
        for &v in face {
            let sum: Vector3<f64> = vf[v]
                .iter()
                .filter(|&&g| g == f || normals[g].dot(&normals[f]) >= min_cos)
                .map(|&g| normals[g] * areas[g])
                .sum();
            result.push(normalize_or_zero(sum));
        }
    }

    Ok(result)
}

/// Interior angle of face `f` at `corner`.
fn corner_angle(mesh: &TriMesh, f: usize, corner: usize) -> f64 {
    let p = mesh.face_positions(f);
    let e1 = p[(corner + 1) % 3] - p[corner];
    let e2 = p[(corner + 2) % 3] - p[corner];
    if e1.norm_squared() == 0.0 || e2.norm_squared() == 0.0 {
        return 0.0;
    }
    e1.angle(&e2)
}

fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}
