//! Sqrt(3) subdivision for triangle meshes.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::Result;
use crate::mesh::{vertex_neighbors, EdgeRecord, EdgeTable, TriMesh};

use super::SubdivideOptions;

/// Performs √3 subdivision on a triangle mesh.
///
/// Runs `options.iterations` passes of [`sqrt3_subdivide_once`], each on the
/// result of the previous one. The input mesh is left untouched; zero
/// iterations return a copy of it.
///
/// # Errors
///
/// Fails if the mesh has no faces, references missing vertices, has a
/// degenerate face, or has an edge shared by more than two faces.
pub fn sqrt3_subdivide(mesh: &TriMesh, options: &SubdivideOptions) -> Result<TriMesh> {
    sqrt3_subdivide_with_progress(mesh, options, &Progress::none())
}

/// √3 subdivision with progress reporting.
pub fn sqrt3_subdivide_with_progress(
    mesh: &TriMesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<TriMesh> {
    mesh.validate()?;

    let mut current = mesh.clone();
    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Sqrt3 subdivision");
        current = sqrt3_subdivide_once(&current, options.parallel)?;
    }
    progress.report(options.iterations, options.iterations, "Sqrt3 subdivision");

    Ok(current)
}

/// Perform one iteration of √3 subdivision.
///
/// The output holds `V + F` vertices: the `V` original vertices (relaxed, or
/// unchanged on the boundary) followed by one barycenter per face, so face
/// `f` owns vertex `V + f`. Every interior edge contributes two triangles and
/// every boundary edge one, emitted in [`EdgeTable`] order.
///
/// Emitted triangles keep the winding of the face they replace: for an edge
/// traversed `v0 -> v1` by its first face `f0` and bordered by `f1` on the
/// other side, the triangles are `(c0, v0, c1)` and `(c1, v1, c0)`.
///
/// Parallel and sequential execution produce identical meshes.
pub fn sqrt3_subdivide_once(mesh: &TriMesh, parallel: bool) -> Result<TriMesh> {
    mesh.validate()?;

    let vertices = mesh.vertices();
    let faces = mesh.faces();
    let num_vertices = vertices.len();

    let edges = EdgeTable::build(faces)?;
    let neighbors = vertex_neighbors(num_vertices, faces);
    let boundary = edges.boundary_vertices(num_vertices);

    let (relaxed, barycenters) = if parallel {
        let relaxed: Vec<Point3<f64>> = (0..num_vertices)
            .into_par_iter()
            .map(|v| relax_vertex(vertices, v, &neighbors[v], boundary[v]))
            .collect();
        let barycenters: Vec<Point3<f64>> = (0..faces.len())
            .into_par_iter()
            .map(|f| mesh.face_barycenter(f))
            .collect();
        (relaxed, barycenters)
    } else {
        let relaxed: Vec<Point3<f64>> = (0..num_vertices)
            .map(|v| relax_vertex(vertices, v, &neighbors[v], boundary[v]))
            .collect();
        let barycenters: Vec<Point3<f64>> = (0..faces.len())
            .map(|f| mesh.face_barycenter(f))
            .collect();
        (relaxed, barycenters)
    };

    let mut new_vertices = relaxed;
    new_vertices.extend(barycenters);

    let emitted: Vec<([usize; 3], Option<[usize; 3]>)> = if parallel {
        edges
            .edges()
            .par_iter()
            .map(|e| flip_edge(e, num_vertices))
            .collect()
    } else {
        edges.edges().iter().map(|e| flip_edge(e, num_vertices)).collect()
    };

    let mut new_faces: Vec<[usize; 3]> = Vec::with_capacity(2 * edges.len());
    for (first, second) in emitted {
        new_faces.push(first);
        new_faces.extend(second);
    }

    log::debug!(
        "sqrt3: {} vertices, {} faces ({} interior / {} boundary edges) -> {} vertices, {} faces",
        num_vertices,
        faces.len(),
        edges.num_interior(),
        edges.num_boundary(),
        new_vertices.len(),
        new_faces.len()
    );

    Ok(TriMesh::from_raw(new_vertices, new_faces))
}

/// Relaxation weight `a_n = (4 - 2 cos(2π / n)) / 9` for a vertex of valence `n`.
///
/// For the regular valence of 6 this is exactly one third.
pub fn sqrt3_weight(valence: usize) -> f64 {
    let n = valence as f64;
    (4.0 - 2.0 * (2.0 * std::f64::consts::PI / n).cos()) / 9.0
}

/// New position of an original vertex.
///
/// Boundary and isolated vertices stay where they are; interior vertices move
/// to `(1 - a_n) p + (a_n / n) Σ q` over their one-ring `q`.
fn relax_vertex(
    vertices: &[Point3<f64>],
    v: usize,
    ring: &[usize],
    is_boundary: bool,
) -> Point3<f64> {
    let pos = vertices[v];
    if is_boundary || ring.is_empty() {
        return pos;
    }

    let n = ring.len();
    let alpha = sqrt3_weight(n);
    let ring_sum: Vector3<f64> = ring.iter().map(|&q| vertices[q].coords).sum();

    Point3::from(pos.coords * (1.0 - alpha) + ring_sum * (alpha / n as f64))
}

/// Triangles replacing an original edge.
fn flip_edge(edge: &EdgeRecord, num_vertices: usize) -> ([usize; 3], Option<[usize; 3]>) {
    let c0 = num_vertices + edge.faces.0;
    match edge.faces.1 {
        Some(f1) => {
            let c1 = num_vertices + f1;
            ([c0, edge.v0, c1], Some([c1, edge.v1, c0]))
        }
        None => ([c0, edge.v0, edge.v1], None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    fn create_tetrahedron() -> TriMesh {
        // Regular tetrahedron centered at the origin, faces wound outward.
        let vertices = vec![
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [1, 3, 2], [0, 3, 1], [0, 2, 3]];
        TriMesh::new(vertices, faces).unwrap()
    }

    fn create_single_triangle() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        TriMesh::new(vertices, vec![[0, 1, 2]]).unwrap()
    }

    /// Six triangles fanned around vertex 0, which sits at height `apex`.
    fn create_hexagon_fan(apex: f64) -> TriMesh {
        let mut vertices = vec![Point3::new(0.0, 0.0, apex)];
        for k in 0..6 {
            let angle = k as f64 * std::f64::consts::PI / 3.0;
            vertices.push(Point3::new(angle.cos(), angle.sin(), 0.0));
        }
        let faces = (0..6).map(|k| [0, 1 + k, 1 + (k + 1) % 6]).collect();
        TriMesh::new(vertices, faces).unwrap()
    }

    /// Regular grid in the z = 0 plane, counter-clockwise triangles.
    fn create_grid(n: usize) -> TriMesh {
        let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
        let mut faces = Vec::with_capacity(n * n * 2);

        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }

        TriMesh::new(vertices, faces).unwrap()
    }

    #[test]
    fn test_tetrahedron_counts() {
        let mesh = create_tetrahedron();
        let result = sqrt3_subdivide_once(&mesh, false).unwrap();

        // 4 + 4 vertices, 2 * 6 interior edges
        assert_eq!(result.num_vertices(), 8);
        assert_eq!(result.num_faces(), 12);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_single_triangle() {
        let mesh = create_single_triangle();
        let result = sqrt3_subdivide_once(&mesh, false).unwrap();

        assert_eq!(result.num_vertices(), 4);
        assert_eq!(result.num_faces(), 3);

        // All original vertices are on the boundary and stay bit-identical.
        for v in 0..3 {
            assert_eq!(result.position(v), mesh.position(v));
        }
        assert!((result.position(3) - Point3::new(0.5, 1.0 / 3.0, 0.0)).norm() < 1e-12);
        assert_eq!(result.faces(), &[[3, 0, 1], [3, 1, 2], [3, 2, 0]]);
    }

    #[test]
    fn test_vertex_and_face_count_laws() {
        let mesh = create_grid(4);
        let edges = EdgeTable::build(mesh.faces()).unwrap();
        let result = sqrt3_subdivide_once(&mesh, true).unwrap();

        assert_eq!(result.num_vertices(), mesh.num_vertices() + mesh.num_faces());
        assert_eq!(
            result.num_faces(),
            2 * edges.num_interior() + edges.num_boundary()
        );
    }

    #[test]
    fn test_two_iterations_apply_laws_recursively() {
        let mesh = create_tetrahedron();
        let result = sqrt3_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();

        // First pass: 8 vertices, 12 faces, 18 edges (closed, all interior).
        assert_eq!(result.num_vertices(), 8 + 12);
        assert_eq!(result.num_faces(), 2 * 18);
    }

    #[test]
    fn test_closed_mesh_triples_faces() {
        let mesh = create_tetrahedron();
        let mut current = mesh.clone();
        for _ in 0..3 {
            let next = sqrt3_subdivide_once(&current, true).unwrap();
            assert_eq!(next.num_faces(), current.num_faces() * 3);
            current = next;
        }
    }

    #[test]
    fn test_boundary_vertices_are_fixed() {
        let mesh = create_hexagon_fan(0.5);
        let result = sqrt3_subdivide_once(&mesh, false).unwrap();

        for v in 1..7 {
            assert_eq!(result.position(v), mesh.position(v));
        }
    }

    #[test]
    fn test_valence_six_relaxation() {
        let mesh = create_hexagon_fan(0.5);
        let result = sqrt3_subdivide_once(&mesh, false).unwrap();

        // a_6 = 1/3, so p' = 2/3 p + 1/3 mean(ring) and the ring mean is the origin.
        let ring_mean = Point3::origin();
        let expected = Point3::from(
            mesh.position(0).coords * (2.0 / 3.0) + ring_mean.coords / 3.0,
        );
        assert!((result.position(0) - expected).norm() < 1e-12);
        assert!((result.position(0).z - 1.0 / 3.0).abs() < 1e-12);

        // 6 spokes are interior, 6 rim edges are boundary.
        assert_eq!(result.num_vertices(), 13);
        assert_eq!(result.num_faces(), 18);
    }

    #[test]
    fn test_sqrt3_weight() {
        assert!((sqrt3_weight(6) - 1.0 / 3.0).abs() < 1e-12);
        // cos(2π/3) = -1/2
        assert!((sqrt3_weight(3) - 5.0 / 9.0).abs() < 1e-12);
        // cos(π/2) = 0
        assert!((sqrt3_weight(4) - 4.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_interior_vertex_formula() {
        // Regular tetrahedron: every vertex has valence 3 and its ring mean
        // is -p / 3, so p' = (4/9) p - (5/27) p = (7/27) p.
        let mesh = create_tetrahedron();
        let result = sqrt3_subdivide_once(&mesh, false).unwrap();

        for v in 0..4 {
            let expected = mesh.position(v).coords * (7.0 / 27.0);
            assert!((result.position(v).coords - expected).norm() < 1e-12);
        }
    }

    #[test]
    fn test_isolated_vertex_is_unchanged() {
        let mut vertices = create_single_triangle().into_parts().0;
        vertices.push(Point3::new(5.0, 5.0, 5.0));
        let mesh = TriMesh::new(vertices, vec![[0, 1, 2]]).unwrap();

        let result = sqrt3_subdivide_once(&mesh, false).unwrap();
        assert_eq!(result.num_vertices(), 5);
        assert_eq!(*result.position(3), Point3::new(5.0, 5.0, 5.0));
        // Barycenter lands after the isolated vertex.
        assert!((result.position(4) - Point3::new(0.5, 1.0 / 3.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_edge_flip_connectivity() {
        // Two triangles sharing edge (1, 2).
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let mesh = TriMesh::new(vertices, vec![[0, 1, 2], [2, 1, 3]]).unwrap();
        let result = sqrt3_subdivide_once(&mesh, false).unwrap();

        // Barycenters are vertices 4 and 5; edge order is (0,1) (1,2) (2,0) (1,3) (3,2).
        assert_eq!(
            result.faces(),
            &[[4, 0, 1], [4, 1, 5], [5, 2, 4], [4, 2, 0], [5, 1, 3], [5, 3, 2]]
        );

        // The original edge is gone, replaced by the barycenter edge.
        let edges = EdgeTable::build(result.faces()).unwrap();
        assert!(edges.find(1, 2).is_none());
        assert!(edges.find(4, 5).is_some());
    }

    #[test]
    fn test_orientation_is_preserved_on_flat_mesh() {
        let mesh = create_grid(3);
        let result = sqrt3_subdivide_once(&mesh, true).unwrap();

        for f in 0..result.num_faces() {
            assert!(
                result.face_normal(f).z > 0.0,
                "face {} flipped: {:?}",
                f,
                result.face(f)
            );
        }
    }

    #[test]
    fn test_orientation_is_outward_on_closed_mesh() {
        let mesh = create_tetrahedron();
        let result = sqrt3_subdivide_once(&mesh, false).unwrap();

        for f in 0..result.num_faces() {
            let outward = result.face_barycenter(f).coords;
            assert!(result.face_normal(f).dot(&outward) > 0.0);
        }
        assert!(EdgeTable::build(result.faces()).unwrap().num_boundary() == 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mesh = create_grid(6);
        let sequential = sqrt3_subdivide(&mesh, &SubdivideOptions::new(2).sequential()).unwrap();
        let parallel = sqrt3_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_input_is_not_modified() {
        let mesh = create_tetrahedron();
        let before = mesh.clone();
        let _ = sqrt3_subdivide(&mesh, &SubdivideOptions::new(1)).unwrap();
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_zero_iterations() {
        let mesh = create_tetrahedron();
        let result = sqrt3_subdivide(&mesh, &SubdivideOptions::new(0)).unwrap();
        assert_eq!(result, mesh);
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let mesh = TriMesh::from_raw(vec![Point3::origin()], vec![]);
        let result = sqrt3_subdivide_once(&mesh, false);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_index_is_rejected() {
        let mesh = TriMesh::from_raw(vec![Point3::origin(); 3], vec![[0, 1, 3]]);
        let result = sqrt3_subdivide(&mesh, &SubdivideOptions::new(1));
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 3 })
        ));
    }

    #[test]
    fn test_non_manifold_edge_is_rejected() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let mesh = TriMesh::new(vertices, vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]]).unwrap();
        let result = sqrt3_subdivide_once(&mesh, true);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { .. })));
    }

    #[test]
    fn test_progress_reporting() {
        use std::sync::{Arc, Mutex};

        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let progress = Progress::new(move |current, total, _| {
            sink.lock().unwrap().push((current, total));
        });

        let mesh = create_single_triangle();
        sqrt3_subdivide_with_progress(&mesh, &SubdivideOptions::new(3), &progress).unwrap();

        assert_eq!(*calls.lock().unwrap(), vec![(0, 3), (1, 3), (2, 3), (3, 3)]);
    }
}
