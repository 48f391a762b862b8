//! Adjacency relations derived from a face list.
//!
//! These are computed on demand from `[usize; 3]` faces rather than stored in
//! the mesh, so they can be rebuilt cheaply after an algorithm produces new
//! connectivity.

use std::collections::HashMap;

use crate::error::{MeshError, Result};

/// An undirected edge and the faces bordering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    /// Start vertex, as traversed by the first adjacent face.
    pub v0: usize,
    /// End vertex, as traversed by the first adjacent face.
    pub v1: usize,
    /// The first adjacent face and, for interior edges, the second one.
    pub faces: (usize, Option<usize>),
}

impl EdgeRecord {
    /// Whether the edge borders exactly one face.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.faces.1.is_none()
    }
}

/// All undirected edges of a triangle mesh.
///
/// Edges are stored in order of first appearance: faces in order, and within
/// a face the corner pairs `(0, 1)`, `(1, 2)`, `(2, 0)`.
#[derive(Debug, Clone)]
pub struct EdgeTable {
    edges: Vec<EdgeRecord>,
    lookup: HashMap<(usize, usize), usize>,
}

impl EdgeTable {
    /// Build the edge table of `faces`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NonManifoldEdge`] if an edge borders more than two
    /// faces.
    pub fn build(faces: &[[usize; 3]]) -> Result<Self> {
        let mut edges: Vec<EdgeRecord> = Vec::with_capacity(faces.len() * 3 / 2 + 3);
        let mut lookup: HashMap<(usize, usize), usize> = HashMap::with_capacity(faces.len() * 2);

        for (face_idx, face) in faces.iter().enumerate() {
            for i in 0..3 {
                let v0 = face[i];
                let v1 = face[(i + 1) % 3];

                match lookup.get(&edge_key(v0, v1)) {
                    Some(&e) => {
                        let record = &mut edges[e];
                        if record.faces.1.is_some() {
                            return Err(MeshError::NonManifoldEdge {
                                v0: record.v0,
                                v1: record.v1,
                            });
                        }
                        record.faces.1 = Some(face_idx);
                    }
                    None => {
                        lookup.insert(edge_key(v0, v1), edges.len());
                        edges.push(EdgeRecord {
                            v0,
                            v1,
                            faces: (face_idx, None),
                        });
                    }
                }
            }
        }

        log::trace!("edge table: {} edges from {} faces", edges.len(), faces.len());

        Ok(Self { edges, lookup })
    }

    /// Number of undirected edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the table holds no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges in table order.
    #[inline]
    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Look up the edge between `a` and `b`, in either direction.
    pub fn find(&self, a: usize, b: usize) -> Option<&EdgeRecord> {
        self.lookup.get(&edge_key(a, b)).map(|&e| &self.edges[e])
    }

    /// Number of edges bordering exactly one face.
    pub fn num_boundary(&self) -> usize {
        self.edges.iter().filter(|e| e.is_boundary()).count()
    }

    /// Number of edges bordering two faces.
    pub fn num_interior(&self) -> usize {
        self.len() - self.num_boundary()
    }

    /// Flag every vertex that is an endpoint of a boundary edge.
    pub fn boundary_vertices(&self, num_vertices: usize) -> Vec<bool> {
        let mut boundary = vec![false; num_vertices];
        for e in self.edges.iter().filter(|e| e.is_boundary()) {
            boundary[e.v0] = true;
            boundary[e.v1] = true;
        }
        boundary
    }
}

/// Canonical key for an undirected edge (smaller index first).
#[inline]
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Vertex-to-face relation.
///
/// Returns `(vf, vfi)`: `vf[v]` lists the faces incident to `v` in ascending
/// order and `vfi[v][k]` is the corner (0, 1 or 2) at which `v` appears in
/// face `vf[v][k]`.
pub fn vertex_faces(num_vertices: usize, faces: &[[usize; 3]]) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let mut vf: Vec<Vec<usize>> = vec![Vec::new(); num_vertices];
    let mut vfi: Vec<Vec<usize>> = vec![Vec::new(); num_vertices];

    for (face_idx, face) in faces.iter().enumerate() {
        for (corner, &v) in face.iter().enumerate() {
            vf[v].push(face_idx);
            vfi[v].push(corner);
        }
    }

    (vf, vfi)
}

/// Vertex-to-vertex relation: the sorted one-ring neighbors of every vertex.
///
/// Vertices not referenced by any face get an empty list.
pub fn vertex_neighbors(num_vertices: usize, faces: &[[usize; 3]]) -> Vec<Vec<usize>> {
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); num_vertices];

    for face in faces {
        for i in 0..3 {
            let v = face[i];
            neighbors[v].push(face[(i + 1) % 3]);
            neighbors[v].push(face[(i + 2) % 3]);
        }
    }

    for ring in &mut neighbors {
        ring.sort_unstable();
        ring.dedup();
    }

    neighbors
}
