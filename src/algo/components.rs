//! Connected components of the face graph.
//!
//! Two faces belong to the same component when they share an edge. Faces
//! that only touch at a vertex are kept apart.

use crate::error::Result;
use crate::mesh::{EdgeTable, TriMesh};

/// Component label of every face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    /// `labels[f]` is the component of face `f`, in `0..count`.
    pub labels: Vec<usize>,
    /// Number of components.
    pub count: usize,
}

impl Components {
    /// Number of faces in each component, indexed by label.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.count];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Label the edge-connected components of a mesh.
///
/// Labels are assigned in order of the lowest face id in each component, so
/// face 0 is always in component 0.
///
/// # Errors
///
/// Fails on meshes that break the [`TriMesh::validate`] invariants and on
/// meshes with an edge shared by more than two faces.
///
/// # Example
///
/// ```
/// use tessel::algo::components::face_components;
/// use tessel::mesh::TriMesh;
/// use nalgebra::Point3;
///
/// let vertices = (0..6).map(|i| Point3::new(i as f64, (i % 2) as f64, 0.0)).collect();
/// let mesh = TriMesh::new(vertices, vec![[0, 1, 2], [3, 4, 5]]).unwrap();
///
/// let components = face_components(&mesh).unwrap();
/// assert_eq!(components.count, 2);
/// assert_eq!(components.labels, vec![0, 1]);
/// ```
pub fn face_components(mesh: &TriMesh) -> Result<Components> {
    mesh.validate()?;
    let edges = EdgeTable::build(mesh.faces())?;

    let mut sets = DisjointSets::new(mesh.num_faces());
    for edge in edges.edges() {
        if let (f0, Some(f1)) = edge.faces {
            sets.union(f0, f1);
        }
    }

    let mut root_label = vec![usize::MAX; mesh.num_faces()];
    let mut labels = Vec::with_capacity(mesh.num_faces());
    let mut count = 0;
    for f in 0..mesh.num_faces() {
        let root = sets.find(f);
        if root_label[root] == usize::MAX {
            root_label[root] = count;
            count += 1;
        }
        labels.push(root_label[root]);
    }

    log::debug!("{} faces in {} components", mesh.num_faces(), count);

    Ok(Components { labels, count })
}

/// Per-face RGB color in `[0, 1]` for display.
///
/// Every component gets its own fully saturated hue, evenly spaced around the
/// color wheel.
pub fn component_colors(components: &Components) -> Vec<[f64; 3]> {
    let palette: Vec<[f64; 3]> = (0..components.count)
        .map(|label| hue_to_rgb(label as f64 / components.count as f64))
        .collect();

    components.labels.iter().map(|&label| palette[label]).collect()
}

/// Fully saturated, full value color for `hue` in `[0, 1)`.
fn hue_to_rgb(hue: f64) -> [f64; 3] {
    let h = hue.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let t = h - sector;

    match sector as u8 {
        0 => [1.0, t, 0.0],
        1 => [1.0 - t, 1.0, 0.0],
        2 => [0.0, 1.0, t],
        3 => [0.0, 1.0 - t, 1.0],
        4 => [t, 0.0, 1.0],
        _ => [1.0, 0.0, 1.0 - t],
    }
}

/// Union-find over face ids with path halving.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Keep the smaller id as root.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use nalgebra::Point3;

    fn grid_vertices(n: usize) -> Vec<Point3<f64>> {
        (0..n).map(|i| Point3::new(i as f64, (i * i % 7) as f64, 0.0)).collect()
    }

    #[test]
    fn test_single_component() {
        let mesh = TriMesh::new(
            grid_vertices(4),
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        )
        .unwrap();

        let components = face_components(&mesh).unwrap();
        assert_eq!(components.count, 1);
        assert_eq!(components.sizes(), vec![4]);
    }

    #[test]
    fn test_vertex_contact_does_not_connect() {
        // Two triangles sharing only vertex 2.
        let mesh = TriMesh::new(grid_vertices(5), vec![[0, 1, 2], [2, 3, 4]]).unwrap();
        let components = face_components(&mesh).unwrap();
        assert_eq!(components.count, 2);
    }

    #[test]
    fn test_labels_follow_lowest_face() {
        // Faces 0 and 2 share edge (1, 2); face 1 is separate.
        let mesh = TriMesh::new(
            grid_vertices(7),
            vec![[0, 1, 2], [4, 5, 6], [2, 1, 3]],
        )
        .unwrap();

        let components = face_components(&mesh).unwrap();
        assert_eq!(components.labels, vec![0, 1, 0]);
        assert_eq!(components.sizes(), vec![2, 1]);
    }

    #[test]
    fn test_unvalidated_mesh_is_rejected() {
        let mesh = TriMesh::from_raw(grid_vertices(3), vec![[0, 1, 5]]);
        assert!(matches!(
            face_components(&mesh),
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 5 })
        ));
    }

    #[test]
    fn test_component_colors() {
        let components = Components {
            labels: vec![0, 1, 0, 2],
            count: 3,
        };
        let colors = component_colors(&components);

        assert_eq!(colors.len(), 4);
        assert_eq!(colors[0], colors[2]);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[3]);
        assert_eq!(colors[0], [1.0, 0.0, 0.0]);
        for c in colors.iter().flatten() {
            assert!((0.0..=1.0).contains(c));
        }
    }
}
