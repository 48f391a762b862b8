//! STL (stereolithography) format support.
//!
//! STL stores every triangle with its own copy of its corner positions.
//! Corners with equal coordinates are merged into one vertex on load so that
//! the result has usable connectivity.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format. Triangles that collapse
/// after merging corners are dropped; a file left without triangles fails
/// with [`MeshError::EmptyMesh`].
///
/// # Example
///
/// ```no_run
/// use tessel::io::stl;
///
/// let mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::load(path, e.to_string()))?;

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut lookup: HashMap<[u32; 3], usize> = HashMap::new();
    let mut merge = |p: [f32; 3]| -> usize {
        // -0.0 and 0.0 are the same position; adding 0.0 maps the former to the latter.
        let key = p.map(|c| (c + 0.0).to_bits());
        *lookup.entry(key).or_insert_with(|| {
            vertices.push(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));
            vertices.len() - 1
        })
    };

    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(stl.faces.len());
    let mut dropped = 0;
    for tri in &stl.faces {
        let [i0, i1, i2] = tri.vertices.map(|v| {
            let p = &stl.vertices[v];
            merge([p[0], p[1], p[2]])
        });

        if i0 != i1 && i1 != i2 && i0 != i2 {
            faces.push([i0, i1, i2]);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        log::warn!("{}: dropped {} degenerate triangles", path.display(), dropped);
    }

    TriMesh::new(vertices, faces)
}

/// Save a mesh to a binary STL file.
///
/// Coordinates are narrowed to `f32`, as the format requires.
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    let triangles: Vec<stl_io::Triangle> = (0..mesh.num_faces())
        .map(|f| {
            let n = mesh.face_normal(f);
            let [p0, p1, p2] = mesh.face_positions(f);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
