//! Wavefront OBJ format support.
//!
//! Only geometry is read: `v` records for positions and `f` records for
//! faces. Texture coordinates, normals, groups and materials are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

use super::triangulate_fan;

/// Load a mesh from an OBJ file.
///
/// Face corners may be written as `i`, `i/t`, `i//n` or `i/t/n`; negative
/// indices count back from the most recent vertex.
///
/// # Example
///
/// ```no_run
/// use tessel::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let coords: Vec<f64> = parts
                    .take(3)
                    .map(|t| t.parse::<f64>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| MeshError::load(path, format!("line {}: {}", line_no + 1, e)))?;
                if coords.len() < 3 {
                    return Err(MeshError::load(
                        path,
                        format!("line {}: vertex needs 3 coordinates", line_no + 1),
                    ));
                }
                vertices.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let polygon = parts
                    .map(|corner| resolve_index(corner, vertices.len()))
                    .collect::<Option<Vec<usize>>>()
                    .ok_or_else(|| {
                        MeshError::load(path, format!("line {}: invalid face index", line_no + 1))
                    })?;
                if !triangulate_fan(&polygon, &mut faces) {
                    log::warn!("{}:{}: skipping face with {} vertices", path.display(), line_no + 1, polygon.len());
                }
            }
            _ => {}
        }
    }

    TriMesh::new(vertices, faces)
}

/// Convert the position part of an OBJ face corner to a 0-based index.
fn resolve_index(corner: &str, num_vertices: usize) -> Option<usize> {
    let index: i64 = corner.split('/').next()?.parse().ok()?;
    if index > 0 {
        Some(index as usize - 1)
    } else if index < 0 {
        num_vertices.checked_sub(index.unsigned_abs() as usize)
    } else {
        None
    }
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);

    writeln!(writer, "# Generated by tessel")?;
    for v in mesh.vertices() {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in mesh.faces() {
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::test_util;

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index("1", 3), Some(0));
        assert_eq!(resolve_index("3/7", 3), Some(2));
        assert_eq!(resolve_index("2//5", 3), Some(1));
        assert_eq!(resolve_index("-1/2/3", 3), Some(2));
        assert_eq!(resolve_index("-4", 3), None);
        assert_eq!(resolve_index("0", 3), None);
        assert_eq!(resolve_index("x", 3), None);
    }

    #[test]
    fn test_load_mixed_records() {
        let path = test_util::temp_path("mixed.obj");
        std::fs::write(
            &path,
            "# square\n\
             o square\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             v 0 1 0\n\
             vt 0 0\n\
             vn 0 0 1\n\
             f 1/1/1 2/1/1 3/1/1 -1/1/1\n",
        )
        .unwrap();

        let mesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.faces(), &[[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_load_rejects_bad_index() {
        let path = test_util::temp_path("bad-index.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nf 1 2 q\n").unwrap();

        let result = load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(MeshError::LoadError { .. })));
    }

    #[test]
    fn test_load_without_faces() {
        let path = test_util::temp_path("points.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\n").unwrap();

        let result = load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_save_and_load() {
        let mesh = test_util::tetrahedron();
        let path = test_util::temp_path("roundtrip.obj");

        save(&mesh, &path).unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, mesh);
    }
}
