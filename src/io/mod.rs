//! Mesh file I/O.
//!
//! This module provides functions for loading and saving meshes in various formats.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Object File Format | `.off` | ✓ | ✓ | ASCII |
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Positions and faces only |
//! | PLY | `.ply` | ✓ | ✓ | Binary and ASCII load, ASCII save |
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII load, binary save |
//!
//! Polygons with more than three corners are fan-triangulated on load.
//!
//! # Usage
//!
//! ```no_run
//! use tessel::io::{load, save};
//!
//! // Load with automatic format detection
//! let mesh = load("bunny.off").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "bunny.stl").unwrap();
//! ```

pub mod obj;
pub mod off;
pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Object File Format.
    Off,
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "off" => Some(Format::Off),
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let mesh = match detect(path)? {
        Format::Off => off::load(path),
        Format::Obj => obj::load(path),
        Format::Ply => ply::load(path),
        Format::Stl => stl::load(path),
    }?;

    log::debug!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Off => off::save(mesh, path),
        Format::Obj => obj::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
    }?;

    log::debug!("saved {}", path.display());
    Ok(())
}

/// Fan-triangulate a polygon given by its corner indices.
///
/// Returns `false` if the polygon has fewer than three corners.
pub(crate) fn triangulate_fan(polygon: &[usize], faces: &mut Vec<[usize; 3]>) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    for i in 1..polygon.len() - 1 {
        faces.push([polygon[0], polygon[i], polygon[i + 1]]);
    }
    true
}
