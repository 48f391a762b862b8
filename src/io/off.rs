//! OFF (Object File Format) support.
//!
//! ```text
//! OFF
//! # comment
//! <num_vertices> <num_faces> <num_edges>
//! x y z                 (one line per vertex)
//! n i0 i1 ... i(n-1)    (one line per face)
//! ```
//!
//! The counts may also follow the keyword on the header line. `COFF` and
//! `NOFF` headers are accepted; values after the coordinates of a vertex or
//! after the indices of a face (colors, normals) are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

use super::triangulate_fan;

/// Upper bound on elements reserved up front from the header counts.
const MAX_RESERVE: usize = 1 << 20;

/// Load a mesh from an OFF file.
///
/// # Example
///
/// ```no_run
/// use tessel::io::off;
///
/// let mesh = off::load("bunny.off").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    read(reader).map_err(|e| match e {
        MeshError::LoadError { message, .. } => MeshError::load(path, message),
        other => other,
    })
}

/// Parse OFF content from any reader.
///
/// Parse failures are reported as [`MeshError::LoadError`] with an empty path.
pub fn read<R: BufRead>(reader: R) -> Result<TriMesh> {
    let mut lines = DataLines::new(reader);

    let header = lines.next_line()?.ok_or_else(|| MeshError::load("", "empty file"))?;
    let mut tokens = header.split_whitespace();
    let keyword = tokens.next().unwrap_or_default();
    if !matches!(keyword, "OFF" | "COFF" | "NOFF" | "CNOFF") {
        return Err(MeshError::load("", format!("expected OFF header, found '{}'", keyword)));
    }

    let mut counts: Vec<String> = tokens.map(str::to_string).collect();
    if counts.is_empty() {
        counts = lines
            .next_line()?
            .ok_or_else(|| MeshError::load("", "missing element counts"))?
            .split_whitespace()
            .map(str::to_string)
            .collect();
    }
    if counts.len() < 2 {
        return Err(MeshError::load("", "element count line needs vertex and face counts"));
    }
    let num_vertices: usize = parse(&counts[0], "vertex count")?;
    let num_faces: usize = parse(&counts[1], "face count")?;

    let mut vertices = Vec::with_capacity(num_vertices.min(MAX_RESERVE));
    for i in 0..num_vertices {
        let line = lines
            .next_line()?
            .ok_or_else(|| MeshError::load("", format!("expected {} vertices, found {}", num_vertices, i)))?;
        let coords: Vec<&str> = line.split_whitespace().take(3).collect();
        if coords.len() < 3 {
            return Err(MeshError::load("", format!("vertex {} has fewer than 3 coordinates", i)));
        }
        vertices.push(Point3::new(
            parse(coords[0], "coordinate")?,
            parse(coords[1], "coordinate")?,
            parse(coords[2], "coordinate")?,
        ));
    }

    let mut faces = Vec::with_capacity(num_faces.min(MAX_RESERVE));
    for i in 0..num_faces {
        let line = lines
            .next_line()?
            .ok_or_else(|| MeshError::load("", format!("expected {} faces, found {}", num_faces, i)))?;
        let mut tokens = line.split_whitespace();
        let n: usize = parse(tokens.next().unwrap_or_default(), "face size")?;
        let polygon = tokens
            .take(n)
            .map(|t| parse::<usize>(t, "vertex index"))
            .collect::<Result<Vec<usize>>>()?;
        if polygon.len() != n {
            return Err(MeshError::load("", format!("face {} lists fewer than {} indices", i, n)));
        }
        if !triangulate_fan(&polygon, &mut faces) {
            log::warn!("skipping face {} with {} vertices", i, n);
        }
    }

    TriMesh::new(vertices, faces)
}

/// Save a mesh to an ASCII OFF file.
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as ASCII OFF.
pub fn write<W: Write>(mesh: &TriMesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "OFF")?;
    writeln!(writer, "{} {} 0", mesh.num_vertices(), mesh.num_faces())?;
    for v in mesh.vertices() {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }
    for f in mesh.faces() {
        writeln!(writer, "3 {} {} {}", f[0], f[1], f[2])?;
    }
    Ok(())
}

fn parse<T: std::str::FromStr>(token: &str, what: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| MeshError::load("", format!("invalid {}: '{}'", what, token)))
}

/// Lines with comments stripped and blank lines skipped.
struct DataLines<R> {
    lines: std::io::Lines<R>,
}

impl<R: BufRead> DataLines<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        for line in self.lines.by_ref() {
            let line = line?;
            let data = line.split('#').next().unwrap_or_default().trim();
            if !data.is_empty() {
                return Ok(Some(data.to_string()));
            }
        }
        Ok(None)
    }
}
