//! Tessel CLI - mesh subdivision command-line tool.
//!
//! Usage: tessel <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `tessel --help` for available commands. Set `RUST_LOG=debug` for
//! per-pass details.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use tessel::algo::normals::{self, NormalWeighting};
use tessel::algo::{components, subdivide, Progress};
use tessel::io;
use tessel::mesh::EdgeTable;

#[derive(Parser)]
#[command(name = "tessel")]
#[command(author, version, about = "Sqrt(3) mesh subdivision CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Subdivide a mesh with the sqrt(3) scheme
    Subdivide {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// List the edge-connected components of a mesh
    Components {
        /// Input mesh file
        input: PathBuf,

        /// Print the display color of each component
        #[arg(long)]
        colors: bool,
    },

    /// Summarize per-vertex normals
    Normals {
        /// Input mesh file
        input: PathBuf,

        /// How incident faces are weighted
        #[arg(short, long, value_enum, default_value = "area")]
        weighting: Weighting,

        /// Also compute per-corner normals with this crease angle in degrees
        #[arg(long, value_name = "DEGREES")]
        corner: Option<f64>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Weighting {
    /// Every incident face counts the same
    Uniform,
    /// Faces weighted by area
    Area,
    /// Faces weighted by the corner angle
    Angle,
}

impl From<Weighting> for NormalWeighting {
    fn from(w: Weighting) -> Self {
        match w {
            Weighting::Uniform => NormalWeighting::Uniform,
            Weighting::Area => NormalWeighting::Area,
            Weighting::Angle => NormalWeighting::Angle,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,

        Commands::Subdivide {
            input,
            output,
            iterations,
            sequential,
        } => cmd_subdivide(&input, &output, iterations, sequential)?,

        Commands::Components { input, colors } => cmd_components(&input, colors)?,

        Commands::Normals {
            input,
            weighting,
            corner,
        } => cmd_normals(&input, weighting, corner)?,
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    // Highest percentage drawn so far; the bar never moves backwards.
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, raw_percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());

    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for f in 0..mesh.num_faces() {
        let area = mesh.face_area(f);
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }
    println!("Surface area: {:.6}", mesh.surface_area());
    println!("Face area range: [{:.6}, {:.6}]", min_area, max_area);

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let edges = EdgeTable::build(mesh.faces())?;
    println!(
        "Edges: {} ({} interior, {} boundary)",
        edges.len(),
        edges.num_interior(),
        edges.num_boundary()
    );

    let boundary_verts = edges
        .boundary_vertices(mesh.num_vertices())
        .into_iter()
        .filter(|&b| b)
        .count();
    if boundary_verts == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary vertices)", boundary_verts);
    }

    let euler = mesh.num_vertices() as i64 - edges.len() as i64 + mesh.num_faces() as i64;
    println!("Euler characteristic: {}", euler);

    let comps = components::face_components(&mesh)?;
    println!("Connected components: {}", comps.count);

    Ok(())
}

fn cmd_subdivide(
    input: &Path,
    output: &Path,
    iterations: usize,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let options = subdivide::SubdivideOptions::new(iterations).with_parallel(!sequential);
    let mode = if sequential { "sequential" } else { "parallel" };
    let progress = create_progress();

    println!("Applying sqrt(3) subdivision ({} iterations, {})...", iterations, mode);
    let start = Instant::now();
    let refined = subdivide::sqrt3_subdivide_with_progress(&mesh, &options, &progress)?;
    let elapsed = start.elapsed();

    println!("Result: {} vertices, {} faces", refined.num_vertices(), refined.num_faces());
    io::save(&refined, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_components(input: &Path, colors: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    let comps = components::face_components(&mesh)?;

    // Color of the first face carrying each label.
    let mut palette = vec![[0.0; 3]; comps.count];
    if colors {
        let face_colors = components::component_colors(&comps);
        for (f, &label) in comps.labels.iter().enumerate().rev() {
            palette[label] = face_colors[f];
        }
    }

    println!("Components: {}", comps.count);
    for (label, size) in comps.sizes().into_iter().enumerate() {
        if colors {
            let [r, g, b] = palette[label];
            println!("  #{}: {} faces, rgb({:.3}, {:.3}, {:.3})", label, size, r, g, b);
        } else {
            println!("  #{}: {} faces", label, size);
        }
    }

    Ok(())
}

fn cmd_normals(
    input: &Path,
    weighting: Weighting,
    corner: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    let normals = normals::vertex_normals(&mesh, weighting.into())?;

    let zero = normals.iter().filter(|n| n.norm_squared() == 0.0).count();
    println!("Vertex normals: {}", normals.len());
    println!("Vertices without a normal: {}", zero);

    if let Some(first) = normals.iter().find(|n| n.norm_squared() > 0.0) {
        println!("First normal: ({:.4}, {:.4}, {:.4})", first.x, first.y, first.z);
    }

    if let Some(threshold) = corner {
        let corners = normals::corner_normals(&mesh, threshold)?;
        // Corners that split away from the smooth area-weighted vertex normal.
        let smooth = normals::vertex_normals(&mesh, NormalWeighting::Area)?;
        let creased = corners
            .iter()
            .enumerate()
            .filter(|&(i, n)| (n - smooth[mesh.face(i / 3)[i % 3]]).norm() > 1e-9)
            .count();
        println!("Corner normals: {} (threshold {} degrees)", corners.len(), threshold);
        println!("Corners on a crease: {}", creased);
    }

    Ok(())
}
