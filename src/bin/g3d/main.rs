//! G3D CLI - Tool for inspecting and manipulating G3D files.

use std::env;
use std::path::Path;
use std::process;

use g3d::container::{read_geometry_file_opts, write_geometry_file};
use g3d::merge::{merge_geometries, merge_vim};
use g3d::prelude::*;
use g3d::validate::IndexViolation;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Command line options shared by all commands.
#[derive(Clone, Copy, Default)]
struct Options {
    json: bool,
    vim: bool,
    no_mmap: bool,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter);
    // A second initialisation only happens in tests; keep the first.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "warn";
    let mut opts = Options::default();
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "g3d=debug",
            "-vv" | "--trace" => level = "g3d=trace",
            "-q" | "--quiet" => level = "off",
            "-j" | "--json" => opts.json = true,
            "--vim" => opts.vim = true,
            "--no-mmap" => opts.no_mmap = true,
            "-V" | "--version" => {
                print_version();
                return;
            }
            _ => filtered_args.push(arg),
        }
    }
    init_tracing(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "info" | "i" => match filtered_args.get(1) {
            Some(path) => cmd_info(path, opts),
            None => usage("g3d info <file.g3d>"),
        },
        "validate" | "val" => match filtered_args.get(1) {
            Some(path) => cmd_validate(path, opts),
            None => usage("g3d validate <file.g3d>"),
        },
        "merge" | "m" => {
            if filtered_args.len() < 3 {
                usage("g3d merge <output.g3d> <input.g3d>...")
            } else {
                cmd_merge(filtered_args[1], &filtered_args[2..], opts)
            }
        }
        "triangulate" | "tri" => {
            if filtered_args.len() < 3 {
                usage("g3d triangulate <input.g3d> <output.g3d>")
            } else {
                cmd_triangulate(filtered_args[1], filtered_args[2], opts)
            }
        }
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => {
            // A bare path means info
            if Path::new(other).exists() {
                cmd_info(other, opts)
            } else {
                eprintln!("Unknown command: {other}");
                eprintln!();
                print_help();
                process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn usage(text: &str) -> Result<()> {
    eprintln!("Error: missing arguments");
    eprintln!("Usage: {text}");
    process::exit(1);
}

fn print_version() {
    println!(
        "g3d {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("G3D_BUILD_DATE"),
        env!("G3D_BUILD_TIME")
    );
}

fn print_help() {
    println!("g3d - G3D geometry file toolkit");
    println!();
    println!("USAGE:");
    println!("    g3d [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info        <file>             Show header, counts and attributes");
    println!("    val, validate  <file>             Check every index attribute");
    println!("    m, merge       <out> <in>...      Merge inputs into one file");
    println!("    tri, triangulate <in> <out>       Split quads into triangles");
    println!("    h, help                           Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Suppress log output");
    println!("    -j, --json       Print info as JSON");
    println!("    --vim            Use the fixed VIM schema instead of the open collection");
    println!("    --no-mmap        Read files without memory mapping");
    println!("    -V, --version    Show version and build date");
    println!();
    println!("EXAMPLES:");
    println!("    g3d info mesh.g3d                     # Quick overview");
    println!("    g3d --json info mesh.g3d              # Machine readable overview");
    println!("    g3d merge all.g3d a.g3d b.g3d         # Merge two files");
    println!("    g3d --vim validate model.g3d          # Validate VIM relations");
    println!();
    println!("NOTES:");
    println!("    - Passing a .g3d file directly is equivalent to 'info'");
    println!("    - RUST_LOG overrides the -v/-q log level");
}

fn read_geometry(path: &str, opts: Options) -> Result<GeometryAttributes> {
    debug!(path, mmap = !opts.no_mmap, "reading geometry");
    read_geometry_file_opts(path, !opts.no_mmap)
}

fn read_vim(path: &str, opts: Options) -> Result<VimAttributes> {
    debug!(path, mmap = !opts.no_mmap, "reading VIM attributes");
    VimAttributes::read_file_opts(path, !opts.no_mmap)
}

fn cmd_info(path: &str, opts: Options) -> Result<()> {
    if opts.vim {
        return cmd_info_vim(path, opts);
    }
    let g = read_geometry(path, opts)?;
    let header = g.header();
    let counts = g.counts();

    if opts.json {
        let attributes: Vec<serde_json::Value> = g
            .attributes()
            .iter()
            .map(|a| {
                serde_json::json!({
                    "name": a.name(),
                    "elements": a.element_count(),
                    "bytes": a.byte_len(),
                })
            })
            .collect();
        let bounds = g.bounds();
        let json = serde_json::json!({
            "file": path,
            "header": {
                "unit": header.unit.name(),
                "up_axis": format!("{:?}", header.up_axis),
                "forward_axis": format!("{:?}", header.forward_axis),
                "handedness": format!("{:?}", header.handedness),
            },
            "counts": {
                "vertices": counts.vertices,
                "corners": counts.corners,
                "faces": counts.faces,
                "corners_per_face": g.corners_per_face(),
                "groups": counts.groups,
                "subgeometries": counts.subgeometries,
                "instances": counts.instances,
            },
            "bounds": if bounds.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::json!({ "min": bounds.min.to_array(), "max": bounds.max.to_array() })
            },
            "attributes": attributes,
        });
        println!("{}", serde_json::to_string_pretty(&json).map_err(|e| Error::other(e.to_string()))?);
        return Ok(());
    }

    println!("File: {path}");
    println!(
        "Header: unit={} up={:?} forward={:?} {:?}-handed",
        header.unit.name(),
        header.up_axis,
        header.forward_axis,
        header.handedness
    );
    println!();
    println!("Vertices:        {}", counts.vertices);
    println!("Corners:         {}", counts.corners);
    println!("Faces:           {} ({} corners each)", counts.faces, g.corners_per_face());
    println!("Groups:          {}", counts.groups);
    println!("Sub-geometries:  {}", counts.subgeometries);
    println!("Instances:       {}", counts.instances);
    let bounds = g.bounds();
    if !bounds.is_empty() {
        println!("Bounds:          {bounds:?}");
    }
    println!();
    println!("Attributes ({}):", g.attributes().len());
    for a in g.attributes() {
        println!("    {:<44} {:>10} elements {:>12} bytes", a.name(), a.element_count(), a.byte_len());
    }
    Ok(())
}

fn cmd_info_vim(path: &str, opts: Options) -> Result<()> {
    let vim = read_vim(path, opts)?;
    let c = vim.counts()?;
    if opts.json {
        let slots: Vec<serde_json::Value> = vim
            .attributes()
            .map(|(slot, a)| {
                serde_json::json!({ "slot": slot.label(), "name": a.name(), "elements": a.element_count() })
            })
            .collect();
        let json = serde_json::json!({
            "file": path,
            "counts": {
                "vertices": c.vertices,
                "indices": c.indices,
                "faces": c.faces,
                "instances": c.instances,
                "meshes": c.meshes,
                "submeshes": c.submeshes,
                "materials": c.materials,
                "shape_vertices": c.shape_vertices,
                "shapes": c.shapes,
            },
            "slots": slots,
        });
        println!("{}", serde_json::to_string_pretty(&json).map_err(|e| Error::other(e.to_string()))?);
        return Ok(());
    }

    println!("File: {path} (VIM schema)");
    println!();
    println!("Vertices:        {}", c.vertices);
    println!("Indices:         {}", c.indices);
    println!("Faces:           {}", c.faces);
    println!("Instances:       {}", c.instances);
    println!("Meshes:          {}", c.meshes);
    println!("Submeshes:       {}", c.submeshes);
    println!("Materials:       {}", c.materials);
    println!("Shape vertices:  {}", c.shape_vertices);
    println!("Shapes:          {}", c.shapes);
    println!();
    for (slot, a) in vim.attributes() {
        println!("    {:<20} {:<40} {:>10} elements", slot.label(), a.name(), a.element_count());
    }
    Ok(())
}

fn report(violations: &[IndexViolation]) -> Result<()> {
    if violations.is_empty() {
        println!("OK");
        return Ok(());
    }
    for v in violations {
        println!("    {v}");
    }
    Err(Error::other(format!("{} index violations", violations.len())))
}

fn cmd_validate(path: &str, opts: Options) -> Result<()> {
    let violations = if opts.vim {
        let vim = read_vim(path, opts)?;
        vim.check_counts()?;
        vim.validate_with(ValidationMode::Collect)?
    } else {
        validate_geometry(&read_geometry(path, opts)?, ValidationMode::Collect)?
    };
    report(&violations)
}

fn cmd_merge(output: &str, inputs: &[&str], opts: Options) -> Result<()> {
    if opts.vim {
        let parts = inputs.iter().map(|p| read_vim(p, opts)).collect::<Result<Vec<_>>>()?;
        let merged = merge_vim(parts)?;
        merged.write_file(output)?;
        let c = merged.counts()?;
        info!(inputs = inputs.len(), output, "merged VIM files");
        println!(
            "Wrote {output}: {} vertices, {} faces, {} submeshes",
            c.vertices, c.faces, c.submeshes
        );
        return Ok(());
    }
    let parts = inputs.iter().map(|p| read_geometry(p, opts)).collect::<Result<Vec<_>>>()?;
    let Some(merged) = merge_geometries(parts)? else {
        return Err(Error::other("nothing to merge"));
    };
    write_geometry_file(&merged, output)?;
    info!(inputs = inputs.len(), output, "merged geometry files");
    println!(
        "Wrote {output}: {} vertices, {} faces, {} sub-geometries",
        merged.num_vertices(),
        merged.num_faces(),
        merged.num_subgeometries()
    );
    Ok(())
}

fn cmd_triangulate(input: &str, output: &str, opts: Options) -> Result<()> {
    let g = read_geometry(input, opts)?;
    let tri = g.triangulate_quad_mesh()?;
    write_geometry_file(&tri, output)?;
    println!("Wrote {output}: {} quads -> {} triangles", g.num_faces(), tri.num_faces());
    Ok(())
}
