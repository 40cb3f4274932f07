//! Generate sample STL exports from every tessellator.
//!
//! Usage: `surfgen [OUTPUT_DIR]` (defaults to `exports`).

mod extractor;
mod surfaces;

use std::error::Error;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use surfmesh_kernel::{ImplicitFunction, Mesh, Tolerance, Vec3};
use surfmesh_stl::{save_binary_stl, write_ascii_stl};
use surfmesh_tessellation::{
    tessellate_parametric, triangulate_points, triangulate_polygon, MeshBuilder, MeshReport,
    ParametricDomain,
};

use crate::extractor::MarchingTetrahedra;

/// Largest `|f(v)|` over the mesh vertices: how far the mesh strays from
/// the zero set of `field`.
fn max_field_deviation(mesh: &Mesh, field: &dyn ImplicitFunction) -> f64 {
    mesh.iter()
        .flat_map(|t| t.vertices().iter())
        .map(|v| field.evaluate(*v).abs())
        .fold(0.0, f64::max)
}

/// Write `mesh` as `<dir>/<name>.stl` and print its report.
fn export_and_report(dir: &Path, name: &str, mesh: &Mesh) -> Result<(), Box<dyn Error>> {
    let path = dir.join(format!("{name}.stl"));
    save_binary_stl(&path, mesh)?;
    let report = MeshReport::from_mesh(mesh, &Tolerance::default());
    println!("  {name}: {report}");
    if report.degenerate_count > 0 {
        println!("    {} degenerate triangles", report.degenerate_count);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("exports"));
    fs::create_dir_all(&out_dir)?;

    println!("=== Parametric Surfaces ===");

    // 1. Camellia
    {
        let domain = ParametricDomain::new((0.0, 2.0), (0.0, 1.0), 1000, 40);
        let mesh = tessellate_parametric(&surfaces::camellia, &domain)?;
        export_and_report(&out_dir, "camellia", &mesh)?;
    }

    // 2. Sphere
    {
        let domain = ParametricDomain::new((0.0, TAU), (-FRAC_PI_2, FRAC_PI_2), 48, 24);
        let mesh = tessellate_parametric(&surfaces::sphere(5.0), &domain)?;
        export_and_report(&out_dir, "sphere", &mesh)?;
        let deviation = max_field_deviation(&mesh, &surfaces::sphere_field(5.0));
        println!("    max |f| on sphere field: {:.2e}", deviation);
    }

    // 3. Torus
    {
        let domain = ParametricDomain::new((0.0, TAU), (0.0, TAU), 64, 24);
        let mesh = tessellate_parametric(&surfaces::torus(4.0, 1.5), &domain)?;
        export_and_report(&out_dir, "torus", &mesh)?;
        let deviation = max_field_deviation(&mesh, &surfaces::torus_field(4.0, 1.5));
        println!("    max |f| on torus field: {:.2e}", deviation);
    }

    println!("\n=== Implicit Surfaces ===");

    // Same sphere and torus, extracted from their fields
    {
        let bound = Vec3::new(5.5, 5.5, 5.5);
        let field = surfaces::sphere_field(5.0);
        let mesh = MeshBuilder::new()
            .implicit(&MarchingTetrahedra, &field, -bound, bound, [40; 3])
            .build()?;
        export_and_report(&out_dir, "sphere_implicit", &mesh)?;
    }
    {
        let lower = Vec3::new(-6.0, -6.0, -2.0);
        let upper = Vec3::new(6.0, 6.0, 2.0);
        let field = surfaces::torus_field(4.0, 1.5);
        let mesh = MeshBuilder::new()
            .implicit(&MarchingTetrahedra, &field, lower, upper, [60, 60, 20])
            .build()?;
        export_and_report(&out_dir, "torus_implicit", &mesh)?;
    }

    println!("\n=== Planar Triangulation ===");

    // 4. Delaunay of a sunflower scatter
    let scatter = surfaces::sunflower(400, 10.0);
    {
        let mesh = triangulate_points(&scatter)?;
        export_and_report(&out_dir, "sunflower_delaunay", &mesh)?;
    }

    // 5. Ear-clipped star, also as ASCII
    let star = surfaces::star(7, 6.0, 2.5);
    {
        let mesh = triangulate_polygon(&star)?;
        export_and_report(&out_dir, "star", &mesh)?;
        let mut file = File::create(out_dir.join("star_ascii.stl"))?;
        write_ascii_stl(&mut file, mesh.triangles(), "star")?;
    }

    // 6. Everything in one scene
    {
        let mesh = MeshBuilder::new()
            .parametric(&surfaces::sphere(2.0), &ParametricDomain::new((0.0, TAU), (-FRAC_PI_2, FRAC_PI_2), 24, 12))
            .points(&scatter)
            .polygon(&star)
            .build()?;
        export_and_report(&out_dir, "scene", &mesh)?;
    }

    println!("\nSTL files written to {}/", out_dir.display());
    Ok(())
}
