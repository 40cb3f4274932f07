//! ASCII STL export.

use std::io::{BufWriter, Write};

use surfmesh_kernel::{default_tolerance, Triangle};
use tracing::{info, instrument};

use crate::errors::StlResult;

/// Write `triangles` as an ASCII STL solid called `name`.
///
/// Only the first line of `name` is used, since the keyword layout is
/// line-oriented. Normals are computed the same way as for binary output.
#[instrument(skip(out, triangles), fields(triangles = triangles.len()))]
pub fn write_ascii_stl<W>(out: &mut W, triangles: &[Triangle], name: &str) -> StlResult<()>
where
    W: Write + ?Sized,
{
    let name = name.lines().next().unwrap_or("").trim();
    let tol = default_tolerance();
    let mut out = BufWriter::new(out);

    writeln!(out, "solid {}", name)?;
    for triangle in triangles {
        let [nx, ny, nz] = triangle.normal_with(&tol).to_f32_array();
        writeln!(out, "  facet normal {} {} {}", nx, ny, nz)?;
        writeln!(out, "    outer loop")?;
        for v in triangle.vertices() {
            let [x, y, z] = v.to_f32_array();
            writeln!(out, "      vertex {} {} {}", x, y, z)?;
        }
        writeln!(out, "    endloop")?;
        writeln!(out, "  endfacet")?;
    }
    writeln!(out, "endsolid {}", name)?;
    out.flush()?;

    info!("wrote ASCII STL");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use surfmesh_kernel::Vec3;

    #[test]
    fn test_single_facet_layout() {
        let mut buf = Vec::new();
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        write_ascii_stl(&mut buf, &[tri], "part").unwrap();
        let text = String::from_utf8(buf).unwrap();
        let expected = "solid part\n\
                        \x20 facet normal 0 0 1\n\
                        \x20   outer loop\n\
                        \x20     vertex 0 0 0\n\
                        \x20     vertex 1 0 0\n\
                        \x20     vertex 0 1 0\n\
                        \x20   endloop\n\
                        \x20 endfacet\n\
                        endsolid part\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_sliver_facet_gets_zero_normal() {
        let mut buf = Vec::new();
        let sliver = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::new(0.5, 1e-13, 0.0));
        write_ascii_stl(&mut buf, &[sliver], "sliver").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("facet normal 0 0 0\n"), "{}", text);
    }

    #[test]
    fn test_name_keeps_first_line() {
        let mut buf = Vec::new();
        write_ascii_stl(&mut buf, &[], "top\nsecond").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "solid top\nendsolid top\n");
    }
}
