//! Binary STL: 80-byte header, `u32` facet count, then 50 bytes per facet
//! (normal, three vertices, attribute count), all little-endian.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use surfmesh_kernel::{default_tolerance, Mesh, Tolerance, Triangle, Vec3};
use tracing::{debug, info, instrument, warn};

use crate::errors::{StlError, StlResult};

pub const HEADER_LEN: usize = 80;
pub const FACET_LEN: usize = 50;

/// Header written by [`save_binary_stl`].
pub const DEFAULT_HEADER: &str = "surfmesh binary STL";

/// Exact byte size of a binary STL holding `triangles` facets.
pub fn binary_stl_size(triangles: usize) -> usize {
    HEADER_LEN + 4 + FACET_LEN * triangles
}

/// Write `triangles` as binary STL.
///
/// `header` is truncated to 80 bytes and zero-padded. Each facet normal is
/// the unit `(v1 - v0) x (v2 - v0)`, or zero when that cross product is
/// within the default [`Tolerance::coincidence`] of zero.
/// Coordinates are narrowed to `f32` here and nowhere earlier.
///
/// Facets are streamed one at a time through a buffer. A write failure
/// aborts with [`StlError::Io`]; whatever reached `out` before the failure
/// stays there.
#[instrument(skip(out, triangles), fields(triangles = triangles.len()))]
pub fn write_binary_stl<W>(out: &mut W, triangles: &[Triangle], header: &str) -> StlResult<()>
where
    W: Write + ?Sized,
{
    write_binary_stl_iter(out, triangles.iter().copied(), header)
}

/// Streaming form of [`write_binary_stl`]: triangles are pulled from the
/// iterator as they are written, so a generated mesh never has to be
/// collected first. The iterator must know its length up front because the
/// count precedes the facets.
pub fn write_binary_stl_iter<W, I>(out: &mut W, triangles: I, header: &str) -> StlResult<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = Triangle>,
    I::IntoIter: ExactSizeIterator,
{
    let triangles = triangles.into_iter();
    let len = triangles.len();
    let count = u32::try_from(len).map_err(|_| StlError::TooManyTriangles(len))?;

    if header.starts_with("solid") {
        warn!("binary STL header starts with \"solid\"; some readers will mistake it for ASCII");
    }

    let tol = default_tolerance();
    let mut out = BufWriter::new(out);
    out.write_all(&header_block(header))?;
    out.write_all(&count.to_le_bytes())?;
    for triangle in triangles {
        write_facet(&mut out, &triangle, &tol)?;
    }
    out.flush()?;

    info!(triangles = count, bytes = binary_stl_size(len), "wrote binary STL");
    Ok(())
}

fn header_block(header: &str) -> [u8; HEADER_LEN] {
    let mut block = [0u8; HEADER_LEN];
    let bytes = header.as_bytes();
    let n = bytes.len().min(HEADER_LEN);
    block[..n].copy_from_slice(&bytes[..n]);
    block
}

fn write_facet<W: Write>(
    out: &mut W,
    triangle: &Triangle,
    tol: &Tolerance,
) -> std::io::Result<()> {
    write_vec3(out, &triangle.normal_with(tol))?;
    for v in triangle.vertices() {
        write_vec3(out, v)?;
    }
    out.write_all(&0u16.to_le_bytes())
}

fn write_vec3<W: Write>(out: &mut W, v: &Vec3) -> std::io::Result<()> {
    for c in v.to_f32_array() {
        out.write_all(&c.to_le_bytes())?;
    }
    Ok(())
}

/// One facet as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StlFacet {
    pub normal: [f32; 3],
    pub vertices: [[f32; 3]; 3],
    pub attribute: u16,
}

impl StlFacet {
    pub fn to_triangle(&self) -> Triangle {
        let [a, b, c] = self.vertices;
        Triangle::new(
            Vec3::from_f32_array(a),
            Vec3::from_f32_array(b),
            Vec3::from_f32_array(c),
        )
    }
}

/// A parsed binary STL file.
#[derive(Debug, Clone, PartialEq)]
pub struct StlFile {
    pub header: [u8; HEADER_LEN],
    pub facets: Vec<StlFacet>,
}

impl StlFile {
    /// Header up to the first NUL byte, lossily decoded.
    pub fn header_text(&self) -> String {
        let end = self
            .header
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(HEADER_LEN);
        String::from_utf8_lossy(&self.header[..end]).into_owned()
    }

    pub fn triangle_count(&self) -> usize {
        self.facets.len()
    }

    /// Facets widened back to `f64` triangles. Stored normals are dropped;
    /// [`Triangle::normal`] recomputes them from the winding.
    pub fn to_mesh(&self) -> Mesh {
        self.facets.iter().map(StlFacet::to_triangle).collect()
    }
}

/// Read a whole binary STL from `reader`.
pub fn read_binary_stl<R>(reader: &mut R) -> StlResult<StlFile>
where
    R: Read + ?Sized,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_binary_stl(&bytes)
}

/// Parse binary STL bytes. Bytes past the last declared facet are ignored.
pub fn parse_binary_stl(bytes: &[u8]) -> StlResult<StlFile> {
    let prelude = HEADER_LEN + 4;
    if bytes.len() < prelude {
        return Err(StlError::Truncated {
            expected: prelude,
            actual: bytes.len(),
        });
    }

    let count = u32::from_le_bytes(le_bytes(&bytes[HEADER_LEN..prelude])) as usize;
    let expected = binary_stl_size(count);
    if bytes.len() < expected {
        return Err(StlError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        debug!(trailing = bytes.len() - expected, "ignoring bytes after last facet");
    }

    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&bytes[..HEADER_LEN]);
    let facets = bytes[prelude..expected]
        .chunks_exact(FACET_LEN)
        .map(parse_facet)
        .collect();

    Ok(StlFile { header, facets })
}

fn parse_facet(chunk: &[u8]) -> StlFacet {
    let vec3 = |offset: usize| {
        let f = |i: usize| f32::from_le_bytes(le_bytes(&chunk[offset + 4 * i..offset + 4 * i + 4]));
        [f(0), f(1), f(2)]
    };
    StlFacet {
        normal: vec3(0),
        vertices: [vec3(12), vec3(24), vec3(36)],
        attribute: u16::from_le_bytes([chunk[48], chunk[49]]),
    }
}

fn le_bytes(slice: &[u8]) -> [u8; 4] {
    [slice[0], slice[1], slice[2], slice[3]]
}

/// Write `mesh` to a new binary STL file at `path`, replacing any existing
/// file.
#[instrument(skip(mesh), fields(triangles = mesh.triangle_count()))]
pub fn save_binary_stl(path: &Path, mesh: &Mesh) -> StlResult<()> {
    let mut file = File::create(path)?;
    write_binary_stl(&mut file, mesh.triangles(), DEFAULT_HEADER)
}

/// Read the binary STL file at `path`.
#[instrument]
pub fn load_binary_stl(path: &Path) -> StlResult<StlFile> {
    let mut file = File::open(path)?;
    let stl = read_binary_stl(&mut file)?;
    info!(triangles = stl.triangle_count(), "loaded binary STL");
    Ok(stl)
}
