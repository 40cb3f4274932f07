//! STL output for surfmesh triangle meshes.
//!
//! Binary STL is the primary format; ASCII export and binary import are
//! provided for inspection and round-trip checks.

pub mod ascii;
pub mod binary;
pub mod errors;

pub use ascii::write_ascii_stl;
pub use binary::{
    binary_stl_size, load_binary_stl, parse_binary_stl, read_binary_stl, save_binary_stl,
    write_binary_stl, write_binary_stl_iter, StlFacet, StlFile, DEFAULT_HEADER,
};
pub use errors::{StlError, StlResult};
