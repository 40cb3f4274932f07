//! Triangle mesh generation: parametric grids, Delaunay point sets and
//! ear-clipped polygons.

pub mod builder;
pub mod delaunay;
pub mod ear_clip;
pub mod parametric;
pub mod report;

pub use builder::MeshBuilder;
pub use delaunay::{triangulate_points, triangulate_points_with};
pub use ear_clip::triangulate_polygon;
pub use parametric::{tessellate_parametric, ParametricDomain};
pub use report::MeshReport;
