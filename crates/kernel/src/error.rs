//! Error type shared by every tessellator and triangulator.

use thiserror::Error;

/// Failures reported by mesh construction.
///
/// Every operation returns these synchronously; nothing retries and nothing
/// hands back a partially built mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A sampling grid was asked for zero divisions along some axis.
    #[error("division counts must be at least 1 (got u = {u_divisions}, v = {v_divisions})")]
    Division {
        u_divisions: usize,
        v_divisions: usize,
    },

    /// The input has no well-defined triangulation (e.g. all points
    /// collinear).
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Malformed input that a precondition check caught.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// An isosurface extractor reported a failure of its own.
    #[error("isosurface extraction failed: {0}")]
    Extractor(String),
}

/// Result alias for mesh construction.
pub type MeshResult<T> = Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::Division {
            u_divisions: 0,
            v_divisions: 4,
        };
        assert!(err.to_string().contains("u = 0"));
        assert!(err.to_string().contains("v = 4"));

        let err = MeshError::DegenerateGeometry("all points collinear".into());
        assert!(err.to_string().contains("collinear"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }
}
