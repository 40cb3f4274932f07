/// Errors during STL export and import.
#[derive(Debug, thiserror::Error)]
pub enum StlError {
    #[error("STL I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("mesh has {0} triangles; binary STL holds at most {max}", max = u32::MAX)]
    TooManyTriangles(usize),

    #[error("binary STL truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
}

pub type StlResult<T> = Result<T, StlError>;
