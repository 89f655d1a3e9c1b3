//! Error types for the linalg ops.
use thiserror::Error;

/// Errors raised before or around the numeric work.
/// The numeric routines themselves (svd, matmul) do not fail.
#[derive(Error, Debug)]
pub enum LinalgError {
    /// Input is not a matrix, eg. a 1-d vector
    #[error("expected a 2-d array, got a {ndim}-d array")]
    NotTwoDim { ndim: usize },

    /// Shared dimension of a least squares system does not agree
    #[error("solve: A has {a_rows} rows but B has {b_rows} rows")]
    RowMismatch { a_rows: usize, b_rows: usize },

    #[error("{op}: input contains NaN or infinite values")]
    NonFinite { op: &'static str },

    #[error("invalid rcond {0}: must be finite and non-negative")]
    InvalidRcond(f64),

    #[error("invalid value {value:?} for environment variable {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type LinalgResult<T> = Result<T, LinalgError>;
