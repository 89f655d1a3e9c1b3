/// Dimension vectors and output shape derivation.
/// Shapes are in row-major (numpy) order: (rows, cols).
use std::fmt;

use crate::lib_linalg::errors::{LinalgError, LinalgResult};


/// Row and column extents of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatDims {
    pub nrows: usize,
    pub ncols: usize,
}

impl MatDims {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        MatDims { nrows, ncols }
    }

    /// Reads dims from an array shape. Anything other than
    /// exactly two extents is rejected.
    pub fn from_shape(shape: &[usize]) -> LinalgResult<Self> {
        match shape {
            [nrows, ncols] => Ok(MatDims::new(*nrows, *ncols)),
            _ => Err(LinalgError::NotTwoDim { ndim: shape.len() }),
        }
    }

    pub fn transpose(&self) -> Self {
        MatDims::new(self.ncols, self.nrows)
    }

    /// Shape of the pseudo-inverse of a (m, n) matrix: (n, m)
    pub fn pinv_output(&self) -> Self {
        self.transpose()
    }

    /// Shape of X in A*X = B given A (m, n) and B (m, p): (n, p).
    /// Errors if A and B disagree on m.
    pub fn solve_output(a: MatDims, b: MatDims) -> LinalgResult<Self> {
        if a.nrows != b.nrows {
            return Err(LinalgError::RowMismatch {
                a_rows: a.nrows,
                b_rows: b.nrows,
            });
        }
        Ok(MatDims::new(a.ncols, b.ncols))
    }

    /// true if either extent is zero
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

impl fmt::Display for MatDims {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.nrows, self.ncols)
    }
}
