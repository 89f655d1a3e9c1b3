// The three matrix ops on ndarray views.
// Each op checks its arguments are matrices, derives the output
// shape, hands faer views of the inputs to the routines in
// mat_utils and returns a freshly allocated ndarray.
use std::io::Write;
use faer_ext::{IntoFaer, IntoNdarray};
use itertools::Itertools;
use ndarray::{Array2, ArrayView, ArrayView2, Dimension, Ix2};

use crate::lib_linalg::config::LinalgConfig;
use crate::lib_linalg::dims::MatDims;
use crate::lib_linalg::errors::{LinalgError, LinalgResult};
use crate::lib_linalg::mat_utils::{mat_pinv, mat_solve, Scalar};


/// Views an array of any rank as a matrix, rejecting non 2-d input
pub fn as_matrix<'a, T, D>(a: ArrayView<'a, T, D>) -> LinalgResult<(ArrayView2<'a, T>, MatDims)>
    where
    D: Dimension
{
    let ndim = a.ndim();
    let dims = MatDims::from_shape(a.shape())?;
    let a2 = a.into_dimensionality::<Ix2>()
        .map_err(|_| LinalgError::NotTwoDim { ndim })?;
    Ok((a2, dims))
}

/// Renders a matrix one row per line with all entries right
/// aligned to a common width.
pub fn format_mat<T, D>(a: ArrayView<'_, T, D>) -> LinalgResult<String>
    where
    T: Scalar,
    D: Dimension
{
    let (a2, _dims) = as_matrix(a)?;
    let width = a2.iter()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(0);
    let out = a2.outer_iter()
        .map(|row| row.iter()
             .map(|v| format!("{:>width$}", v, width = width))
             .join(" "))
        .join("\n");
    Ok(out)
}

/// Writes the rendered matrix followed by a newline
pub fn write_mat<T, D, W>(w: &mut W, a: ArrayView<'_, T, D>) -> LinalgResult<()>
    where
    T: Scalar,
    D: Dimension,
    W: Write
{
    let rendered = format_mat(a)?;
    writeln!(w, "{}", rendered)?;
    Ok(())
}

/// Prints a matrix to stderr. The input is only read.
pub fn printmat<T, D>(a: ArrayView<'_, T, D>) -> LinalgResult<()>
    where
    T: Scalar,
    D: Dimension
{
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    write_mat(&mut handle, a)
}


/// Moore-Penrose pseudo-inverse. A (m, n) gives (n, m).
pub fn pinv<T, D>(a: ArrayView<'_, T, D>, config: &LinalgConfig) -> LinalgResult<Array2<T>>
    where
    T: Scalar,
    D: Dimension
{
    let (a2, a_dims) = as_matrix(a)?;
    let out_dims = a_dims.pinv_output();
    log::debug!("pinv: {} -> {}", a_dims, out_dims);
    if a_dims.is_empty() {
        return Ok(Array2::zeros(out_dims.shape()));
    }
    let b_mat = mat_pinv(a2.into_faer(), config.rcond(), config.parallelism())?;
    Ok(b_mat.as_ref().into_ndarray().to_owned())
}


/// Least squares solve of A*X = B. A (m, n) and B (m, p) give X (n, p).
pub fn solve<T, DA, DB>(a: ArrayView<'_, T, DA>, b: ArrayView<'_, T, DB>, config: &LinalgConfig)
    -> LinalgResult<Array2<T>>
    where
    T: Scalar,
    DA: Dimension,
    DB: Dimension
{
    let (a2, a_dims) = as_matrix(a)?;
    let (b2, b_dims) = as_matrix(b)?;
    let x_dims = MatDims::solve_output(a_dims, b_dims)?;
    log::debug!("solve: A {} B {} -> {}", a_dims, b_dims, x_dims);
    if a_dims.is_empty() || b_dims.is_empty() {
        return Ok(Array2::zeros(x_dims.shape()));
    }
    let x_mat = mat_solve(
        a2.into_faer(), b2.into_faer(), config.rcond(), config.parallelism())?;
    Ok(x_mat.as_ref().into_ndarray().to_owned())
}
