/// Matrix utility methods
/// Contains the faer side of the linalg ops: matmul with
/// explicit parallel control, the truncated svd inverse used
/// by both the pseudo-inverse and the least squares solver,
/// and helpers for tests.
///
use std::fmt::{Debug, Display};
use num_traits::Float;
use faer::{Mat, MatRef, MatMut, Parallelism};
use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::lib_linalg::dims::MatDims;
use crate::lib_linalg::errors::{LinalgError, LinalgResult};


/// Element types the ops are implemented for (f32 and f64)
pub trait Scalar:
    faer::RealField + faer::SimpleEntity + Float + Display + Debug + Send + Sync + 'static {}

impl<T> Scalar for T
    where
    T: faer::RealField + faer::SimpleEntity + Float + Display + Debug + Send + Sync + 'static {}


/// Casts an f64 constant into T. Infallible for f32 and f64.
fn cast<T: Scalar>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// Default relative singular value cutoff, eps * max(m, n)
pub fn default_rcond<T: Scalar>(nrows: usize, ncols: usize) -> T {
    T::epsilon() * cast::<T>(nrows.max(ncols) as f64)
}


/// Rejects matrices holding NaN or inf, the svd has no
/// meaningful result for them
pub fn check_finite<T>(x: MatRef<T>, op: &'static str) -> LinalgResult<()>
    where
    T: Scalar
{
    for j in 0..x.ncols() {
        for i in 0..x.nrows() {
            if !x.read(i, j).is_finite() {
                return Err(LinalgError::NonFinite { op });
            }
        }
    }
    Ok(())
}


/// Matrix multiplication with explicit
/// parallel control exposed.
/// res = beta * lhs * rhs, res is overwritten
pub fn par_matmul_helper<T>(res: MatMut<T>, lhs: MatRef<T>, rhs: MatRef<T>, beta: T, par: Parallelism)
    where
    T: Scalar
{
    faer::linalg::matmul::matmul(
        res,
        lhs,
        rhs,
        None,
        beta,
        par,
        );
}


/// Thin svd factors of a (m, n) matrix with the singular values
/// inverted. Singular values at or below rcond * s_max are
/// treated as zero and get a zero inverse.
pub struct SvdInverse<T: Scalar> {
    // left singular vectors, m x k
    pub u: Mat<T>,
    // inverted, truncated singular values, length k
    pub s_inv: Vec<T>,
    // right singular vectors, n x k
    pub v: Mat<T>,
    // number of singular values kept
    pub rank: usize,
}

/// Computes the thin svd of x and inverts its singular values
pub fn svd_inverse<T>(x: MatRef<T>, rcond: Option<f64>) -> SvdInverse<T>
    where
    T: Scalar
{
    let x_svd = x.thin_svd();
    let s_vec = x_svd.s_diagonal();
    let k = s_vec.nrows();
    let rcond_t = match rcond {
        Some(r) => cast::<T>(r),
        None => default_rcond::<T>(x.nrows(), x.ncols()),
    };
    let s_max = (0..k)
        .map(|i| s_vec.read(i))
        .fold(T::zero(), |acc, s| acc.max(s));
    let cutoff = rcond_t * s_max;

    let s_inv: Vec<T> = (0..k)
        .map(|i| {
            let s = s_vec.read(i);
            if s > cutoff { T::one() / s } else { T::zero() }
        })
        .collect();
    let rank = s_inv.iter().filter(|s| **s != T::zero()).count();
    if rank < k {
        log::debug!("svd inverse: rank deficient, kept {} of {} singular values (cutoff {})",
                    rank, k, cutoff);
    }

    SvdInverse {
        u: x_svd.u().to_owned(),
        s_inv,
        v: x_svd.v().to_owned(),
        rank,
    }
}


/// Compute the Moore-Penrose inverse of a (m, n) matrix, returns (n, m).
/// pinv(x) = V * diag(s_inv) * U^T
pub fn mat_pinv<T>(x: MatRef<T>, rcond: Option<f64>, par: Parallelism) -> LinalgResult<Mat<T>>
    where
    T: Scalar
{
    if x.nrows() == 0 || x.ncols() == 0 {
        return Ok(Mat::zeros(x.ncols(), x.nrows()));
    }
    check_finite(x, "pinv")?;
    let svd_inv = svd_inverse(x, rcond);
    // scale right singular vectors column by column
    let vs: Mat<T> = Mat::from_fn(
        svd_inv.v.nrows(),
        svd_inv.v.ncols(),
        |i, j| svd_inv.v.read(i, j) * svd_inv.s_inv[j],
        );
    let mut out_mat: Mat<T> = Mat::zeros(x.ncols(), x.nrows());
    par_matmul_helper(
        out_mat.as_mut(),
        vs.as_ref(),
        svd_inv.u.as_ref().transpose(),
        T::one(),
        par);
    Ok(out_mat)
}


/// Minimum norm least squares solution X of A*X = B via svd.
/// A is (m, n), B is (m, p), X is (n, p).
/// X = V * diag(s_inv) * (U^T * B)
pub fn mat_solve<T>(a: MatRef<T>, b: MatRef<T>, rcond: Option<f64>, par: Parallelism)
    -> LinalgResult<Mat<T>>
    where
    T: Scalar
{
    let a_dims = MatDims::new(a.nrows(), a.ncols());
    let b_dims = MatDims::new(b.nrows(), b.ncols());
    let x_dims = MatDims::solve_output(a_dims, b_dims)?;
    if a_dims.is_empty() || b_dims.is_empty() {
        return Ok(Mat::zeros(x_dims.nrows, x_dims.ncols));
    }
    check_finite(a, "solve")?;
    check_finite(b, "solve")?;

    let svd_inv = svd_inverse(a, rcond);
    let k = svd_inv.s_inv.len();

    // project rhs onto left singular vectors, k x p
    let mut utb: Mat<T> = Mat::zeros(k, b.ncols());
    par_matmul_helper(
        utb.as_mut(),
        svd_inv.u.as_ref().transpose(),
        b,
        T::one(),
        par);
    for j in 0..utb.ncols() {
        for i in 0..k {
            utb.write(i, j, utb.read(i, j) * svd_inv.s_inv[i]);
        }
    }

    let mut x_mat: Mat<T> = Mat::zeros(x_dims.nrows, x_dims.ncols);
    par_matmul_helper(
        x_mat.as_mut(),
        svd_inv.v.as_ref(),
        utb.as_ref(),
        T::one(),
        par);
    Ok(x_mat)
}


/// create a matrix filled with standard normal samples
pub fn random_mat_normal<T>(n_rows: usize, n_cols: usize)
    -> Mat<T>
    where
    T: Scalar
{
    Mat::from_fn(
        n_rows,
        n_cols,
        |_i, _j| {
            cast::<T>(thread_rng().sample(StandardNormal))
            }
        )
}

/// Square identity matrix
pub fn mat_eye<T>(n: usize) -> Mat<T>
    where
    T: Scalar
{
    Mat::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
}


/// Asserts two matrices share a shape and agree entry-wise within tol
pub fn mat_mat_approx_eq<T>(a: MatRef<T>, b: MatRef<T>, tol: T)
    where
    T: Scalar
{
    use assert_approx_eq::assert_approx_eq;
    assert_eq!((a.nrows(), a.ncols()), (b.nrows(), b.ncols()), "shape mismatch");
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            assert_approx_eq!(a.read(i, j), b.read(i, j), tol);
        }
    }
}
