use numpy::ndarray::{ArrayView, CowArray, Dimension, IxDyn};
use numpy::{Element, IntoPyArray, PyReadonlyArrayDyn};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;

use crate::lib_linalg::config::{parallelism_for, threads_of, LinalgConfig};
use crate::lib_linalg::errors::LinalgError;
use crate::lib_linalg::mat_utils::Scalar;
use crate::lib_linalg::ops;


impl From<LinalgError> for PyErr {
    fn from(err: LinalgError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}


/// A float32 or float64 numpy array argument
pub enum MatArg<'py> {
    F64(PyReadonlyArrayDyn<'py, f64>),
    F32(PyReadonlyArrayDyn<'py, f32>),
}

impl<'py> FromPyObject<'py> for MatArg<'py> {
    fn extract_bound(ob: &Bound<'py, PyAny>) -> PyResult<Self> {
        if let Ok(a) = ob.extract::<PyReadonlyArrayDyn<'py, f64>>() {
            return Ok(MatArg::F64(a));
        }
        if let Ok(a) = ob.extract::<PyReadonlyArrayDyn<'py, f32>>() {
            return Ok(MatArg::F32(a));
        }
        Err(PyTypeError::new_err("expected a float32 or float64 numpy array"))
    }
}

impl<'py> MatArg<'py> {
    // f64 view of the argument, copies only float32 input
    fn as_f64(&self) -> CowArray<'_, f64, IxDyn> {
        match self {
            MatArg::F64(a) => CowArray::from(a.as_array()),
            MatArg::F32(a) => CowArray::from(a.as_array().mapv(f64::from)),
        }
    }
}


fn config_for(rcond: Option<f64>) -> PyResult<LinalgConfig> {
    Ok(LinalgConfig::new().with_rcond(rcond)?)
}

// The GIL is released around the numeric work. Readonly borrows do not stop
// other python threads writing the input buffers, callers sharing arrays
// across threads must synchronise themselves.
fn pinv_impl<'py, T, D>(py: Python<'py>, a: ArrayView<'_, T, D>, cfg: &LinalgConfig)
    -> PyResult<PyObject>
    where
    T: Scalar + Element,
    D: Dimension
{
    let b = py.allow_threads(|| ops::pinv(a, cfg))?;
    Ok(b.into_pyarray_bound(py).into_any().unbind())
}

fn solve_impl<'py, T, D>(py: Python<'py>, a: ArrayView<'_, T, D>, b: ArrayView<'_, T, D>, cfg: &LinalgConfig)
    -> PyResult<PyObject>
    where
    T: Scalar + Element,
    D: Dimension
{
    let x = py.allow_threads(|| ops::solve(a, b, cfg))?;
    Ok(x.into_pyarray_bound(py).into_any().unbind())
}


/// Convert to matrix and print
#[pyfunction]
fn printmat<'py>(py: Python<'py>, a: MatArg<'py>) -> PyResult<()> {
    let rendered = match &a {
        MatArg::F64(a) => ops::format_mat(a.as_array())?,
        MatArg::F32(a) => ops::format_mat(a.as_array())?,
    };
    let stderr = py.import_bound("sys")?.getattr("stderr")?;
    stderr.call_method1("write", (rendered + "\n",))?;
    Ok(())
}

/// PseudoInverse
///
/// Returns the (n, m) Moore-Penrose inverse of an (m, n) matrix.
/// Singular values at or below rcond * max(s) are dropped.
#[pyfunction]
#[pyo3(signature = (a, rcond=None))]
fn pinv<'py>(py: Python<'py>, a: MatArg<'py>, rcond: Option<f64>) -> PyResult<PyObject> {
    let cfg = config_for(rcond)?;
    match &a {
        MatArg::F64(a) => pinv_impl(py, a.as_array(), &cfg),
        MatArg::F32(a) => pinv_impl(py, a.as_array(), &cfg),
    }
}

/// Least Squares Solver (SVD)
///
/// Solves A X = B in the least squares sense for A (m, n) and
/// B (m, p), returning X (n, p).
#[pyfunction]
#[pyo3(signature = (a, b, rcond=None))]
fn solve<'py>(py: Python<'py>, a: MatArg<'py>, b: MatArg<'py>, rcond: Option<f64>) -> PyResult<PyObject> {
    let cfg = config_for(rcond)?;
    match (&a, &b) {
        (MatArg::F32(a32), MatArg::F32(b32)) => {
            solve_impl(py, a32.as_array(), b32.as_array(), &cfg)
        }
        _ => {
            // mixed or double precision
            let a64 = a.as_f64();
            let b64 = b.as_f64();
            solve_impl(py, a64.view(), b64.view(), &cfg)
        }
    }
}

/// Sets the number of threads faer may use, 0 for the rayon default
#[pyfunction]
fn set_num_threads(n_threads: usize) {
    faer::set_global_parallelism(parallelism_for(n_threads));
}

/// Number of threads faer currently uses
#[pyfunction]
fn get_num_threads() -> usize {
    threads_of(faer::get_global_parallelism())
}


#[pymodule]
fn linalg_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    LinalgConfig::from_env()?.apply_global();

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(printmat, m)?)?;
    m.add_function(wrap_pyfunction!(pinv, m)?)?;
    m.add_function(wrap_pyfunction!(solve, m)?)?;
    m.add_function(wrap_pyfunction!(set_num_threads, m)?)?;
    m.add_function(wrap_pyfunction!(get_num_threads, m)?)?;
    Ok(())
}
