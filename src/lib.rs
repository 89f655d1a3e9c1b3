// root level lib
// other modules
pub mod lib_linalg;
#[cfg(feature = "python")]
pub mod lib_linalg_py;

// root level re-exports
pub use lib_linalg::config::LinalgConfig;
pub use lib_linalg::dims::MatDims;
pub use lib_linalg::errors::{LinalgError, LinalgResult};
pub use lib_linalg::mat_utils::{mat_pinv, mat_solve, Scalar};
pub use lib_linalg::ops::{format_mat, pinv, printmat, solve, write_mat};
