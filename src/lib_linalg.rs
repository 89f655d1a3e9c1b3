// Dense linear algebra core, usable without python
pub mod errors;
pub mod config;
pub mod dims;
pub mod mat_utils;
pub mod ops;
