//! Built-in kernels

pub mod rolling;

pub use rolling::{rolling_mean_f64, rolling_mean_into};
