//! CLI entry points for [`nodal-bench`](crate), a small ad-hoc timing
//! harness over the `nodal` crate's hot paths: sink fan-out and
//! dependency-set sweeps.

#![forbid(unsafe_code)]

mod cli;
mod error;
mod routines;

pub use cli::run_from_env;
pub use error::{BenchError, Result};
