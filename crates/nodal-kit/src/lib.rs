//! Peripheral utilities shared by the workspace: color parsing, 2D
//! geometry, string case conversion, path normalization, and a handful of
//! small class/exception/decorator/assert helpers.
//!
//! None of this crate is part of the reactive value graph in
//! [`nodal`](https://docs.rs/nodal) — it exists only because a complete
//! version of this toolkit carries these utilities alongside the core.

#![forbid(unsafe_code)]

pub mod asserts;
pub mod color;
pub mod decorators;
pub mod fault;
pub mod geometry;
pub mod path;
pub mod strcase;
