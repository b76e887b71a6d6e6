// src/domjudge/mod.rs

//! Emission of DOMjudge problem packages.
//!
//! - `emitter`: serializes a [`Problem`](crate::models::Problem) into the
//!   DOMjudge directory layout
//! - `archive`: zip packing/unpacking
//! - `testlib`: fetches and patches the testlib.h support header

mod archive;
mod emitter;
mod testlib;

pub use archive::{unzip_into, zip_dir};
pub use emitter::{emit_package, Manifest, Validation};
pub use testlib::{patch_testlib, update_testlib};
