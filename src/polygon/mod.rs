// src/polygon/mod.rs

//! Parsing of Polygon problem packages into the canonical [`Problem`]
//! record.
//!
//! - `package`: `problem.xml` metadata, tests, checker, interactor, solutions
//! - `statement`: `problem-properties.json` and statement assets

mod package;
mod statement;

pub use package::parse_package;
pub use statement::{scan_images, StatementProperties};

/// Statement language exported from the package.
pub const STATEMENT_LANGUAGE: &str = "english";
