// src/models/mod.rs

//! Domain models: the canonical problem record and the persisted contest
//! configuration.

mod config;
mod problem;

pub use config::{
    ContestConfig, ContestDirs, DomjudgeCredentials, PolygonCredentials, ProblemEntry,
    UNSET_VERSION,
};
pub use problem::{
    Checker, Image, Interactor, Problem, Sample, Solution, Statement, TestCase,
};
