// src/api/mod.rs

//! Seams to the two external servers.
//!
//! The pipeline talks to traits, not clients, so tests can run against
//! in-memory fakes; the production implementations are thin API glue.

mod domjudge;
mod polygon;

pub use domjudge::DomjudgeApi;
pub use polygon::{ContestProblem, PolygonApi};

use async_trait::async_trait;

use crate::error::Result;

/// A ready package revision on the upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageRef {
    pub revision: i64,
    pub package_id: i64,
}

/// Where problem packages are fetched from.
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Latest revision with a ready package, if any exists.
    async fn latest_package(&self, problem_id: u64) -> Result<Option<PackageRef>>;

    /// Download the archive bytes of the given package.
    async fn download(&self, problem_id: u64, package: PackageRef) -> Result<Vec<u8>>;
}

/// Where converted packages are published to.
#[async_trait]
pub trait PublishTarget: Send + Sync {
    /// Register the problem with the contest; returns the external id the
    /// target will know the problem by.
    async fn register(&self, label: &str, name: &str) -> Result<String>;

    /// Upload a package archive for an already registered problem.
    async fn upload(&self, remote_id: &str, package: Vec<u8>) -> Result<()>;
}

/// Six random upper-case letters, used for API nonces and external ids.
pub(crate) fn random_suffix() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..6).map(|_| rng.random_range(b'A'..=b'Z') as char).collect()
}
