// src/models/config.rs

//! Contest configuration and persisted pipeline state.
//!
//! The whole contest lives in `<contest_dir>/contest.toml`: credentials for
//! the two servers, presentation metadata per problem, and the three
//! version counters the pipeline uses to decide what is stale.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::mapping;
use crate::report::Reporter;

/// Version value meaning "never fetched/converted/published".
pub const UNSET_VERSION: i64 = -1;

/// Root contest configuration.
///
/// Plain values come before the table-valued fields so the TOML
/// serializer never has to emit a value after a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestConfig {
    /// Contest display name, used in the generated documents.
    pub contest_name: String,

    /// Optional front page for the problemset document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_page_problemset: Option<PathBuf>,

    /// Optional front page for the editorial document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_page_solutions: Option<PathBuf>,

    /// Polygon API credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<PolygonCredentials>,

    /// DOMjudge server credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domjudge: Option<DomjudgeCredentials>,

    /// Per-contest adjustments to the verdict-tag mapping. Values are
    /// bucket names or "exclude".
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub verdict_overrides: BTreeMap<String, String>,

    #[serde(default)]
    pub problems: Vec<ProblemEntry>,
}

/// Polygon API key pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonCredentials {
    pub key: String,
    pub secret: String,
}

/// DOMjudge server coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomjudgeCredentials {
    pub server: String,
    pub username: String,
    pub password: String,
    pub contest_id: String,
}

/// One problem of the contest: operator metadata plus pipeline state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemEntry {
    /// Polygon short name, the unique key of the problem.
    pub name: String,

    /// Polygon problem id, needed by the fetch stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon_id: Option<u64>,

    /// Contest-assigned label (letter).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Balloon color (CSS name or #RRGGBB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<String>,

    /// Time limit override, seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_time_limit: Option<f64>,

    /// Memory limit override, MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_memory_limit: Option<u64>,

    /// Latest Polygon revision fetched into `polygon/<name>/`.
    #[serde(default = "defaults::unset_version")]
    pub polygon_version: i64,

    /// Revision of the last successful local conversion.
    #[serde(default = "defaults::unset_version")]
    pub local_version: i64,

    /// Revision of the last successful publish to the DOMjudge server.
    #[serde(default = "defaults::unset_version")]
    pub published_version: i64,

    /// External id assigned when the problem was registered with DOMjudge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domjudge_id: Option<String>,
}

mod defaults {
    pub fn unset_version() -> i64 {
        super::UNSET_VERSION
    }
}

impl ProblemEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polygon_id: None,
            label: None,
            color: None,
            author: None,
            preparation: None,
            override_time_limit: None,
            override_memory_limit: None,
            polygon_version: UNSET_VERSION,
            local_version: UNSET_VERSION,
            published_version: UNSET_VERSION,
            domjudge_id: None,
        }
    }
}

impl ContestConfig {
    /// Load the configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::config(format!(
                "cannot read '{}': {e}",
                path.as_ref().display()
            ))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Persist the configuration atomically (write to temp, then rename).
    ///
    /// Called after every stage that advances a version counter, so a
    /// crash mid-run loses at most the in-flight stage.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Validate the configuration for structural sanity.
    ///
    /// Hard requirements are fatal; missing presentation metadata only
    /// warns here and again when the problem is converted.
    pub fn validate(&self, reporter: &Reporter) -> Result<()> {
        if self.contest_name.trim().is_empty() {
            return Err(AppError::config("contest_name is empty"));
        }
        if self.problems.is_empty() {
            return Err(AppError::config("no problems defined"));
        }

        let mut seen = std::collections::BTreeSet::new();
        for problem in &self.problems {
            if problem.name.trim().is_empty() {
                return Err(AppError::config("a problem entry has an empty name"));
            }
            if !seen.insert(problem.name.as_str()) {
                return Err(AppError::config(format!(
                    "duplicate problem name '{}'",
                    problem.name
                )));
            }
            if let Some(color) = &problem.color {
                mapping::normalize_color(color)?;
            }
            let unset = [
                ("label", problem.label.is_none()),
                ("color", problem.color.is_none()),
                ("author", problem.author.is_none()),
                ("preparation", problem.preparation.is_none()),
            ];
            for (key, is_unset) in unset {
                if is_unset {
                    reporter.warn(&format!(
                        "Problem '{}' has no '{}' key.",
                        problem.name, key
                    ));
                }
            }
        }

        // Exercise every override once so a typo fails up front.
        for tag in self.verdict_overrides.keys() {
            mapping::verdict_bucket(tag, &self.verdict_overrides)?;
        }
        Ok(())
    }

    pub fn problem_mut(&mut self, name: &str) -> Option<&mut ProblemEntry> {
        self.problems.iter_mut().find(|p| p.name == name)
    }

    pub fn problem(&self, name: &str) -> Option<&ProblemEntry> {
        self.problems.iter().find(|p| p.name == name)
    }
}

/// Well-known locations inside a contest directory.
#[derive(Debug, Clone)]
pub struct ContestDirs {
    root: PathBuf,
}

impl ContestDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("contest.toml")
    }

    /// Unpacked Polygon package of a problem.
    pub fn polygon_dir(&self, name: &str) -> PathBuf {
        self.root.join("polygon").join(name)
    }

    /// Emitted DOMjudge package of a problem.
    pub fn domjudge_dir(&self, name: &str) -> PathBuf {
        self.root.join("domjudge").join(name)
    }

    pub fn domjudge_zip(&self, name: &str) -> PathBuf {
        self.domjudge_dir(name).join(format!("{name}.zip"))
    }

    /// Shared LaTeX workspace (statement/solution sources, samples, images).
    pub fn tex_dir(&self) -> PathBuf {
        self.root.join("tex")
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.root.join("resources")
    }

    /// The DOMjudge-patched testlib.h used by custom validators.
    pub fn testlib_path(&self) -> PathBuf {
        self.resources_dir().join("testlib.h")
    }
}
