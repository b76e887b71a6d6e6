// src/models/problem.rs

//! Canonical problem model produced by the Polygon parser and consumed by
//! the DOMjudge emitter and the statement compiler.

use std::path::PathBuf;

use crate::error::Result;
use crate::mapping;
use crate::models::config::ProblemEntry;
use crate::report::Reporter;

/// A sample shown in the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: PathBuf,
    pub answer: PathBuf,
    /// Explanation extracted from the statement notes; absent is fine.
    pub explanation: Option<String>,
}

/// A single test, sample or secret.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// Global sequence number, contiguous from 1.
    pub num: usize,
    pub input: PathBuf,
    pub answer: PathBuf,
    pub is_sample: bool,
}

/// Output checker of the problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Checker {
    /// Identifier of the standard testlib checker (e.g. `rcmp6`), if the
    /// package declares one. Already validated against the checker table.
    pub standard: Option<String>,
    pub source: PathBuf,
}

/// Interactor of an interactive problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Interactor {
    pub source: PathBuf,
}

/// A reference solution with its expected verdict tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub source: PathBuf,
    pub verdict: String,
}

/// An image referenced by the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Original file name, as referenced from the statement source.
    pub name: String,
    pub path: PathBuf,
}

/// Free-text parts of the statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub legend: String,
    pub input: String,
    pub output: String,
    pub interaction: Option<String>,
    pub tutorial: String,
    /// Derived from the tutorial's `%AUTHOR:` line; config may override.
    pub author: String,
    /// Derived from the tutorial's `%PREPARATION:` line; config may override.
    pub preparation: String,
    pub samples: Vec<Sample>,
    pub images: Vec<Image>,
}

/// Canonical problem record.
///
/// Constructed fresh on every conversion; immutable after parsing except
/// for [`Problem::apply_entry`], which folds in the operator-supplied
/// metadata before emission.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Short name, unique key matching Polygon's short name.
    pub name: String,
    pub title: String,
    /// Contest-assigned label (letter); supplied by the config.
    pub label: String,
    /// Six upper-case hex digits; supplied by the config.
    pub color: String,
    /// Time limit in seconds.
    pub time_limit: f64,
    /// Memory limit in MiB.
    pub memory_limit: u64,
    pub statement: Statement,
    pub tests: Vec<TestCase>,
    pub checker: Checker,
    pub interactor: Option<Interactor>,
    pub solutions: Vec<Solution>,
}

impl Problem {
    /// Apply the operator-supplied metadata from the contest config.
    ///
    /// Missing presentation keys degrade to defaults with a warning.
    pub fn apply_entry(&mut self, entry: &ProblemEntry, reporter: &Reporter) -> Result<()> {
        let mut missing = Vec::new();
        if entry.label.is_none() {
            missing.push("label");
        }
        if entry.color.is_none() {
            missing.push("color");
        }
        if !missing.is_empty() {
            reporter.warn(&format!(
                "The keys [{}] are not set in contest.toml for problem '{}'.",
                missing.join(", "),
                self.name
            ));
        }

        self.label = entry.label.clone().unwrap_or_else(|| "?".to_string());
        self.color = mapping::normalize_color(entry.color.as_deref().unwrap_or("black"))?;

        if let Some(tl) = entry.override_time_limit {
            self.time_limit = tl;
        }
        if let Some(ml) = entry.override_memory_limit {
            self.memory_limit = ml;
        }
        if let Some(author) = &entry.author {
            self.statement.author = author.clone();
        }
        if let Some(preparation) = &entry.preparation {
            self.statement.preparation = preparation.clone();
        }
        Ok(())
    }

    pub fn is_interactive(&self) -> bool {
        self.interactor.is_some()
    }
}
