// src/domjudge/emitter.rs

//! Serialization of a [`Problem`] into the DOMjudge package layout.
//!
//! The destination directory is assumed empty; every file operation is a
//! copy from the source package. Emission only starts once parsing fully
//! succeeded, so a failed conversion never leaves a package that looks
//! complete.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::mapping;
use crate::models::Problem;
use crate::report::Reporter;
use crate::tex::{self, Renderer};

/// `problem.yaml` contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub limits: Limits,
    pub validation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator_flags: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Memory limit in MiB.
    pub memory: u64,
}

/// Validation mode chosen for the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Default,
    Custom,
    CustomInteractive,
}

impl Validation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Validation::Default => "default",
            Validation::Custom => "custom",
            Validation::CustomInteractive => "custom interactive",
        }
    }
}

fn copy_into(source: &Path, dest_dir: &Path, name: &str) -> Result<()> {
    fs::copy(source, dest_dir.join(name)).map_err(|e| {
        AppError::package(source, format!("cannot copy into the DOMjudge package: {e}"))
    })?;
    Ok(())
}

/// The support header every custom validator is compiled against.
fn require_testlib(testlib: &Path) -> Result<&Path> {
    if testlib.is_file() {
        Ok(testlib)
    } else {
        Err(AppError::config(format!(
            "testlib.h not found at '{}'; run 'pol2dom update-testlib' first",
            testlib.display()
        )))
    }
}

/// Populate `dest` with the DOMjudge package of `problem`.
///
/// Returns the validation mode that was written into the manifest.
pub async fn emit_package(
    problem: &Problem,
    dest: &Path,
    testlib: &Path,
    contest_name: &str,
    verdict_overrides: &BTreeMap<String, String>,
    renderer: &dyn Renderer,
    keep_dirs: bool,
    reporter: &Reporter,
) -> Result<Validation> {
    reporter.info(&format!(
        "Creating the DOMjudge package directory '{}'.",
        dest.display()
    ));
    fs::create_dir_all(dest)?;

    // Metadata.
    let ini_content = format!(
        "short-name = {}\nname = {}\ntimelimit = {}\ncolor = {}\n",
        problem.name,
        problem.title.replace('\'', "`"),
        problem.time_limit,
        problem.color
    );
    fs::write(dest.join("domjudge-problem.ini"), ini_content)?;

    // Statement, compiled in a scratch directory of its own.
    let scratch = tempfile::Builder::new()
        .prefix(&format!("{}-pol2dom-", problem.name))
        .tempdir()?;
    let body = tex::statement_tex(problem, scratch.path())?;
    let pdf = tex::compile_document(&body, contest_name, scratch.path(), "statement", renderer)
        .await?;
    fs::write(dest.join("problem.pdf"), pdf)?;
    if keep_dirs {
        let kept = scratch.keep();
        reporter.info(&format!("Keeping the scratch directory '{}'.", kept.display()));
    }

    // Tests.
    reporter.info("Copying the tests into the DOMjudge package.");
    let sample_dir = dest.join("data").join("sample");
    let secret_dir = dest.join("data").join("secret");
    fs::create_dir_all(&sample_dir)?;
    fs::create_dir_all(&secret_dir)?;
    for test in &problem.tests {
        let dir = if test.is_sample { &sample_dir } else { &secret_dir };
        copy_into(&test.input, dir, &format!("{}.in", test.num))?;
        copy_into(&test.answer, dir, &format!("{}.ans", test.num))?;
    }

    // Checker or interactor.
    let (validation, validator_flags) = if let Some(interactor) = &problem.interactor {
        let validators = dest.join("output_validators");
        fs::create_dir_all(&validators)?;
        copy_into(require_testlib(testlib)?, &validators, "testlib.h")?;
        copy_into(&interactor.source, &validators, "interactor.cpp")?;
        (Validation::CustomInteractive, None)
    } else if let Some(ident) = &problem.checker.standard {
        reporter.debug(&format!("Standard checker '{ident}'."));
        // The identifier was validated at parse time.
        let flags = mapping::checker_flags(ident).flatten();
        (Validation::Default, flags.map(str::to_string))
    } else {
        reporter.debug("Custom checker.");
        let validators = dest.join("output_validators");
        fs::create_dir_all(&validators)?;
        copy_into(require_testlib(testlib)?, &validators, "testlib.h")?;
        copy_into(&problem.checker.source, &validators, "checker.cpp")?;
        (Validation::Custom, None)
    };

    // Solutions whose verdict maps to a bucket; the rest are filtered out.
    for solution in &problem.solutions {
        let Some(bucket) = mapping::verdict_bucket(&solution.verdict, verdict_overrides)? else {
            continue;
        };
        let bucket_dir = dest.join("submissions").join(bucket.dir_name());
        fs::create_dir_all(&bucket_dir)?;
        let file_name = solution
            .source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::package(&solution.source, "solution source has no file name")
            })?;
        copy_into(&solution.source, &bucket_dir, file_name)?;
    }

    // Manifest.
    let manifest = Manifest {
        limits: Limits {
            memory: problem.memory_limit,
        },
        validation: validation.as_str().to_string(),
        validator_flags,
    };
    fs::write(dest.join("problem.yaml"), serde_yaml::to_string(&manifest)?)?;

    Ok(validation)
}
