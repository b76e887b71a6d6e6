// src/pipeline/convert.rs

//! Convert stage: parse the fetched Polygon package, apply the operator
//! overrides and emit the DOMjudge package plus its archive.

use std::collections::BTreeMap;
use std::fs;

use crate::domjudge::{emit_package, zip_dir};
use crate::error::{AppError, Result};
use crate::models::{ContestDirs, ProblemEntry, UNSET_VERSION};
use crate::pipeline::stage::{decide, StageDecision};
use crate::polygon::parse_package;
use crate::report::Reporter;
use crate::tex::{self, Renderer};

/// Run the convert stage for one problem.
///
/// Returns whether the persisted state changed.
#[allow(clippy::too_many_arguments)]
pub async fn run_convert(
    entry: &mut ProblemEntry,
    dirs: &ContestDirs,
    contest_name: &str,
    verdict_overrides: &BTreeMap<String, String>,
    renderer: &dyn Renderer,
    force: bool,
    keep_dirs: bool,
    reporter: &Reporter,
) -> Result<bool> {
    let available = entry.polygon_version;
    let stored = if force { UNSET_VERSION } else { entry.local_version };

    match decide(available, stored) {
        StageDecision::Unavailable => {
            reporter.warn("The Polygon package is not present locally; nothing fetched yet.");
            return Ok(false);
        }
        StageDecision::Regressed => {
            reporter.warn(
                "The local DOMjudge package is more up to date than the local Polygon package.",
            );
            return Ok(false);
        }
        StageDecision::UpToDate => {
            reporter.info("The local DOMjudge package is already up to date.");
            return Ok(false);
        }
        StageDecision::Outdated => {}
    }

    let package_dir = dirs.polygon_dir(&entry.name);
    let mut problem = parse_package(&package_dir, reporter)?;
    if problem.name != entry.name {
        return Err(AppError::package(
            &package_dir,
            format!(
                "the package short name '{}' does not match the configured problem '{}'",
                problem.name, entry.name
            ),
        ));
    }
    problem.apply_entry(entry, reporter)?;

    // Statement and editorial bodies for the contest-level documents.
    let tex_dir = dirs.tex_dir();
    fs::create_dir_all(&tex_dir)?;
    let statement_body = tex::statement_tex(&problem, &tex_dir)?;
    fs::write(
        tex_dir.join(format!("{}-statement.tex", problem.name)),
        statement_body,
    )?;
    let solution_body = tex::solution_tex(&problem, &tex_dir)?;
    fs::write(
        tex_dir.join(format!("{}-solution.tex", problem.name)),
        solution_body,
    )?;

    // The emitter requires an empty destination.
    let dest = dirs.domjudge_dir(&entry.name);
    if dest.is_dir() {
        fs::remove_dir_all(&dest)?;
    }
    fs::create_dir_all(&dest)?;

    emit_package(
        &problem,
        &dest,
        &dirs.testlib_path(),
        contest_name,
        verdict_overrides,
        renderer,
        keep_dirs,
        reporter,
    )
    .await?;

    // Zip through a scratch location: the archive lands inside the very
    // directory being packed.
    let staging = tempfile::tempdir()?;
    let staged_zip = staging.path().join(format!("{}.zip", entry.name));
    zip_dir(&dest, &staged_zip)?;
    fs::copy(&staged_zip, dirs.domjudge_zip(&entry.name))?;

    entry.local_version = available;
    reporter.info(&format!(
        "Converted the Polygon package to the DOMjudge package '{}'.",
        dest.display()
    ));
    Ok(true)
}
