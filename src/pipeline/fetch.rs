// src/pipeline/fetch.rs

//! Fetch stage: download and unpack the latest Polygon package.

use std::fs;

use crate::api::PackageSource;
use crate::domjudge::unzip_into;
use crate::error::Result;
use crate::models::{ContestDirs, ProblemEntry, UNSET_VERSION};
use crate::pipeline::stage::{decide, StageDecision};
use crate::report::Reporter;

/// Run the fetch stage for one problem.
///
/// Returns whether the persisted state changed.
pub async fn run_fetch(
    source: &dyn PackageSource,
    entry: &mut ProblemEntry,
    dirs: &ContestDirs,
    force: bool,
    reporter: &Reporter,
) -> Result<bool> {
    let Some(polygon_id) = entry.polygon_id else {
        reporter.warn("Skipped because polygon_id is not specified.");
        return Ok(false);
    };

    // "No ready revision" sorts below every stored value, so it can never
    // beat an unset (-1) state either.
    let Some(package) = source.latest_package(polygon_id).await? else {
        reporter.warn("No ready package was found on Polygon.");
        return Ok(false);
    };
    let stored = if force { UNSET_VERSION } else { entry.polygon_version };
    reporter.debug(&format!(
        "Fetch decision inputs: available={}, stored={stored}.",
        package.revision
    ));

    match decide(package.revision, stored) {
        StageDecision::Unavailable => {
            reporter.warn("No ready package was found on Polygon.");
            Ok(false)
        }
        StageDecision::Regressed => {
            reporter.warn("The local version is newer than the Polygon version; not overwriting.");
            Ok(false)
        }
        StageDecision::UpToDate => {
            reporter.info("The Polygon package is up to date.");
            Ok(false)
        }
        StageDecision::Outdated => {
            let bytes = source.download(polygon_id, package).await?;

            let package_dir = dirs.polygon_dir(&entry.name);
            if package_dir.is_dir() {
                fs::remove_dir_all(&package_dir)?;
            }
            unzip_into(&bytes, &package_dir)?;

            entry.polygon_version = package.revision;
            reporter.info(&format!(
                "Downloaded and unpacked revision {} into '{}'.",
                package.revision,
                package_dir.display()
            ));
            Ok(true)
        }
    }
}
