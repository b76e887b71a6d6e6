// src/pipeline/publish.rs

//! Publish stage: register the problem with the DOMjudge contest and
//! upload the converted archive.

use std::fs;

use crate::api::PublishTarget;
use crate::error::Result;
use crate::models::{ContestDirs, ProblemEntry, UNSET_VERSION};
use crate::pipeline::stage::{decide, StageDecision};
use crate::report::Reporter;

/// Run the publish stage for one problem.
///
/// Returns whether the persisted state changed. The remote id assigned at
/// registration sticks to the entry even if the subsequent upload fails,
/// so a retry does not register the problem twice.
pub async fn run_publish(
    target: &dyn PublishTarget,
    entry: &mut ProblemEntry,
    dirs: &ContestDirs,
    force: bool,
    reporter: &Reporter,
) -> Result<bool> {
    let available = entry.local_version;
    let stored = if force { UNSET_VERSION } else { entry.published_version };

    match decide(available, stored) {
        StageDecision::Unavailable => {
            reporter.warn("The DOMjudge package is not present locally; nothing to publish.");
            return Ok(false);
        }
        StageDecision::Regressed => {
            reporter.warn(
                "The DOMjudge package on the server is more up to date than the local one.",
            );
            return Ok(false);
        }
        StageDecision::UpToDate => {
            reporter.info("The DOMjudge package on the server is already up to date.");
            return Ok(false);
        }
        StageDecision::Outdated => {}
    }

    let remote_id = match entry.domjudge_id.clone() {
        Some(id) => id,
        None => {
            let label = entry.label.as_deref().unwrap_or("?");
            let id = target.register(label, &entry.name).await?;
            reporter.info(&format!("Registered with external id '{id}'."));
            entry.domjudge_id = Some(id.clone());
            id
        }
    };

    let package = fs::read(dirs.domjudge_zip(&entry.name))?;
    target.upload(&remote_id, package).await?;

    entry.published_version = available;
    reporter.info(&format!(
        "Updated the DOMjudge package on the server, id = '{remote_id}'."
    ));
    Ok(true)
}
