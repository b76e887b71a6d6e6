// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::{ContestConfig, ContestDirs};
use crate::report::Reporter;

/// Validate the contest configuration and report a short summary.
pub fn run_validate(dirs: &ContestDirs, reporter: &Reporter) -> Result<ContestConfig> {
    let config = ContestConfig::load(dirs.config_path())?;
    config.validate(reporter)?;

    reporter.info("The contest configuration is valid.");
    reporter.sub_item(&format!("Contest name: {}", config.contest_name));
    reporter.sub_item(&format!("Problems: {}", config.problems.len()));
    reporter.sub_item(&format!(
        "Polygon credentials: {}",
        if config.polygon.is_some() { "present" } else { "absent" }
    ));
    reporter.sub_item(&format!(
        "DOMjudge credentials: {}",
        if config.domjudge.is_some() { "present" } else { "absent" }
    ));
    Ok(config)
}
