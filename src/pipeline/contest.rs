// src/pipeline/contest.rs

//! Sequential per-problem driver for the three pipeline stages.

use crate::api::{PackageSource, PolygonApi, PublishTarget};
use crate::error::Result;
use crate::models::{ContestConfig, ContestDirs, ProblemEntry};
use crate::pipeline::{run_convert, run_fetch, run_publish};
use crate::report::Reporter;
use crate::tex::Renderer;

/// Which stages to run, and which to force.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunFlags {
    pub fetch: bool,
    pub convert: bool,
    pub publish: bool,
    pub force_fetch: bool,
    pub force_convert: bool,
    pub force_publish: bool,
    pub keep_dirs: bool,
}

/// Outcome of a whole-contest run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: Vec<String>,
}

impl RunSummary {
    pub fn ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drive the requested stages over the selected problems, one problem at
/// a time, in fetch → convert → publish order.
///
/// A stage failure aborts the remaining stages of that problem only; the
/// run continues with the next problem. The config file is rewritten after
/// every stage attempt so a crash loses at most the in-flight stage.
#[allow(clippy::too_many_arguments)]
pub async fn run_contest(
    config: &mut ContestConfig,
    dirs: &ContestDirs,
    selected: &[String],
    source: Option<&dyn PackageSource>,
    target: Option<&dyn PublishTarget>,
    renderer: &dyn Renderer,
    flags: &RunFlags,
    reporter: &Reporter,
) -> Result<RunSummary> {
    let names: Vec<String> = if selected.is_empty() {
        config.problems.iter().map(|p| p.name.clone()).collect()
    } else {
        let mut names = Vec::new();
        for name in selected {
            if config.problem(name).is_some() {
                names.push(name.clone());
            } else {
                reporter.warn(&format!("Problem '{name}' is not in contest.toml; skipped."));
            }
        }
        names
    };

    let contest_name = config.contest_name.clone();
    let verdict_overrides = config.verdict_overrides.clone();

    let mut summary = RunSummary::default();
    for name in &names {
        reporter.header(name);
        let stage_reporter = reporter.nested();
        summary.processed += 1;
        let mut problem_failed = false;

        if flags.fetch && !problem_failed {
            match source {
                Some(source) => {
                    let result = match config.problem_mut(name) {
                        Some(entry) => {
                            run_fetch(source, entry, dirs, flags.force_fetch, &stage_reporter)
                                .await
                        }
                        None => Ok(false),
                    };
                    config.save(dirs.config_path())?;
                    if let Err(e) = result {
                        stage_reporter.error(&format!("Fetch failed: {e}"));
                        problem_failed = true;
                    }
                }
                None => {
                    stage_reporter.warn("No Polygon credentials configured; skipping fetch.");
                }
            }
        }

        if flags.convert && !problem_failed {
            let result = match config.problem_mut(name) {
                Some(entry) => {
                    run_convert(
                        entry,
                        dirs,
                        &contest_name,
                        &verdict_overrides,
                        renderer,
                        flags.force_convert,
                        flags.keep_dirs,
                        &stage_reporter,
                    )
                    .await
                }
                None => Ok(false),
            };
            config.save(dirs.config_path())?;
            if let Err(e) = result {
                stage_reporter.error(&format!("Convert failed: {e}"));
                problem_failed = true;
            }
        }

        if flags.publish && !problem_failed {
            match target {
                Some(target) => {
                    let result = match config.problem_mut(name) {
                        Some(entry) => {
                            run_publish(target, entry, dirs, flags.force_publish, &stage_reporter)
                                .await
                        }
                        None => Ok(false),
                    };
                    config.save(dirs.config_path())?;
                    if let Err(e) = result {
                        stage_reporter.error(&format!("Publish failed: {e}"));
                        problem_failed = true;
                    }
                }
                None => {
                    stage_reporter.warn("No DOMjudge credentials configured; skipping publish.");
                }
            }
        }

        if problem_failed {
            summary.failed.push(name.clone());
        }
    }

    if summary.failed.is_empty() {
        reporter.info(&format!("Processed {} problem(s).", summary.processed));
    } else {
        reporter.error(&format!(
            "Processed {} problem(s); failed: {}.",
            summary.processed,
            summary.failed.join(", ")
        ));
    }
    Ok(summary)
}

/// Fill the contest config with the problems of a Polygon contest.
///
/// Existing entries are kept; new problems get their Polygon id and, if
/// unset, the label Polygon assigned to them.
pub async fn import_contest(
    api: &PolygonApi,
    config: &mut ContestConfig,
    contest_id: u64,
    reporter: &Reporter,
) -> Result<()> {
    let contest_problems = api.contest_problems(contest_id).await?;
    reporter.info(&format!("Fetched problems from contest {contest_id}."));

    let mut new_problems = Vec::new();
    for (label, problem) in &contest_problems {
        if problem.deleted {
            continue;
        }
        let known = config
            .problems
            .iter()
            .any(|p| p.polygon_id == Some(problem.id));
        if !known {
            let mut entry = ProblemEntry::new(&problem.name);
            entry.polygon_id = Some(problem.id);
            config.problems.push(entry);
            new_problems.push(problem.name.clone());
        }
        if let Some(entry) = config
            .problems
            .iter_mut()
            .find(|p| p.polygon_id == Some(problem.id))
        {
            if entry.label.is_none() {
                entry.label = Some(label.clone());
            }
        }
    }

    if new_problems.is_empty() {
        reporter.info("No new problems were found in the contest.");
    } else {
        reporter.info(&format!("Found new problems: {}.", new_problems.join(", ")));
    }
    Ok(())
}
