// src/main.rs

//! pol2dom: convert Polygon problem packages into DOMjudge packages and
//! keep a whole contest in sync across Polygon, the local disk and a
//! DOMjudge server.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use pol2dom::api::{DomjudgeApi, PackageSource, PolygonApi, PublishTarget};
use pol2dom::domjudge::update_testlib;
use pol2dom::error::{AppError, Result};
use pol2dom::models::{ContestConfig, ContestDirs};
use pol2dom::pipeline::{import_contest, run_contest, run_validate, RunFlags};
use pol2dom::report::{Reporter, Verbosity};
use pol2dom::tex::{generate_problemset, generate_solutions, PdfLatex};

#[derive(Parser, Debug)]
#[command(
    name = "pol2dom",
    version,
    about = "Convert Polygon problem packages to DOMjudge packages"
)]
struct Cli {
    /// Verbosity of the console output
    #[arg(long, global = true, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Command,
}

/// A stage whose stored version should be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ForceStage {
    Fetch,
    Convert,
    Publish,
    All,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the fetch → convert → publish pipeline over the contest
    Run {
        contest_dir: PathBuf,
        /// Restrict the run to these problems (comma separated)
        #[arg(long, value_delimiter = ',')]
        problems: Vec<String>,
        /// Do not query or download from Polygon
        #[arg(long)]
        skip_polygon: bool,
        /// Do not convert fetched packages
        #[arg(long)]
        skip_convert: bool,
        /// Do not publish converted packages to DOMjudge
        #[arg(long)]
        skip_domjudge: bool,
        /// Redo a stage even if its stored version is current
        #[arg(long, value_enum)]
        force: Vec<ForceStage>,
        /// Keep scratch directories (useful for debugging)
        #[arg(long)]
        keep_dirs: bool,
    },
    /// Validate contest.toml
    Validate { contest_dir: PathBuf },
    /// Compile the statements of the whole contest into one document
    Problemset { contest_dir: PathBuf },
    /// Compile the editorial of the whole contest into one document
    Editorial { contest_dir: PathBuf },
    /// Fill contest.toml with the problems of a Polygon contest
    ImportContest {
        contest_dir: PathBuf,
        #[arg(long)]
        contest_id: u64,
    },
    /// Download testlib.h and patch it for DOMjudge
    UpdateTestlib { contest_dir: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let reporter = Reporter::new(Verbosity::from_str(&cli.verbosity));

    match cli.command {
        Command::Run {
            contest_dir,
            problems,
            skip_polygon,
            skip_convert,
            skip_domjudge,
            force,
            keep_dirs,
        } => {
            let dirs = ContestDirs::new(contest_dir);
            let mut config = run_validate(&dirs, &reporter)?;

            let forced = |stage: ForceStage| {
                force.contains(&stage) || force.contains(&ForceStage::All)
            };
            let flags = RunFlags {
                fetch: !skip_polygon,
                convert: !skip_convert,
                publish: !skip_domjudge,
                force_fetch: forced(ForceStage::Fetch),
                force_convert: forced(ForceStage::Convert),
                force_publish: forced(ForceStage::Publish),
                keep_dirs,
            };

            let source = config.polygon.as_ref().map(PolygonApi::new);
            let target = match &config.domjudge {
                Some(credentials) => Some(DomjudgeApi::new(credentials)?),
                None => None,
            };
            let renderer = PdfLatex;

            let summary = run_contest(
                &mut config,
                &dirs,
                &problems,
                source.as_ref().map(|s| s as &dyn PackageSource),
                target.as_ref().map(|t| t as &dyn PublishTarget),
                &renderer,
                &flags,
                &reporter,
            )
            .await?;
            if !summary.ok() {
                return Err(AppError::Run(format!(
                    "{} problem(s) failed: {}",
                    summary.failed.len(),
                    summary.failed.join(", ")
                )));
            }
        }
        Command::Validate { contest_dir } => {
            run_validate(&ContestDirs::new(contest_dir), &reporter)?;
        }
        Command::Problemset { contest_dir } => {
            let dirs = ContestDirs::new(contest_dir);
            let config = run_validate(&dirs, &reporter)?;
            let out = generate_problemset(&config, &dirs, &PdfLatex, &reporter).await?;
            reporter.info(&format!("Generated '{}'.", out.display()));
        }
        Command::Editorial { contest_dir } => {
            let dirs = ContestDirs::new(contest_dir);
            let config = run_validate(&dirs, &reporter)?;
            let out = generate_solutions(&config, &dirs, &PdfLatex, &reporter).await?;
            reporter.info(&format!("Generated '{}'.", out.display()));
        }
        Command::ImportContest {
            contest_dir,
            contest_id,
        } => {
            let dirs = ContestDirs::new(contest_dir);
            let mut config = ContestConfig::load(dirs.config_path())?;
            let credentials = config.polygon.clone().ok_or_else(|| {
                AppError::config("importing a contest requires [polygon] credentials")
            })?;
            let api = PolygonApi::new(&credentials);
            import_contest(&api, &mut config, contest_id, &reporter).await?;
            config.save(dirs.config_path())?;
        }
        Command::UpdateTestlib { contest_dir } => {
            let dirs = ContestDirs::new(contest_dir);
            update_testlib(&dirs.testlib_path(), &reporter).await?;
        }
    }

    Ok(())
}
