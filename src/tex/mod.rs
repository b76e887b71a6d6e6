// src/tex/mod.rs

//! Statement and editorial document generation.
//!
//! Statement bodies are produced by flat placeholder substitution over the
//! built-in templates, then wrapped in the document template and handed to
//! the [`Renderer`]. Samples and images are staged next to the compiled
//! document; images get per-problem-unique names so that the statements of
//! a whole contest can be compiled into one combined document without
//! collisions.

mod renderer;
mod templates;

use std::fs;
use std::path::{Path, PathBuf};

pub use renderer::{PdfLatex, Renderer};

use crate::error::{AppError, Result};
use crate::models::{ContestConfig, ContestDirs, Problem};
use crate::report::Reporter;

/// Fill `??KEY??` placeholders in a single pass. Flat, non-recursive;
/// placeholders without a replacement are left verbatim.
pub fn fill_template(template: &str, replacements: &[(&str, String)]) -> String {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    let re = RE.get_or_init(|| regex::Regex::new(r"\?\?([A-Z]+)\?\?").unwrap());
    re.replace_all(template, |caps: &regex::Captures| {
        replacements
            .iter()
            .find(|(key, _)| *key == &caps[1])
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// Shortest display form of the time limit (`1.5`, `2`).
fn format_time_limit(seconds: f64) -> String {
    format!("{seconds}")
}

/// Rewrite statement image references to per-problem-unique names and copy
/// the image bytes into `<tex_dir>/images/`.
fn stage_images(problem: &Problem, mut body: String, tex_dir: &Path) -> Result<String> {
    if problem.statement.images.is_empty() {
        return Ok(body);
    }
    let images_dir = tex_dir.join("images");
    fs::create_dir_all(&images_dir)?;
    for image in &problem.statement.images {
        let unique = format!("{}-{}", problem.name, image.name);
        body = body.replace(&image.name, &format!("images/{unique}"));
        fs::copy(&image.path, images_dir.join(&unique))?;
    }
    Ok(body)
}

/// Produce the statement body of a problem.
///
/// Samples are copied to `<tex_dir>/samples/<name>-<i>.in|.ans` and
/// referenced with absolute paths, so the body compiles from any document
/// that inputs it.
pub fn statement_tex(problem: &Problem, tex_dir: &Path) -> Result<String> {
    if problem.statement.samples.is_empty() {
        return Err(AppError::render(format!(
            "problem '{}' has no samples to show in the statement",
            problem.name
        )));
    }

    let samples_dir = tex_dir.join("samples");
    fs::create_dir_all(&samples_dir)?;

    let mut samples_tex = String::new();
    for (i, sample) in problem.statement.samples.iter().enumerate() {
        let base = samples_dir.join(format!("{}-{}", problem.name, i + 1));
        fs::copy(&sample.input, base.with_extension("in"))?;
        fs::copy(&sample.answer, base.with_extension("ans"))?;
        samples_tex.push_str(&format!("\\sample{{{}}}\n", base.display()));
        if let Some(explanation) = &sample.explanation {
            samples_tex.push_str(&format!("\\sampleexplanation{{{explanation}}}\n"));
        }
    }

    let interaction = match &problem.statement.interaction {
        Some(body) => fill_template(
            templates::INTERACTION_SECTION,
            &[("INTERACTIONBODY", body.clone())],
        ),
        None => String::new(),
    };

    let body = fill_template(
        templates::STATEMENT_TEMPLATE,
        &[
            ("LABEL", problem.label.clone()),
            ("COLOR", problem.color.clone()),
            ("TITLE", problem.title.clone()),
            ("TIMELIMIT", format_time_limit(problem.time_limit)),
            ("MEMORYLIMIT", problem.memory_limit.to_string()),
            ("LEGEND", problem.statement.legend.clone()),
            ("INPUT", problem.statement.input.clone()),
            ("OUTPUT", problem.statement.output.clone()),
            ("INTERACTION", interaction),
            ("SAMPLES", samples_tex),
        ],
    );
    stage_images(problem, body, tex_dir)
}

/// Produce the editorial body of a problem.
pub fn solution_tex(problem: &Problem, tex_dir: &Path) -> Result<String> {
    let body = fill_template(
        templates::SOLUTION_TEMPLATE,
        &[
            ("LABEL", problem.label.clone()),
            ("COLOR", problem.color.clone()),
            ("TITLE", problem.title.clone()),
            ("AUTHOR", problem.statement.author.clone()),
            ("PREPARATION", problem.statement.preparation.clone()),
            ("SOLUTION", problem.statement.tutorial.clone()),
        ],
    );
    stage_images(problem, body, tex_dir)
}

/// Wrap a document body in the outer template, write it to
/// `<work_dir>/<job_name>.tex` and render it.
pub async fn compile_document(
    body: &str,
    contest_name: &str,
    work_dir: &Path,
    job_name: &str,
    renderer: &dyn Renderer,
) -> Result<Vec<u8>> {
    let document = fill_template(
        templates::DOCUMENT_TEMPLATE,
        &[
            ("CONTESTNAME", contest_name.to_string()),
            ("DOCUMENTCONTENT", body.to_string()),
        ],
    );
    let tex_path = work_dir.join(format!("{job_name}.tex"));
    fs::write(&tex_path, document)?;
    renderer.render(&tex_path).await
}

/// Problems sorted by label, the order they appear in combined documents.
fn sorted_names(config: &ContestConfig) -> Vec<String> {
    let mut labeled: Vec<(String, String)> = config
        .problems
        .iter()
        .map(|p| (p.label.clone().unwrap_or_default(), p.name.clone()))
        .collect();
    labeled.sort();
    labeled.into_iter().map(|(_, name)| name).collect()
}

fn booklet_body(
    config: &ContestConfig,
    dirs: &ContestDirs,
    suffix: &str,
    front_page: Option<&PathBuf>,
    separator: &str,
    reporter: &Reporter,
) -> String {
    let mut body = String::new();
    if let Some(front) = front_page {
        body.push_str(&format!("\\includepdf{{{}}}\n{separator}\n", front.display()));
    }
    for name in sorted_names(config) {
        let content = dirs.tex_dir().join(format!("{name}-{suffix}.tex"));
        if !content.is_file() {
            reporter.warn(&format!(
                "The tex source '{}' does not exist; problem '{name}' is left out.",
                content.display()
            ));
            continue;
        }
        body.push_str(&format!("\\input{{{}}}\n{separator}\n", content.display()));
    }
    body
}

/// Generate `<tex_dir>/problemset.pdf` with the statements of the whole
/// contest, label-sorted.
pub async fn generate_problemset(
    config: &ContestConfig,
    dirs: &ContestDirs,
    renderer: &dyn Renderer,
    reporter: &Reporter,
) -> Result<PathBuf> {
    let body = booklet_body(
        config,
        dirs,
        "statement",
        config.front_page_problemset.as_ref(),
        "\\insertblankpageifnecessary",
        reporter,
    );
    let tex_dir = dirs.tex_dir();
    fs::create_dir_all(&tex_dir)?;
    // Compiled twice so \insertblankpageifnecessary sees settled page
    // numbers.
    let mut pdf = Vec::new();
    for _ in 0..2 {
        pdf = compile_document(&body, &config.contest_name, &tex_dir, "problemset", renderer)
            .await?;
    }
    let out = tex_dir.join("problemset.pdf");
    fs::write(&out, pdf)?;
    Ok(out)
}

/// Generate `<tex_dir>/solutions.pdf`, the contest editorial.
pub async fn generate_solutions(
    config: &ContestConfig,
    dirs: &ContestDirs,
    renderer: &dyn Renderer,
    reporter: &Reporter,
) -> Result<PathBuf> {
    let body = booklet_body(
        config,
        dirs,
        "solution",
        config.front_page_solutions.as_ref(),
        "\\clearpage",
        reporter,
    );
    let tex_dir = dirs.tex_dir();
    fs::create_dir_all(&tex_dir)?;
    let pdf = compile_document(&body, &config.contest_name, &tex_dir, "solutions", renderer)
        .await?;
    let out = tex_dir.join("solutions.pdf");
    fs::write(&out, pdf)?;
    Ok(out)
}
