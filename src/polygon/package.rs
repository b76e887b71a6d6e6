// src/polygon/package.rs

//! The Polygon package parser.
//!
//! Reads `problem.xml` and the statement properties of an unpacked package
//! and produces a [`Problem`], or fails on the first structural defect.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use roxmltree::{Document, Node};

use crate::error::{AppError, Result};
use crate::mapping;
use crate::markup;
use crate::models::{Checker, Interactor, Problem, Sample, Solution, Statement, TestCase};
use crate::polygon::statement::{scan_images, StatementProperties};
use crate::polygon::STATEMENT_LANGUAGE;
use crate::report::Reporter;

fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(name))
}

fn require_child<'a, 'input>(
    path: &Path,
    node: Node<'a, 'input>,
    name: &str,
) -> Result<Node<'a, 'input>> {
    find_child(node, name).ok_or_else(|| {
        AppError::package(
            path,
            format!("element <{}> has no <{name}> child", node.tag_name().name()),
        )
    })
}

fn require_attr<'a>(path: &Path, node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        AppError::package(
            path,
            format!(
                "element <{}> is missing the '{name}' attribute",
                node.tag_name().name()
            ),
        )
    })
}

fn element_text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().map(str::trim).unwrap_or("")
}

/// Expand a printf-style `%d`/`%0Nd` test path pattern.
fn format_pattern(pattern: &str, n: usize) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"%(0?)(\d*)d").unwrap());
    match re.captures(pattern) {
        Some(caps) => {
            let zero_padded = !caps[1].is_empty();
            let width: usize = caps[2].parse().unwrap_or(0);
            let value = if zero_padded {
                format!("{n:0width$}")
            } else {
                format!("{n:width$}")
            };
            re.replace(pattern, value.as_str()).into_owned()
        }
        None => pattern.to_string(),
    }
}

fn read_test_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| AppError::package(path, format!("cannot read test file: {e}")))
}

/// Parse an unpacked Polygon package directory into a [`Problem`].
pub fn parse_package(package_dir: &Path, reporter: &Reporter) -> Result<Problem> {
    let xml_path = package_dir.join("problem.xml");
    if !xml_path.is_file() {
        return Err(AppError::package(
            package_dir,
            "not a Polygon package: problem.xml is missing",
        ));
    }
    reporter.debug(&format!("Parsing '{}'.", xml_path.display()));

    let xml_text = fs::read_to_string(&xml_path)?;
    let doc = Document::parse(&xml_text)?;
    let root = doc.root_element();

    let name = require_attr(&xml_path, root, "short-name")?.to_string();
    let names = require_child(&xml_path, root, "names")?;
    let title = require_attr(&xml_path, require_child(&xml_path, names, "name")?, "value")?
        .to_string();

    let judging = require_child(&xml_path, root, "judging")?;

    // Limits come from the testset literally named "tests".
    let mut limits = None;
    for testset in judging
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("testset"))
    {
        if require_attr(&xml_path, testset, "name")? != "tests" {
            continue;
        }
        let tl_text = element_text(require_child(&xml_path, testset, "time-limit")?);
        let ml_text = element_text(require_child(&xml_path, testset, "memory-limit")?);
        let time_ms: f64 = tl_text.parse().map_err(|_| {
            AppError::package(&xml_path, format!("time limit '{tl_text}' is not a number"))
        })?;
        let memory_bytes: u64 = ml_text.parse().map_err(|_| {
            AppError::package(&xml_path, format!("memory limit '{ml_text}' is not a number"))
        })?;
        // Polygon stores the limit in bytes; DOMjudge wants MiB. The
        // division is exact because Polygon itself edits the value in MiB.
        limits = Some((time_ms / 1000.0, memory_bytes >> 20));
    }
    let Some((time_limit, memory_limit)) = limits else {
        return Err(AppError::package(
            &xml_path,
            "a testset named 'tests' is required",
        ));
    };

    // Statement text, sample explanations and credits.
    let statement_dir = package_dir
        .join("statements")
        .join(STATEMENT_LANGUAGE);
    let props = StatementProperties::load(&statement_dir)?;
    let explanations = markup::extract_regions(props.notes.as_deref().unwrap_or(""))?;
    let author = markup::extract_tagged_line(&props.tutorial, "%AUTHOR:", reporter);
    let preparation = markup::extract_tagged_line(&props.tutorial, "%PREPARATION:", reporter);

    let samples: Vec<Sample> = props
        .sample_tests
        .iter()
        .enumerate()
        .map(|(i, sample)| Sample {
            input: statement_dir.join(&sample.input_file),
            answer: statement_dir.join(&sample.output_file),
            explanation: explanations.get(&(i + 1)).cloned(),
        })
        .collect();
    for index in explanations.keys().filter(|k| **k > samples.len()) {
        reporter.warn(&format!(
            "Explanation for sample {index} does not match any sample."
        ));
    }

    let images = scan_images(&statement_dir)?;

    // Tests. "pretests" contributes samples only; the secret sequence
    // comes from "tests". Sequence numbers are global and contiguous.
    let sample_prefix = format!("statements/{STATEMENT_LANGUAGE}/example.");
    let mut tests: Vec<TestCase> = Vec::new();
    for testset in judging
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("testset"))
    {
        let set_name = require_attr(&xml_path, testset, "name")?;
        if set_name != "tests" && set_name != "pretests" {
            reporter.warn(&format!(
                "Testset '{set_name}' ignored: only the testset 'tests' is exported \
                 in DOMjudge (apart from the samples)."
            ));
            continue;
        }

        let input_pattern =
            element_text(require_child(&xml_path, testset, "input-path-pattern")?).to_string();
        let answer_pattern =
            element_text(require_child(&xml_path, testset, "answer-path-pattern")?).to_string();
        let sample_input_pattern = input_pattern.replacen("tests/", &sample_prefix, 1);
        let sample_answer_pattern = answer_pattern.replacen("tests/", &sample_prefix, 1);

        let mut local = 0usize;
        for test in testset.descendants().filter(|n| n.has_tag_name("test")) {
            local += 1;
            let is_sample = test.has_attribute("sample");
            let input = package_dir.join(format_pattern(&input_pattern, local));

            if is_sample {
                // DOMjudge shows contestants the exact evaluated input, so
                // the published sample must be byte-identical to the test.
                let shown = package_dir.join(format_pattern(&sample_input_pattern, local));
                if read_test_file(&input)? != read_test_file(&shown)? {
                    return Err(AppError::package(
                        &input,
                        "custom sample inputs are not supported (the statement publishes \
                         a different input than the evaluated one)",
                    ));
                }
            }

            if set_name == "tests" || is_sample {
                let answer = if is_sample {
                    package_dir.join(format_pattern(&sample_answer_pattern, local))
                } else {
                    package_dir.join(format_pattern(&answer_pattern, local))
                };
                tests.push(TestCase {
                    num: tests.len() + 1,
                    input,
                    answer,
                    is_sample,
                });
            }
        }
    }
    if tests.is_empty() {
        return Err(AppError::package(&xml_path, "the package contains no tests"));
    }

    // Checker.
    let assets = require_child(&xml_path, root, "assets")?;
    let checker_node = require_child(&xml_path, assets, "checker")?;
    let checker_source =
        require_attr(&xml_path, require_child(&xml_path, checker_node, "source")?, "path")?;
    if !checker_source.ends_with(".cpp") && !checker_source.ends_with(".cc") {
        return Err(AppError::package(
            checker_source,
            "only C++ checkers (using testlib) are supported",
        ));
    }
    let standard = match checker_node.attribute("name") {
        Some(declared) => {
            let ident = mapping::parse_standard_checker(declared).ok_or_else(|| {
                AppError::package(
                    &xml_path,
                    format!("checker name '{declared}' does not match the std::<name>.cpp pattern"),
                )
            })?;
            if mapping::checker_flags(ident).is_none() {
                return Err(AppError::package(
                    &xml_path,
                    format!("unknown standard checker '{ident}'"),
                ));
            }
            Some(ident.to_string())
        }
        None => None,
    };
    let checker = Checker {
        standard,
        source: package_dir.join(checker_source),
    };

    // Interactor.
    let interactor = match find_child(assets, "interactor") {
        Some(node) => {
            reporter.debug("The problem is interactive.");
            let source =
                require_attr(&xml_path, require_child(&xml_path, node, "source")?, "path")?;
            Some(Interactor {
                source: package_dir.join(source),
            })
        }
        None => None,
    };

    // Solutions, verdict tags carried verbatim; mapping happens at emission.
    let mut solutions = Vec::new();
    if let Some(solutions_node) = find_child(assets, "solutions") {
        for solution in solutions_node
            .children()
            .filter(|n| n.is_element() && n.has_tag_name("solution"))
        {
            let tag = require_attr(&xml_path, solution, "tag")?;
            let source = require_attr(
                &xml_path,
                require_child(&xml_path, solution, "source")?,
                "path",
            )?;
            solutions.push(Solution {
                source: package_dir.join(source),
                verdict: tag.to_string(),
            });
        }
    }

    Ok(Problem {
        name,
        title,
        label: String::new(),
        color: String::new(),
        time_limit,
        memory_limit,
        statement: Statement {
            legend: props.legend,
            input: props.input,
            output: props.output,
            interaction: props.interaction,
            tutorial: props.tutorial,
            author,
            preparation,
            samples,
            images,
        },
        tests,
        checker,
        interactor,
        solutions,
    })
}
