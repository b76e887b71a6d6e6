// tests/convert.rs

//! End-to-end checks of the Polygon parser and the DOMjudge emitter over
//! synthetic packages.

mod common;

use std::collections::BTreeMap;

use common::{FakeRenderer, PolygonPackageBuilder};
use pol2dom::domjudge::{emit_package, Manifest, Validation};
use pol2dom::polygon::parse_package;
use pol2dom::report::Reporter;

fn reporter() -> Reporter {
    Reporter::default()
}

#[test]
fn parsing_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    PolygonPackageBuilder::default().write(dir.path());

    let first = parse_package(dir.path(), &reporter()).unwrap();
    let second = parse_package(dir.path(), &reporter()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parses_metadata_and_limits() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.time_limit_ms = 1500;
    builder.memory_limit_bytes = 512 * 1024 * 1024;
    builder.write(dir.path());

    let problem = parse_package(dir.path(), &reporter()).unwrap();
    assert_eq!(problem.name, "sum");
    assert_eq!(problem.title, "A Plus B");
    assert_eq!(problem.time_limit, 1.5);
    assert_eq!(problem.memory_limit, 512);
    assert_eq!(problem.checker.standard.as_deref(), Some("rcmp6"));
    assert!(problem.interactor.is_none());
}

#[test]
fn test_sequence_is_contiguous_from_one() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.tests = vec![true, true, false, false, false];
    builder.notes.push_str("%BEGIN 2\nsecond explanation\n%END\n");
    builder.write(dir.path());

    let problem = parse_package(dir.path(), &reporter()).unwrap();
    let nums: Vec<usize> = problem.tests.iter().map(|t| t.num).collect();
    assert_eq!(nums, vec![1, 2, 3, 4, 5]);
    let samples: Vec<bool> = problem.tests.iter().map(|t| t.is_sample).collect();
    assert_eq!(samples, vec![true, true, false, false, false]);
}

#[test]
fn extra_testset_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.with_extra_testset = true;
    builder.write(dir.path());

    let problem = parse_package(dir.path(), &reporter()).unwrap();
    // Only the three tests of the "tests" testset survive.
    assert_eq!(problem.tests.len(), 3);
}

#[test]
fn statement_explanations_and_credits() {
    let dir = tempfile::tempdir().unwrap();
    PolygonPackageBuilder::default().write(dir.path());

    let problem = parse_package(dir.path(), &reporter()).unwrap();
    assert_eq!(problem.statement.samples.len(), 1);
    assert_eq!(
        problem.statement.samples[0].explanation.as_deref(),
        Some("The first sample is the smallest case.")
    );
    assert_eq!(problem.statement.author, "Jane Doe");
    assert_eq!(problem.statement.preparation, "John Smith");
}

#[test]
fn missing_explanation_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.notes = String::new();
    builder.write(dir.path());

    let problem = parse_package(dir.path(), &reporter()).unwrap();
    assert!(problem.statement.samples[0].explanation.is_none());
}

#[test]
fn sample_input_mismatch_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.sample_mismatch = true;
    builder.write(dir.path());

    let err = parse_package(dir.path(), &reporter()).unwrap_err();
    assert!(err.to_string().contains("custom sample inputs"));
}

#[test]
fn missing_tests_testset_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.testset_name = "maintests".to_string();
    builder.write(dir.path());

    let err = parse_package(dir.path(), &reporter()).unwrap_err();
    assert!(err.to_string().contains("testset named 'tests'"));
}

#[test]
fn zero_tests_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.tests = vec![];
    builder.notes = String::new();
    builder.write(dir.path());

    let err = parse_package(dir.path(), &reporter()).unwrap_err();
    assert!(err.to_string().contains("no tests"));
}

#[test]
fn non_cpp_checker_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.checker_name = None;
    builder.checker_source = "check.java".to_string();
    builder.write(dir.path());

    let err = parse_package(dir.path(), &reporter()).unwrap_err();
    assert!(err.to_string().contains("C++ checkers"));
}

#[test]
fn unknown_standard_checker_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.checker_name = Some("std::mycmp.cpp".to_string());
    builder.write(dir.path());

    let err = parse_package(dir.path(), &reporter()).unwrap_err();
    assert!(err.to_string().contains("unknown standard checker"));
}

#[test]
fn malformed_checker_name_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.checker_name = Some("wcmp.cpp".to_string());
    builder.write(dir.path());

    assert!(parse_package(dir.path(), &reporter()).is_err());
}

#[test]
fn interactive_package_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.interactive = true;
    builder.write(dir.path());

    let problem = parse_package(dir.path(), &reporter()).unwrap();
    assert!(problem.is_interactive());
}

// -------------------------------------------------------------------------
// Emitter
// -------------------------------------------------------------------------

async fn convert(
    builder: &PolygonPackageBuilder,
    overrides: &BTreeMap<String, String>,
) -> (tempfile::TempDir, Validation) {
    let package = tempfile::tempdir().unwrap();
    builder.write(package.path());
    let mut problem = parse_package(package.path(), &reporter()).unwrap();

    let mut entry = pol2dom::models::ProblemEntry::new(&problem.name);
    entry.label = Some("A".to_string());
    entry.color = Some("#FF0000".to_string());
    problem.apply_entry(&entry, &reporter()).unwrap();

    let work = tempfile::tempdir().unwrap();
    let dest = work.path().join("package");
    std::fs::create_dir(&dest).unwrap();
    let testlib = work.path().join("testlib.h");
    std::fs::write(&testlib, "// patched testlib\n").unwrap();

    let renderer = FakeRenderer::default();
    let validation = emit_package(
        &problem,
        &dest,
        &testlib,
        "Test Contest",
        overrides,
        &renderer,
        false,
        &reporter(),
    )
    .await
    .unwrap();
    (work, validation)
}

#[tokio::test]
async fn tolerance_checker_scenario() {
    // Three tests, one sample, standard checker rcmp6.
    let builder = PolygonPackageBuilder::default();
    let (work, validation) = convert(&builder, &BTreeMap::new()).await;
    let dest = work.path().join("package");

    assert_eq!(validation, Validation::Default);

    let manifest: Manifest =
        serde_yaml::from_str(&std::fs::read_to_string(dest.join("problem.yaml")).unwrap())
            .unwrap();
    assert_eq!(manifest.validation, "default");
    assert_eq!(manifest.validator_flags.as_deref(), Some("float_tolerance 1e-6"));
    assert_eq!(manifest.limits.memory, 256);

    let sample_files = std::fs::read_dir(dest.join("data/sample")).unwrap().count();
    let secret_files = std::fs::read_dir(dest.join("data/secret")).unwrap().count();
    assert_eq!(sample_files, 2); // 1.in + 1.ans
    assert_eq!(secret_files, 4); // 2.in 2.ans 3.in 3.ans

    // No validator directory for default validation.
    assert!(!dest.join("output_validators").exists());

    let ini = std::fs::read_to_string(dest.join("domjudge-problem.ini")).unwrap();
    assert!(ini.contains("short-name = sum"));
    assert!(ini.contains("timelimit = 1"));
    assert!(ini.contains("color = FF0000"));

    assert_eq!(std::fs::read(dest.join("problem.pdf")).unwrap(), b"%PDF-1.4 fake");
}

#[tokio::test]
async fn quote_characters_are_normalized_in_ini() {
    let mut builder = PolygonPackageBuilder::default();
    builder.title = "Alice's Garden".to_string();
    let (work, _) = convert(&builder, &BTreeMap::new()).await;
    let ini =
        std::fs::read_to_string(work.path().join("package/domjudge-problem.ini")).unwrap();
    assert!(ini.contains("name = Alice`s Garden"));
}

#[tokio::test]
async fn solutions_land_in_their_buckets() {
    let builder = PolygonPackageBuilder::default();
    let (work, _) = convert(&builder, &BTreeMap::new()).await;
    let dest = work.path().join("package");

    assert!(dest.join("submissions/accepted/ok.cpp").is_file());
    assert!(dest.join("submissions/time_limit_exceeded/slow.cpp").is_file());
}

#[tokio::test]
async fn excluded_verdicts_create_no_submissions() {
    let mut builder = PolygonPackageBuilder::default();
    builder.solutions = vec![
        ("solutions/a.cpp".to_string(), "do-not-run".to_string()),
        ("solutions/b.cpp".to_string(), "rejected".to_string()),
    ];
    let (work, _) = convert(&builder, &BTreeMap::new()).await;
    assert!(!work.path().join("package/submissions").exists());
}

#[tokio::test]
async fn verdict_override_redirects_a_bucket() {
    let mut builder = PolygonPackageBuilder::default();
    builder.solutions = vec![("solutions/r.cpp".to_string(), "rejected".to_string())];
    let mut overrides = BTreeMap::new();
    overrides.insert("rejected".to_string(), "run_time_error".to_string());
    let (work, _) = convert(&builder, &overrides).await;
    assert!(work
        .path()
        .join("package/submissions/run_time_error/r.cpp")
        .is_file());
}

#[tokio::test]
async fn interactive_problem_emits_interactor_validator() {
    let mut builder = PolygonPackageBuilder::default();
    builder.interactive = true;
    let (work, validation) = convert(&builder, &BTreeMap::new()).await;
    let dest = work.path().join("package");

    assert_eq!(validation, Validation::CustomInteractive);
    assert!(dest.join("output_validators/interactor.cpp").is_file());
    assert!(dest.join("output_validators/testlib.h").is_file());

    let manifest: Manifest =
        serde_yaml::from_str(&std::fs::read_to_string(dest.join("problem.yaml")).unwrap())
            .unwrap();
    assert_eq!(manifest.validation, "custom interactive");
    assert!(manifest.validator_flags.is_none());
}

#[tokio::test]
async fn custom_checker_emits_checker_validator() {
    let mut builder = PolygonPackageBuilder::default();
    builder.checker_name = None;
    let (work, validation) = convert(&builder, &BTreeMap::new()).await;
    let dest = work.path().join("package");

    assert_eq!(validation, Validation::Custom);
    assert!(dest.join("output_validators/checker.cpp").is_file());

    let manifest: Manifest =
        serde_yaml::from_str(&std::fs::read_to_string(dest.join("problem.yaml")).unwrap())
            .unwrap();
    assert_eq!(manifest.validation, "custom");
}

#[tokio::test]
async fn custom_checker_without_testlib_is_fatal() {
    let package = tempfile::tempdir().unwrap();
    let mut builder = PolygonPackageBuilder::default();
    builder.checker_name = None;
    builder.write(package.path());
    let mut problem = parse_package(package.path(), &reporter()).unwrap();
    let entry = pol2dom::models::ProblemEntry::new(&problem.name);
    problem.apply_entry(&entry, &reporter()).unwrap();

    let work = tempfile::tempdir().unwrap();
    let dest = work.path().join("package");
    std::fs::create_dir(&dest).unwrap();
    let missing_testlib = work.path().join("testlib.h");

    let renderer = FakeRenderer::default();
    let err = emit_package(
        &problem,
        &dest,
        &missing_testlib,
        "Test Contest",
        &BTreeMap::new(),
        &renderer,
        false,
        &reporter(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("testlib.h not found"));
}
