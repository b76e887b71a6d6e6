// tests/common/mod.rs

//! Shared fixtures: a synthetic Polygon package builder and fake
//! collaborators for the pipeline.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use pol2dom::api::{PackageRef, PackageSource, PublishTarget};
use pol2dom::error::{AppError, Result};
use pol2dom::tex::Renderer;

/// Builder for an on-disk Polygon package with tweakable defects.
pub struct PolygonPackageBuilder {
    pub name: String,
    pub title: String,
    pub testset_name: String,
    pub time_limit_ms: u64,
    pub memory_limit_bytes: u64,
    /// One entry per test of the main testset; `true` marks a sample.
    pub tests: Vec<bool>,
    pub with_extra_testset: bool,
    pub checker_name: Option<String>,
    pub checker_source: String,
    pub interactive: bool,
    /// (source file name, verdict tag)
    pub solutions: Vec<(String, String)>,
    pub notes: String,
    pub tutorial: String,
    /// Publish a statement sample input different from the evaluated one.
    pub sample_mismatch: bool,
}

impl Default for PolygonPackageBuilder {
    fn default() -> Self {
        Self {
            name: "sum".to_string(),
            title: "A Plus B".to_string(),
            testset_name: "tests".to_string(),
            time_limit_ms: 1000,
            memory_limit_bytes: 256 * 1024 * 1024,
            tests: vec![true, false, false],
            with_extra_testset: false,
            checker_name: Some("std::rcmp6.cpp".to_string()),
            checker_source: "check.cpp".to_string(),
            interactive: false,
            solutions: vec![
                ("solutions/ok.cpp".to_string(), "main".to_string()),
                ("solutions/slow.cpp".to_string(), "time-limit-exceeded".to_string()),
            ],
            notes: "%BEGIN 1\nthe first sample is the smallest case.\n%END\n".to_string(),
            tutorial: "%AUTHOR: Jane Doe\n%PREPARATION: John Smith\nSum the numbers.\n"
                .to_string(),
            sample_mismatch: false,
        }
    }
}

impl PolygonPackageBuilder {
    fn test_input(&self, i: usize) -> String {
        format!("{i} {}\n", i + 1)
    }

    fn test_answer(&self, i: usize) -> String {
        format!("{}\n", 2 * i + 1)
    }

    /// Write the package below `root`.
    pub fn write(&self, root: &Path) {
        let statements = root.join("statements/english");
        std::fs::create_dir_all(root.join("tests")).unwrap();
        std::fs::create_dir_all(&statements).unwrap();
        std::fs::create_dir_all(root.join("solutions")).unwrap();

        // Tests plus the statement copies of the samples.
        let mut sample_entries = Vec::new();
        for (index, is_sample) in self.tests.iter().enumerate() {
            let i = index + 1;
            std::fs::write(root.join(format!("tests/{i:02}")), self.test_input(i)).unwrap();
            std::fs::write(root.join(format!("tests/{i:02}.a")), self.test_answer(i)).unwrap();
            if *is_sample {
                let shown_input = if self.sample_mismatch {
                    format!("{}tampered\n", self.test_input(i))
                } else {
                    self.test_input(i)
                };
                std::fs::write(statements.join(format!("example.{i:02}")), shown_input).unwrap();
                std::fs::write(
                    statements.join(format!("example.{i:02}.a")),
                    self.test_answer(i),
                )
                .unwrap();
                sample_entries.push(serde_json::json!({
                    "inputFile": format!("example.{i:02}"),
                    "outputFile": format!("example.{i:02}.a"),
                }));
            }
        }

        let properties = serde_json::json!({
            "legend": "Given two integers, print their sum.",
            "input": "Two integers.",
            "output": "One integer.",
            "notes": self.notes,
            "tutorial": self.tutorial,
            "sampleTests": sample_entries,
        });
        std::fs::write(
            statements.join("problem-properties.json"),
            serde_json::to_string_pretty(&properties).unwrap(),
        )
        .unwrap();

        // Checker, interactor, solutions.
        std::fs::write(root.join(&self.checker_source), "// checker\n").unwrap();
        if self.interactive {
            std::fs::write(root.join("interactor.cpp"), "// interactor\n").unwrap();
        }
        for (source, _) in &self.solutions {
            std::fs::write(root.join(source), "// solution\n").unwrap();
        }

        std::fs::write(root.join("problem.xml"), self.problem_xml()).unwrap();
    }

    fn problem_xml(&self) -> String {
        let mut tests_xml = String::new();
        for is_sample in &self.tests {
            if *is_sample {
                tests_xml.push_str("        <test method=\"manual\" sample=\"true\"/>\n");
            } else {
                tests_xml.push_str("        <test method=\"manual\"/>\n");
            }
        }

        let extra_testset = if self.with_extra_testset {
            "    <testset name=\"statements\">\n      \
             <input-path-pattern>statements/%02d</input-path-pattern>\n      \
             <answer-path-pattern>statements/%02d.a</answer-path-pattern>\n      \
             <tests><test method=\"manual\"/></tests>\n    </testset>\n"
                .to_string()
        } else {
            String::new()
        };

        let checker_name_attr = match &self.checker_name {
            Some(name) => format!(" name=\"{name}\""),
            None => String::new(),
        };

        let interactor_xml = if self.interactive {
            "      <interactor>\n        <source path=\"interactor.cpp\" type=\"cpp.g++17\"/>\n      </interactor>\n"
                .to_string()
        } else {
            String::new()
        };

        let mut solutions_xml = String::new();
        for (source, tag) in &self.solutions {
            solutions_xml.push_str(&format!(
                "        <solution tag=\"{tag}\">\n          <source path=\"{source}\" type=\"cpp.g++17\"/>\n        </solution>\n"
            ));
        }

        format!(
            r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<problem short-name="{name}" revision="1">
  <names>
    <name language="english" value="{title}"/>
  </names>
  <judging>
    <testset name="{testset}">
      <time-limit>{tl}</time-limit>
      <memory-limit>{ml}</memory-limit>
      <test-count>{count}</test-count>
      <input-path-pattern>tests/%02d</input-path-pattern>
      <answer-path-pattern>tests/%02d.a</answer-path-pattern>
      <tests>
{tests}      </tests>
    </testset>
{extra}  </judging>
  <assets>
    <checker{checker_name} type="testlib">
      <source path="{checker_source}" type="cpp.g++17"/>
    </checker>
{interactor}    <solutions>
{solutions}    </solutions>
  </assets>
</problem>
"#,
            name = self.name,
            title = self.title,
            testset = self.testset_name,
            tl = self.time_limit_ms,
            ml = self.memory_limit_bytes,
            count = self.tests.len(),
            tests = tests_xml,
            extra = extra_testset,
            checker_name = checker_name_attr,
            checker_source = self.checker_source,
            interactor = interactor_xml,
            solutions = solutions_xml,
        )
    }
}

/// Renderer fake producing a fixed PDF and counting invocations.
#[derive(Default)]
pub struct FakeRenderer {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn render(&self, _tex_file: &Path) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(b"%PDF-1.4 fake".to_vec())
    }
}

/// Package source fake serving one fixed revision.
pub struct FakeSource {
    pub package: Option<PackageRef>,
    pub bytes: Vec<u8>,
    pub downloads: AtomicUsize,
}

impl FakeSource {
    pub fn new(revision: i64, bytes: Vec<u8>) -> Self {
        Self {
            package: Some(PackageRef {
                revision,
                package_id: revision * 10,
            }),
            bytes,
            downloads: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            package: None,
            bytes: Vec::new(),
            downloads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PackageSource for FakeSource {
    async fn latest_package(&self, _problem_id: u64) -> Result<Option<PackageRef>> {
        Ok(self.package)
    }

    async fn download(&self, _problem_id: u64, _package: PackageRef) -> Result<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

/// Publish target fake recording registrations and uploads.
#[derive(Default)]
pub struct FakeTarget {
    pub registered: Mutex<Vec<String>>,
    pub uploads: AtomicUsize,
    pub fail_upload: bool,
}

#[async_trait]
impl PublishTarget for FakeTarget {
    async fn register(&self, label: &str, name: &str) -> Result<String> {
        let id = format!("{label}-{name}-FAKEID");
        self.registered.lock().unwrap().push(id.clone());
        Ok(id)
    }

    async fn upload(&self, _remote_id: &str, _package: Vec<u8>) -> Result<()> {
        if self.fail_upload {
            return Err(AppError::api("domjudge", "upload rejected"));
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
