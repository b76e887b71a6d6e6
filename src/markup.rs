// src/markup.rs

//! Extraction of delimited regions from free-form statement notes.
//!
//! Polygon statements carry per-sample explanations as line-delimited
//! regions (`%BEGIN <n>` ... `%END`) inside the notes field, and
//! author/preparer credits as tagged lines inside the tutorial.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AppError, Result};
use crate::report::Reporter;

fn begin_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^%BEGIN (\d+)$").unwrap())
}

/// Capitalize the first grapheme of a string.
fn capitalize(text: &str) -> String {
    let mut graphemes = text.graphemes(true);
    match graphemes.next() {
        Some(first) => first.to_uppercase() + graphemes.as_str(),
        None => String::new(),
    }
}

/// Extract all `%BEGIN <n>` ... `%END` regions from the given text.
///
/// The returned map is keyed by the integer carried on the begin marker.
/// Region bodies are trimmed and the first grapheme is capitalized.
/// Nested or unbalanced markers are fatal.
pub fn extract_regions(notes: &str) -> Result<BTreeMap<usize, String>> {
    let mut regions = BTreeMap::new();
    let mut open_key: Option<usize> = None;
    let mut body = String::new();

    for line in notes.lines() {
        let trimmed = line.trim();
        if let Some(caps) = begin_marker().captures(trimmed) {
            if open_key.is_some() {
                return Err(AppError::markup(format!(
                    "unterminated region: '%BEGIN {}' opened before the previous region was closed",
                    &caps[1]
                )));
            }
            let key: usize = caps[1]
                .parse()
                .map_err(|_| AppError::markup(format!("region key '{}' is not an integer", &caps[1])))?;
            open_key = Some(key);
        } else if trimmed == "%END" {
            let Some(key) = open_key.take() else {
                return Err(AppError::markup(
                    "unmatched end: '%END' does not close any '%BEGIN' region",
                ));
            };
            if regions.contains_key(&key) {
                return Err(AppError::markup(format!(
                    "region {key} is defined more than once"
                )));
            }
            regions.insert(key, capitalize(body.trim()));
            body.clear();
        } else if open_key.is_some() {
            body.push_str(line);
            body.push('\n');
        }
    }

    if let Some(key) = open_key {
        return Err(AppError::markup(format!(
            "missing end: region {key} is not closed by an '%END' line"
        )));
    }
    Ok(regions)
}

/// Extract the text of a `<tag>` line (e.g. `%AUTHOR: Jane Doe`).
///
/// A missing tag degrades to an empty string with a warning; multiple
/// occurrences warn and keep the last one.
pub fn extract_tagged_line(text: &str, tag: &str, reporter: &Reporter) -> String {
    let matches: Vec<&str> = text
        .lines()
        .filter_map(|line| line.trim().strip_prefix(tag))
        .map(str::trim)
        .collect();

    match matches.as_slice() {
        [] => {
            reporter.warn(&format!("No '{tag}' line found in the tutorial."));
            String::new()
        }
        [only] => only.to_string(),
        [.., last] => {
            reporter.warn(&format!(
                "Found {} '{tag}' lines in the tutorial; keeping the last one.",
                matches.len()
            ));
            last.to_string()
        }
    }
}
