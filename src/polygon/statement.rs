// src/polygon/statement.rs

//! Statement properties and asset detection.

use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::Image;

/// Typed view of `problem-properties.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementProperties {
    #[serde(default)]
    pub legend: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub interaction: Option<String>,
    /// Free-form notes; sample explanations live here as marked regions.
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tutorial: String,
    #[serde(default)]
    pub sample_tests: Vec<SampleTest>,
}

/// One entry of the `sampleTests` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleTest {
    pub input_file: String,
    pub output_file: String,
}

impl StatementProperties {
    pub fn load(statement_dir: &Path) -> Result<Self> {
        let path = statement_dir.join("problem-properties.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| AppError::package(&path, format!("cannot read statement properties: {e}")))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Extensions recognized as statement images.
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "gif", "png", "pdf", "svg"];

/// Scan the statement directory for images referenced by the markup.
///
/// Returned in file-name order so parsing is deterministic.
pub fn scan_images(statement_dir: &Path) -> Result<Vec<Image>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(statement_dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let lower = ext.to_lowercase();
                IMAGE_EXTENSIONS.contains(&lower.as_str())
            });
        if is_image {
            images.push(Image {
                name: name.to_string(),
                path: path.clone(),
            });
        }
    }
    images.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(images)
}
