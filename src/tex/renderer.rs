// src/tex/renderer.rs

//! The rendering seam: LaTeX in, PDF bytes out.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{AppError, Result};

/// Turns a `.tex` document into PDF bytes.
///
/// Injected into the emitter so tests can swap in a fake instead of
/// requiring a TeX installation.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, tex_file: &Path) -> Result<Vec<u8>>;
}

/// Production renderer shelling out to `pdflatex`.
pub struct PdfLatex;

#[async_trait]
impl Renderer for PdfLatex {
    async fn render(&self, tex_file: &Path) -> Result<Vec<u8>> {
        let work_dir = tex_file.parent().ok_or_else(|| {
            AppError::render(format!("'{}' has no parent directory", tex_file.display()))
        })?;
        let job_name = tex_file
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                AppError::render(format!("'{}' is not a valid tex path", tex_file.display()))
            })?;

        let output = tokio::process::Command::new("pdflatex")
            .arg("-interaction=nonstopmode")
            .arg(format!("-output-directory={}", work_dir.display()))
            .arg(format!("-jobname={job_name}"))
            .arg(tex_file)
            .output()
            .await?;

        if !output.status.success() {
            return Err(AppError::render(format!(
                "pdflatex failed on '{}':\n{}",
                tex_file.display(),
                String::from_utf8_lossy(&output.stdout)
            )));
        }

        let pdf_path = work_dir.join(format!("{job_name}.pdf"));
        Ok(tokio::fs::read(&pdf_path).await?)
    }
}
