use crate::error::Error;
use crate::paths::{check_output, collect_pdf_inputs, with_pdf_extension};
use crate::pdf::merge::merge_files;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub files: usize,
    pub pages: u32,
    pub output: PathBuf,
}

/// Merge `inputs` (files or directories of PDFs) into `output`.
pub fn merge<P: AsRef<Path>>(inputs: &[P], output: &Path, force: bool) -> Result<MergeOutcome> {
    let files = collect_pdf_inputs(inputs)?;
    if files.len() < 2 {
        return Err(Error::TooFewInputs(files.len()).into());
    }

    let output = with_pdf_extension(output);
    check_output(&output, &files, force)?;

    let mut merged = merge_files(&files)?;
    let pages = merged.get_pages().len() as u32;

    merged
        .save(&output)
        .with_context(|| format!("Failed to save merged PDF: {}", output.display()))?;

    tracing::info!(files = files.len(), pages, output = %output.display(), "merged PDFs");

    Ok(MergeOutcome {
        files: files.len(),
        pages,
        output,
    })
}

pub fn run<P: AsRef<Path>>(inputs: &[P], output: &Path, force: bool) -> Result<()> {
    let outcome = merge(inputs, output, force)?;

    println!(
        "Successfully merged {} PDFs! ({} pages) -> {}",
        outcome.files,
        outcome.pages,
        outcome.output.display()
    );

    Ok(())
}
