use crate::error::Error;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand merge inputs, keeping the order they were given in.
///
/// Files are taken as-is. Directories contribute every `*.pdf` file below
/// them, sorted by path.
pub fn collect_pdf_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            files.push(input.to_path_buf());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(input).follow_links(true) {
            let entry =
                entry.with_context(|| format!("Failed to read directory: {}", input.display()))?;
            if entry.file_type().is_file() && has_pdf_extension(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        tracing::debug!(dir = %input.display(), count = found.len(), "expanded directory");
        files.extend(found);
    }

    Ok(files)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Append `.pdf` when the output path has no extension.
pub fn with_pdf_extension<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("pdf")
    }
}

/// Validate an output location against the inputs it is derived from.
pub fn check_output<P: AsRef<Path>>(output: &Path, inputs: &[P], force: bool) -> Result<(), Error> {
    let resolved = canonical(output);
    if inputs.iter().any(|input| canonical(input.as_ref()) == resolved) {
        return Err(Error::OutputIsInput(output.to_path_buf()));
    }
    if !force && output.exists() {
        return Err(Error::OutputExists(output.to_path_buf()));
    }
    Ok(())
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Size of a file in bytes.
pub fn file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read file size: {}", path.display()))?;
    Ok(metadata.len())
}
