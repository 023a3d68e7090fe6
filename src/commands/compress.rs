use crate::paths::{check_output, file_size, with_pdf_extension};
use crate::pdf::compress::compress_to_vec;
use crate::pdf::{CompressionLevel, CompressionReport, PdfDocument};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct CompressOutcome {
    pub level: CompressionLevel,
    pub report: CompressionReport,
    pub output: PathBuf,
}

/// Re-save `input` to `output` at `level` and measure the result.
pub fn compress<P: AsRef<Path>>(
    input: P,
    level: CompressionLevel,
    output: &Path,
    force: bool,
) -> Result<CompressOutcome> {
    let input = input.as_ref();
    let output = with_pdf_extension(output);
    check_output(&output, &[input], force)?;

    let report = compress_file(input, level, &output).context("Compression failed")?;

    tracing::info!(
        %level,
        original = report.original_bytes,
        compressed = report.compressed_bytes,
        output = %output.display(),
        "compressed PDF"
    );

    Ok(CompressOutcome {
        level,
        report,
        output,
    })
}

fn compress_file(input: &Path, level: CompressionLevel, output: &Path) -> Result<CompressionReport> {
    let mut doc = PdfDocument::open(input)?;
    let bytes = compress_to_vec(&mut doc.doc, level)?;
    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to save PDF: {}", output.display()))?;

    Ok(CompressionReport {
        original_bytes: file_size(input)?,
        compressed_bytes: bytes.len() as u64,
    })
}

pub fn run<P: AsRef<Path>>(
    input: P,
    level: CompressionLevel,
    output: &Path,
    force: bool,
) -> Result<()> {
    let outcome = compress(input, level, output, force)?;

    println!("PDF compressed successfully! ({} level)", outcome.level);
    println!();
    println!("{}", outcome.report);
    println!("Saved to {}", outcome.output.display());

    Ok(())
}
