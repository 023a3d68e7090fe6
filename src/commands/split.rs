use crate::error::Error;
use crate::page_range::{PageRange, PageSpan};
use crate::paths::{check_output, with_pdf_extension};
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    pub span: PageSpan,
    pub output: PathBuf,
}

/// Fail early when the document is too short to split.
pub fn ensure_splittable(doc: &PdfDocument) -> Result<u32, Error> {
    let total = doc.page_count();
    if total < 2 {
        return Err(Error::TooFewPages(total));
    }
    Ok(total)
}

/// Write pages `span` of `doc` to `output`.
pub fn split(doc: &PdfDocument, span: PageSpan, output: &Path, force: bool) -> Result<SplitOutcome> {
    let output = with_pdf_extension(output);
    check_output(&output, &[&doc.path], force)?;

    let mut new_doc = doc.split(span)?;
    PdfDocument::save(&mut new_doc, &output)?;

    tracing::info!(
        source = %doc.path.display(),
        pages = %span,
        output = %output.display(),
        "split PDF"
    );

    Ok(SplitOutcome { span, output })
}

pub fn run<P: AsRef<Path>>(input: P, pages: &str, output: &Path, force: bool) -> Result<()> {
    let doc = PdfDocument::open(&input)?;
    let total = ensure_splittable(&doc)?;
    let span = PageRange::parse(pages)?.resolve(total)?;

    let outcome = split(&doc, span, output, force)?;

    println!(
        "Successfully split pages {} to {}! -> {}",
        outcome.span.start,
        outcome.span.end,
        outcome.output.display()
    );

    Ok(())
}
