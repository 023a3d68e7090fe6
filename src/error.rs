use std::path::PathBuf;
use thiserror::Error;

/// Input validation failures.
///
/// These are raised before any document is written and carry the message
/// shown to the user. Library failures stay in `anyhow` with context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Please select at least 2 PDF files to merge")]
    TooFewInputs(usize),

    #[error("PDF must have at least 2 pages to split")]
    TooFewPages(u32),

    #[error("Page numbers required")]
    MissingPageNumbers,

    #[error("Please enter valid numbers")]
    InvalidPageNumber(String),

    /// Out-of-range integers, including negative ones, end up here.
    #[error("Invalid page range! Please enter numbers between 1 and {total}")]
    InvalidPageRange { start: i64, end: i64, total: u32 },

    #[error("PDF has no pages: {}", .0.display())]
    EmptyDocument(PathBuf),

    #[error("Output {} is also an input file", .0.display())]
    OutputIsInput(PathBuf),

    #[error("Output {} already exists (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),

    #[error("Unknown compression level: {0:?} (expected none, default or maximum)")]
    UnknownCompressionLevel(String),
}
