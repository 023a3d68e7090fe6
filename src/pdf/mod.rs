pub mod compress;
pub mod document;
pub mod merge;

#[cfg(test)]
pub mod sample;

pub use compress::{CompressionLevel, CompressionReport};
pub use document::PdfDocument;
