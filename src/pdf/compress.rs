use crate::error::Error;
use anyhow::{Context, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{Document, Object, Stream};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// How hard to work on stream data when re-saving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Leave stream encodings alone; structural cleanup only
    #[value(alias = "low")]
    None,
    /// Deflate streams that have no filter yet
    #[default]
    #[value(alias = "medium")]
    Default,
    /// Also re-deflate existing Flate streams at the best level
    #[value(aliases = ["high", "max"])]
    Maximum,
}

impl CompressionLevel {
    pub const ALL: [CompressionLevel; 3] = [
        CompressionLevel::None,
        CompressionLevel::Default,
        CompressionLevel::Maximum,
    ];

    /// Menu label for the interactive chooser.
    pub fn label(self) -> &'static str {
        match self {
            CompressionLevel::None => "Low (Better Quality)",
            CompressionLevel::Default => "Medium (Balanced)",
            CompressionLevel::Maximum => "High (Smaller Size)",
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompressionLevel::None => "none",
            CompressionLevel::Default => "default",
            CompressionLevel::Maximum => "maximum",
        })
    }
}

impl FromStr for CompressionLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "low" | "1" => Ok(CompressionLevel::None),
            "default" | "medium" | "2" => Ok(CompressionLevel::Default),
            "maximum" | "max" | "high" | "3" => Ok(CompressionLevel::Maximum),
            _ => Err(Error::UnknownCompressionLevel(s.trim().to_string())),
        }
    }
}

/// What `optimize` did to a document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeStats {
    pub pruned_objects: usize,
    pub recompressed_streams: usize,
}

/// Optimize `doc` in place for saving at `level`.
pub fn optimize(doc: &mut Document, level: CompressionLevel) -> OptimizeStats {
    let pruned_objects = doc.prune_objects().len();
    doc.renumber_objects();

    let mut recompressed_streams = 0;
    if level != CompressionLevel::None {
        doc.compress();
    }
    if level == CompressionLevel::Maximum {
        for object in doc.objects.values_mut() {
            if let Object::Stream(stream) = object {
                if recompress_best(stream) {
                    recompressed_streams += 1;
                }
            }
        }
    }

    let stats = OptimizeStats {
        pruned_objects,
        recompressed_streams,
    };
    tracing::debug!(
        %level,
        pruned = stats.pruned_objects,
        recompressed = stats.recompressed_streams,
        "optimized document"
    );
    stats
}

/// Re-deflate a Flate stream at the best level, keeping the result only if
/// it is smaller. Streams with other filters or decode parameters are left
/// alone.
fn recompress_best(stream: &mut Stream) -> bool {
    if !stream.allows_compression || !is_plain_flate(stream) {
        return false;
    }
    let Ok(raw) = stream.decompressed_content() else {
        return false;
    };

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::best());
    if encoder.write_all(&raw).is_err() {
        return false;
    }
    let Ok(packed) = encoder.finish() else {
        return false;
    };

    if packed.len() < stream.content.len() {
        stream.set_content(packed);
        true
    } else {
        false
    }
}

fn is_plain_flate(stream: &Stream) -> bool {
    if stream.dict.has(b"DecodeParms") {
        return false;
    }
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => name == b"FlateDecode",
        Ok(Object::Array(filters)) => {
            matches!(filters.as_slice(), [Object::Name(name)] if name == b"FlateDecode")
        }
        _ => false,
    }
}

/// Sizes before and after compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionReport {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

impl CompressionReport {
    pub fn original_mb(&self) -> f64 {
        self.original_bytes as f64 / BYTES_PER_MB
    }

    pub fn compressed_mb(&self) -> f64 {
        self.compressed_bytes as f64 / BYTES_PER_MB
    }

    /// Percentage saved; negative when the output grew.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        (self.original_bytes as f64 - self.compressed_bytes as f64) / self.original_bytes as f64
            * 100.0
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original size: {:.2} MB", self.original_mb())?;
        writeln!(f, "Compressed size: {:.2} MB", self.compressed_mb())?;
        write!(f, "Size reduction: {:.1}%", self.reduction_percent())
    }
}

/// Optimize and serialize into memory.
pub fn compress_to_vec(doc: &mut Document, level: CompressionLevel) -> Result<Vec<u8>> {
    optimize(doc, level);
    let mut out = Vec::new();
    doc.save_to(&mut out)
        .context("Failed to serialize compressed PDF")?;
    Ok(out)
}
