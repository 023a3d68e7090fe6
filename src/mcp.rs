use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::commands::{compress, merge, split};
use crate::page_range::PageSpan;
use crate::paths::file_size;
use crate::pdf::{CompressionLevel, PdfDocument};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfMergeRequest {
    #[schemars(description = "PDF files (or directories of PDFs) to merge, in order")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "First page to keep (1-based)")]
    pub start: i64,
    #[schemars(description = "Last page to keep (1-based, inclusive)")]
    pub end: i64,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfCompressRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Compression level: none, default or maximum (default: default)")]
    #[serde(default)]
    pub level: Option<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: Serialize>(result: &T) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("Error: {}", e))
}

fn report_error(tool: &str, err: anyhow::Error) -> String {
    tracing::warn!(tool, error = %format!("{:#}", err), "tool call failed");
    format!("Error: {:#}", err)
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get PDF metadata including page count, file size, title, author, creator and producer")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        let result = PdfDocument::open(&path).and_then(|doc| {
            let info = doc.get_info();
            Ok(PdfInfoResult {
                size_bytes: file_size(&path)?,
                page_count: info.page_count,
                version: info.version,
                title: info.title,
                author: info.author,
                creator: info.creator,
                producer: info.producer,
                path,
            })
        });
        match result {
            Ok(result) => to_json(&result),
            Err(e) => report_error("pdf_info", e),
        }
    }

    #[tool(description = "Merge two or more PDFs, in the given order, into a new file. Directories contribute their *.pdf files in sorted order.")]
    fn pdf_merge(&self, Parameters(req): Parameters<PdfMergeRequest>) -> String {
        match merge::merge(&req.inputs, Path::new(&req.output), true) {
            Ok(outcome) => to_json(&MergeResult {
                output_path: outcome.output.display().to_string(),
                file_count: outcome.files,
                page_count: outcome.pages,
            }),
            Err(e) => report_error("pdf_merge", e),
        }
    }

    #[tool(description = "Copy pages start..=end (1-based, inclusive) of a PDF with at least two pages into a new file")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        let result = PdfDocument::open(&req.path).and_then(|doc| {
            let total = split::ensure_splittable(&doc)?;
            let span = PageSpan::new(req.start, req.end, total)?;
            split::split(&doc, span, Path::new(&req.output), true)
        });
        match result {
            Ok(outcome) => to_json(&SplitResult {
                output_path: outcome.output.display().to_string(),
                start: outcome.span.start,
                end: outcome.span.end,
                page_count: outcome.span.len(),
            }),
            Err(e) => report_error("pdf_split", e),
        }
    }

    #[tool(description = "Re-save a PDF with structural optimization and stream compression. Levels: none (cleanup only), default (deflate unfiltered streams), maximum (also re-deflate at best level).")]
    fn pdf_compress(&self, Parameters(req): Parameters<PdfCompressRequest>) -> String {
        let level = match req.level.as_deref().map(str::parse::<CompressionLevel>) {
            None => CompressionLevel::default(),
            Some(Ok(level)) => level,
            Some(Err(e)) => return report_error("pdf_compress", e.into()),
        };

        match compress::compress(&req.path, level, Path::new(&req.output), true) {
            Ok(outcome) => to_json(&CompressResult {
                output_path: outcome.output.display().to_string(),
                level: outcome.level,
                original_size: outcome.report.original_bytes,
                compressed_size: outcome.report.compressed_bytes,
                reduction_percent: outcome.report.reduction_percent(),
            }),
            Err(e) => report_error("pdf_compress", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize)]
pub struct PdfInfoResult {
    pub path: String,
    pub size_bytes: u64,
    pub page_count: u32,
    pub version: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MergeResult {
    pub output_path: String,
    pub file_count: usize,
    pub page_count: u32,
}

#[derive(Debug, Serialize)]
pub struct SplitResult {
    pub output_path: String,
    pub start: u32,
    pub end: u32,
    pub page_count: u32,
}

#[derive(Debug, Serialize)]
pub struct CompressResult {
    pub output_path: String,
    pub level: CompressionLevel,
    pub original_size: u64,
    pub compressed_size: u64,
    pub reduction_percent: f64,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF merge, split and compress tools. Use pdf_info to get the page count, \
                 pdf_merge to concatenate files, pdf_split to copy a page range into a new \
                 file, and pdf_compress to shrink a file."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();
    tracing::info!("MCP server listening on stdio");

    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
