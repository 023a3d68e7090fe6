use crate::pdf::CompressionLevel;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfworks")]
#[command(about = "Merge, split and compress PDF files")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Combine two or more PDFs into one, in the order given
    #[command(alias = "cat")]
    Merge {
        /// PDF files to merge; directories add the PDFs they contain
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (".pdf" is added when there is no extension)
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Copy a page range of a PDF into a new file
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Inclusive page range (e.g., "3-7", "5", "2-end")
        pages: String,

        /// Output file (".pdf" is added when there is no extension)
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Re-save a PDF with object cleanup and stream compression
    Compress {
        /// PDF file to compress
        path: PathBuf,

        /// Output file (".pdf" is added when there is no extension)
        #[arg(short, long)]
        output: PathBuf,

        /// Compression level
        #[arg(
            short,
            long,
            value_enum,
            default_value_t = CompressionLevel::Default,
            env = "PDFWORKS_COMPRESSION"
        )]
        level: CompressionLevel,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Display page count, size and metadata
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Walk through merge, split or compress with prompts
    #[command(alias = "menu")]
    Interactive,

    /// Run as MCP server on stdio
    Mcp,
}
