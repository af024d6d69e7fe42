use clap::{Args, Parser, Subcommand};
use pdf_stamp_core::{DEFAULT_MAX_PAYLOAD_BYTES, ValidationConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pdf-stamp",
    about = "Validate signature/seal stamp placements for PDFs",
    long_about = "Validate a stamp asset pool and a signing task, then emit render instructions in paint order."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output machine-readable JSON to stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a signing task against an asset pool
    Validate {
        #[command(flatten)]
        inputs: TaskInputs,
    },

    /// Validate a signing task and print its render instructions
    Plan {
        #[command(flatten)]
        inputs: TaskInputs,

        /// Digest algorithm used to fingerprint stamp images (sha256, sha512)
        #[arg(long, default_value = "sha512")]
        digest_algorithm: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TaskInputs {
    /// Path to the task JSON file
    pub task: PathBuf,

    /// Path to the asset pool JSON file (array of stamp assets)
    #[arg(short, long)]
    pub assets: PathBuf,

    /// Page count of the source PDF, if known (enables page range checks)
    #[arg(long)]
    pub page_count: Option<u32>,

    /// Largest accepted stamp image payload, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD_BYTES)]
    pub max_payload_bytes: usize,
}

impl TaskInputs {
    pub fn config(&self) -> ValidationConfig {
        ValidationConfig {
            page_count: self.page_count,
            max_payload_bytes: self.max_payload_bytes,
        }
    }
}
