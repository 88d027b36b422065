pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "A small file-backed document manager")]
pub struct Args {
    /// Path to the folio directory (defaults to ~/.folio)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
