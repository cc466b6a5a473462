//! CLI entry point for building and exporting a moodboard

use clap::Parser;
use moodboard::io::cli::{Cli, SessionProcessor};
use moodboard::io::logging;

#[tokio::main]
async fn main() -> moodboard::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbosity());
    let processor = SessionProcessor::new(cli);
    processor.process().await?;
    Ok(())
}
