//! aspace-instance-update: relink ArchivesSpace archival object instances to
//! new top containers from a tab-delimited work order.
//!
//! # Usage
//!
//! ```text
//! aspace-instance-update --workorder <path> --environment <name>
//!     [--test] [--undo] [--missing-target unlink|keep|fail]
//!     [--config <path>] [--log <path>] [-v|--verbose]
//! ```

mod commands;
mod logger;

use anyhow::Result;
use clap::Parser;

use commands::run::RunArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "aspace-instance-update",
    version,
    about = "Update ArchivesSpace archival object instances from a work order",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    /// Log each row and backend call to stderr.
    #[arg(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);
    cli.run.run()
}
