//! Configurable job-cost calculator.
//!
//! All calculation logic lives in `jobcalc-core`; this binary owns the
//! flags, environment, prompts, and rendering.

use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod formatters;
mod logging;
mod profile;
mod prompt;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("{e}");
            for cause in e.chain().skip(1) {
                tracing::error!("  caused by: {cause}");
            }
            Err(e)
        }
    }
}
