//! Overlapper CLI: find all pairwise intersections between solids.

use anyhow::Result;
use clap::Parser;
use overlapper::engine::Cli;
use overlapper::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
