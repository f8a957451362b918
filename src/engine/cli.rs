//! CLI command handler: load the solids, run the check, fail the process
//! when any pair ended failed, timed out, or overlapped beyond policy.

use anyhow::{Result, bail};
use std::sync::Arc;

use crate::document::load_solids;
use crate::engine::arg_parser::Cli;
use crate::kernel::BoxKernel;
use crate::pipeline::run_overlap_check;
use crate::utils::setup_logging;

/// Run the overlap check described by the parsed CLI. CSV goes to stdout,
/// logs to stderr. Returns an error (non-zero exit) on fatal load/config
/// problems and when the finished run did not pass.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose);

    let opts = cli.check_opts();
    opts.validate()?;

    let solids = load_solids(&cli.input)?;

    let stdout = std::io::stdout();
    let summary = run_overlap_check(solids, Arc::new(BoxKernel), &opts, stdout.lock())?;

    if !summary.passed() {
        bail!(
            "overlap check failed: failed={}, timeout={}, bad_overlap={}",
            summary.failed,
            summary.timeout,
            summary.bad_overlap
        );
    }
    Ok(())
}
