//! The driver: bounding index, pair plan, channels, workers, drain loop.
//! The driver thread is the sole producer of work and the sole consumer of
//! results; workers own everything in between.

use anyhow::{Context, Result};
use crossbeam_channel::bounded;
use log::{debug, info};
use std::io::Write;
use std::sync::Arc;

use crate::engine::progress::{ProgressLog, create_progress_bar, tick_progress_bar};
use crate::geometry::BoxSolid;
use crate::kernel::IntersectionKernel;
use crate::pipeline::bounds::build_bounding_index;
use crate::pipeline::collector::ResultStream;
use crate::pipeline::pairs::generate_pairs;
use crate::pipeline::workers::{WorkerContext, spawn_classification_workers};
use crate::report::Aggregator;
use crate::types::{CheckOpts, RunSummary};

/// Run the full overlap check over `solids`, streaming CSV records to
/// `csv_out` as results drain. Returns the finalized summary; the caller
/// decides the exit status from [`RunSummary::passed`].
pub fn run_overlap_check<W: Write>(
    solids: Vec<BoxSolid>,
    kernel: Arc<dyn IntersectionKernel>,
    opts: &CheckOpts,
    csv_out: W,
) -> Result<RunSummary> {
    opts.validate()?;

    let metrics = build_bounding_index(&solids)?;
    let plan = generate_pairs(&metrics, opts.clearance);
    let submitted = plan.pairs.len();

    info!("checking for overlaps between {} pairs", submitted);

    // Channel capacity covers the whole work list so submission below
    // never blocks, and the sender can be dropped before workers start
    // popping (they exit when the channel is closed and empty).
    let cap = submitted.max(1);
    let (work_tx, work_rx) = bounded(cap);
    let (result_tx, result_rx) = bounded(cap);

    for key in &plan.pairs {
        work_tx
            .send(*key)
            .context("work queue rejected a pair before workers started")?;
    }
    drop(work_tx);

    let jobs = opts.worker_count().min(submitted.max(1));
    debug!("launching {} worker threads", jobs);
    let ctx = WorkerContext {
        solids: Arc::new(solids),
        kernel,
        tolerances: Arc::new(opts.tolerances.clone()),
        time_per_pair: opts.time_per_pair,
    };
    let workers = spawn_classification_workers(&work_rx, &result_tx, ctx, jobs);
    drop(result_tx);

    let mut stream = ResultStream::new(result_rx, submitted);
    let mut aggregator = Aggregator::new(&metrics, opts.max_overlap_ratio, csv_out);
    aggregator.summary_mut().candidates = plan.candidates;
    aggregator.summary_mut().pruned = plan.pruned;
    aggregator.summary_mut().submitted = submitted as u64;

    let mut bar = create_progress_bar(submitted, opts.verbose);
    let mut progress = ProgressLog::new(submitted);
    while stream.remaining() > 0 {
        let result = stream.drain_next()?;
        aggregator.record(result)?;
        tick_progress_bar(&mut bar);
        progress.tick();
    }

    for handle in workers {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("classification worker panicked"))?;
    }

    Ok(aggregator.finish())
}
