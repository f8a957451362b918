//! Classification worker pool: a fixed set of threads draining the shared
//! work queue, each running the tolerance retry ladder for one pair at a
//! time and pushing exactly one result per pair.

use crossbeam_channel::{Receiver, Sender};
use log::{info, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::geometry::BoxSolid;
use crate::kernel::{IntersectionKernel, normalize_outcome};
use crate::types::{IntersectOutcome, IntersectStatus, PairKey, PairResult};

/// Read-only state shared by all workers for the duration of a run.
pub struct WorkerContext {
    pub solids: Arc<Vec<BoxSolid>>,
    pub kernel: Arc<dyn IntersectionKernel>,
    /// Fuzzy tolerance ladder, most permissive first. An empty ladder
    /// fails every pair.
    pub tolerances: Arc<Vec<f64>>,
    pub time_per_pair: Option<Duration>,
}

/// Classify one pair by walking the tolerance ladder. A `Failed` attempt
/// is retried at the next rung; `Timeout` is terminal, since a slow solve
/// is unlikely to be rescued by a different tolerance and retrying would
/// double the already-excessive latency. Always returns exactly one
/// outcome, `Failed` once the ladder is exhausted.
pub fn classify_pair(ctx: &WorkerContext, key: PairKey) -> IntersectOutcome {
    let a = &ctx.solids[key.hi];
    let b = &ctx.solids[key.lo];

    // validation rejects an empty ladder up front, but a library consumer
    // can build the context directly; no rungs means nothing to try
    let Some(&first) = ctx.tolerances.first() else {
        warn!("{} has no tolerance rungs to try, reporting failed", key);
        return IntersectOutcome::new(IntersectStatus::Failed, 0.0);
    };

    let mut outcome = IntersectOutcome::new(IntersectStatus::Failed, first);
    for (rung, &tolerance) in ctx.tolerances.iter().enumerate() {
        if rung > 0 {
            info!(
                "{} solve failed with ({} filler and {} common) warnings, \
                 retrying with tolerance={}",
                key, outcome.filler_warnings, outcome.common_warnings, tolerance
            );
        }

        let raw = ctx
            .kernel
            .classify(a, b, tolerance, ctx.time_per_pair, key);
        outcome = normalize_outcome(raw, key);

        if outcome.status != IntersectStatus::Failed {
            break;
        }
    }

    if outcome.status == IntersectStatus::Failed {
        warn!(
            "{} solve failed at every tolerance, last attempt raised \
             ({} filler and {} common) warnings",
            key, outcome.filler_warnings, outcome.common_warnings
        );
    }
    outcome
}

/// One worker: pop pairs until the work channel closes, push one result
/// each. A failed or timed-out pair never disturbs the others; the loop
/// just moves on to the next item.
fn classification_worker_loop(
    work_rx: Receiver<PairKey>,
    result_tx: Sender<PairResult>,
    ctx: Arc<WorkerContext>,
) {
    while let Ok(key) = work_rx.recv() {
        let outcome = classify_pair(&ctx, key);
        if result_tx.send(PairResult { key, outcome }).is_err() {
            // driver went away; nothing left to report to
            return;
        }
    }
    drop(result_tx);
}

/// Spawn `jobs` classification workers. The caller must drop its own work
/// sender after submitting so workers see the channel close and exit, and
/// its result sender so the stream closes once all workers are done.
pub fn spawn_classification_workers(
    work_rx: &Receiver<PairKey>,
    result_tx: &Sender<PairResult>,
    ctx: WorkerContext,
    jobs: usize,
) -> Vec<JoinHandle<()>> {
    let ctx = Arc::new(ctx);
    (0..jobs)
        .map(|_| {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || classification_worker_loop(work_rx, result_tx, ctx))
        })
        .collect()
}
