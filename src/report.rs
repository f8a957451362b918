//! Outcome aggregation: turn raw intersection outcomes into policy
//! categories, tally them, and write the per-pair CSV records.

use anyhow::Result;
use log::{debug, error, info};
use std::io::Write;

use crate::types::{
    IntersectOutcome, IntersectStatus, PairCategory, PairResult, RunSummary, SolidMetrics,
};

/// Apply the overlap policy to one raw outcome. An overlap is acceptable
/// while `common / min(vol_hi, vol_lo)` stays within `max_ratio`.
pub fn classify_outcome(
    outcome: &IntersectOutcome,
    vol_hi: f64,
    vol_lo: f64,
    max_ratio: f64,
) -> PairCategory {
    match outcome.status {
        IntersectStatus::Distinct => PairCategory::Distinct,
        IntersectStatus::Touching => PairCategory::Touching,
        IntersectStatus::Failed => PairCategory::Failed,
        IntersectStatus::Timeout => PairCategory::Timeout,
        IntersectStatus::Overlap(vols) => {
            let min_vol = vol_hi.min(vol_lo);
            if vols.common > min_vol * max_ratio {
                PairCategory::BadOverlap
            } else {
                PairCategory::Overlap
            }
        }
    }
}

/// Single consumer of drained results: classifies, counts, and streams one
/// CSV record per non-distinct pair. Owned by the driver thread; workers
/// never touch it.
pub struct Aggregator<'a, W: Write> {
    metrics: &'a [SolidMetrics],
    max_ratio: f64,
    out: W,
    summary: RunSummary,
}

impl<'a, W: Write> Aggregator<'a, W> {
    pub fn new(metrics: &'a [SolidMetrics], max_ratio: f64, out: W) -> Self {
        Self {
            metrics,
            max_ratio,
            out,
            summary: RunSummary::default(),
        }
    }

    pub fn summary_mut(&mut self) -> &mut RunSummary {
        &mut self.summary
    }

    /// Consume one result: derive its category, count it, log it, and
    /// write its CSV record. Returns the category for the caller's use.
    pub fn record(&mut self, result: PairResult) -> Result<PairCategory> {
        let key = result.key;
        let outcome = &result.outcome;
        let vol_hi = self.metrics[key.hi].volume;
        let vol_lo = self.metrics[key.lo].volume;
        let category = classify_outcome(outcome, vol_hi, vol_lo, self.max_ratio);
        self.summary.record(category);

        if outcome.solve_time.as_secs() >= 1 {
            debug!("{} took {:.1?} to solve", key, outcome.solve_time);
        }

        match category {
            PairCategory::Distinct => {
                debug!("{} are distinct", key);
            }
            PairCategory::Touching => {
                info!("{} touch", key);
                writeln!(self.out, "{},{},touch", key.hi, key.lo)?;
            }
            PairCategory::Overlap | PairCategory::BadOverlap => {
                let IntersectStatus::Overlap(vols) = outcome.status else {
                    unreachable!("overlap category without volumes");
                };
                let min_vol = vol_hi.min(vol_lo);
                let detail = format!(
                    "{:.0}%, {:.2}% of smaller shape. vol_{}={:.1}, vol_{}={:.1}, common={:.1}",
                    self.max_ratio * 100.0,
                    vols.common / min_vol * 100.0,
                    key.hi,
                    vol_hi,
                    key.lo,
                    vol_lo,
                    vols.common
                );
                if category == PairCategory::BadOverlap {
                    error!("{} overlap by more than {}", key, detail);
                } else {
                    info!("{} overlap by less than {}", key, detail);
                }
                writeln!(
                    self.out,
                    "{},{},{},{:.2},{:.2},{:.2}",
                    key.hi,
                    key.lo,
                    category.label(),
                    vols.common,
                    vol_hi,
                    vol_lo
                )?;
            }
            PairCategory::Failed => {
                error!(
                    "{} failed to classify at tolerance={} with ({} filler and {} common) warnings",
                    key, outcome.tolerance, outcome.filler_warnings, outcome.common_warnings
                );
                writeln!(self.out, "{},{},failed", key.hi, key.lo)?;
            }
            PairCategory::Timeout => {
                error!(
                    "{} failed to classify, solve exceeded its deadline at tolerance={}",
                    key, outcome.tolerance
                );
                writeln!(self.out, "{},{},timeout", key.hi, key.lo)?;
            }
        }

        // keep the CSV current while results trickle in
        self.out.flush()?;
        Ok(category)
    }

    /// Log the run totals and hand back the finalized summary.
    pub fn finish(self) -> RunSummary {
        let s = &self.summary;
        info!(
            "processing summary: bbox tests={}, pruned={}, intersection tests={}, \
             distinct={}, touching={}, overlapping={}, bad overlaps={}, \
             tests failed={}, timed out={}",
            s.candidates,
            s.pruned,
            s.classified(),
            s.distinct,
            s.touching,
            s.overlap,
            s.bad_overlap,
            s.failed,
            s.timeout
        );
        if !s.passed() {
            error!(
                "errors occurred while processing: intersection tests failed={}, \
                 timed out={}, overlapped by too much={}",
                s.failed, s.timeout, s.bad_overlap
            );
        }
        self.summary
    }
}
