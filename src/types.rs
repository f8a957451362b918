//! Public and internal types for the overlapper API and pipeline.

use std::fmt;
use std::time::Duration;

use crate::geometry::Aabb;

/// Unordered pair of solid indices, the unit of work and the result
/// correlation key. Invariant: `hi > lo`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    pub hi: usize,
    pub lo: usize,
}

impl PairKey {
    /// Build a key from two distinct indices, in either order.
    pub fn new(a: usize, b: usize) -> Self {
        debug_assert_ne!(a, b);
        if a > b {
            Self { hi: a, lo: b }
        } else {
            Self { hi: b, lo: a }
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.hi, self.lo)
    }
}

/// Intersection and one-sided remainder volumes of an overlapping pair.
/// `cut_hi` is the volume of solid `hi` minus the common part, `cut_lo`
/// likewise for `lo`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapVolumes {
    pub common: f64,
    pub cut_hi: f64,
    pub cut_lo: f64,
}

/// Raw geometric outcome of one intersection solve. All of these are
/// subject to the fuzzy tolerance the solve ran with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IntersectStatus {
    /// The solve failed to converge; a different fuzzy value might help.
    Failed,
    /// The solve exceeded its per-pair deadline.
    Timeout,
    /// Null intersection.
    Distinct,
    /// At least one vertex, edge, or face in common, but no volume.
    Touching,
    /// Some volume in common. Volumes are carried here so they exist
    /// exactly when the pair overlaps.
    Overlap(OverlapVolumes),
}

/// Result of classifying one pair, as produced by a kernel and finalized
/// by the worker's retry ladder.
#[derive(Clone, Copy, Debug)]
pub struct IntersectOutcome {
    pub status: IntersectStatus,
    /// Fuzzy tolerance the recorded attempt actually ran with.
    pub tolerance: f64,
    /// Warnings raised while building the intersection structure.
    pub filler_warnings: u32,
    /// Warnings raised while extracting the common volume.
    pub common_warnings: u32,
    /// Wall-clock time of the solve.
    pub solve_time: Duration,
}

impl IntersectOutcome {
    pub fn new(status: IntersectStatus, tolerance: f64) -> Self {
        Self {
            status,
            tolerance,
            filler_warnings: 0,
            common_warnings: 0,
            solve_time: Duration::ZERO,
        }
    }
}

/// One classified pair, pushed by a worker onto the result stream.
#[derive(Clone, Copy, Debug)]
pub struct PairResult {
    pub key: PairKey,
    pub outcome: IntersectOutcome,
}

/// Final, policy-aware category of a pair. `BadOverlap` is a policy
/// violation (overlap beyond the configured ratio), not a solve failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PairCategory {
    Distinct,
    Touching,
    Overlap,
    BadOverlap,
    Failed,
    Timeout,
}

impl PairCategory {
    /// Token written to the CSV output.
    pub fn label(self) -> &'static str {
        match self {
            PairCategory::Distinct => "distinct",
            PairCategory::Touching => "touch",
            PairCategory::Overlap => "overlap",
            PairCategory::BadOverlap => "bad_overlap",
            PairCategory::Failed => "failed",
            PairCategory::Timeout => "timeout",
        }
    }

    /// True for categories that make the whole run fail.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            PairCategory::BadOverlap | PairCategory::Failed | PairCategory::Timeout
        )
    }
}

impl fmt::Display for PairCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cached per-solid derivations, computed once by the bounding index and
/// read-only for the rest of the run.
#[derive(Clone, Copy, Debug)]
pub struct SolidMetrics {
    pub volume: f64,
    pub bound: Aabb,
}

/// Counters accumulated by the aggregator while results drain. Mutated
/// only by the driver thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Unordered pairs enumerated, `N * (N - 1) / 2`.
    pub candidates: u64,
    /// Pairs discarded by the bounding-box test.
    pub pruned: u64,
    /// Pairs submitted to the worker pool.
    pub submitted: u64,
    pub distinct: u64,
    pub touching: u64,
    pub overlap: u64,
    pub bad_overlap: u64,
    pub failed: u64,
    pub timeout: u64,
}

impl RunSummary {
    pub fn record(&mut self, category: PairCategory) {
        match category {
            PairCategory::Distinct => self.distinct += 1,
            PairCategory::Touching => self.touching += 1,
            PairCategory::Overlap => self.overlap += 1,
            PairCategory::BadOverlap => self.bad_overlap += 1,
            PairCategory::Failed => self.failed += 1,
            PairCategory::Timeout => self.timeout += 1,
        }
    }

    /// Number of pairs classified so far, across all categories.
    pub fn classified(&self) -> u64 {
        self.distinct + self.touching + self.overlap + self.bad_overlap + self.failed + self.timeout
    }

    /// False when any pair ended failed, timed out, or overlapped beyond
    /// policy; drives the process exit code.
    pub fn passed(&self) -> bool {
        self.failed == 0 && self.timeout == 0 && self.bad_overlap == 0
    }
}

/// Options for one overlap-check run. Use [`CheckOpts::validate`] before
/// scheduling any work; range violations are rejected up front.
#[derive(Clone, Debug)]
pub struct CheckOpts {
    /// Worker thread count. When None, uses all available cores.
    pub jobs: Option<usize>,
    /// Bounding boxes with a gap larger than this on some axis are pruned
    /// without classification. Must be >= every tolerance rung for the
    /// pruning to stay conservative.
    pub clearance: f64,
    /// Fuzzy tolerance ladder, most permissive first, tried in order while
    /// the solve keeps failing. Must be non-empty; zero is a valid rung.
    pub tolerances: Vec<f64>,
    /// Overlap with `common / min(vol_hi, vol_lo)` at most this ratio is
    /// acceptable; more is a `bad_overlap`.
    pub max_overlap_ratio: f64,
    /// Deadline for a single intersection solve. None disables timeouts.
    pub time_per_pair: Option<Duration>,
    /// Show a progress bar and debug logging.
    pub verbose: bool,
}

impl Default for CheckOpts {
    fn default() -> Self {
        Self {
            jobs: None,
            clearance: 0.5,
            tolerances: vec![1e-3, 0.0],
            max_overlap_ratio: 0.01,
            time_per_pair: Some(Duration::from_secs(60)),
            verbose: false,
        }
    }
}

impl CheckOpts {
    /// Check documented ranges. Called before any pair is scheduled.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tolerances.is_empty() {
            anyhow::bail!("tolerance ladder must contain at least one value");
        }
        for &t in &self.tolerances {
            if !(t >= 0.0) {
                anyhow::bail!("tolerance must not be negative, got {}", t);
            }
            if self.clearance < t {
                log::warn!(
                    "bounding-box clearance smaller than tolerance, {} < {}; \
                     close pairs may be pruned before classification",
                    self.clearance,
                    t
                );
            }
        }
        if !(self.clearance >= 0.0) {
            anyhow::bail!(
                "bounding-box clearance must not be negative, got {}",
                self.clearance
            );
        }
        if !(self.max_overlap_ratio > 0.0 && self.max_overlap_ratio <= 1.0) {
            anyhow::bail!(
                "max overlap ratio must be in (0, 1], got {}",
                self.max_overlap_ratio
            );
        }
        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            anyhow::bail!("worker count must be at least 1");
        }
        Ok(())
    }

    /// Resolved worker count: the override, or all available cores.
    pub fn worker_count(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
