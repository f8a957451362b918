//! The intersection-kernel seam. The engine never branches on geometry
//! itself; everything it knows about a pair comes back through
//! [`IntersectionKernel::classify`]. Kernel quirks (convergence failures,
//! warning counts, the occasional negative common volume near a shared
//! boundary) are outcomes of that one call.

use log::warn;
use std::time::{Duration, Instant};

use crate::geometry::BoxSolid;
use crate::types::{IntersectOutcome, IntersectStatus, OverlapVolumes, PairKey};

/// One fuzzy boolean-intersection solve between two solids.
///
/// `tolerance` is the numerical slack the solve may merge features within;
/// `timeout` is an advisory per-solve deadline (None disables it). `pair`
/// is a diagnostic tag naming the work item, for logs and error messages
/// only. Implementations must be callable concurrently from many workers.
pub trait IntersectionKernel: Send + Sync {
    fn classify(
        &self,
        a: &BoxSolid,
        b: &BoxSolid,
        tolerance: f64,
        timeout: Option<Duration>,
        pair: PairKey,
    ) -> IntersectOutcome;
}

/// Reference kernel over axis-aligned boxes. Exact, so it never fails,
/// never times out, and raises no warnings; it exists to exercise the
/// engine end to end and to back the geometric test scenarios.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxKernel;

impl IntersectionKernel for BoxKernel {
    fn classify(
        &self,
        a: &BoxSolid,
        b: &BoxSolid,
        tolerance: f64,
        _timeout: Option<Duration>,
        _pair: PairKey,
    ) -> IntersectOutcome {
        let start = Instant::now();
        let d = a.aabb.overlap_extents(&b.aabb);

        let status = if d.iter().any(|&di| di < -tolerance) {
            IntersectStatus::Distinct
        } else if d.iter().all(|&di| di > tolerance) {
            let common: f64 = d.iter().product();
            IntersectStatus::Overlap(OverlapVolumes {
                common,
                cut_hi: a.volume() - common,
                cut_lo: b.volume() - common,
            })
        } else {
            // some extent within the tolerance band of zero
            IntersectStatus::Touching
        };

        let mut outcome = IntersectOutcome::new(status, tolerance);
        outcome.solve_time = start.elapsed();
        outcome
    }
}

/// Post-processing rule for a kernel artifact: solves near a shared
/// boundary occasionally report a slightly negative common volume. A small
/// one (within 10% of the smaller one-sided remainder) is reinterpreted as
/// `Touching`, since later pipeline stages care about which solids are
/// close enough to need merging. A large one means the solve went wrong
/// and becomes `Failed`, leaving the retry ladder to try a stricter
/// tolerance.
///
/// TODO: revalidate the 10% magnitude threshold against the current kernel
/// version; it was calibrated on an older release.
pub fn normalize_outcome(outcome: IntersectOutcome, pair: PairKey) -> IntersectOutcome {
    let IntersectStatus::Overlap(vols) = outcome.status else {
        return outcome;
    };
    if vols.common >= 0.0 {
        return outcome;
    }

    let limit = vols.cut_hi.min(vols.cut_lo) * 0.1;
    let mut normalized = outcome;
    if -vols.common <= limit {
        normalized.status = IntersectStatus::Touching;
    } else {
        warn!(
            "{} solve produced a negative common volume too large to ignore \
             ({} vs remainder {}), treating as failed",
            pair, vols.common, limit
        );
        normalized.status = IntersectStatus::Failed;
    }
    normalized
}
