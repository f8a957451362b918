//! Pair generation: enumerate every unordered pair once, in a fixed order,
//! and drop the ones whose bounding boxes are too far apart to matter.

use log::{debug, trace};

use crate::types::{PairKey, SolidMetrics};

/// Work list produced by [`generate_pairs`]. `candidates` always equals
/// `pruned + pairs.len()` and is `n * (n - 1) / 2` for `n` solids.
#[derive(Clone, Debug)]
pub struct PairPlan {
    pub pairs: Vec<PairKey>,
    pub candidates: u64,
    pub pruned: u64,
}

/// Enumerate `(hi, lo)` with `hi` ascending from 1 and `lo` ascending from
/// 0, keeping only pairs whose bounds are within `clearance` of each
/// other. Most pairs in a typical assembly are nowhere near each other, so
/// this cheap test is run before any classification is scheduled.
pub fn generate_pairs(metrics: &[SolidMetrics], clearance: f64) -> PairPlan {
    let mut pairs = Vec::new();
    let mut candidates = 0u64;
    let mut pruned = 0u64;

    for hi in 1..metrics.len() {
        for lo in 0..hi {
            candidates += 1;
            if metrics[hi].bound.is_disjoint_from(&metrics[lo].bound, clearance) {
                trace!("({}, {}) pruned by bounding-box test", hi, lo);
                pruned += 1;
                continue;
            }
            pairs.push(PairKey { hi, lo });
        }
    }

    debug!(
        "{} candidate pairs, {} pruned, {} to classify",
        candidates,
        pruned,
        pairs.len()
    );
    PairPlan {
        pairs,
        candidates,
        pruned,
    }
}
