//! Overlapper: parallel pairwise overlap classifier for solid assemblies.
//!
//! For every pair among N solids, decide whether they are distinct, merely
//! touching, acceptably overlapping, or overlapping by more than policy
//! allows. Candidate pairs are pruned with cheap bounding-box tests, the
//! survivors are classified on a fixed worker pool, and numerically fragile
//! solves are retried down a fuzzy-tolerance ladder.

pub mod document;
pub mod engine;
pub mod geometry;
pub mod kernel;
pub mod pipeline;
pub mod report;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use std::io::Write;
use std::sync::Arc;

use crate::geometry::BoxSolid;
use crate::kernel::IntersectionKernel;

/// Result alias used by the public overlapper API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single library entry point: classify every pair among `solids` with
/// `kernel`, streaming CSV records to `csv_out` as results complete, and
/// return the run totals.
///
/// Use [`kernel::BoxKernel`] for the built-in axis-aligned box backend, or
/// plug in any [`IntersectionKernel`] over the same solid handles. The
/// caller decides what to do with a failing summary; the CLI exits
/// non-zero via [`RunSummary::passed`].
pub fn check_solids<W: Write>(
    solids: Vec<BoxSolid>,
    kernel: Arc<dyn IntersectionKernel>,
    opts: &CheckOpts,
    csv_out: W,
) -> Result<RunSummary> {
    pipeline::run_overlap_check(solids, kernel, opts, csv_out)
}
