//! Bounding index: per-solid volume and enclosing box, computed once up
//! front. Solids are independent so this fans out over rayon.

use anyhow::{Result, bail};
use log::info;
use rayon::prelude::*;

use crate::geometry::BoxSolid;
use crate::types::SolidMetrics;

/// Compute `(volume, bound)` for every solid. A negative or non-finite
/// volume coming back from the geometry is a defect and is surfaced with
/// the solid's index, never clamped.
pub fn build_bounding_index(solids: &[BoxSolid]) -> Result<Vec<SolidMetrics>> {
    info!("calculating {} bounding boxes", solids.len());

    solids
        .par_iter()
        .enumerate()
        .map(|(i, solid)| {
            let volume = solid.volume();
            if !volume.is_finite() || volume < 0.0 {
                bail!("solid {} has invalid volume {}", i, volume);
            }
            Ok(SolidMetrics {
                volume,
                bound: solid.bound(),
            })
        })
        .collect()
}
