//! Solids file loading. The input is a JSON array of box records; anything
//! malformed is fatal since there is nothing to classify without it.

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use std::path::Path;

use crate::geometry::BoxSolid;

#[derive(Deserialize)]
struct SolidRecord {
    min: [f64; 3],
    max: [f64; 3],
}

/// Parse a solids document from a JSON string. Split out from
/// [`load_solids`] so callers can parse in-memory documents.
pub fn parse_solids(text: &str) -> Result<Vec<BoxSolid>> {
    let records: Vec<SolidRecord> =
        serde_json::from_str(text).context("malformed solids document")?;

    if records.is_empty() {
        bail!("solids document contains no solids");
    }

    let mut solids = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        for axis in 0..3 {
            let (lo, hi) = (rec.min[axis], rec.max[axis]);
            if !lo.is_finite() || !hi.is_finite() {
                bail!("solid {}: non-finite coordinate on axis {}", i, axis);
            }
            if lo > hi {
                bail!("solid {}: min {} > max {} on axis {}", i, lo, hi, axis);
            }
        }
        solids.push(BoxSolid::new(rec.min, rec.max));
    }
    Ok(solids)
}

/// Load the solids file at `path`. Errors here abort the run before any
/// pair is scheduled.
pub fn load_solids(path: &Path) -> Result<Vec<BoxSolid>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading solids file {}", path.display()))?;
    let solids =
        parse_solids(&text).with_context(|| format!("loading {}", path.display()))?;
    debug!("loaded {} solids from {}", solids.len(), path.display());
    Ok(solids)
}
