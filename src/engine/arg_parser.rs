use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::types::CheckOpts;

struct DefaultArgs;

impl DefaultArgs {
    pub const CLEARANCE: f64 = 0.5;
    pub const MAX_OVERLAP_RATIO: f64 = 0.01;
    pub const TIME_PER_PAIR_SECS: u64 = 60;
    pub const TOLERANCES: [f64; 2] = [1e-3, 0.0];
}

/// Find all pairwise intersections between solids.
///
/// Writes a CSV row to stdout for each pair of nearby shapes categorised
/// as: 'touch' when vertices, edges, or faces intersect, 'overlap' when
/// shapes overlap by less than the common volume ratio, and 'bad_overlap'
/// when they overlap by more.
#[derive(Clone, Parser)]
#[command(name = "overlapper")]
#[command(about = "Classify every nearby pair of solids as touching, overlapping, or worse.")]
pub struct Cli {
    /// Solids file to check (JSON array of {"min": [x,y,z], "max": [x,y,z]}).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Parallelise over N worker threads. Default: all cores.
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Bounding boxes closer than C are checked for overlaps; anything
    /// farther apart is pruned without classification.
    #[arg(long, value_name = "C", default_value_t = DefaultArgs::CLEARANCE)]
    pub clearance: f64,

    /// Fuzzy tolerance ladder, most permissive first; a failed solve is
    /// retried down the ladder. Can specify multiple: -t 0.001 0
    #[arg(long, short = 't', value_name = "T", num_args = 1..)]
    pub tolerance: Vec<f64>,

    /// Overlap volume up to ratio R of the smaller solid is acceptable.
    #[arg(long, value_name = "R", default_value_t = DefaultArgs::MAX_OVERLAP_RATIO)]
    pub max_overlap_ratio: f64,

    /// Seconds to allow for one pairwise intersection solve; 0 disables
    /// the deadline.
    #[arg(long, value_name = "SECS", default_value_t = DefaultArgs::TIME_PER_PAIR_SECS)]
    pub time_per_pair: u64,

    /// Verbose output with a progress bar.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the argument surface into run options, applying defaults
    /// for anything unset. Ranges are checked by [`CheckOpts::validate`].
    pub fn check_opts(&self) -> CheckOpts {
        let tolerances = if self.tolerance.is_empty() {
            DefaultArgs::TOLERANCES.to_vec()
        } else {
            self.tolerance.clone()
        };
        let time_per_pair = match self.time_per_pair {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        CheckOpts {
            jobs: self.jobs,
            clearance: self.clearance,
            tolerances,
            max_overlap_ratio: self.max_overlap_ratio,
            time_per_pair,
            verbose: self.verbose,
        }
    }
}
