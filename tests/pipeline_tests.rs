use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use overlapper::geometry::BoxSolid;
use overlapper::kernel::IntersectionKernel;
use overlapper::pipeline::{WorkerContext, classify_pair, run_overlap_check};
use overlapper::types::{CheckOpts, IntersectOutcome, IntersectStatus, PairKey};

/// Test kernel with a scripted outcome sequence per pair; anything without
/// a script gets `default`. Records the tolerance of every attempt.
struct ScriptedKernel {
    scripts: Mutex<HashMap<PairKey, VecDeque<IntersectStatus>>>,
    attempts: Mutex<HashMap<PairKey, Vec<f64>>>,
    default: IntersectStatus,
}

impl ScriptedKernel {
    fn new(default: IntersectStatus) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            attempts: Mutex::new(HashMap::new()),
            default,
        }
    }

    fn script(self, pair: PairKey, outcomes: &[IntersectStatus]) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(pair, outcomes.iter().copied().collect());
        self
    }

    fn attempts_for(&self, pair: PairKey) -> Vec<f64> {
        self.attempts
            .lock()
            .unwrap()
            .get(&pair)
            .cloned()
            .unwrap_or_default()
    }
}

impl IntersectionKernel for ScriptedKernel {
    fn classify(
        &self,
        _a: &BoxSolid,
        _b: &BoxSolid,
        tolerance: f64,
        _timeout: Option<Duration>,
        pair: PairKey,
    ) -> IntersectOutcome {
        self.attempts
            .lock()
            .unwrap()
            .entry(pair)
            .or_default()
            .push(tolerance);
        let status = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&pair)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(self.default);
        IntersectOutcome::new(status, tolerance)
    }
}

/// n unit cubes stacked at the origin, so no pair is ever pruned.
fn stacked_cubes(n: usize) -> Vec<BoxSolid> {
    (0..n).map(|_| BoxSolid::cube([0.0; 3], 1.0)).collect()
}

fn ctx_with(kernel: Arc<dyn IntersectionKernel>, tolerances: &[f64]) -> WorkerContext {
    WorkerContext {
        solids: Arc::new(stacked_cubes(4)),
        kernel,
        tolerances: Arc::new(tolerances.to_vec()),
        time_per_pair: None,
    }
}

// --- retry ladder ---

#[test]
fn test_retry_ladder_records_success_tolerance() {
    let pair = PairKey::new(1, 0);
    let kernel = Arc::new(
        ScriptedKernel::new(IntersectStatus::Distinct)
            .script(pair, &[IntersectStatus::Failed, IntersectStatus::Touching]),
    );
    let ctx = ctx_with(kernel.clone(), &[0.1, 0.01]);

    let outcome = classify_pair(&ctx, pair);
    assert_eq!(outcome.status, IntersectStatus::Touching);
    assert_eq!(outcome.tolerance, 0.01, "outcome carries the rung that succeeded");
    assert_eq!(kernel.attempts_for(pair), vec![0.1, 0.01]);
}

#[test]
fn test_retry_ladder_first_rung_success_stops() {
    let pair = PairKey::new(2, 1);
    let kernel = Arc::new(ScriptedKernel::new(IntersectStatus::Distinct));
    let ctx = ctx_with(kernel.clone(), &[0.1, 0.01, 0.0]);

    let outcome = classify_pair(&ctx, pair);
    assert_eq!(outcome.status, IntersectStatus::Distinct);
    assert_eq!(outcome.tolerance, 0.1);
    assert_eq!(kernel.attempts_for(pair).len(), 1);
}

#[test]
fn test_retry_ladder_exhaustion_yields_failed() {
    let pair = PairKey::new(1, 0);
    let kernel = Arc::new(
        ScriptedKernel::new(IntersectStatus::Distinct)
            .script(pair, &[IntersectStatus::Failed, IntersectStatus::Failed]),
    );
    let ctx = ctx_with(kernel.clone(), &[0.1, 0.0]);

    let outcome = classify_pair(&ctx, pair);
    assert_eq!(outcome.status, IntersectStatus::Failed);
    assert_eq!(kernel.attempts_for(pair), vec![0.1, 0.0]);
}

#[test]
fn test_empty_ladder_fails_pair_without_calling_kernel() {
    let pair = PairKey::new(1, 0);
    let kernel = Arc::new(ScriptedKernel::new(IntersectStatus::Distinct));
    let ctx = ctx_with(kernel.clone(), &[]);

    let outcome = classify_pair(&ctx, pair);
    assert_eq!(outcome.status, IntersectStatus::Failed);
    assert!(
        kernel.attempts_for(pair).is_empty(),
        "no solve should run when there is no tolerance to run it with"
    );
}

#[test]
fn test_timeout_is_terminal_and_not_retried() {
    let pair = PairKey::new(1, 0);
    let kernel = Arc::new(
        ScriptedKernel::new(IntersectStatus::Distinct)
            .script(pair, &[IntersectStatus::Timeout, IntersectStatus::Touching]),
    );
    let ctx = ctx_with(kernel.clone(), &[0.1, 0.01]);

    let outcome = classify_pair(&ctx, pair);
    assert_eq!(outcome.status, IntersectStatus::Timeout);
    assert_eq!(
        kernel.attempts_for(pair).len(),
        1,
        "a timed-out solve must not be retried at another tolerance"
    );
}

// --- no loss, no duplication, worker-count independence ---

/// Deterministic per-pair status so runs are comparable across worker
/// counts.
fn status_for(pair: PairKey) -> IntersectStatus {
    match (pair.hi + pair.lo) % 3 {
        0 => IntersectStatus::Distinct,
        1 => IntersectStatus::Touching,
        _ => IntersectStatus::Distinct,
    }
}

struct DeterministicKernel;

impl IntersectionKernel for DeterministicKernel {
    fn classify(
        &self,
        _a: &BoxSolid,
        _b: &BoxSolid,
        tolerance: f64,
        _timeout: Option<Duration>,
        pair: PairKey,
    ) -> IntersectOutcome {
        IntersectOutcome::new(status_for(pair), tolerance)
    }
}

fn run_deterministic(jobs: usize, n: usize) -> (overlapper::RunSummary, Vec<String>) {
    let opts = CheckOpts {
        jobs: Some(jobs),
        ..Default::default()
    };
    let mut out = Vec::new();
    let summary =
        run_overlap_check(stacked_cubes(n), Arc::new(DeterministicKernel), &opts, &mut out)
            .unwrap();
    let mut lines: Vec<String> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    (summary, lines)
}

#[test]
fn test_no_loss_no_duplication_across_worker_counts() {
    let n = 12;
    let expected_pairs = (n * (n - 1) / 2) as u64;
    let (reference_summary, reference_lines) = run_deterministic(1, n);
    assert_eq!(reference_summary.candidates, expected_pairs);
    assert_eq!(reference_summary.submitted, expected_pairs);
    assert_eq!(reference_summary.classified(), expected_pairs);

    for jobs in [2, 8, 64] {
        let (summary, lines) = run_deterministic(jobs, n);
        assert_eq!(
            summary.classified(),
            expected_pairs,
            "with {} workers, every submitted pair must drain exactly once",
            jobs
        );
        assert_eq!(summary, reference_summary, "summaries differ at {} workers", jobs);
        assert_eq!(
            lines, reference_lines,
            "per-pair records differ at {} workers",
            jobs
        );
    }
}

#[test]
fn test_csv_records_have_no_duplicates() {
    let (_, lines) = run_deterministic(8, 12);
    let mut deduped = lines.clone();
    deduped.dedup();
    assert_eq!(lines, deduped);
}

// --- failure isolation ---

#[test]
fn test_one_failing_pair_does_not_disturb_the_rest() {
    let poisoned = PairKey::new(3, 1);
    let kernel = Arc::new(
        ScriptedKernel::new(IntersectStatus::Touching)
            .script(poisoned, &[IntersectStatus::Failed, IntersectStatus::Failed]),
    );
    let opts = CheckOpts {
        jobs: Some(4),
        tolerances: vec![0.1, 0.0],
        ..Default::default()
    };
    let mut out = Vec::new();
    let summary = run_overlap_check(stacked_cubes(5), kernel, &opts, &mut out).unwrap();

    assert_eq!(summary.classified(), 10);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.touching, 9);
    assert!(!summary.passed());
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("3,1,failed"));
}

#[test]
fn test_timeout_counts_against_the_run() {
    let slow = PairKey::new(1, 0);
    let kernel = Arc::new(
        ScriptedKernel::new(IntersectStatus::Distinct)
            .script(slow, &[IntersectStatus::Timeout]),
    );
    let opts = CheckOpts {
        jobs: Some(2),
        ..Default::default()
    };
    let mut out = Vec::new();
    let summary = run_overlap_check(stacked_cubes(3), kernel, &opts, &mut out).unwrap();

    assert_eq!(summary.timeout, 1);
    assert!(!summary.passed());
    assert!(String::from_utf8(out).unwrap().contains("1,0,timeout"));
}

// --- scale ---

#[test]
fn test_many_pairs_four_workers_drain_exactly_once() {
    // 46 solids -> 1035 candidate pairs, none pruned, all touching
    let n = 46;
    let expected = (n * (n - 1) / 2) as u64;
    let kernel = Arc::new(ScriptedKernel::new(IntersectStatus::Touching));
    let opts = CheckOpts {
        jobs: Some(4),
        ..Default::default()
    };
    let mut out = Vec::new();
    let summary = run_overlap_check(stacked_cubes(n), kernel, &opts, &mut out).unwrap();

    assert_eq!(summary.submitted, expected);
    assert_eq!(summary.classified(), expected);
    assert_eq!(summary.touching, expected);
    assert!(summary.passed());

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count() as u64, expected);
}

#[test]
fn test_empty_and_single_solid_runs() {
    let kernel = Arc::new(ScriptedKernel::new(IntersectStatus::Touching));
    let opts = CheckOpts::default();

    let mut out = Vec::new();
    let summary = run_overlap_check(stacked_cubes(1), kernel, &opts, &mut out).unwrap();
    assert_eq!(summary.candidates, 0);
    assert_eq!(summary.classified(), 0);
    assert!(summary.passed());
    assert!(out.is_empty());
}
