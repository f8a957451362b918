//! End-to-end runs over the box backend: known geometric configurations
//! through the full prune/classify/aggregate pipeline.

use std::sync::Arc;

use overlapper::check_solids;
use overlapper::geometry::BoxSolid;
use overlapper::kernel::BoxKernel;
use overlapper::types::{CheckOpts, RunSummary};

fn run(solids: Vec<BoxSolid>, opts: &CheckOpts) -> (RunSummary, String) {
    let mut out = Vec::new();
    let summary = check_solids(solids, Arc::new(BoxKernel), opts, &mut out).unwrap();
    (summary, String::from_utf8(out).unwrap())
}

#[test]
fn test_identical_cubes_fully_overlap() {
    let solids = vec![BoxSolid::cube([0.0; 3], 10.0), BoxSolid::cube([0.0; 3], 10.0)];
    let opts = CheckOpts {
        max_overlap_ratio: 1.0,
        ..Default::default()
    };
    let (summary, csv) = run(solids, &opts);

    assert_eq!(summary.overlap, 1);
    assert!(summary.passed());
    assert_eq!(csv.trim(), "1,0,overlap,1000.00,1000.00,1000.00");
}

#[test]
fn test_identical_cubes_violate_default_ratio() {
    let solids = vec![BoxSolid::cube([0.0; 3], 10.0), BoxSolid::cube([0.0; 3], 10.0)];
    let (summary, csv) = run(solids, &CheckOpts::default());

    assert_eq!(summary.bad_overlap, 1);
    assert!(!summary.passed());
    assert!(csv.starts_with("1,0,bad_overlap,"));
}

#[test]
fn test_far_cubes_pruned_before_classification() {
    // gap of 1.0 on every axis, clearance 0.5: never submitted
    let solids = vec![
        BoxSolid::cube([0.0; 3], 4.0),
        BoxSolid::cube([5.0, 5.0, 5.0], 4.0),
    ];
    let (summary, csv) = run(solids, &CheckOpts::default());

    assert_eq!(summary.candidates, 1);
    assert_eq!(summary.pruned, 1);
    assert_eq!(summary.submitted, 0);
    assert_eq!(summary.classified(), 0);
    assert!(summary.passed());
    assert!(csv.is_empty());
}

#[test]
fn test_face_sharing_cubes_touch() {
    let solids = vec![
        BoxSolid::cube([0.0; 3], 5.0),
        BoxSolid::cube([5.0, 0.0, 0.0], 5.0),
    ];
    let (summary, csv) = run(solids, &CheckOpts::default());

    assert_eq!(summary.touching, 1);
    assert!(summary.passed());
    assert_eq!(csv.trim(), "1,0,touch");
}

#[test]
fn test_overlap_ratio_policy_cutover() {
    // common = 0.2 * 10 * 10 = 20, min volume 1000, ratio 0.02
    let solids = vec![
        BoxSolid::cube([0.0; 3], 10.0),
        BoxSolid::cube([9.8, 0.0, 0.0], 10.0),
    ];

    let strict = CheckOpts {
        max_overlap_ratio: 0.01,
        ..Default::default()
    };
    let (summary, csv) = run(solids.clone(), &strict);
    assert_eq!(summary.bad_overlap, 1);
    assert!(!summary.passed());
    assert!(csv.starts_with("1,0,bad_overlap,20.00,"));

    let lenient = CheckOpts {
        max_overlap_ratio: 0.05,
        ..Default::default()
    };
    let (summary, csv) = run(solids, &lenient);
    assert_eq!(summary.overlap, 1);
    assert!(summary.passed());
    assert!(csv.starts_with("1,0,overlap,20.00,"));
}

#[test]
fn test_mixed_assembly_summary() {
    let solids = vec![
        BoxSolid::cube([0.0; 3], 5.0),           // 0
        BoxSolid::cube([5.0, 0.0, 0.0], 5.0),    // 1: touches 0
        BoxSolid::cube([20.0, 20.0, 20.0], 5.0), // 2: far from everything
        BoxSolid::cube([0.0; 3], 5.0),           // 3: identical to 0
    ];
    let opts = CheckOpts {
        max_overlap_ratio: 1.0,
        jobs: Some(2),
        ..Default::default()
    };
    let (summary, _) = run(solids, &opts);

    assert_eq!(summary.candidates, 6);
    assert_eq!(summary.pruned, 3); // every pair involving cube 2
    assert_eq!(summary.submitted, 3);
    assert_eq!(summary.touching, 2); // (1,0) and (3,1)
    assert_eq!(summary.overlap, 1); // (3,0)
    assert!(summary.passed());
}
