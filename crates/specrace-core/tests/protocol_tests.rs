//! Speculative and sequential run protocol
//!
//! Run with: cargo test --package specrace-core --test protocol_tests

use specrace_core::prelude::*;
use specrace_core::{run_series, run_trials_with, TrialError};
use specrace_test_utils::{
    branch_set, quick_config, CountingTask, FailingTask, FixedSelector, FixedTask,
    PanickingTask, ScriptedSelector, SpinTask,
};
use std::time::{Duration, Instant};

#[test]
fn loser_is_cancelled_and_winner_completes() {
    let branches = branch_set(FixedTask::new(7, "a"), SpinTask::until_cancelled());
    let runner = SpeculativeRunner::new(&branches, 100);

    let record = runner
        .run(1, &mut FixedSelector::new(100).after(Duration::from_millis(5)))
        .unwrap();

    assert_eq!(record.winner, BranchId::A);
    let winners: Vec<_> = record
        .outcomes
        .iter()
        .filter(|o| record.is_winner(o))
        .collect();
    assert_eq!(winners.len(), 1);
    assert!(!winners[0].cancelled);
    assert!(record.outcome(BranchId::B).unwrap().cancelled);
}

#[test]
fn each_branch_executes_exactly_once_per_run() {
    let a = CountingTask::new(SpinTask::until_cancelled());
    let b = CountingTask::new(FixedTask::new(1, "b"));
    let (a_calls, b_calls) = (a.clone(), b.clone());
    let branches = branch_set(a, b);
    let runner = SpeculativeRunner::new(&branches, 0);

    let records = run_series(&runner, 4, &mut FixedSelector::new(-1)).unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(a_calls.calls(), 4);
    assert_eq!(b_calls.calls(), 4);
    for record in &records {
        assert_eq!(record.outcomes.len(), 2);
        assert_eq!(record.winner, BranchId::B);
        assert!(record.outcome(BranchId::A).unwrap().cancelled);
    }
}

#[test]
fn selector_outrunning_both_branches_is_not_an_error() {
    // Both tasks finish before the selector returns; neither observes a cancel.
    let branches = branch_set(FixedTask::new(1, "a"), FixedTask::new(2, "b"));
    let runner = SpeculativeRunner::new(&branches, 0);

    let record = runner
        .run(1, &mut FixedSelector::new(0).after(Duration::from_millis(20)))
        .unwrap();

    assert_eq!(record.winner, BranchId::A);
    assert!(record.outcomes.iter().all(|o| !o.cancelled));
    assert!(record.is_winner(record.outcome(BranchId::A).unwrap()));
    assert!(!record.is_winner(record.outcome(BranchId::B).unwrap()));
}

#[test]
fn cancellation_is_never_observed_before_decision() {
    // A polls every 100us; the selector takes 30ms. A must still be running
    // (not cancelled) for at least the selector's duration.
    let branches = branch_set(SpinTask::until_cancelled(), FixedTask::new(0, "b"));
    let runner = SpeculativeRunner::new(&branches, 1);

    let record = runner
        .run(1, &mut FixedSelector::new(0).after(Duration::from_millis(30)))
        .unwrap();

    let a = record.outcome(BranchId::A).unwrap();
    assert!(a.cancelled);
    assert!(a.end_offset(record.run_start) >= record.selector_duration);
}

#[test]
fn total_duration_covers_every_outcome() {
    let branches = branch_set(
        SpinTask::for_duration(Duration::from_millis(15)),
        SpinTask::until_cancelled(),
    );
    let runner = SpeculativeRunner::new(&branches, 0);

    let record = runner.run(1, &mut FixedSelector::new(5)).unwrap();

    for outcome in &record.outcomes {
        assert!(record.total_duration >= outcome.end_offset(record.run_start));
    }
    assert!(record.total_duration >= Duration::from_millis(15));
}

#[test]
fn winner_failure_aborts_speculative_run_and_stops_loser() {
    let branches = branch_set(FailingTask::new("bad input"), SpinTask::until_cancelled());
    let runner = SpeculativeRunner::new(&branches, 0);

    let start = Instant::now();
    let err = runner.run(9, &mut FixedSelector::new(1)).unwrap_err();

    match err {
        TrialError::RunAborted {
            mode,
            run_index,
            branch,
            cause,
        } => {
            assert_eq!(mode, RunMode::Speculative);
            assert_eq!(run_index, 9);
            assert_eq!(branch, BranchId::A);
            assert_eq!(cause, "bad input");
        }
        other => panic!("unexpected error: {other}"),
    }
    // The spinning loser would never stop on its own.
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn loser_failure_also_aborts() {
    let branches = branch_set(
        SpinTask::for_duration(Duration::from_millis(10)),
        FailingTask::new("broken").after(Duration::from_millis(1)),
    );
    let runner = SpeculativeRunner::new(&branches, 0);

    let err = runner
        .run(2, &mut FixedSelector::new(1).after(Duration::from_millis(5)))
        .unwrap_err();
    assert_eq!(err.branch(), Some(BranchId::B));
    assert_eq!(err.run_index(), Some(2));
}

#[test]
fn panicking_winner_aborts_run_and_stops_loser() {
    let branches = branch_set(PanickingTask::new("boom"), SpinTask::until_cancelled());
    let runner = SpeculativeRunner::new(&branches, 0);

    let start = Instant::now();
    let err = runner.run(1, &mut FixedSelector::new(1)).unwrap_err();

    assert!(matches!(
        err,
        TrialError::BranchPanicked {
            mode: RunMode::Speculative,
            run_index: 1,
            branch: BranchId::A,
        }
    ));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn panicking_branch_halts_the_trial_sequence() {
    let config = quick_config().with_runs(5);
    let panicking = CountingTask::new(PanickingTask::new("boom"));
    let calls = panicking.clone();
    let branches = branch_set(panicking, SpinTask::until_cancelled());

    let err = run_trials_with(&config, &branches, &mut FixedSelector::new(10)).unwrap_err();

    assert!(matches!(
        err,
        TrialError::BranchPanicked {
            run_index: 1,
            branch: BranchId::A,
            ..
        }
    ));
    assert_eq!(calls.calls(), 1);
}

#[test]
fn failure_halts_the_trial_sequence() {
    let config = quick_config().with_runs(5);
    let failing = CountingTask::new(FailingTask::new("nope"));
    let calls = failing.clone();
    let branches = branch_set(failing, SpinTask::until_cancelled());

    let err = run_trials_with(&config, &branches, &mut FixedSelector::new(10)).unwrap_err();

    assert!(matches!(err, TrialError::RunAborted { run_index: 1, .. }));
    assert_eq!(calls.calls(), 1);
}

#[test]
fn sequential_runs_winner_only_without_cancellation() {
    let a = CountingTask::new(SpinTask::until_cancelled());
    let a_calls = a.clone();
    let branches = branch_set(a, FixedTask::new(3, "b"));
    let runner = SequentialRunner::new(&branches, 10);

    let record = runner.run(1, &mut FixedSelector::new(9)).unwrap();

    assert_eq!(a_calls.calls(), 0);
    assert_eq!(record.outcomes.len(), 1);
    let only = &record.outcomes[0];
    assert_eq!(only.branch, BranchId::B);
    assert_eq!(only.numeric, 3);
    assert!(!only.cancelled);
}

#[test]
fn sequential_winner_runs_to_completion() {
    let branches = branch_set(
        SpinTask::for_duration(Duration::from_millis(10)),
        FixedTask::new(0, "b"),
    );
    let record = SequentialRunner::new(&branches, 0)
        .run(1, &mut FixedSelector::new(0))
        .unwrap();
    let a = record.winning_outcome().unwrap();
    assert!(!a.cancelled);
    assert_eq!(a.detail, "spun");
}

#[test]
fn scripted_selector_drives_winners_per_run() {
    let branches = branch_set(FixedTask::new(1, "a"), FixedTask::new(2, "b"));
    let runner = SequentialRunner::new(&branches, 50);
    let mut selector = ScriptedSelector::new(vec![10, 50, 99, 49]);

    let winners: Vec<BranchId> = run_series(&runner, 4, &mut selector)
        .unwrap()
        .iter()
        .map(|r| r.winner)
        .collect();

    assert_eq!(
        winners,
        vec![BranchId::B, BranchId::A, BranchId::A, BranchId::B]
    );
}
