//! `pdeck run` end to end: script file in, frames out.

use std::path::PathBuf;

use pdeck_cli::cli::RunArgs;
use pdeck_cli::error::CliError;
use pdeck_cli::run::{RunSummary, run_session};

fn args(goal: &str, hyps: &[&str], script: Option<PathBuf>) -> RunArgs {
    RunArgs {
        goal: goal.into(),
        hyps: hyps.iter().map(|h| (*h).to_string()).collect(),
        script,
        config: None,
        width: 40,
        height: 12,
    }
}

fn write_script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("steps.txt");
    std::fs::write(&path, body).expect("write script");
    path
}

fn run(args: &RunArgs) -> (Result<RunSummary, CliError>, String) {
    let mut out = Vec::new();
    let result = run_session(args, &mut out);
    (result, String::from_utf8(out).expect("utf-8 frames"))
}

#[test]
fn drags_finish_the_proof_and_exit_acknowledges() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, "drag H2 H\ndrag H goal\nexit\n");
    let (result, out) = run(&args("B", &["H:A", "H2:A -> B"], Some(script)));

    let summary = result.expect("script runs");
    assert_eq!(
        summary,
        RunSummary {
            steps: 3,
            finished: true,
            acknowledged: true
        }
    );
    assert!(out.starts_with("== initial\n  H: A\n  H2: A -> B\n"));
    assert!(out.contains("== 1: drag H2 H\n  H: B\n"));
    assert!(out.contains("== 2: drag H goal\nNo more subgoals.\n\n[ Exit ]\n"));
}

#[test]
fn menu_pick_undo_and_double_click() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, "menu goal\npick 1\nkey undo\ndbl goal\n");
    let (result, out) = run(&args("A -> A", &[], Some(script)));

    let summary = result.expect("script runs");
    assert_eq!(summary.steps, 4);
    assert!(!summary.finished);
    let frames: Vec<&str> = out.split("== ").collect();
    // initial, menu, pick, undo, dbl
    assert_eq!(frames.len(), 6);
    assert!(frames[2].contains("★ intros"));
    assert!(frames[3].starts_with("2: pick 1\n  H: A\n"));
    assert!(!frames[4].contains("H: A"));
    assert!(frames[5].contains("  H: A"));
}

#[test]
fn unknown_target_is_reported_with_its_step() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, "drag X goal\n");
    let (result, _) = run(&args("B", &["H:A"], Some(script)));
    let err = result.expect_err("X is not on screen");
    assert!(matches!(err, CliError::NotOnScreen { step: 1, .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn bad_arguments_exit_with_two() {
    let (result, _) = run(&args("A ->", &[], None));
    assert_eq!(result.expect_err("bad goal").exit_code(), 2);

    let (result, _) = run(&args("B", &["H:A", "H:B"], None));
    assert!(matches!(result, Err(CliError::InvalidArgument { .. })));
}

#[test]
fn without_script_prints_one_frame() {
    let (result, out) = run(&args("A -> B", &["H:A"], None));
    assert_eq!(result.expect("runs").steps, 0);
    assert_eq!(out.matches("== ").count(), 1);
    assert!(out.contains("(1/1)"));
}
