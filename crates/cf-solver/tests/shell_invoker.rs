//! ShellInvoker against a real shell. Requires `/bin/bash`.

use std::fs;
use std::path::PathBuf;

use cf_solver::{ConvergenceOutcome, ResidualPair, ShellInvoker, SolverInvoker, read_residuals};
use tempfile::TempDir;

fn setup(env_script: &str) -> (TempDir, ShellInvoker, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let script = tmp.path().join("bashrc");
    fs::write(&script, env_script).unwrap();
    let invoker = ShellInvoker::new("/bin/bash", &script).unwrap();
    let log = tmp.path().join("log.simpleFoam");
    (tmp, invoker, log)
}

#[test]
fn success_writes_merged_output() {
    let (tmp, mut invoker, log) = setup("");
    let ok = invoker.run(tmp.path(), "echo out; echo err 1>&2", &log);
    assert!(ok);
    let content = fs::read_to_string(&log).unwrap();
    assert!(content.contains("out"));
    assert!(content.contains("err"));
}

#[test]
fn nonzero_exit_is_failure() {
    let (tmp, mut invoker, log) = setup("");
    assert!(!invoker.run(tmp.path(), "exit 3", &log));
}

#[test]
fn unknown_command_is_failure() {
    let (tmp, mut invoker, log) = setup("");
    assert!(!invoker.run(tmp.path(), "definitely_not_a_solver_binary", &log));
}

#[test]
fn failing_env_script_skips_command() {
    let (tmp, mut invoker, log) = setup("return 1\n");
    assert!(!invoker.run(tmp.path(), "touch ran", &log));
    assert!(!tmp.path().join("ran").exists());
}

#[test]
fn env_script_is_sourced_before_command() {
    let (tmp, mut invoker, log) = setup("export SOLVER_MARKER=sourced\n");
    assert!(invoker.run(tmp.path(), "echo $SOLVER_MARKER", &log));
    assert_eq!(fs::read_to_string(&log).unwrap().trim(), "sourced");
}

#[test]
fn runs_inside_case_directory() {
    let (tmp, mut invoker, log) = setup("");
    let case = tmp.path().join("case");
    fs::create_dir(&case).unwrap();
    assert!(invoker.run(&case, "mkdir 1", &log));
    assert!(case.join("1").is_dir());
}

#[test]
fn log_is_truncated_each_call() {
    let (tmp, mut invoker, log) = setup("");
    assert!(invoker.run(tmp.path(), "echo first-invocation", &log));
    assert!(invoker.run(tmp.path(), "echo second", &log));
    let content = fs::read_to_string(&log).unwrap();
    assert!(!content.contains("first-invocation"));
    assert_eq!(content.trim(), "second");
}

#[test]
fn missing_shell_is_failure() {
    let tmp = TempDir::new().unwrap();
    let script = tmp.path().join("bashrc");
    fs::write(&script, "").unwrap();
    let mut invoker = ShellInvoker::new(tmp.path().join("no-such-shell"), &script).unwrap();
    assert!(!invoker.run(tmp.path(), "true", &tmp.path().join("log")));
}

#[test]
fn solver_output_round_trips_through_monitor() {
    let (tmp, mut invoker, log) = setup("");
    let ok = invoker.run(
        tmp.path(),
        "echo 'smoothSolver:  Solving for Ux, Initial residual = 0.25, Final residual = 0.01, No Iterations 2'; \
         echo 'DICPCG:  Solving for p, Initial residual = 0.0625, Final residual = 0.001, No Iterations 9'",
        &log,
    );
    assert!(ok);
    assert_eq!(
        read_residuals(&log),
        ConvergenceOutcome::Progressed(ResidualPair { u: 0.25, p: 0.0625 })
    );
}
