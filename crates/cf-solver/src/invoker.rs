//! Synchronous solver invocation.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{SolverError, SolverResult};

/// Runs one solver command to completion.
///
/// Implementations must block until the command exits, truncate `log_path`
/// and write the command's merged stdout/stderr into it, and report failure
/// as `false` instead of returning an error. There are no retries: one call
/// is one definitive attempt.
pub trait SolverInvoker {
    /// Run `command` with `case_dir` as working directory.
    ///
    /// Returns `true` iff the command exited with status zero.
    fn run(&mut self, case_dir: &Path, command: &str, log_path: &Path) -> bool;
}

/// Invoker that sources an environment script in a shell before the command.
///
/// Equivalent to `<shell> -c "source '<env_script>' && <command>"`.
#[derive(Debug, Clone)]
pub struct ShellInvoker {
    shell: PathBuf,
    env_script: PathBuf,
}

impl ShellInvoker {
    /// Fails when the environment script does not exist; a missing shell is
    /// only detected per invocation and reported as a failed run.
    pub fn new(shell: impl Into<PathBuf>, env_script: impl Into<PathBuf>) -> SolverResult<Self> {
        let env_script = env_script.into();
        if !env_script.is_file() {
            return Err(SolverError::EnvScriptMissing { path: env_script });
        }
        Ok(Self {
            shell: shell.into(),
            env_script,
        })
    }

    pub fn shell(&self) -> &Path {
        &self.shell
    }

    pub fn env_script(&self) -> &Path {
        &self.env_script
    }

    /// Script passed to `<shell> -c`.
    pub fn command_line(&self, command: &str) -> String {
        format!(
            "source {} && {}",
            shell_quote(&self.env_script.to_string_lossy()),
            command
        )
    }
}

impl SolverInvoker for ShellInvoker {
    fn run(&mut self, case_dir: &Path, command: &str, log_path: &Path) -> bool {
        let stdout = match File::create(log_path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(log = %log_path.display(), error = %e, "cannot open solver log");
                return false;
            }
        };
        let stderr = match stdout.try_clone() {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(log = %log_path.display(), error = %e, "cannot share solver log");
                return false;
            }
        };

        tracing::debug!(command, case = %case_dir.display(), "invoking solver");
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(self.command_line(command))
            .current_dir(case_dir)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status();

        match status {
            Ok(status) if status.success() => true,
            Ok(status) => {
                tracing::warn!(command, code = ?status.code(), "solver exited unsuccessfully");
                false
            }
            Err(e) => {
                tracing::warn!(command, shell = %self.shell.display(), error = %e, "solver could not be started");
                false
            }
        }
    }
}

/// Single-quote `s` for a POSIX shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
