//! Error types for solver setup.

use std::path::PathBuf;
use thiserror::Error;

/// Setup errors. Invocation and parse failures are not errors; they are
/// reported as [`crate::ConvergenceOutcome::Diverged`].
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Solver environment script not found: {path}")]
    EnvScriptMissing { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type SolverResult<T> = Result<T, SolverError>;
