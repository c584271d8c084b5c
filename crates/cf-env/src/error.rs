//! Error types for the control loop.

use std::path::PathBuf;

/// Fatal control-loop errors.
///
/// Solver and parse failures never appear here; see [`crate::CfdEnv::step`].
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Environment must be reset before stepping")]
    NotReset,

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file: {path}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid reward parameter: {0}")]
    Reward(#[from] cf_core::CfError),

    #[error("Case error: {0}")]
    Case(#[from] cf_case::CaseError),

    #[error("Solver setup error: {0}")]
    Solver(#[from] cf_solver::SolverError),
}

pub type EnvResult<T> = Result<T, EnvError>;
