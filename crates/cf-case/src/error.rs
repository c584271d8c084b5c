//! Error types for case directory operations.

use std::path::PathBuf;
use thiserror::Error;

pub type CaseResult<T> = Result<T, CaseError>;

/// Errors raised while isolating or editing a case.
///
/// All of these are fatal for the episode: a workspace that cannot be copied,
/// cleaned up, or rewritten cannot guarantee isolation.
#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Case template not found: {path}")]
    TemplateMissing { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CaseError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| CaseError::Io { path, source }
    }
}
