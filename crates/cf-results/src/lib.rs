//! cf-results: episode trajectory storage.

pub mod store;
pub mod types;

use std::path::PathBuf;

pub use store::{EpisodeRecorder, EpisodeStore};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Episode not found: {episode_id}")]
    EpisodeNotFound { episode_id: String },

    #[error("Episode already recorded: {episode_id}")]
    EpisodeExists { episode_id: String },

    #[error("Corrupt manifest {path}: {source}")]
    CorruptManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Corrupt step record in {episode_id}, line {line}: {source}")]
    CorruptStep {
        episode_id: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
