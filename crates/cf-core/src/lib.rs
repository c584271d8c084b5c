//! cf-core: stable foundation for cfdgym.
//!
//! Contains:
//! - numeric (Real + float helpers)
//! - action (relaxation coefficient pair, clamped to its admissible range)
//! - ids (episode identifiers, unique within a process tree)
//! - error (shared error types)

pub mod action;
pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use action::{Action, RELAXATION_MAX, RELAXATION_MIN};
pub use error::{CfError, CfResult};
pub use ids::EpisodeId;
pub use numeric::*;
