//! cf-case: on-disk case protocol for episode workspaces.
//!
//! A case is a directory tree read and written by the external solver. This
//! crate owns the two things the control loop does to it:
//! - isolation: one full copy of the case template per episode ([`CaseWorkspace`])
//! - parameter injection: keyed rewrites of `system/controlDict` and
//!   `system/fvSolution` ([`control_dict`], [`fv_solution`])

pub mod control_dict;
pub mod dictionary;
pub mod error;
pub mod fv_solution;
pub mod workspace;

pub use control_dict::{TimeWindow, rewrite_time_window, set_time_window};
pub use dictionary::{DICT_PROTOCOL_VERSION, DictRewrite};
pub use error::{CaseError, CaseResult};
pub use fv_solution::{rewrite_relaxation_factors, set_relaxation_factors};
pub use workspace::CaseWorkspace;
