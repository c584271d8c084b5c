//! External solver boundary.
//!
//! Provides:
//! - [`SolverInvoker`]: synchronous, single-shot execution of a solver command
//!   inside a case directory, output merged into one log file
//! - [`ShellInvoker`]: the production invoker (environment script + command)
//! - [`monitor`]: residual extraction and divergence classification from logs

pub mod error;
pub mod invoker;
pub mod monitor;

pub use error::{SolverError, SolverResult};
pub use invoker::{ShellInvoker, SolverInvoker};
pub use monitor::{
    ConvergenceOutcome, DivergenceCause, ResidualField, ResidualPair, last_reported_time,
    parse_residuals, read_last_reported_time, read_residuals,
};
