//! Convergence monitoring from solver logs.
//!
//! Each outer iteration the solver prints one line per linear solve, e.g.
//!
//! ```text
//! smoothSolver:  Solving for Ux, Initial residual = 0.0123, Final residual = 8.1e-05, No Iterations 4
//! DICPCG:  Solving for p, Initial residual = 0.0456, Final residual = 0.0041, No Iterations 12
//! ```
//!
//! The last occurrence of each marker in a log is the final linearized solve
//! of the iteration; earlier occurrences (correctors) are ignored.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use cf_core::Real;
use regex::Regex;

use crate::error::{SolverError, SolverResult};

static UX_RESIDUAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Solving for Ux\b.*Initial residual = ([^,\s]+)").expect("valid Ux pattern")
});
static P_RESIDUAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Solving for p\b.*Initial residual = ([^,\s]+)").expect("valid p pattern")
});
static TIME_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Time = (\d+)").expect("valid Time pattern"));

/// Monitored residual quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResidualField {
    /// x-component of the velocity field.
    Ux,
    /// Pressure.
    P,
}

impl fmt::Display for ResidualField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResidualField::Ux => f.write_str("Ux"),
            ResidualField::P => f.write_str("p"),
        }
    }
}

/// Latest initial residuals of one outer iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResidualPair {
    pub u: Real,
    pub p: Real,
}

/// Why an iteration is classified as diverged.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DivergenceCause {
    #[error("solver invocation failed")]
    SolverFailed,

    #[error("log unavailable: {reason}")]
    LogUnavailable { reason: String },

    #[error("no {field} residual in log")]
    MarkerMissing { field: ResidualField },

    #[error("unparseable {field} residual: {token:?}")]
    Unparseable { field: ResidualField, token: String },

    #[error("non-finite {field} residual: {value}")]
    NonFinite { field: ResidualField, value: Real },

    #[error("negative {field} residual: {value}")]
    Negative { field: ResidualField, value: Real },
}

/// Outcome of one outer iteration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConvergenceOutcome {
    Progressed(ResidualPair),
    Diverged(DivergenceCause),
}

impl ConvergenceOutcome {
    pub fn is_diverged(&self) -> bool {
        matches!(self, ConvergenceOutcome::Diverged(_))
    }
}

/// Classify log text.
pub fn parse_residuals(log: &str) -> ConvergenceOutcome {
    let pair = last_residual(log, &UX_RESIDUAL, ResidualField::Ux).and_then(|u| {
        last_residual(log, &P_RESIDUAL, ResidualField::P).map(|p| ResidualPair { u, p })
    });
    match pair {
        Ok(pair) => ConvergenceOutcome::Progressed(pair),
        Err(cause) => ConvergenceOutcome::Diverged(cause),
    }
}

/// Read and classify the log at `path`. An absent or unreadable log diverges.
pub fn read_residuals(path: &Path) -> ConvergenceOutcome {
    match fs::read(path) {
        Ok(bytes) => parse_residuals(&String::from_utf8_lossy(&bytes)),
        Err(e) => ConvergenceOutcome::Diverged(DivergenceCause::LogUnavailable {
            reason: format!("{}: {e}", path.display()),
        }),
    }
}

fn last_residual(log: &str, pattern: &Regex, field: ResidualField) -> Result<Real, DivergenceCause> {
    let token = pattern
        .captures_iter(log)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(DivergenceCause::MarkerMissing { field })?;

    let value: Real = token.parse().map_err(|_| DivergenceCause::Unparseable {
        field,
        token: token.to_owned(),
    })?;
    if !value.is_finite() {
        return Err(DivergenceCause::NonFinite { field, value });
    }
    // residual norms are non-negative; anything else is a corrupt log
    if value < 0.0 {
        return Err(DivergenceCause::Negative { field, value });
    }
    Ok(value)
}

/// Value of the last `Time = <int>` line, as printed once per outer iteration.
///
/// Used to count the iterations of a reference run.
pub fn last_reported_time(log: &str) -> Option<u64> {
    TIME_MARKER
        .captures_iter(log)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .last()
}

pub fn read_last_reported_time(path: &Path) -> SolverResult<Option<u64>> {
    let content = fs::read(path).map_err(|source| SolverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(last_reported_time(&String::from_utf8_lossy(&content)))
}
