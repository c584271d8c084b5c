//! Relaxation factor directives in `system/fvSolution`.

use std::path::Path;
use std::sync::LazyLock;

use cf_core::Action;
use regex::Regex;

use crate::dictionary::{DictRewrite, rewrite_file, substitute};
use crate::error::CaseResult;

static U_FACTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bU(?P<ws>\s+)[0-9.]+").expect("valid U pattern"));
static P_FACTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bp(?P<ws>\s+)[0-9.]+").expect("valid p pattern"));

/// Rewrite the `U` and `p` coefficients with three decimals.
///
/// The action is clamped again before formatting.
pub fn rewrite_relaxation_factors(content: &str, action: Action) -> DictRewrite {
    let action = action.clamped();
    let mut missing = Vec::new();
    let content = substitute(
        content.to_owned(),
        "U",
        &U_FACTOR,
        &format!("U${{ws}}{:.3}", action.u()),
        &mut missing,
    );
    let content = substitute(
        content,
        "p",
        &P_FACTOR,
        &format!("p${{ws}}{:.3}", action.p()),
        &mut missing,
    );
    DictRewrite { content, missing }
}

/// Apply [`rewrite_relaxation_factors`] to an fvSolution file in place.
pub fn set_relaxation_factors(path: &Path, action: Action) -> CaseResult<DictRewrite> {
    tracing::debug!(u = action.u(), p = action.p(), "setting relaxation factors");
    rewrite_file(path, |content| rewrite_relaxation_factors(content, action))
}
