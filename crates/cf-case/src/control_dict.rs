//! Time window directives in `system/controlDict`.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::dictionary::{DictRewrite, rewrite_file, substitute};
use crate::error::CaseResult;

/// Restart mode written on every update.
///
/// Together with a start marker equal to the latest checkpoint this makes the
/// solver resume from its last computed state.
pub const RESTART_MODE: &str = "startTime";

static START_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bstartFrom\s+\w+;").expect("valid startFrom pattern"));
static START_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bstartTime\s+[0-9.]+;").expect("valid startTime pattern"));
static END_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bendTime\s+[0-9.]+;").expect("valid endTime pattern"));

/// Outer-iteration window handed to one solver invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: u64,
    pub end: u64,
}

impl TimeWindow {
    /// Advance exactly one outer iteration past `start`.
    pub fn single_step(start: u64) -> Self {
        Self {
            start,
            end: start + 1,
        }
    }
}

/// Rewrite restart mode and start/end markers in controlDict text.
pub fn rewrite_time_window(content: &str, window: TimeWindow) -> DictRewrite {
    let mut missing = Vec::new();
    let content = substitute(
        content.to_owned(),
        "startFrom",
        &START_FROM,
        &format!("startFrom\t{RESTART_MODE};"),
        &mut missing,
    );
    let content = substitute(
        content,
        "startTime",
        &START_TIME,
        &format!("startTime\t{};", window.start),
        &mut missing,
    );
    let content = substitute(
        content,
        "endTime",
        &END_TIME,
        &format!("endTime\t{};", window.end),
        &mut missing,
    );
    DictRewrite { content, missing }
}

/// Apply [`rewrite_time_window`] to a controlDict file in place.
pub fn set_time_window(path: &Path, window: TimeWindow) -> CaseResult<DictRewrite> {
    tracing::debug!(start = window.start, end = window.end, "setting time window");
    rewrite_file(path, |content| rewrite_time_window(content, window))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROL_DICT: &str = "FoamFile { format ascii; class dictionary; location \"system\"; object controlDict; }
application     simpleFoam;
startFrom       latestTime;
startTime       0;
stopAt          endTime;
endTime         1000;
deltaT          1;
writeControl    timeStep;
writeInterval   50;";

    #[test]
    fn rewrites_all_three_directives() {
        let out = rewrite_time_window(CONTROL_DICT, TimeWindow::single_step(7));
        assert!(out.is_complete());
        assert!(out.content.contains("startFrom\tstartTime;"));
        assert!(out.content.contains("startTime\t7;"));
        assert!(out.content.contains("endTime\t8;"));
        // stopAt takes a word, not a number, and must survive
        assert!(out.content.contains("stopAt          endTime;"));
        assert!(out.content.contains("deltaT          1;"));
    }

    #[test]
    fn second_rewrite_replaces_previous_values() {
        let first = rewrite_time_window(CONTROL_DICT, TimeWindow::single_step(3));
        let second = rewrite_time_window(&first.content, TimeWindow::single_step(4));
        assert!(second.content.contains("startTime\t4;"));
        assert!(second.content.contains("endTime\t5;"));
        assert!(!second.content.contains("startTime\t3;"));
    }

    #[test]
    fn missing_keys_are_reported_and_text_kept() {
        let text = "application simpleFoam;\ndeltaT 1;\n";
        let out = rewrite_time_window(text, TimeWindow::single_step(0));
        assert_eq!(out.content, text);
        assert_eq!(out.missing, vec!["startFrom", "startTime", "endTime"]);
    }

    #[test]
    fn single_step_window_ends_one_past_start() {
        let w = TimeWindow::single_step(41);
        assert_eq!(w.end, w.start + 1);
    }
}
