//! Episode record types.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpisodeManifest {
    pub episode_id: String,
    /// RFC 3339, UTC, microsecond precision.
    pub started_at: String,
    pub solver: String,
    pub max_steps: usize,
    pub steps: usize,
    pub total_reward: f64,
    pub outcome: EpisodeOutcome,
}

impl EpisodeManifest {
    /// Manifest for an episode starting now, with no steps yet.
    pub fn begin(episode_id: impl Into<String>, solver: impl Into<String>, max_steps: usize) -> Self {
        Self {
            episode_id: episode_id.into(),
            started_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            solver: solver.into(),
            max_steps,
            steps: 0,
            total_reward: 0.0,
            outcome: EpisodeOutcome::Incomplete,
        }
    }

    /// Fold one step into the running summary.
    pub fn record(&mut self, step: &StepRecord) {
        self.steps += 1;
        self.total_reward += step.reward;
        self.outcome = EpisodeOutcome::after(step);
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum EpisodeOutcome {
    Converged,
    Diverged,
    Truncated,
    /// Stopped before any terminal condition.
    Incomplete,
}

impl EpisodeOutcome {
    /// Outcome of an episode whose latest step is `last`.
    pub fn after(last: &StepRecord) -> Self {
        if last.terminated && last.divergence.is_some() {
            Self::Diverged
        } else if last.terminated {
            Self::Converged
        } else if last.truncated {
            Self::Truncated
        } else {
            Self::Incomplete
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    pub action_u: f64,
    pub action_p: f64,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub residual_u: Option<f64>,
    pub residual_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divergence: Option<String>,
}
