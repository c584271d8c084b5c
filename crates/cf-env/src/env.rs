//! Reset/step/close façade over one episode workspace.

use cf_case::{CaseError, CaseWorkspace, TimeWindow, set_relaxation_factors, set_time_window};
use cf_core::{Action, EpisodeId, Real};
use cf_solver::{
    ConvergenceOutcome, DivergenceCause, ShellInvoker, SolverInvoker, read_residuals,
};
use serde::{Deserialize, Serialize};

use crate::config::EnvConfig;
use crate::error::{EnvError, EnvResult};
use crate::observation::{Observation, ResidualHistory};

/// Diagnostics attached to a reset or step. Carries no agent-facing state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StepInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<usize>,
    /// Start of the time window handed to the solver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divergence: Option<String>,
}

/// Result of one environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: Real,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

/// Solver-in-the-loop environment.
///
/// One instance owns one workspace path for its whole life; `reset` replaces
/// the workspace contents and `close` removes it. Nothing is cleaned up on
/// drop: call [`CfdEnv::close`] so removal failures are observed.
pub struct CfdEnv<I = ShellInvoker> {
    config: EnvConfig,
    invoker: I,
    episode_id: EpisodeId,
    workspace: CaseWorkspace,
    history: ResidualHistory,
    step_count: usize,
    live: bool,
}

impl CfdEnv<ShellInvoker> {
    /// Production environment. Fails immediately if the environment script or
    /// the case template is missing.
    pub fn new(config: EnvConfig) -> EnvResult<Self> {
        config.validate()?;
        let invoker = ShellInvoker::new(&config.shell, &config.env_script)?;
        Self::with_invoker(config, invoker)
    }
}

impl<I: SolverInvoker> CfdEnv<I> {
    pub fn with_invoker(config: EnvConfig, invoker: I) -> EnvResult<Self> {
        config.validate()?;
        if !config.template_dir.is_dir() {
            return Err(CaseError::TemplateMissing {
                path: config.template_dir.clone(),
            }
            .into());
        }
        let episode_id = EpisodeId::generate();
        let workspace =
            CaseWorkspace::for_episode(&config.template_dir, &config.workspace_root, &episode_id);
        Ok(Self {
            config,
            invoker,
            episode_id,
            workspace,
            history: ResidualHistory::default(),
            step_count: 0,
            live: false,
        })
    }

    /// Start a new episode on a fresh copy of the template.
    ///
    /// Runs the mesher once; a meshing failure is logged and surfaces as
    /// divergence on the first step. The initial observation is all zeros.
    pub fn reset(&mut self) -> EnvResult<(Observation, StepInfo)> {
        self.step_count = 0;
        self.history.clear();
        self.live = false;

        self.workspace.create()?;
        self.live = true;

        let log = self.workspace.log_path(&self.config.solver);
        if !self
            .invoker
            .run(self.workspace.root(), &self.config.mesher, &log)
        {
            tracing::warn!(
                episode = %self.episode_id,
                mesher = %self.config.mesher,
                "meshing failed"
            );
        }
        tracing::info!(episode = %self.episode_id, "episode reset");

        Ok((self.history.observation(), StepInfo::default()))
    }

    /// Apply `action`, advance the solver one outer iteration, and score it.
    ///
    /// Solver failures and unusable logs end the episode with the divergence
    /// penalty and leave the observation unchanged. Errors are returned only
    /// when the workspace itself cannot be read or written.
    pub fn step(&mut self, action: impl Into<Action>) -> EnvResult<StepResult> {
        if !self.live {
            return Err(EnvError::NotReset);
        }
        let action = action.into().clamped();

        set_relaxation_factors(&self.workspace.fv_solution(), action)?;
        let checkpoint = self.workspace.checkpoint_cursor()?;
        set_time_window(
            &self.workspace.control_dict(),
            TimeWindow::single_step(checkpoint),
        )?;
        // only a step that reaches the solver counts against the budget
        self.step_count += 1;

        let log = self.workspace.log_path(&self.config.solver);
        let outcome = if self
            .invoker
            .run(self.workspace.root(), &self.config.solver, &log)
        {
            read_residuals(&log)
        } else {
            ConvergenceOutcome::Diverged(DivergenceCause::SolverFailed)
        };

        let judgement = self.config.reward.judge(&outcome);
        let divergence = match &outcome {
            ConvergenceOutcome::Progressed(pair) => {
                self.history.push(*pair);
                None
            }
            ConvergenceOutcome::Diverged(cause) => {
                tracing::warn!(episode = %self.episode_id, step = self.step_count, %cause, "diverged");
                Some(cause.to_string())
            }
        };
        let truncated = self.step_count >= self.config.max_steps;

        tracing::debug!(
            episode = %self.episode_id,
            step = self.step_count,
            checkpoint,
            u = action.u(),
            p = action.p(),
            reward = judgement.reward,
            terminated = judgement.terminated,
            truncated,
            "step"
        );

        Ok(StepResult {
            observation: self.history.observation(),
            reward: judgement.reward,
            terminated: judgement.terminated,
            truncated,
            info: StepInfo {
                step: Some(self.step_count),
                checkpoint: Some(checkpoint),
                divergence,
            },
        })
    }

    /// Remove the workspace. Safe to call repeatedly.
    pub fn close(&mut self) -> EnvResult<()> {
        self.live = false;
        self.workspace.destroy()?;
        Ok(())
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn episode_id(&self) -> &EpisodeId {
        &self.episode_id
    }

    pub fn workspace(&self) -> &CaseWorkspace {
        &self.workspace
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn max_steps(&self) -> usize {
        self.config.max_steps
    }

    pub fn observation(&self) -> Observation {
        self.history.observation()
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }
}
