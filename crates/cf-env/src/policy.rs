//! Reward and termination policy.

use cf_core::{CfError, CfResult, Real, ensure_finite};
use cf_solver::ConvergenceOutcome;
use serde::{Deserialize, Serialize};

/// Reward shaping parameters.
///
/// A progressed step earns `-log10(p + residual_floor)`, which grows as the
/// pressure residual decays. Falling below `convergence_threshold` adds
/// `convergence_bonus` and ends the episode; divergence earns
/// `divergence_penalty` and ends the episode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RewardPolicy {
    pub divergence_penalty: Real,
    pub convergence_bonus: Real,
    pub convergence_threshold: Real,
    pub residual_floor: Real,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            divergence_penalty: -200.0,
            convergence_bonus: 100.0,
            convergence_threshold: 1e-5,
            residual_floor: 1e-10,
        }
    }
}

/// Reward and terminal flag for one step, before truncation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Judgement {
    pub reward: Real,
    pub terminated: bool,
}

impl RewardPolicy {
    pub fn judge(&self, outcome: &ConvergenceOutcome) -> Judgement {
        match outcome {
            ConvergenceOutcome::Diverged(_) => Judgement {
                reward: self.divergence_penalty,
                terminated: true,
            },
            ConvergenceOutcome::Progressed(pair) => {
                let mut reward = -(pair.p + self.residual_floor).log10();
                let converged = pair.p < self.convergence_threshold;
                if converged {
                    reward += self.convergence_bonus;
                }
                Judgement {
                    reward,
                    terminated: converged,
                }
            }
        }
    }

    pub(crate) fn check(&self) -> CfResult<()> {
        ensure_finite(self.divergence_penalty, "reward.divergence_penalty")?;
        ensure_finite(self.convergence_bonus, "reward.convergence_bonus")?;
        ensure_finite(self.convergence_threshold, "reward.convergence_threshold")?;
        ensure_finite(self.residual_floor, "reward.residual_floor")?;
        if self.convergence_threshold <= 0.0 {
            return Err(CfError::InvalidArg {
                what: "reward.convergence_threshold must be positive",
            });
        }
        if self.residual_floor <= 0.0 {
            return Err(CfError::InvalidArg {
                what: "reward.residual_floor must be positive",
            });
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use cf_solver::ResidualPair;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn reward_decreases_as_residual_grows(a in 1e-5_f64..1.0, b in 1e-5_f64..1.0) {
            prop_assume!(a < b);
            let policy = RewardPolicy::default();
            let ra = policy.judge(&ConvergenceOutcome::Progressed(ResidualPair { u: 0.1, p: a })).reward;
            let rb = policy.judge(&ConvergenceOutcome::Progressed(ResidualPair { u: 0.1, p: b })).reward;
            prop_assert!(ra >= rb);
        }
    }
}
