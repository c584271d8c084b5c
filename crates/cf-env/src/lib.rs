//! Episode-scoped control loop around an external iterative solver.
//!
//! [`CfdEnv`] exposes a reset/step/close lifecycle to a learning agent. Each
//! step injects the agent's relaxation coefficients and a one-iteration time
//! window into an isolated case copy, runs the solver once, and turns the
//! log's residuals into a reward, an observation and termination flags.
//!
//! # Failure contract
//!
//! - setup and cleanup failures are returned as [`EnvError`]
//! - solver crashes, missing logs and non-finite residuals are not errors:
//!   they all end the episode with the divergence penalty

pub mod config;
pub mod env;
pub mod error;
pub mod observation;
pub mod policy;

pub use config::{EnvConfig, load_yaml, save_yaml};
pub use env::{CfdEnv, StepInfo, StepResult};
pub use error::{EnvError, EnvResult};
pub use observation::{OBSERVATION_LEN, Observation, ResidualHistory};
pub use policy::{Judgement, RewardPolicy};
