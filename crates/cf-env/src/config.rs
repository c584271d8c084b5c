//! Control-loop configuration, stored as YAML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EnvError, EnvResult};
use crate::policy::RewardPolicy;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvConfig {
    /// Script sourced before every solver command.
    pub env_script: PathBuf,
    /// Read-only case template copied into each episode workspace.
    pub template_dir: PathBuf,
    /// Parent directory of episode workspaces.
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,
    #[serde(default = "default_shell")]
    pub shell: PathBuf,
    /// Solver application run once per step; also names the log file.
    #[serde(default = "default_solver")]
    pub solver: String,
    /// Meshing command run once per reset.
    #[serde(default = "default_mesher")]
    pub mesher: String,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default)]
    pub reward: RewardPolicy,
}

fn default_workspace_root() -> PathBuf {
    std::env::temp_dir()
}

fn default_shell() -> PathBuf {
    PathBuf::from("/bin/bash")
}

fn default_solver() -> String {
    "simpleFoam".to_string()
}

fn default_mesher() -> String {
    "blockMesh".to_string()
}

fn default_max_steps() -> usize {
    100
}

impl EnvConfig {
    /// Config with defaults for everything but the two required paths.
    pub fn new(env_script: impl Into<PathBuf>, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            env_script: env_script.into(),
            template_dir: template_dir.into(),
            workspace_root: default_workspace_root(),
            shell: default_shell(),
            solver: default_solver(),
            mesher: default_mesher(),
            max_steps: default_max_steps(),
            reward: RewardPolicy::default(),
        }
    }

    /// Check internal consistency. Does not touch the file system.
    pub fn validate(&self) -> EnvResult<()> {
        if self.max_steps == 0 {
            return Err(invalid("max_steps must be positive"));
        }
        if self.solver.trim().is_empty() {
            return Err(invalid("solver must not be empty"));
        }
        if self.mesher.trim().is_empty() {
            return Err(invalid("mesher must not be empty"));
        }
        // the solver name becomes part of the log file name
        if self.solver.contains(['/', '\\']) {
            return Err(invalid("solver must be a bare command name"));
        }
        self.reward.check()?;
        Ok(())
    }
}

fn invalid(what: &str) -> EnvError {
    EnvError::InvalidConfig {
        what: what.to_string(),
    }
}

pub fn load_yaml(path: &Path) -> EnvResult<EnvConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| EnvError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EnvConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &EnvConfig) -> EnvResult<()> {
    config.validate()?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content).map_err(|source| EnvError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_gets_defaults() {
        let yaml = "env_script: /opt/openfoam12/etc/bashrc\ntemplate_dir: cavity_base\n";
        let config: EnvConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config, EnvConfig::new("/opt/openfoam12/etc/bashrc", "cavity_base"));
        assert_eq!(config.solver, "simpleFoam");
        assert_eq!(config.mesher, "blockMesh");
        assert_eq!(config.max_steps, 100);
        assert_eq!(config.reward.divergence_penalty, -200.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_reward_section_keeps_other_defaults() {
        let yaml = "env_script: a\ntemplate_dir: b\nmax_steps: 5\nreward:\n  convergence_bonus: 50.0\n";
        let config: EnvConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.max_steps, 5);
        assert_eq!(config.reward.convergence_bonus, 50.0);
        assert_eq!(config.reward.convergence_threshold, 1e-5);
    }

    #[test]
    fn missing_required_path_is_rejected() {
        assert!(serde_yaml::from_str::<EnvConfig>("template_dir: b\n").is_err());
    }

    #[test]
    fn validate_rejects_zero_steps_and_bad_names() {
        let mut config = EnvConfig::new("a", "b");
        config.max_steps = 0;
        assert!(matches!(config.validate(), Err(EnvError::InvalidConfig { .. })));

        let mut config = EnvConfig::new("a", "b");
        config.solver = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = EnvConfig::new("a", "b");
        config.solver = "../simpleFoam".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("env.yaml");
        let mut config = EnvConfig::new("/opt/foam/bashrc", "/cases/cavity");
        config.max_steps = 25;
        save_yaml(&path, &config).unwrap();
        assert_eq!(load_yaml(&path).unwrap(), config);
    }
}
