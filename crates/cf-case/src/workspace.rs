//! Per-episode isolated copy of a case template.

use std::fs;
use std::path::{Path, PathBuf};

use cf_core::EpisodeId;

use crate::error::{CaseError, CaseResult};

/// A mutable working copy of a read-only case template.
///
/// All file-system state of one episode lives under [`CaseWorkspace::root`],
/// so episodes in separate processes can share one template safely as long
/// as their roots differ.
#[derive(Debug, Clone)]
pub struct CaseWorkspace {
    template: PathBuf,
    root: PathBuf,
}

impl CaseWorkspace {
    pub fn new(template: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            root: root.into(),
        }
    }

    /// Workspace at `<workspace_root>/<episode id>`.
    pub fn for_episode(template: impl Into<PathBuf>, workspace_root: &Path, id: &EpisodeId) -> Self {
        Self::new(template, workspace_root.join(id.as_str()))
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    pub fn control_dict(&self) -> PathBuf {
        self.root.join("system").join("controlDict")
    }

    pub fn fv_solution(&self) -> PathBuf {
        self.root.join("system").join("fvSolution")
    }

    /// Combined output of the most recent invocation, `log.<application>`.
    pub fn log_path(&self, application: &str) -> PathBuf {
        self.root.join(format!("log.{application}"))
    }

    /// Replace any existing workspace with a fresh deep copy of the template.
    pub fn create(&self) -> CaseResult<()> {
        if !self.template.is_dir() {
            return Err(CaseError::TemplateMissing {
                path: self.template.clone(),
            });
        }
        self.destroy()?;
        copy_dir_all(&self.template, &self.root)?;
        tracing::info!(
            template = %self.template.display(),
            root = %self.root.display(),
            "workspace created"
        );
        Ok(())
    }

    /// Remove the workspace recursively. No-op when it does not exist.
    pub fn destroy(&self) -> CaseResult<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(CaseError::io(&self.root))?;
            tracing::info!(root = %self.root.display(), "workspace removed");
        }
        Ok(())
    }

    /// Latest solver checkpoint: the largest integer-named subdirectory, or 0.
    ///
    /// Read from disk on every call; the directory listing is the single
    /// source of truth for the current time.
    pub fn checkpoint_cursor(&self) -> CaseResult<u64> {
        let entries = fs::read_dir(&self.root).map_err(CaseError::io(&self.root))?;
        let mut latest = 0;
        for entry in entries {
            let entry = entry.map_err(CaseError::io(&self.root))?;
            let is_dir = entry
                .file_type()
                .map_err(CaseError::io(entry.path()))?
                .is_dir();
            if !is_dir {
                continue;
            }
            if let Some(time) = entry.file_name().to_str().and_then(parse_checkpoint_name) {
                latest = latest.max(time);
            }
        }
        Ok(latest)
    }
}

fn parse_checkpoint_name(name: &str) -> Option<u64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

fn copy_dir_all(src: &Path, dst: &Path) -> CaseResult<()> {
    fs::create_dir_all(dst).map_err(CaseError::io(dst))?;
    for entry in fs::read_dir(src).map_err(CaseError::io(src))? {
        let entry = entry.map_err(CaseError::io(src))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        // follow symlinks, like a plain recursive copy
        let meta = fs::metadata(&from).map_err(CaseError::io(&from))?;
        if meta.is_dir() {
            copy_dir_all(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(CaseError::io(&from))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_names_are_plain_integers() {
        assert_eq!(parse_checkpoint_name("0"), Some(0));
        assert_eq!(parse_checkpoint_name("120"), Some(120));
        assert_eq!(parse_checkpoint_name(""), None);
        assert_eq!(parse_checkpoint_name("0.5"), None);
        assert_eq!(parse_checkpoint_name("+3"), None);
        assert_eq!(parse_checkpoint_name("system"), None);
        assert_eq!(parse_checkpoint_name("99999999999999999999999"), None);
    }

    #[test]
    fn paths_are_relative_to_root() {
        let ws = CaseWorkspace::new("/tmpl", "/work/ep");
        assert_eq!(ws.control_dict(), PathBuf::from("/work/ep/system/controlDict"));
        assert_eq!(ws.fv_solution(), PathBuf::from("/work/ep/system/fvSolution"));
        assert_eq!(ws.log_path("simpleFoam"), PathBuf::from("/work/ep/log.simpleFoam"));
    }
}
