//! Episode storage API.
//!
//! Layout: `<root>/<episode_id>/manifest.json` and `steps.jsonl`.
//!
//! A rollout is recorded while it runs: [`EpisodeStore::begin_episode`]
//! writes an `Incomplete` manifest, each step is appended to `steps.jsonl` as
//! soon as it is known, and [`EpisodeRecorder::finish`] replaces the manifest
//! with the final summary. An interrupted rollout therefore leaves every
//! completed step on disk.

use crate::types::{EpisodeManifest, StepRecord};
use crate::{ResultsError, ResultsResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const STEPS_FILE: &str = "steps.jsonl";

#[derive(Clone)]
pub struct EpisodeStore {
    root_dir: PathBuf,
}

impl EpisodeStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> ResultsResult<Self> {
        let root_dir = root_dir.into();
        fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    fn episode_dir(&self, episode_id: &str) -> PathBuf {
        self.root_dir.join(episode_id)
    }

    pub fn has_episode(&self, episode_id: &str) -> bool {
        self.episode_dir(episode_id).join(MANIFEST_FILE).is_file()
    }

    /// Start recording the episode described by `manifest`.
    ///
    /// Refuses to overwrite an episode that is already stored.
    pub fn begin_episode(&self, manifest: &EpisodeManifest) -> ResultsResult<EpisodeRecorder> {
        if self.has_episode(&manifest.episode_id) {
            return Err(ResultsError::EpisodeExists {
                episode_id: manifest.episode_id.clone(),
            });
        }
        let dir = self.episode_dir(&manifest.episode_id);
        fs::create_dir_all(&dir)?;
        write_manifest(&dir, manifest)?;
        let steps = File::create(dir.join(STEPS_FILE))?;
        Ok(EpisodeRecorder { dir, steps })
    }

    pub fn load_manifest(&self, episode_id: &str) -> ResultsResult<EpisodeManifest> {
        let path = self.episode_dir(episode_id).join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ResultsError::EpisodeNotFound {
                episode_id: episode_id.to_string(),
            });
        }
        read_manifest(&path)
    }

    pub fn load_steps(&self, episode_id: &str) -> ResultsResult<Vec<StepRecord>> {
        let path = self.episode_dir(episode_id).join(STEPS_FILE);
        if !path.is_file() {
            return Err(ResultsError::EpisodeNotFound {
                episode_id: episode_id.to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|source| ResultsError::CorruptStep {
                    episode_id: episode_id.to_string(),
                    line: i + 1,
                    source,
                })
            })
            .collect()
    }

    /// All stored manifests, oldest first.
    ///
    /// Directories without a manifest are not episodes and are skipped. A
    /// manifest that exists but cannot be parsed is an error.
    pub fn list_episodes(&self) -> ResultsResult<Vec<EpisodeManifest>> {
        let mut episodes = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path().join(MANIFEST_FILE);
            if path.is_file() {
                episodes.push(read_manifest(&path)?);
            }
        }
        episodes.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        Ok(episodes)
    }

    pub fn delete_episode(&self, episode_id: &str) -> ResultsResult<()> {
        let dir = self.episode_dir(episode_id);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}

/// Open episode being written by [`EpisodeStore::begin_episode`].
pub struct EpisodeRecorder {
    dir: PathBuf,
    steps: File,
}

impl EpisodeRecorder {
    /// Append one step as a single JSON line.
    pub fn append(&mut self, step: &StepRecord) -> ResultsResult<()> {
        let mut line = serde_json::to_string(step)?;
        line.push('\n');
        self.steps.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Flush the step log and store the final summary.
    pub fn finish(mut self, manifest: &EpisodeManifest) -> ResultsResult<()> {
        self.steps.flush()?;
        self.steps.sync_all()?;
        write_manifest(&self.dir, manifest)
    }
}

fn read_manifest(path: &Path) -> ResultsResult<EpisodeManifest> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ResultsError::CorruptManifest {
        path: path.to_path_buf(),
        source,
    })
}

/// Write through a temporary file so readers never see a half-written manifest.
fn write_manifest(dir: &Path, manifest: &EpisodeManifest) -> ResultsResult<()> {
    let tmp = dir.join(format!("{MANIFEST_FILE}.tmp"));
    fs::write(&tmp, serde_json::to_string_pretty(manifest)?)?;
    fs::rename(tmp, dir.join(MANIFEST_FILE))?;
    Ok(())
}
