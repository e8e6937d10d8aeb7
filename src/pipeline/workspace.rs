use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::{core::FrameIndex, error::ScorecastResult};

/// Per-run scratch directory holding `frame_%06d.png` files.
///
/// Exclusively owned by one pipeline run. [`FrameWorkspace::finish`] is the teardown step and must
/// be called on every exit path; it removes the directory unless retention was requested.
#[derive(Debug)]
pub struct FrameWorkspace {
    dir: tempfile::TempDir,
    keep: bool,
}

impl FrameWorkspace {
    pub fn create(keep: bool) -> ScorecastResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("scorecast-frames-")
            .tempdir()
            .context("create frame workspace")?;
        Ok(Self { dir, keep })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.path().join(idx.file_name())
    }

    /// Tear the workspace down. Returns the retained directory when `keep` was set.
    pub fn finish(self) -> ScorecastResult<Option<PathBuf>> {
        if self.keep {
            let path = self.dir.keep();
            tracing::info!(dir = %path.display(), "kept generated frames");
            return Ok(Some(path));
        }

        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .with_context(|| format!("remove frame workspace '{}'", path.display()))?;
        tracing::debug!(dir = %path.display(), "removed frame workspace");
        Ok(None)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/workspace.rs"]
mod tests;
