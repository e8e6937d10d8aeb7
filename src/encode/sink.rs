use std::path::PathBuf;

use anyhow::Context as _;

use crate::foundation::{
    core::{FRAME_FILE_PATTERN, FrameIndex},
    error::ScorecastResult,
};

/// A complete, gapless frame sequence ready for encoding.
#[derive(Clone, Debug)]
pub struct EncodeJob {
    /// Directory holding `frame_%06d.png` files.
    pub frames_dir: PathBuf,
    /// Number of frames, starting at index 0.
    pub frame_count: u64,
    /// Output frames-per-second.
    pub fps: u32,
    /// Container file to write.
    pub out_path: PathBuf,
}

impl EncodeJob {
    /// `frames_dir/frame_%06d.png`.
    pub fn frame_pattern(&self) -> PathBuf {
        self.frames_dir.join(FRAME_FILE_PATTERN)
    }

    /// Path of the frame file for `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.frames_dir.join(idx.file_name())
    }
}

/// Encoder contract: invoked once per run, after every frame file exists.
pub trait FrameEncoder {
    /// Encode `job` and return the path of the written output.
    fn encode(&mut self, job: &EncodeJob) -> ScorecastResult<PathBuf>;
}

/// In-memory encoder for tests and dry runs.
///
/// Reads each frame file in index order and keeps the raw bytes; nothing is written.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    job: Option<EncodeJob>,
    frames: Vec<Vec<u8>>,
}

impl InMemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The job captured by the last `encode` call, if any.
    pub fn job(&self) -> Option<&EncodeJob> {
        self.job.as_ref()
    }

    /// Encoded PNG bytes of every frame, in index order.
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }
}

impl FrameEncoder for InMemoryEncoder {
    fn encode(&mut self, job: &EncodeJob) -> ScorecastResult<PathBuf> {
        self.frames.clear();
        for idx in 0..job.frame_count {
            let path = job.frame_path(FrameIndex(idx));
            let bytes =
                std::fs::read(&path).with_context(|| format!("read frame '{}'", path.display()))?;
            self.frames.push(bytes);
        }
        self.job = Some(job.clone());
        Ok(job.out_path.clone())
    }
}
