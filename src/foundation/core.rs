use crate::foundation::error::{ScorecastError, ScorecastResult};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Clock time of this frame in seconds (`index / fps`).
    pub fn clock_secs(self, fps: u32) -> f64 {
        (self.0 as f64) / f64::from(fps)
    }

    /// File name used for this frame inside a frame workspace.
    pub fn file_name(self) -> String {
        format!("frame_{:06}.png", self.0)
    }
}

/// `printf`-style pattern matching [`FrameIndex::file_name`], as understood by `ffmpeg`'s image2
/// demuxer.
pub const FRAME_FILE_PATTERN: &str = "frame_%06d.png";

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Range covering `[0, total)`.
    pub fn from_total(total: u64) -> Self {
        Self {
            start: FrameIndex(0),
            end: FrameIndex(total),
        }
    }

    /// Iterate frame indices in strictly increasing order.
    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

/// Fixed render viewport in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> ScorecastResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScorecastError::config(
                "viewport width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Number of output frames for `duration` seconds at `fps`: `floor(duration * fps)`.
pub fn total_frames(duration_secs: f64, fps: u32) -> u64 {
    (duration_secs * f64::from(fps)).floor().max(0.0) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
