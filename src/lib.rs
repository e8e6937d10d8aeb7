//! scorecast turns a sparse, timestamped parameter table into a transparent video overlay.
//!
//! # Pipeline overview
//!
//! 1. **Timeline**: CSV rows -> [`Timeline`] of [`Event`]s sorted by timestamp
//! 2. **Resolve**: frame clock `index / fps` -> active parameter set (held-last-value)
//! 3. **Fill**: [`Template`] + [`GlobalParams`] + event params -> markup
//! 4. **Render**: markup -> raster via a [`RenderBackend`] (SVG in-process, or headless Chromium)
//! 5. **Trim**: crop fully transparent borders ([`trim_transparent_borders`])
//! 6. **Encode**: the `frame_%06d.png` sequence -> one container via a [`FrameEncoder`]
//!
//! Consecutive frames whose parameter sets are equal are not re-rendered: the [`FrameCache`]
//! copies the previous frame file instead. Overlays are often static for seconds at a time, so
//! most frames are copies.
#![forbid(unsafe_code)]

mod cache;
mod foundation;
mod normalize;
mod pipeline;
mod template;
mod timeline;

/// Encoders for the finished frame sequence.
pub mod encode;
/// Rendering backends.
pub mod render;

pub use crate::cache::frame_cache::{CacheDecision, FrameCache};
pub use crate::foundation::core::{
    FRAME_FILE_PATTERN, FrameIndex, FrameRange, Viewport, total_frames,
};
pub use crate::foundation::error::{ScorecastError, ScorecastResult};
pub use crate::normalize::trim::{TrimOutcome, alpha_bounding_box, trim_transparent_borders};
pub use crate::pipeline::driver::{
    OverlayOpts, OverlayPipeline, OverlayReport, PipelineState, RenderStats, resolve_duration,
};
pub use crate::pipeline::workspace::FrameWorkspace;
pub use crate::template::engine::{GlobalParams, Template, fill};
pub use crate::timeline::store::{Event, ParamSet, TIMESTAMP_COLUMN, Timeline, TimelineCursor};

pub use crate::encode::ffmpeg::{
    FfmpegEncoder, FfmpegEncoderOpts, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use crate::encode::sink::{EncodeJob, FrameEncoder, InMemoryEncoder};
pub use crate::render::backend::{BackendKind, BackendOpts, RenderBackend, create_backend};
pub use crate::render::chromium::{ChromiumBackend, ChromiumBackendOpts};
pub use crate::render::svg::{SvgBackend, SvgBackendOpts};
