use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    cache::frame_cache::{CacheDecision, FrameCache},
    encode::sink::{EncodeJob, FrameEncoder},
    foundation::{
        core::{FrameRange, Viewport, total_frames},
        error::{ScorecastError, ScorecastResult},
    },
    normalize::trim::trim_transparent_borders,
    pipeline::workspace::FrameWorkspace,
    render::backend::RenderBackend,
    template::engine::{GlobalParams, Template},
    timeline::store::{TIMESTAMP_COLUMN, Timeline},
};

/// Lifecycle of one [`OverlayPipeline::run`].
///
/// `Idle -> BackendReady -> Rendering -> Encoding -> Done`; any step may end in `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PipelineState {
    Idle,
    BackendReady,
    Rendering,
    Encoding,
    Done,
    Failed,
}

/// Run options, usually filled from the CLI.
#[derive(Clone, Debug)]
pub struct OverlayOpts {
    /// Output frames-per-second.
    pub fps: u32,
    /// Total duration in seconds; defaults to one second past the last event.
    pub duration: Option<f64>,
    /// Render viewport.
    pub viewport: Viewport,
    /// Keep the frame workspace after the run.
    pub keep_frames: bool,
    /// Log progress every this many frames (0 disables).
    pub progress_every: u64,
}

impl Default for OverlayOpts {
    fn default() -> Self {
        Self {
            fps: 5,
            duration: None,
            viewport: Viewport::default(),
            keep_frames: false,
            progress_every: 30,
        }
    }
}

impl OverlayOpts {
    pub fn validate(&self) -> ScorecastResult<()> {
        if self.fps == 0 {
            return Err(ScorecastError::config("fps must be non-zero"));
        }
        if let Some(d) = self.duration
            && !(d.is_finite() && d > 0.0)
        {
            return Err(ScorecastError::config(format!(
                "duration must be a positive number of seconds, got {d}"
            )));
        }
        Viewport::new(self.viewport.width, self.viewport.height)?;
        Ok(())
    }
}

/// Configured duration, or `last_event.timestamp + 1.0`.
pub fn resolve_duration(opts: &OverlayOpts, timeline: &Timeline) -> f64 {
    opts.duration.unwrap_or_else(|| timeline.default_duration())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    pub frames_total: u64,
    pub frames_rendered: u64,
    pub frames_reused: u64,
}

/// Summary of a successful run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct OverlayReport {
    /// Path reported by the encoder.
    pub out_path: PathBuf,
    pub duration_secs: f64,
    pub fps: u32,
    pub stats: RenderStats,
    /// Retained frame directory, when `keep_frames` was set.
    pub frames_dir: Option<PathBuf>,
}

/// Drives one overlay run over a timeline, a template and global values.
///
/// Frames are produced strictly in index order: the timeline cursor and the frame cache both
/// rely on a monotonic clock.
pub struct OverlayPipeline {
    timeline: Timeline,
    template: Template,
    globals: GlobalParams,
    opts: OverlayOpts,
    state: PipelineState,
}

impl OverlayPipeline {
    pub fn new(
        timeline: Timeline,
        template: Template,
        globals: GlobalParams,
        opts: OverlayOpts,
    ) -> ScorecastResult<Self> {
        opts.validate()?;
        let pipeline = Self {
            timeline,
            template,
            globals,
            opts,
            state: PipelineState::Idle,
        };
        if pipeline.total_frames() == 0 {
            return Err(ScorecastError::config(format!(
                "duration {}s at {} fps produces no frames",
                pipeline.duration_secs(),
                pipeline.opts.fps
            )));
        }
        Ok(pipeline)
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn duration_secs(&self) -> f64 {
        resolve_duration(&self.opts, &self.timeline)
    }

    /// `floor(duration * fps)`.
    pub fn total_frames(&self) -> u64 {
        total_frames(self.duration_secs(), self.opts.fps)
    }

    /// Render every frame, encode them, and release `backend` on every exit path.
    pub fn run(
        &mut self,
        backend: &mut dyn RenderBackend,
        encoder: &mut dyn FrameEncoder,
        out_path: &Path,
    ) -> ScorecastResult<OverlayReport> {
        let span = tracing::info_span!("overlay", backend = backend.name());
        let _enter = span.enter();

        self.state = PipelineState::Idle;
        let outcome = self.acquire_and_run(backend, encoder, out_path);
        let released = backend.release();

        match (outcome, released) {
            (Ok(report), Ok(())) => {
                self.transition(PipelineState::Done);
                tracing::info!(
                    out = %report.out_path.display(),
                    rendered = report.stats.frames_rendered,
                    reused = report.stats.frames_reused,
                    "overlay written"
                );
                Ok(report)
            }
            (Ok(_), Err(e)) => {
                self.transition(PipelineState::Failed);
                Err(e)
            }
            (Err(e), released) => {
                if let Err(release_err) = released {
                    tracing::warn!(error = %release_err, "backend release failed after error");
                }
                self.transition(PipelineState::Failed);
                Err(e)
            }
        }
    }

    fn acquire_and_run(
        &mut self,
        backend: &mut dyn RenderBackend,
        encoder: &mut dyn FrameEncoder,
        out_path: &Path,
    ) -> ScorecastResult<OverlayReport> {
        backend.acquire(self.opts.viewport)?;
        self.transition(PipelineState::BackendReady);

        let workspace = FrameWorkspace::create(self.opts.keep_frames)?;
        let produced = self.render_and_encode(backend, encoder, &workspace, out_path);
        let frames_dir = workspace.finish();

        let (stats, out_path) = produced?;
        Ok(OverlayReport {
            out_path,
            duration_secs: self.duration_secs(),
            fps: self.opts.fps,
            stats,
            frames_dir: frames_dir?,
        })
    }

    fn render_and_encode(
        &mut self,
        backend: &mut dyn RenderBackend,
        encoder: &mut dyn FrameEncoder,
        workspace: &FrameWorkspace,
        out_path: &Path,
    ) -> ScorecastResult<(RenderStats, PathBuf)> {
        self.transition(PipelineState::Rendering);
        let stats = self.render_frames(backend, workspace)?;

        self.transition(PipelineState::Encoding);
        let job = EncodeJob {
            frames_dir: workspace.path().to_path_buf(),
            frame_count: stats.frames_total,
            fps: self.opts.fps,
            out_path: out_path.to_path_buf(),
        };
        let written = encoder.encode(&job)?;
        Ok((stats, written))
    }

    fn render_frames(
        &self,
        backend: &mut dyn RenderBackend,
        workspace: &FrameWorkspace,
    ) -> ScorecastResult<RenderStats> {
        let fps = self.opts.fps;
        let total = self.total_frames();
        tracing::info!(
            frames = total,
            fps,
            duration = self.duration_secs(),
            dir = %workspace.path().display(),
            "generating frames"
        );
        self.warn_unresolved_placeholders();

        let mut cursor = self.timeline.cursor();
        let mut cache = FrameCache::new();

        for idx in FrameRange::from_total(total).iter() {
            let (event_idx, event) = cursor.resolve(idx.clock_secs(fps));
            let frame_path = workspace.frame_path(idx);

            match cache.decide(&event.params) {
                CacheDecision::Reuse(prev) => {
                    std::fs::copy(prev, &frame_path).with_context(|| {
                        format!(
                            "copy '{}' to '{}'",
                            prev.display(),
                            frame_path.display()
                        )
                    })?;
                    cache.record_reused(frame_path);
                }
                CacheDecision::Render => {
                    tracing::debug!(frame = idx.0, event = event_idx, "rendering frame");
                    let markup = self.template.fill(&self.globals, &event.params);
                    let raster = backend.render(&markup, self.opts.viewport)?;
                    let (raster, _) = trim_transparent_borders(raster);
                    raster
                        .save_with_format(&frame_path, image::ImageFormat::Png)
                        .with_context(|| format!("write frame '{}'", frame_path.display()))?;
                    cache.record_rendered(&event.params, frame_path);
                }
            }

            if self.opts.progress_every > 0 && idx.0 % self.opts.progress_every == 0 {
                tracing::info!(frame = idx.0, total, "progress");
            }
        }

        Ok(RenderStats {
            frames_total: total,
            frames_rendered: cache.rendered(),
            frames_reused: cache.reused(),
        })
    }

    fn warn_unresolved_placeholders(&self) {
        let first = &self.timeline.first().params;
        for name in self.template.placeholders() {
            if name != TIMESTAMP_COLUMN
                && !first.contains_key(name)
                && self.globals.get(name).is_none()
            {
                tracing::warn!(placeholder = name, "template placeholder has no value");
            }
        }
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!(from = ?self.state, to = ?next, "pipeline state");
        self.state = next;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/driver.rs"]
mod tests;
