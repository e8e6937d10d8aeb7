use std::path::{Path, PathBuf};

use crate::timeline::store::ParamSet;

/// What the driver should do for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheDecision<'a> {
    /// Fill the template, render and trim.
    Render,
    /// Copy the bytes of this previously written frame.
    Reuse(&'a Path),
}

/// Tracks the previous frame's parameter set and raster file.
///
/// Invariant: after a frame is recorded, `last_raster_path` names that frame's file and its
/// content matches `last_params`. Identical parameter sets are assumed to render identically.
#[derive(Debug, Default)]
pub struct FrameCache {
    last_params: Option<ParamSet>,
    last_raster_path: Option<PathBuf>,
    rendered: u64,
    reused: u64,
}

impl FrameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decide(&self, params: &ParamSet) -> CacheDecision<'_> {
        match (&self.last_params, &self.last_raster_path) {
            (Some(last), Some(path)) if last == params => CacheDecision::Reuse(path.as_path()),
            _ => CacheDecision::Render,
        }
    }

    /// Record a fresh render of `params` written to `path`.
    pub fn record_rendered(&mut self, params: &ParamSet, path: PathBuf) {
        self.last_params = Some(params.clone());
        self.last_raster_path = Some(path);
        self.rendered += 1;
    }

    /// Record that the previous raster was copied to `path`.
    pub fn record_reused(&mut self, path: PathBuf) {
        self.last_raster_path = Some(path);
        self.reused += 1;
    }

    pub fn last_params(&self) -> Option<&ParamSet> {
        self.last_params.as_ref()
    }

    pub fn last_raster_path(&self) -> Option<&Path> {
        self.last_raster_path.as_deref()
    }

    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    pub fn reused(&self) -> u64 {
        self.reused
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/frame_cache.rs"]
mod tests;
