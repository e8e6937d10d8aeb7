use image::DynamicImage;

use crate::{
    foundation::{core::Viewport, error::ScorecastResult},
    render::{
        chromium::{ChromiumBackend, ChromiumBackendOpts},
        svg::{SvgBackend, SvgBackendOpts},
    },
};

/// A markup-to-raster engine.
///
/// Lifecycle: the pipeline calls [`RenderBackend::acquire`] once before the first frame and
/// [`RenderBackend::release`] exactly once when the run ends, whether it succeeded or not.
/// [`RenderBackend::render`] blocks until the document has finished loading and must be
/// deterministic for identical markup, since the frame cache reuses rasters on that assumption.
pub trait RenderBackend {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Prepare for a run at a fixed viewport.
    fn acquire(&mut self, _viewport: Viewport) -> ScorecastResult<()> {
        Ok(())
    }

    /// Render `markup` into a `viewport`-sized raster with an alpha channel.
    fn render(&mut self, markup: &str, viewport: Viewport) -> ScorecastResult<DynamicImage>;

    /// Free everything acquired for the run.
    fn release(&mut self) -> ScorecastResult<()> {
        Ok(())
    }
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// SVG templates rasterized in-process.
    #[default]
    Svg,
    /// HTML templates screenshotted by a headless Chromium binary.
    Chromium,
}

/// Settings for every backend kind; only the selected kind's entry is used.
#[derive(Clone, Debug, Default)]
pub struct BackendOpts {
    pub svg: SvgBackendOpts,
    pub chromium: ChromiumBackendOpts,
}

/// Create a rendering backend implementation.
pub fn create_backend(
    kind: BackendKind,
    opts: &BackendOpts,
) -> ScorecastResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Svg => Ok(Box::new(SvgBackend::new(opts.svg.clone()))),
        BackendKind::Chromium => Ok(Box::new(ChromiumBackend::new(opts.chromium.clone()))),
    }
}
