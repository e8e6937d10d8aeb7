use std::{path::PathBuf, sync::Arc};

use image::{DynamicImage, RgbaImage};

use crate::{
    foundation::{
        core::Viewport,
        error::{ScorecastError, ScorecastResult},
    },
    render::backend::RenderBackend,
};

#[derive(Clone, Debug, Default)]
pub struct SvgBackendOpts {
    /// Directory used to resolve relative `href`s (images, nested SVGs).
    pub resources_dir: Option<PathBuf>,
    /// Extra font directory loaded next to the system fonts.
    pub font_dir: Option<PathBuf>,
}

/// Rasterizes SVG markup with `resvg`.
///
/// Document units map 1:1 onto viewport pixels; anything outside the viewport is clipped and the
/// background stays transparent.
pub struct SvgBackend {
    opts: SvgBackendOpts,
    fontdb: Option<Arc<usvg::fontdb::Database>>,
}

impl SvgBackend {
    pub fn new(opts: SvgBackendOpts) -> Self {
        Self { opts, fontdb: None }
    }

    fn build_fontdb(&self) -> Arc<usvg::fontdb::Database> {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = self.opts.font_dir.as_deref() {
            if dir.is_dir() {
                db.load_fonts_dir(dir);
            } else {
                tracing::warn!(dir = %dir.display(), "font directory does not exist");
            }
        }
        tracing::debug!(faces = db.len(), "loaded svg font database");
        Arc::new(db)
    }
}

impl RenderBackend for SvgBackend {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn acquire(&mut self, _viewport: Viewport) -> ScorecastResult<()> {
        self.fontdb = Some(self.build_fontdb());
        Ok(())
    }

    fn render(&mut self, markup: &str, viewport: Viewport) -> ScorecastResult<DynamicImage> {
        let fontdb = match self.fontdb.as_ref() {
            Some(db) => db.clone(),
            None => {
                let db = self.build_fontdb();
                self.fontdb = Some(db.clone());
                db
            }
        };

        let opts = usvg::Options {
            resources_dir: self.opts.resources_dir.clone(),
            fontdb,
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(markup, &opts)
            .map_err(|e| ScorecastError::render_backend(format!("parse svg markup: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(viewport.width, viewport.height)
            .ok_or_else(|| ScorecastError::render_backend("failed to allocate svg pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        // tiny-skia stores premultiplied pixels; image buffers are straight alpha.
        let mut straight = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            straight.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        let img = RgbaImage::from_raw(viewport.width, viewport.height, straight)
            .ok_or_else(|| ScorecastError::render_backend("svg pixmap size mismatch"))?;
        Ok(DynamicImage::ImageRgba8(img))
    }

    fn release(&mut self) -> ScorecastResult<()> {
        self.fontdb = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
