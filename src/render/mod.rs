//! Rendering backends: markup in, raster with alpha out.

/// Backend trait and factory.
pub mod backend;
/// Headless Chromium screenshots for HTML templates.
pub mod chromium;
/// In-process SVG rasterization via `resvg`.
pub mod svg;
