//! Post-render raster normalization.

pub(crate) mod trim;
