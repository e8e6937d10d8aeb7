use image::{DynamicImage, GenericImageView as _};

/// What [`trim_transparent_borders`] did to a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimOutcome {
    /// Cropped to the bounding box of visible pixels.
    Trimmed { from: (u32, u32), to: (u32, u32) },
    /// The raster has no alpha channel; left as-is.
    NoAlpha,
    /// Every pixel has alpha 0; left as-is.
    FullyTransparent,
}

/// Inclusive bounding box of pixels with alpha > 0, as `(left, top, right, bottom)`.
pub fn alpha_bounding_box(img: &DynamicImage) -> Option<(u32, u32, u32, u32)> {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    let mut left = w;
    let mut top = h;
    let mut right = 0u32;
    let mut bottom = 0u32;
    let mut any = false;

    for (y, row) in rgba.rows().enumerate() {
        let y = y as u32;
        for (x, px) in row.enumerate() {
            if px.0[3] == 0 {
                continue;
            }
            let x = x as u32;
            any = true;
            left = left.min(x);
            right = right.max(x);
            top = top.min(y);
            bottom = bottom.max(y);
        }
    }

    any.then_some((left, top, right, bottom))
}

/// Crop fully transparent margins from a freshly rendered raster.
///
/// Rasters without alpha and fully transparent rasters are returned unchanged; both are logged at
/// warn level and never treated as errors.
pub fn trim_transparent_borders(img: DynamicImage) -> (DynamicImage, TrimOutcome) {
    if !img.color().has_alpha() {
        tracing::warn!("raster has no alpha channel, skipping border trim");
        return (img, TrimOutcome::NoAlpha);
    }

    let Some((left, top, right, bottom)) = alpha_bounding_box(&img) else {
        tracing::warn!("raster is completely transparent, skipping border trim");
        return (img, TrimOutcome::FullyTransparent);
    };

    let from = img.dimensions();
    let cropped = img.crop_imm(left, top, right - left + 1, bottom - top + 1);
    let to = cropped.dimensions();
    tracing::debug!(
        from_w = from.0,
        from_h = from.1,
        to_w = to.0,
        to_h = to.1,
        "cropped transparent borders"
    );
    (cropped, TrimOutcome::Trimmed { from, to })
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/trim.rs"]
mod tests;
