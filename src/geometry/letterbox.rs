//! Automatic-mode placement: uniform scale-to-fit, centred on the output surface.

use crate::foundation::error::{AvatarError, AvatarResult};

/// Where the scaled source lands on the output surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LetterboxPlan {
    /// Uniform scale applied to both axes.
    pub scale: f64,
    /// Placed image width in whole pixels.
    pub width: u32,
    /// Placed image height in whole pixels.
    pub height: u32,
    /// Left offset on the surface.
    pub x: u32,
    /// Top offset on the surface.
    pub y: u32,
    /// Surface width.
    pub surface_width: u32,
    /// Surface height.
    pub surface_height: u32,
}

impl LetterboxPlan {
    /// Background band widths as `(left, right, top, bottom)`.
    pub fn bands(&self) -> (u32, u32, u32, u32) {
        (
            self.x,
            self.surface_width - self.x - self.width,
            self.y,
            self.surface_height - self.y - self.height,
        )
    }
}

/// Plan the automatic resize.
///
/// The scale is `min(max_w / w, max_h / h)`, so the constraining side exactly fills its
/// bound. Sources smaller than the bounds are upscaled. The placed size is rounded to whole
/// pixels and centred; an odd remainder leaves the extra background pixel on the
/// right/bottom.
pub fn plan_letterbox(
    natural_width: u32,
    natural_height: u32,
    max_width: u32,
    max_height: u32,
) -> AvatarResult<LetterboxPlan> {
    if natural_width == 0 || natural_height == 0 {
        return Err(AvatarError::validation("source image has zero size"));
    }
    if max_width == 0 || max_height == 0 {
        return Err(AvatarError::validation("letterbox bounds must be non-zero"));
    }

    let sx = f64::from(max_width) / f64::from(natural_width);
    let sy = f64::from(max_height) / f64::from(natural_height);
    let scale = sx.min(sy);

    let fit = |natural: u32, bound: u32| -> u32 {
        ((f64::from(natural) * scale).round() as u32).clamp(1, bound)
    };
    let width = fit(natural_width, max_width);
    let height = fit(natural_height, max_height);

    let plan = LetterboxPlan {
        scale,
        width,
        height,
        x: (max_width - width) / 2,
        y: (max_height - height) / 2,
        surface_width: max_width,
        surface_height: max_height,
    };
    tracing::debug!(?plan, "letterbox planned");
    Ok(plan)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/letterbox.rs"]
mod tests;
