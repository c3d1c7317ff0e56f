use crate::foundation::{
    core::{Point, Size},
    error::{AvatarError, AvatarResult},
};

/// Unit of a [`CropRegion`]'s coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropUnit {
    /// Display pixels.
    Pixels,
    /// Percent of the displayed width (x, width) or height (y, height).
    Percent,
}

/// Rectangle relative to the displayed image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRegion {
    /// Coordinate unit.
    pub unit: CropUnit,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl CropRegion {
    /// Pixel-unit region.
    pub const fn pixels(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Pixels,
            x,
            y,
            width,
            height,
        }
    }

    /// Square pixel-unit region.
    pub const fn square(x: f64, y: f64, side: f64) -> Self {
        Self::pixels(x, y, side, side)
    }

    /// Convert to display pixels.
    pub fn to_pixels(self, display: Size) -> Self {
        match self.unit {
            CropUnit::Pixels => self,
            CropUnit::Percent => Self::pixels(
                self.x * display.width / 100.0,
                self.y * display.height / 100.0,
                self.width * display.width / 100.0,
                self.height * display.height / 100.0,
            ),
        }
    }

    /// Convert to percent of the displayed size.
    pub fn to_percent(self, display: Size) -> Self {
        match self.unit {
            CropUnit::Percent => self,
            CropUnit::Pixels => Self {
                unit: CropUnit::Percent,
                x: self.x * 100.0 / display.width,
                y: self.y * 100.0 / display.height,
                width: self.width * 100.0 / display.width,
                height: self.height * 100.0 / display.height,
            },
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether a pixel-unit region lies inside `display`, within `eps`.
    pub fn fits_within(&self, display: Size, eps: f64) -> bool {
        self.x >= -eps
            && self.y >= -eps
            && self.right() <= display.width + eps
            && self.bottom() <= display.height + eps
    }
}

/// Resize handle of the crop rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    /// Top-left handle.
    TopLeft,
    /// Top-right handle.
    TopRight,
    /// Bottom-left handle.
    BottomLeft,
    /// Bottom-right handle.
    BottomRight,
}

impl Corner {
    /// Point of the corner opposite to this handle, which stays fixed while resizing.
    pub fn anchor_of(self, crop: &CropRegion) -> Point {
        match self {
            Self::TopLeft => Point::new(crop.right(), crop.bottom()),
            Self::TopRight => Point::new(crop.x, crop.bottom()),
            Self::BottomLeft => Point::new(crop.right(), crop.y),
            Self::BottomRight => Point::new(crop.x, crop.y),
        }
    }

    /// `(dx, dy)` signs pointing from the anchor towards this handle.
    fn direction(self) -> (f64, f64) {
        match self {
            Self::TopLeft => (-1.0, -1.0),
            Self::TopRight => (1.0, -1.0),
            Self::BottomLeft => (-1.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }
}

/// Fit a natural size inside `max` preserving aspect ratio. Never upscales.
pub fn fit_display(natural: Size, max: Size) -> AvatarResult<Size> {
    if natural.is_degenerate() || max.is_degenerate() {
        return Err(AvatarError::validation(
            "display fitting needs positive sizes",
        ));
    }
    let k = (max.width / natural.width)
        .min(max.height / natural.height)
        .min(1.0);
    Ok(Size::new(natural.width * k, natural.height * k))
}

/// Smallest allowed side: `min_side`, or the displayed short side when that is smaller.
pub(crate) fn effective_min_side(display: Size, min_side: f64) -> f64 {
    min_side.min(display.min_side()).max(0.0)
}

/// Centred square whose side is `fraction` of the displayed width, clamped to the height.
pub(crate) fn initial_crop(display: Size, fraction: f64, min_side: f64) -> CropRegion {
    let side = (display.width * fraction)
        .min(display.height)
        .max(effective_min_side(display, min_side));
    CropRegion::square(
        (display.width - side) / 2.0,
        (display.height - side) / 2.0,
        side,
    )
}

/// Force a pixel-unit region into a square inside `display`.
///
/// The side is the shorter of width/height, clamped to `[min_side, short display side]`;
/// the position is then shifted, not shrunk, to stay inside the image.
pub(crate) fn constrain(crop: CropRegion, display: Size, min_side: f64) -> CropRegion {
    let crop = crop.to_pixels(display);
    let max_side = display.min_side();
    let lo = effective_min_side(display, min_side);
    let side = finite_or(crop.width.min(crop.height), lo).clamp(lo, max_side);
    let x = finite_or(crop.x, 0.0).clamp(0.0, display.width - side);
    let y = finite_or(crop.y, 0.0).clamp(0.0, display.height - side);
    CropRegion::square(x, y, side)
}

/// Square grown from `anchor` towards `pointer` in the handle's direction, clamped to
/// the image and the minimum side.
pub(crate) fn resize_from_anchor(
    corner: Corner,
    anchor: Point,
    pointer: Point,
    display: Size,
    min_side: f64,
) -> CropRegion {
    let (sx, sy) = corner.direction();
    let reach_x = if sx > 0.0 {
        display.width - anchor.x
    } else {
        anchor.x
    };
    let reach_y = if sy > 0.0 {
        display.height - anchor.y
    } else {
        anchor.y
    };
    let max_side = reach_x.min(reach_y).max(0.0);
    let lo = effective_min_side(display, min_side).min(max_side);

    let want = ((pointer.x - anchor.x) * sx).max((pointer.y - anchor.y) * sy);
    let side = finite_or(want, lo).clamp(lo, max_side);

    let x = if sx > 0.0 { anchor.x } else { anchor.x - side };
    let y = if sy > 0.0 { anchor.y } else { anchor.y - side };
    CropRegion::square(x, y, side)
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/crop.rs"]
mod tests;
