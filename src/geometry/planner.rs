use crate::{
    config::PlannerLimits,
    foundation::{
        core::{Point, Size},
        error::{AvatarError, AvatarResult},
        math::quantize,
    },
    geometry::crop::{self, Corner, CropRegion},
};

/// Zoom and rotation applied around the output centre.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AvatarTransform {
    /// Uniform zoom factor.
    pub scale: f64,
    /// Clockwise rotation in degrees.
    pub rotation_deg: f64,
}

impl Default for AvatarTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AvatarTransform {
    /// No zoom, no rotation.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        rotation_deg: 0.0,
    };

    /// Returns `true` for scale 1 and rotation 0.
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.rotation_deg == 0.0
    }

    /// Rotation in radians.
    pub fn rotation_rad(&self) -> f64 {
        self.rotation_deg.to_radians()
    }
}

/// Interactive crop/zoom/rotate state for one displayed image.
///
/// The live crop follows every drag; only [`CropPlanner::commit`] records it as the
/// completed crop that the compositor may use.
#[derive(Clone, Debug)]
pub struct CropPlanner {
    display: Size,
    limits: PlannerLimits,
    crop: CropRegion,
    completed: Option<CropRegion>,
    transform: AvatarTransform,
}

impl CropPlanner {
    /// Start editing an image shown at `display` size with the initial centred crop.
    pub fn new(display: Size, limits: PlannerLimits) -> AvatarResult<Self> {
        if display.is_degenerate() {
            return Err(AvatarError::validation(format!(
                "display size must be positive, got {}x{}",
                display.width, display.height
            )));
        }
        limits.validate()?;
        let crop = crop::initial_crop(display, limits.initial_fraction, limits.min_side);
        let shown = display;
        tracing::debug!(?shown, ?crop, "crop planner initialised");
        Ok(Self {
            display,
            limits,
            crop,
            completed: None,
            transform: AvatarTransform::IDENTITY,
        })
    }

    /// Displayed image size.
    pub fn display(&self) -> Size {
        self.display
    }

    /// Live crop in display pixels.
    pub fn crop(&self) -> CropRegion {
        self.crop
    }

    /// Live crop in percent of the displayed size.
    pub fn crop_percent(&self) -> CropRegion {
        self.crop.to_percent(self.display)
    }

    /// Last committed crop, if any.
    pub fn completed_crop(&self) -> Option<CropRegion> {
        self.completed
    }

    /// Current zoom/rotation.
    pub fn transform(&self) -> AvatarTransform {
        self.transform
    }

    /// The crop a fresh planner or [`CropPlanner::reset`] starts from.
    pub fn initial_crop(&self) -> CropRegion {
        crop::initial_crop(
            self.display,
            self.limits.initial_fraction,
            self.limits.min_side,
        )
    }

    /// Replace the live crop; the region is squared and pulled inside the image.
    pub fn set_crop(&mut self, region: CropRegion) -> CropRegion {
        self.crop = crop::constrain(region, self.display, self.limits.min_side);
        self.crop
    }

    /// Drag the live crop by `(dx, dy)` display pixels.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> CropRegion {
        let moved = CropRegion::square(self.crop.x + dx, self.crop.y + dy, self.crop.width);
        self.set_crop(moved)
    }

    /// Drag a corner handle to `pointer`; the opposite corner stays put.
    pub fn resize_corner(&mut self, corner: Corner, pointer: Point) -> CropRegion {
        let anchor = corner.anchor_of(&self.crop);
        self.crop = crop::resize_from_anchor(
            corner,
            anchor,
            pointer,
            self.display,
            self.limits.min_side,
        );
        self.crop
    }

    /// Record the live crop as completed (end of a drag/resize gesture).
    pub fn commit(&mut self) -> CropRegion {
        self.completed = Some(self.crop);
        self.crop
    }

    /// Set the zoom, clamped and snapped to the slider step. Returns the applied value.
    pub fn set_scale(&mut self, scale: f64) -> f64 {
        self.transform.scale = quantize(
            scale,
            self.limits.scale_min,
            self.limits.scale_max,
            self.limits.scale_step,
        );
        self.transform.scale
    }

    /// Set the rotation, clamped and snapped to the slider step. Returns the applied value.
    pub fn set_rotation(&mut self, degrees: f64) -> f64 {
        self.transform.rotation_deg = quantize(
            degrees,
            self.limits.rotation_min,
            self.limits.rotation_max,
            self.limits.rotation_step,
        );
        self.transform.rotation_deg
    }

    /// Restore the initial centred crop and the identity transform.
    ///
    /// A previously committed crop is replaced by the initial one so confirm matches
    /// what is shown; a planner that never committed stays uncommitted.
    pub fn reset(&mut self) {
        self.crop = self.initial_crop();
        self.transform = AvatarTransform::IDENTITY;
        if self.completed.is_some() {
            self.completed = Some(self.crop);
        }
        tracing::debug!(crop = ?self.crop, "crop planner reset");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/planner.rs"]
mod tests;
