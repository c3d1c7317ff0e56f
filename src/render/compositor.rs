use image::{RgbImage, RgbaImage, imageops::FilterType};

use crate::{
    assets::decode::SourceImage,
    config::OutputSpec,
    foundation::{
        core::{Affine, Point, Rect, Rgb8, Size, Vec2},
        error::{AvatarError, AvatarResult},
        math::blend_over_opaque,
    },
    geometry::{crop::CropRegion, letterbox::LetterboxPlan, planner::AvatarTransform},
};

/// Opaque output surface. Every pixel starts as the background fill.
pub type Surface = RgbImage;

fn new_surface(width: u32, height: u32, background: Rgb8) -> AvatarResult<Surface> {
    if width == 0 || height == 0 {
        return Err(AvatarError::encode(format!(
            "output surface must be non-empty, got {width}x{height}"
        )));
    }
    Ok(RgbImage::from_pixel(width, height, background.to_pixel()))
}

/// Automatic path: scale the whole source by the plan and centre it on a filled surface.
pub fn compose_letterbox(
    source: &SourceImage,
    plan: &LetterboxPlan,
    background: Rgb8,
) -> AvatarResult<Surface> {
    let mut surface = new_surface(plan.surface_width, plan.surface_height, background)?;
    if plan.width == 0
        || plan.height == 0
        || plan.x.checked_add(plan.width).is_none_or(|r| r > plan.surface_width)
        || plan.y.checked_add(plan.height).is_none_or(|b| b > plan.surface_height)
    {
        return Err(AvatarError::encode(format!(
            "letterbox placement {}x{}+{}+{} exceeds {}x{} surface",
            plan.width, plan.height, plan.x, plan.y, plan.surface_width, plan.surface_height
        )));
    }

    let scaled = image::imageops::resize(
        source.pixels(),
        plan.width,
        plan.height,
        FilterType::CatmullRom,
    );
    for (sx, sy, px) in scaled.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let dst = surface.get_pixel_mut(plan.x + sx, plan.y + sy);
        dst.0 = [
            blend_over_opaque(r, a, dst.0[0]),
            blend_over_opaque(g, a, dst.0[1]),
            blend_over_opaque(b, a, dst.0[2]),
        ];
    }
    Ok(surface)
}

/// Map a display-pixel crop onto natural bitmap coordinates, clipped to the bitmap.
pub fn crop_to_natural(crop: &CropRegion, display: Size, natural: Size) -> AvatarResult<Rect> {
    if display.is_degenerate() || natural.is_degenerate() {
        return Err(AvatarError::encode("crop conversion needs positive sizes"));
    }
    let crop = crop.to_pixels(display);
    let kx = natural.width / display.width;
    let ky = natural.height / display.height;
    let rect = Rect::new(
        (crop.x * kx).max(0.0),
        (crop.y * ky).max(0.0),
        (crop.right() * kx).min(natural.width),
        (crop.bottom() * ky).min(natural.height),
    );
    if !(rect.width() > 0.0 && rect.height() > 0.0) {
        return Err(AvatarError::encode(format!(
            "crop {crop:?} does not intersect the image"
        )));
    }
    Ok(rect)
}

/// Forward map from natural bitmap coordinates to output coordinates.
///
/// The crop rectangle is stretched onto the full output, then zoom and rotation pivot
/// around the output centre: `T(c) * R * S * T(-c) * D`.
pub fn crop_affine(natural_crop: Rect, transform: &AvatarTransform, out: Size) -> Affine {
    let center = Vec2::new(out.width / 2.0, out.height / 2.0);
    let draw = Affine::scale_non_uniform(
        out.width / natural_crop.width(),
        out.height / natural_crop.height(),
    ) * Affine::translate(-natural_crop.origin().to_vec2());

    Affine::translate(center)
        * Affine::rotate(transform.rotation_rad())
        * Affine::scale(transform.scale)
        * Affine::translate(-center)
        * draw
}

/// Interactive path: draw the committed crop with zoom/rotation onto a filled surface.
#[tracing::instrument(skip(source, display, spec), fields(src_w = source.width(), src_h = source.height()))]
pub fn compose_crop(
    source: &SourceImage,
    crop: &CropRegion,
    display: Size,
    transform: &AvatarTransform,
    spec: &OutputSpec,
) -> AvatarResult<Surface> {
    let mut surface = new_surface(spec.width, spec.height, spec.background)?;
    if !(transform.scale.is_finite() && transform.scale > 0.0 && transform.rotation_deg.is_finite())
    {
        return Err(AvatarError::encode(format!(
            "transform is not invertible: {transform:?}"
        )));
    }

    let natural = crop_to_natural(crop, display, source.natural_size())?;
    let out = Size::from_u32(spec.width, spec.height);
    let inverse = crop_affine(natural, transform, out).inverse();

    let sampler = CropSampler::new(source.pixels(), natural);
    let bg = [spec.background.r, spec.background.g, spec.background.b];
    for (u, v, dst) in surface.enumerate_pixels_mut() {
        let p = inverse * Point::new(f64::from(u) + 0.5, f64::from(v) + 0.5);
        if !sampler.contains(p) {
            continue;
        }
        let [r, g, b, a] = sampler.sample(p);
        let inv_a = 1.0 - a;
        for (c, (premul, bg)) in dst.0.iter_mut().zip([r, g, b].into_iter().zip(bg)) {
            *c = (premul + f32::from(bg) * inv_a).round().clamp(0.0, 255.0) as u8;
        }
    }
    let shown = display;
    tracing::debug!(?shown, ?natural, ?transform, "crop composited");
    Ok(surface)
}

/// Bilinear sampler restricted to the pixels covered by a crop rectangle.
struct CropSampler<'a> {
    img: &'a RgbaImage,
    rect: Rect,
    min: (i64, i64),
    max: (i64, i64),
}

impl<'a> CropSampler<'a> {
    fn new(img: &'a RgbaImage, rect: Rect) -> Self {
        let last_x = i64::from(img.width()) - 1;
        let last_y = i64::from(img.height()) - 1;
        Self {
            img,
            rect,
            min: (
                (rect.x0.floor() as i64).clamp(0, last_x),
                (rect.y0.floor() as i64).clamp(0, last_y),
            ),
            max: (
                (rect.x1.ceil() as i64 - 1).clamp(0, last_x),
                (rect.y1.ceil() as i64 - 1).clamp(0, last_y),
            ),
        }
    }

    fn contains(&self, p: Point) -> bool {
        p.x >= self.rect.x0 && p.x < self.rect.x1 && p.y >= self.rect.y0 && p.y < self.rect.y1
    }

    /// Premultiplied `[r, g, b]` in 0..=255 plus alpha in 0..=1.
    fn sample(&self, p: Point) -> [f32; 4] {
        let fx = p.x - 0.5;
        let fy = p.y - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = (fx - x0) as f32;
        let ty = (fy - y0) as f32;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let xa = x0.clamp(self.min.0, self.max.0) as u32;
        let xb = (x0 + 1).clamp(self.min.0, self.max.0) as u32;
        let ya = y0.clamp(self.min.1, self.max.1) as u32;
        let yb = (y0 + 1).clamp(self.min.1, self.max.1) as u32;

        let texel = |x: u32, y: u32| -> [f32; 4] {
            let [r, g, b, a] = self.img.get_pixel(x, y).0;
            let af = f32::from(a) / 255.0;
            [f32::from(r) * af, f32::from(g) * af, f32::from(b) * af, af]
        };
        let lerp = |a: [f32; 4], b: [f32; 4], t: f32| -> [f32; 4] {
            let mut out = [0.0; 4];
            for i in 0..4 {
                out[i] = a[i] * (1.0 - t) + b[i] * t;
            }
            out
        };

        let top = lerp(texel(xa, ya), texel(xb, ya), tx);
        let bottom = lerp(texel(xa, yb), texel(xb, yb), tx);
        lerp(top, bottom, ty)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
