use super::*;
use crate::geometry::letterbox::plan_letterbox;

const RED: image::Rgba<u8> = image::Rgba([220, 20, 30, 255]);

fn solid(width: u32, height: u32, px: image::Rgba<u8>) -> SourceImage {
    SourceImage::from_rgba(RgbaImage::from_pixel(width, height, px))
}

/// Deterministic, non-uniform test pattern.
fn pattern(width: u32, height: u32) -> SourceImage {
    SourceImage::from_rgba(RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([
            (x * 7 % 256) as u8,
            (y * 13 % 256) as u8,
            ((x + y) * 3 % 256) as u8,
            255,
        ])
    }))
}

fn spec(side: u32) -> OutputSpec {
    OutputSpec {
        width: side,
        height: side,
        ..OutputSpec::default()
    }
}

const WHITE: [u8; 3] = [255, 255, 255];

#[test]
fn letterbox_landscape_fills_bands_with_background() {
    let src = solid(1920, 1080, RED);
    let plan = plan_letterbox(1920, 1080, 400, 400).unwrap();
    let out = compose_letterbox(&src, &plan, Rgb8::WHITE).unwrap();
    assert_eq!(out.dimensions(), (400, 400));

    for x in [0, 200, 399] {
        assert_eq!(out.get_pixel(x, 0).0, WHITE);
        assert_eq!(out.get_pixel(x, 86).0, WHITE);
        assert_eq!(out.get_pixel(x, 87).0, [220, 20, 30]);
        assert_eq!(out.get_pixel(x, 311).0, [220, 20, 30]);
        assert_eq!(out.get_pixel(x, 312).0, WHITE);
        assert_eq!(out.get_pixel(x, 399).0, WHITE);
    }
}

#[test]
fn letterbox_placement_overflow_is_an_encode_error() {
    let src = solid(10, 10, RED);
    let base = plan_letterbox(10, 10, 40, 40).unwrap();
    for plan in [
        LetterboxPlan { x: u32::MAX, ..base },
        LetterboxPlan { y: u32::MAX, ..base },
    ] {
        assert!(matches!(
            compose_letterbox(&src, &plan, Rgb8::WHITE),
            Err(AvatarError::Encode(_))
        ));
    }
}

#[test]
fn letterbox_portrait_fills_side_bands() {
    let src = solid(300, 600, RED);
    let plan = plan_letterbox(300, 600, 400, 400).unwrap();
    let out = compose_letterbox(&src, &plan, Rgb8::WHITE).unwrap();
    assert_eq!(out.get_pixel(99, 200).0, WHITE);
    assert_eq!(out.get_pixel(100, 200).0, [220, 20, 30]);
    assert_eq!(out.get_pixel(299, 200).0, [220, 20, 30]);
    assert_eq!(out.get_pixel(300, 200).0, WHITE);
}

#[test]
fn letterbox_flattens_transparency_onto_background() {
    let src = solid(10, 10, image::Rgba([0, 0, 0, 0]));
    let plan = plan_letterbox(10, 10, 40, 40).unwrap();
    let out = compose_letterbox(&src, &plan, Rgb8::new(1, 2, 3)).unwrap();
    assert!(out.pixels().all(|p| p.0 == [1, 2, 3]));
}

#[test]
fn identity_transform_reproduces_crop_pixel_for_pixel() {
    let src = pattern(600, 500);
    let display = src.natural_size();
    let crop = CropRegion::square(57.0, 31.0, 400.0);
    let out = compose_crop(&src, &crop, display, &AvatarTransform::IDENTITY, &spec(400)).unwrap();

    for (u, v, px) in out.enumerate_pixels() {
        let s = src.pixels().get_pixel(57 + u, 31 + v).0;
        assert_eq!(px.0, [s[0], s[1], s[2]], "mismatch at ({u}, {v})");
    }
}

#[test]
fn display_coordinates_scale_to_natural() {
    let display = Size::new(300.0, 250.0);
    let natural = Size::new(600.0, 500.0);
    let rect = crop_to_natural(&CropRegion::square(10.0, 20.0, 100.0), display, natural).unwrap();
    assert_eq!(rect, Rect::new(20.0, 40.0, 220.0, 240.0));
}

#[test]
fn crop_outside_image_is_an_encode_error() {
    let display = Size::new(100.0, 100.0);
    let err = crop_to_natural(&CropRegion::square(150.0, 0.0, 10.0), display, display);
    assert!(matches!(err, Err(AvatarError::Encode(_))));
}

#[test]
fn transforms_pivot_on_output_centre() {
    let crop = Rect::new(100.0, 50.0, 300.0, 250.0);
    let out = Size::new(400.0, 400.0);
    let t = AvatarTransform {
        scale: 2.5,
        rotation_deg: 90.0,
    };
    let a = crop_affine(crop, &t, out);
    let mapped = a * crop.center();
    assert!((mapped.x - 200.0).abs() < 1e-9);
    assert!((mapped.y - 200.0).abs() < 1e-9);
}

#[test]
fn zoom_out_reveals_background_at_corners() {
    let src = solid(400, 400, RED);
    let crop = CropRegion::square(0.0, 0.0, 400.0);
    let t = AvatarTransform {
        scale: 0.5,
        rotation_deg: 0.0,
    };
    let out = compose_crop(&src, &crop, src.natural_size(), &t, &spec(400)).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, WHITE);
    assert_eq!(out.get_pixel(399, 399).0, WHITE);
    assert_eq!(out.get_pixel(200, 200).0, [220, 20, 30]);
    assert_eq!(out.get_pixel(99, 200).0, WHITE);
    assert_eq!(out.get_pixel(101, 200).0, [220, 20, 30]);
}

#[test]
fn rotation_by_45_degrees_exposes_corners() {
    let src = solid(400, 400, RED);
    let crop = CropRegion::square(0.0, 0.0, 400.0);
    let t = AvatarTransform {
        scale: 1.0,
        rotation_deg: 45.0,
    };
    let out = compose_crop(&src, &crop, src.natural_size(), &t, &spec(400)).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, WHITE);
    assert_eq!(out.get_pixel(200, 200).0, [220, 20, 30]);
}

#[test]
fn output_size_is_fixed_for_any_crop_shape() {
    let src = pattern(37, 91);
    let crop = CropRegion::square(3.0, 10.0, 20.0);
    let out = compose_crop(
        &src,
        &crop,
        src.natural_size(),
        &AvatarTransform::IDENTITY,
        &spec(400),
    )
    .unwrap();
    assert_eq!(out.dimensions(), (400, 400));
}

#[test]
fn degenerate_inputs_fail_with_encode_error() {
    let src = solid(10, 10, RED);
    let crop = CropRegion::square(0.0, 0.0, 10.0);
    let bad_scale = AvatarTransform {
        scale: 0.0,
        rotation_deg: 0.0,
    };
    assert!(matches!(
        compose_crop(&src, &crop, src.natural_size(), &bad_scale, &spec(40)),
        Err(AvatarError::Encode(_))
    ));
    assert!(matches!(
        compose_crop(
            &src,
            &crop,
            src.natural_size(),
            &AvatarTransform::IDENTITY,
            &spec(0)
        ),
        Err(AvatarError::Encode(_))
    ));
}
