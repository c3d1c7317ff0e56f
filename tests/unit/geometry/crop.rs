use super::*;

const DISPLAY: Size = Size::new(500.0, 400.0);

#[test]
fn initial_crop_is_centred_eighty_percent_square() {
    let crop = initial_crop(DISPLAY, 0.8, 100.0);
    assert_eq!(crop.width, 400.0);
    assert_eq!(crop.height, 400.0);
    // 80% of 500 is 400, which is exactly the height.
    assert_eq!((crop.x, crop.y), (50.0, 0.0));

    let tall = Size::new(300.0, 400.0);
    let crop = initial_crop(tall, 0.8, 100.0);
    assert_eq!(crop.width, 240.0);
    assert_eq!((crop.x, crop.y), (30.0, 80.0));
}

#[test]
fn initial_crop_clamps_to_height_on_wide_images() {
    let wide = Size::new(1000.0, 300.0);
    let crop = initial_crop(wide, 0.8, 100.0);
    assert_eq!(crop.width, 300.0);
    assert_eq!(crop.height, 300.0);
    assert!(crop.fits_within(wide, 1e-9));
    assert_eq!(crop.x, 350.0);
}

#[test]
fn constrain_locks_aspect_and_stays_inside() {
    let c = constrain(CropRegion::pixels(450.0, -20.0, 300.0, 120.0), DISPLAY, 100.0);
    assert_eq!(c.width, c.height);
    assert_eq!(c.width, 120.0);
    assert!(c.fits_within(DISPLAY, 0.0));
    assert_eq!((c.x, c.y), (380.0, 0.0));
}

#[test]
fn constrain_enforces_min_side_and_max_side() {
    let c = constrain(CropRegion::square(10.0, 10.0, 20.0), DISPLAY, 100.0);
    assert_eq!(c.width, 100.0);
    let c = constrain(CropRegion::square(0.0, 0.0, 900.0), DISPLAY, 100.0);
    assert_eq!(c.width, 400.0);

    let tiny = Size::new(60.0, 80.0);
    let c = constrain(CropRegion::square(0.0, 0.0, 10.0), tiny, 100.0);
    assert_eq!(c.width, 60.0);
}

#[test]
fn constrain_accepts_percent_units() {
    let pct = CropRegion {
        unit: CropUnit::Percent,
        x: 10.0,
        y: 10.0,
        width: 40.0,
        height: 50.0,
    };
    let c = constrain(pct, DISPLAY, 100.0);
    assert_eq!(c.unit, CropUnit::Pixels);
    assert_eq!(c.width, 200.0);
    assert_eq!(c.height, 200.0);
    assert_eq!((c.x, c.y), (50.0, 40.0));
}

#[test]
fn percent_and_pixel_conversions_agree() {
    let px = CropRegion::square(50.0, 40.0, 200.0);
    let pct = px.to_percent(DISPLAY);
    assert_eq!(pct.unit, CropUnit::Percent);
    assert_eq!(pct.width, 40.0);
    assert_eq!(pct.height, 50.0);
    assert_eq!(pct.to_pixels(DISPLAY), px);
}

#[test]
fn resize_bottom_right_grows_from_top_left_anchor() {
    let crop = CropRegion::square(100.0, 100.0, 150.0);
    let anchor = Corner::BottomRight.anchor_of(&crop);
    assert_eq!(anchor, Point::new(100.0, 100.0));
    let c = resize_from_anchor(
        Corner::BottomRight,
        anchor,
        Point::new(320.0, 280.0),
        DISPLAY,
        100.0,
    );
    assert_eq!((c.x, c.y, c.width, c.height), (100.0, 100.0, 220.0, 220.0));
}

#[test]
fn resize_top_left_is_clamped_by_image_edge() {
    let crop = CropRegion::square(100.0, 50.0, 150.0);
    let anchor = Corner::TopLeft.anchor_of(&crop);
    let c = resize_from_anchor(Corner::TopLeft, anchor, Point::new(-500.0, -500.0), DISPLAY, 100.0);
    // Anchor at (250, 200): reach is min(250, 200).
    assert_eq!(c.width, 200.0);
    assert_eq!(c.height, 200.0);
    assert_eq!((c.x, c.y), (50.0, 0.0));
    assert!(c.fits_within(DISPLAY, 0.0));
}

#[test]
fn resize_never_shrinks_below_min_side() {
    let crop = CropRegion::square(100.0, 100.0, 150.0);
    let anchor = Corner::TopRight.anchor_of(&crop);
    let c = resize_from_anchor(Corner::TopRight, anchor, anchor, DISPLAY, 100.0);
    assert_eq!(c.width, 100.0);
    assert_eq!(c.height, 100.0);
    assert_eq!((c.x, c.bottom()), (100.0, 250.0));
}

#[test]
fn fit_display_downscales_only() {
    let max = Size::new(512.0, 400.0);
    let fitted = fit_display(Size::new(1920.0, 1080.0), max).unwrap();
    assert!((fitted.width - 512.0).abs() < 1e-9);
    assert!((fitted.height - 288.0).abs() < 1e-9);
    assert_eq!(
        fit_display(Size::new(100.0, 50.0), max).unwrap(),
        Size::new(100.0, 50.0)
    );
    assert!(fit_display(Size::new(0.0, 50.0), max).is_err());
}
