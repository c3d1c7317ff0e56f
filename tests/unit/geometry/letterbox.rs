use super::*;

#[test]
fn landscape_source_gets_top_and_bottom_bands() {
    let plan = plan_letterbox(1920, 1080, 400, 400).unwrap();
    assert_eq!(plan.width, 400);
    assert_eq!(plan.height, 225);
    assert_eq!(plan.x, 0);
    assert_eq!(plan.y, 87);
    let (left, right, top, bottom) = plan.bands();
    assert_eq!((left, right), (0, 0));
    assert_eq!((top, bottom), (87, 88));
}

#[test]
fn portrait_source_gets_left_and_right_bands() {
    let plan = plan_letterbox(600, 1200, 400, 400).unwrap();
    assert_eq!(plan.width, 200);
    assert_eq!(plan.height, 400);
    let (left, right, top, bottom) = plan.bands();
    assert_eq!((left, right), (100, 100));
    assert_eq!((top, bottom), (0, 0));
}

#[test]
fn small_square_source_is_upscaled_to_fill() {
    let plan = plan_letterbox(100, 100, 400, 400).unwrap();
    assert_eq!(plan.scale, 4.0);
    assert_eq!((plan.width, plan.height, plan.x, plan.y), (400, 400, 0, 0));
}

#[test]
fn small_landscape_source_is_upscaled_not_left_native() {
    let plan = plan_letterbox(200, 100, 400, 400).unwrap();
    assert_eq!(plan.scale, 2.0);
    assert_eq!((plan.width, plan.height), (400, 200));
    assert_eq!(plan.y, 100);
}

#[test]
fn extreme_aspect_keeps_at_least_one_pixel() {
    let plan = plan_letterbox(10_000, 1, 400, 400).unwrap();
    assert_eq!(plan.width, 400);
    assert_eq!(plan.height, 1);
}

#[test]
fn uniform_scale_preserves_aspect_within_rounding() {
    for (w, h) in [(1920u32, 1080u32), (1080, 1920), (333, 777), (4000, 3000)] {
        let plan = plan_letterbox(w, h, 400, 400).unwrap();
        let expected_w = f64::from(w) * plan.scale;
        let expected_h = f64::from(h) * plan.scale;
        assert!((f64::from(plan.width) - expected_w).abs() <= 0.5);
        assert!((f64::from(plan.height) - expected_h).abs() <= 0.5);
        assert!(plan.width == 400 || plan.height == 400);
    }
}

#[test]
fn zero_inputs_are_rejected() {
    assert!(plan_letterbox(0, 10, 400, 400).is_err());
    assert!(plan_letterbox(10, 10, 0, 400).is_err());
}
