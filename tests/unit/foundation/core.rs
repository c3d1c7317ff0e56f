use super::*;

#[test]
fn rgb8_hex_parses_long_and_short_forms() {
    assert_eq!(Rgb8::from_hex("#ffffff").unwrap(), Rgb8::WHITE);
    assert_eq!(Rgb8::from_hex("fff").unwrap(), Rgb8::WHITE);
    assert_eq!(Rgb8::from_hex("#102030").unwrap(), Rgb8::new(0x10, 0x20, 0x30));
    assert!(Rgb8::from_hex("#12345").is_err());
    assert!(Rgb8::from_hex("#gg0000").is_err());
}

#[test]
fn rgb8_hex_rejects_non_ascii_without_panicking() {
    for input in ["#a\u{e9}bcd", "#\u{20ac}", "\u{e9}\u{e9}\u{e9}"] {
        assert!(
            matches!(Rgb8::from_hex(input), Err(AvatarError::Validation(_))),
            "{input}"
        );
    }
}

#[test]
fn rgb8_serde_uses_hex_string() {
    let json = serde_json::to_string(&Rgb8::new(1, 2, 255)).unwrap();
    assert_eq!(json, "\"#0102ff\"");
    let back: Rgb8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Rgb8::new(1, 2, 255));
}

#[test]
fn size_degenerate_detection() {
    assert!(Size::new(0.0, 10.0).is_degenerate());
    assert!(Size::new(10.0, f64::NAN).is_degenerate());
    assert!(!Size::from_u32(1, 1).is_degenerate());
    assert_eq!(Size::new(30.0, 20.0).min_side(), 20.0);
}
