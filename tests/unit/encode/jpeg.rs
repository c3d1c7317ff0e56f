use super::*;

fn gradient(width: u32, height: u32) -> Surface {
    Surface::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

#[test]
fn encodes_decodable_jpeg_with_same_dimensions() {
    let bytes = encode_jpeg(&gradient(400, 400), 0.9).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (400, 400));
}

#[test]
fn lower_quality_produces_smaller_output() {
    let surface = gradient(256, 256);
    let high = encode_jpeg(&surface, 0.9).unwrap();
    let low = encode_jpeg(&surface, 0.2).unwrap();
    assert!(low.len() < high.len());
}

#[test]
fn empty_surface_is_rejected() {
    let err = encode_jpeg(&Surface::new(0, 0), 0.8).unwrap_err();
    assert!(matches!(err, AvatarError::Encode(_)));
}

#[test]
fn quality_mapping_clamps() {
    assert_eq!(jpeg_quality_percent(0.8), 80);
    assert_eq!(jpeg_quality_percent(0.9), 90);
    assert_eq!(jpeg_quality_percent(0.0), 1);
    assert_eq!(jpeg_quality_percent(2.0), 100);
    assert_eq!(jpeg_quality_percent(f32::NAN), 1);
}

#[test]
fn trait_object_dispatches_to_jpeg() {
    let encoder: Box<dyn AvatarEncoder> = Box::new(JpegAvatarEncoder);
    let bytes = encoder.encode(&gradient(8, 8), 0.8).unwrap();
    assert!(!bytes.is_empty());
}
